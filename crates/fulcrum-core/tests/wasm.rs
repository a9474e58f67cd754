//! WASM-target tests for fulcrum-core.
//!
//! Runs the EventBus, ChatStore and ChatSession paths under
//! wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use fulcrum_core::auth::AuthSession;
use fulcrum_core::event_bus::EventBus;
use fulcrum_core::ports::*;
use fulcrum_core::session::{ChatSession, SendOutcome};
use fulcrum_core::store::ChatStore;
use fulcrum_types::conversation::ConversationPatch;
use fulcrum_types::event::ChatEvent;
use fulcrum_types::message::ChatMessage;
use fulcrum_types::route::Route;
use fulcrum_types::{ChatError, Result};

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use async_trait::async_trait;

// ─── Mocks ───────────────────────────────────────────────

#[derive(Default)]
struct MockStorage {
    slots: RefCell<HashMap<String, String>>,
}

#[async_trait(?Send)]
impl StoragePort for MockStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct TickClock(Cell<i64>);

impl Clock for TickClock {
    fn now_millis(&self) -> i64 {
        let now = self.0.get();
        self.0.set(now + 1);
        now
    }
}

struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: &Route) -> Result<()> {
        Ok(())
    }
}

struct EchoCompletion;

#[async_trait(?Send)]
impl CompletionPort for EchoCompletion {
    async fn send_message(&self, message: &str, _token: Option<&str>) -> Result<String> {
        Ok(format!("echo: {}", message))
    }
}

struct FailingCompletion;

#[async_trait(?Send)]
impl CompletionPort for FailingCompletion {
    async fn send_message(&self, _message: &str, _token: Option<&str>) -> Result<String> {
        Err(ChatError::Api {
            status: 500,
            message: "Request failed: 500".to_string(),
        })
    }
}

async fn services(storage: Rc<MockStorage>) -> (ChatStore, AuthSession, EventBus) {
    let bus = EventBus::new();
    let clock = Rc::new(TickClock(Cell::new(1_000)));
    let store = ChatStore::load(storage.clone(), clock.clone(), "chats", bus.clone()).await;
    let auth = AuthSession::restore(storage, clock, "token", bus.clone()).await;
    (store, auth, bus)
}

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(ChatEvent::SendStarted);
    bus.emit(ChatEvent::SendFinished);

    assert!(bus.has_pending());
    assert_eq!(bus.drain().len(), 2);
    assert!(!bus.has_pending());
}

#[wasm_bindgen_test]
fn event_bus_multiple_emits() {
    let bus = EventBus::new();
    for i in 0..100 {
        bus.emit(ChatEvent::ConversationUpdated { id: format!("chat-{}", i) });
    }
    assert_eq!(bus.drain().len(), 100);
}

// ─── ChatStore Tests ─────────────────────────────────────

#[wasm_bindgen_test]
async fn store_persists_across_reload() {
    let storage = Rc::new(MockStorage::default());
    let (store, _, _) = services(storage.clone()).await;
    let id = store.create(None).await;
    store
        .update(&id, ConversationPatch::new().title("Saved"))
        .await;

    let (reloaded, _, _) = services(storage).await;
    assert_eq!(reloaded.get(&id).unwrap().title, "Saved");
}

#[wasm_bindgen_test]
async fn store_recency_order() {
    let (store, _, _) = services(Rc::new(MockStorage::default())).await;
    store.create(Some("a".to_string())).await;
    store.create(Some("b".to_string())).await;
    store.update("a", ConversationPatch::new()).await;

    let ids: Vec<String> = store.ordered_by_recency().map(|c| c.id).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[wasm_bindgen_test]
async fn store_delete_all() {
    let storage = Rc::new(MockStorage::default());
    let (store, _, _) = services(storage.clone()).await;
    store.create(None).await;
    store.delete_all().await;
    assert!(store.is_empty());
    assert!(storage.slots.borrow().get("chats").is_none());
}

// ─── ChatSession Tests (async) ───────────────────────────

#[wasm_bindgen_test]
async fn session_first_reply_creates_conversation() {
    let (store, auth, bus) = services(Rc::new(MockStorage::default())).await;
    let session = ChatSession::new(
        Route::Home,
        store.clone(),
        auth,
        Rc::new(EchoCompletion),
        Rc::new(NoopNavigator),
        bus,
    );

    let outcome = session.send("Hello").await;
    let SendOutcome::Delivered { conversation_id, created, .. } = outcome else {
        panic!("expected delivery");
    };
    assert!(created);
    assert_eq!(session.route(), Route::chat(conversation_id.clone()));

    let chat = store.get(&conversation_id).unwrap();
    assert_eq!(chat.title, "Hello");
    assert_eq!(
        chat.messages,
        vec![ChatMessage::user("Hello"), ChatMessage::assistant("echo: Hello")]
    );
}

#[wasm_bindgen_test]
async fn session_failure_without_conversation() {
    let (store, auth, bus) = services(Rc::new(MockStorage::default())).await;
    let session = ChatSession::new(
        Route::Home,
        store.clone(),
        auth,
        Rc::new(FailingCompletion),
        Rc::new(NoopNavigator),
        bus,
    );

    let outcome = session.send("Hello").await;
    assert!(matches!(outcome, SendOutcome::Failed { persisted_to: None, .. }));
    assert!(store.is_empty());
    assert_eq!(
        session.transcript()[1],
        ChatMessage::assistant("Error: Request failed: 500")
    );
    assert!(!session.is_sending());
}

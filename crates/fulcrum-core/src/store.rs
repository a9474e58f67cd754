//! Persisted conversation store.
//!
//! The in-memory list is the single source of truth while the app runs.
//! Every mutation rewrites the whole JSON array into one storage slot
//! before returning, so a reload always reproduces the last successful write.
//! Storage failures are logged and swallowed; a corrupt blob starts the
//! store empty.

use std::cell::RefCell;
use std::rc::Rc;

use fulcrum_types::{
    conversation::{generate_id, Conversation, ConversationPatch, ConversationSummary},
    event::ChatEvent,
    message::ChatMessage,
};
use crate::event_bus::EventBus;
use crate::ports::{Clock, StoragePort};

/// Clone-cheap handle; all clones see the same conversations.
#[derive(Clone)]
pub struct ChatStore {
    /// Enumeration order; newest insert at the head
    chats: Rc<RefCell<Vec<Conversation>>>,
    storage: Rc<dyn StoragePort>,
    clock: Rc<dyn Clock>,
    key: Rc<str>,
    event_bus: EventBus,
}

impl ChatStore {
    /// Hydrate the store from the `key` slot.
    pub async fn load(
        storage: Rc<dyn StoragePort>,
        clock: Rc<dyn Clock>,
        key: &str,
        event_bus: EventBus,
    ) -> Self {
        let store = Self {
            chats: Rc::new(RefCell::new(Vec::new())),
            storage,
            clock,
            key: Rc::from(key),
            event_bus,
        };
        store.reload().await;
        store
    }

    /// Replace in-memory state with whatever the slot currently holds.
    pub async fn reload(&self) {
        let chats = self.read_slot().await;
        let count = chats.len();
        *self.chats.borrow_mut() = chats;
        log::info!(
            "Chat store hydrated from {} ({} conversations)",
            self.storage.backend_name(),
            count
        );
        self.event_bus.emit(ChatEvent::StoreLoaded { count });
    }

    async fn read_slot(&self) -> Vec<Conversation> {
        let raw = match self.storage.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("Chat store unreadable ({}), starting empty", e);
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Conversation>>(&raw) {
            Ok(chats) => chats,
            Err(e) => {
                log::warn!("Discarding corrupt chat store blob: {}", e);
                Vec::new()
            }
        }
    }

    /// Write the full list back. The snapshot is taken before awaiting,
    /// so no borrow is held across the storage call.
    async fn persist(&self) {
        let json = match serde_json::to_string(&*self.chats.borrow()) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize chat store: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &json).await {
            log::warn!("Failed to persist chat store: {}", e);
        }
    }

    pub fn get(&self, id: &str) -> Option<Conversation> {
        self.chats.borrow().iter().find(|c| c.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.chats.borrow().iter().any(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.chats.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.borrow().is_empty()
    }

    /// A fresh, unused-looking id. Collisions are not checked.
    pub fn allocate_id(&self) -> String {
        generate_id(self.clock.now_millis())
    }

    /// Insert an empty conversation and return its id.
    ///
    /// A supplied id that already exists is replaced, not merged; the new
    /// record moves to the head of enumeration order.
    pub async fn create(&self, id: Option<String>) -> String {
        let id = id.unwrap_or_else(|| self.allocate_id());
        let chat = Conversation::new(id, self.clock.now_millis());
        self.insert(chat).await
    }

    /// Insert conversation `id` already carrying its title and messages.
    ///
    /// The record is in memory before the first await, so writes that land
    /// while the blob is being persisted queue up behind these messages.
    pub async fn create_with(
        &self,
        id: String,
        title: impl Into<String>,
        messages: Vec<ChatMessage>,
    ) -> String {
        let mut chat = Conversation::new(id, self.clock.now_millis());
        chat.title = title.into();
        chat.messages = messages;
        self.insert(chat).await
    }

    async fn insert(&self, chat: Conversation) -> String {
        let id = chat.id.clone();
        {
            let mut chats = self.chats.borrow_mut();
            chats.retain(|c| c.id != id);
            chats.insert(0, chat);
        }
        self.persist().await;
        log::info!("Created conversation {}", id);
        self.event_bus.emit(ChatEvent::ConversationCreated { id: id.clone() });
        id
    }

    /// Apply `patch` to conversation `id`.
    ///
    /// Returns whether a record was updated. An absent id is a silent
    /// no-op: nothing is written and no error is raised.
    pub async fn update(&self, id: &str, patch: ConversationPatch) -> bool {
        let now = self.clock.now_millis();
        self.mutate(id, |chat| chat.apply(patch, now)).await
    }

    /// Append `messages` onto the stored transcript of `id`.
    ///
    /// The read-modify-write happens in one synchronous section, so two
    /// replies landing on the same conversation both survive.
    pub async fn append_messages(&self, id: &str, messages: Vec<ChatMessage>) -> bool {
        let now = self.clock.now_millis();
        self.mutate(id, |chat| {
            chat.messages.extend(messages);
            chat.touch(now);
        })
        .await
    }

    async fn mutate(&self, id: &str, f: impl FnOnce(&mut Conversation)) -> bool {
        let applied = {
            let mut chats = self.chats.borrow_mut();
            match chats.iter_mut().find(|c| c.id == id) {
                Some(chat) => {
                    f(chat);
                    true
                }
                None => false,
            }
        };
        if !applied {
            log::debug!("Ignoring write to missing conversation {}", id);
            return false;
        }
        self.persist().await;
        self.event_bus.emit(ChatEvent::ConversationUpdated { id: id.to_string() });
        true
    }

    /// Remove conversation `id`. Returns whether anything was removed.
    pub async fn delete(&self, id: &str) -> bool {
        let removed = {
            let mut chats = self.chats.borrow_mut();
            let before = chats.len();
            chats.retain(|c| c.id != id);
            chats.len() != before
        };
        self.persist().await;
        if removed {
            self.event_bus.emit(ChatEvent::ConversationDeleted { id: id.to_string() });
        }
        removed
    }

    /// Clear everything and drop the durable slot itself.
    pub async fn delete_all(&self) {
        self.chats.borrow_mut().clear();
        if let Err(e) = self.storage.delete(&self.key).await {
            log::warn!("Failed to remove chat store slot: {}", e);
        }
        self.event_bus.emit(ChatEvent::ConversationsCleared);
    }

    /// All conversations, most recently updated first.
    ///
    /// The sort is stable, so ties keep enumeration order. The returned
    /// iterator owns its snapshot and can be cloned to restart it.
    pub fn ordered_by_recency(&self) -> impl Iterator<Item = Conversation> + Clone {
        let mut chats = self.chats.borrow().clone();
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        chats.into_iter()
    }

    pub fn summaries(&self) -> Vec<ConversationSummary> {
        self.ordered_by_recency().map(|c| c.summary()).collect()
    }
}

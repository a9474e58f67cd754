//! Chat session — the message append protocol.
//!
//! Per send: `Composing → Sending → {Succeeded | Failed}`.
//! 1. Append the user message to the visible transcript (optimistic)
//! 2. Call the completion API with exactly that text
//! 3. On reply, resolve the authoritative conversation (creating one if
//!    needed) and persist the exchange
//! 4. On failure, show the error in-line and persist only if a
//!    conversation already exists
//!
//! Sends are not mutually exclusive. Each one persists by appending its own
//! exchange to the stored transcript, so overlapping replies never drop
//! one another.

use std::cell::RefCell;
use std::rc::Rc;

use fulcrum_types::{
    conversation::derive_title,
    event::ChatEvent,
    message::ChatMessage,
    route::Route,
};
use crate::auth::AuthSession;
use crate::event_bus::EventBus;
use crate::ports::{CompletionPort, Navigator};
use crate::resolver::SessionIdentity;
use crate::store::ChatStore;

/// How a send settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing happened
    Ignored,
    /// Reply received. `persisted` is false when the target conversation
    /// vanished (deleted) while the request was in flight.
    Delivered {
        conversation_id: String,
        created: bool,
        persisted: bool,
    },
    /// Remote call failed; `persisted_to` names the conversation that
    /// recorded the failed exchange, if any
    Failed {
        error: String,
        persisted_to: Option<String>,
    },
    /// The session was torn down before the reply arrived
    Discarded,
}

struct SessionState {
    route: Route,
    identity: SessionIdentity,
    /// Visible thread, oldest first
    transcript: Vec<ChatMessage>,
    /// Settled exchanges of a not-yet-created conversation (failed sends)
    unpersisted: Vec<ChatMessage>,
    in_flight: usize,
    /// Bumped whenever the view switches conversations
    view_epoch: u64,
    /// Conversation created by a reply whose view had already been left,
    /// keyed by that view's epoch
    detached: Option<(u64, String)>,
    mounted: bool,
}

/// One chat view: route, transcript and composer state.
/// Clone-cheap via Rc so sends can be spawned onto the local executor.
#[derive(Clone)]
pub struct ChatSession {
    state: Rc<RefCell<SessionState>>,
    store: ChatStore,
    auth: AuthSession,
    completion: Rc<dyn CompletionPort>,
    navigator: Rc<dyn Navigator>,
    event_bus: EventBus,
}

impl ChatSession {
    pub fn new(
        route: Route,
        store: ChatStore,
        auth: AuthSession,
        completion: Rc<dyn CompletionPort>,
        navigator: Rc<dyn Navigator>,
        event_bus: EventBus,
    ) -> Self {
        let transcript = load_transcript(&store, &route);
        Self {
            state: Rc::new(RefCell::new(SessionState {
                route,
                identity: SessionIdentity::new(),
                transcript,
                unpersisted: Vec::new(),
                in_flight: 0,
                view_epoch: 0,
                detached: None,
                mounted: true,
            })),
            store,
            auth,
            completion,
            navigator,
            event_bus,
        }
    }

    pub fn route(&self) -> Route {
        self.state.borrow().route.clone()
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.state.borrow().transcript.clone()
    }

    /// Whether a network call is in flight; the composer stays disabled meanwhile
    pub fn is_sending(&self) -> bool {
        self.state.borrow().in_flight > 0
    }

    /// The conversation created earlier in this view, if the route has not
    /// named a different one since.
    pub fn session_reference(&self) -> Option<String> {
        self.state.borrow().identity.reference().map(str::to_owned)
    }

    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    /// Tear the view down. Replies arriving afterwards are dropped unpersisted.
    pub fn unmount(&self) {
        self.state.borrow_mut().mounted = false;
    }

    /// The route changed from outside (sidebar click, back button).
    pub fn set_route(&self, route: Route) {
        self.enter(route, false);
    }

    fn enter(&self, route: Route, fresh: bool) {
        {
            let mut state = self.state.borrow_mut();
            if state.route == route && !fresh {
                return;
            }
            let catching_up = state.identity.on_route_change(&route);
            if !catching_up {
                state.transcript = load_transcript(&self.store, &route);
                state.unpersisted.clear();
                state.view_epoch += 1;
            }
            state.route = route.clone();
        }
        self.event_bus.emit(ChatEvent::Navigated { path: route.path() });
        self.event_bus.emit(ChatEvent::TranscriptChanged);
    }

    /// Navigate to `route` and reflect it in the address bar.
    pub fn navigate(&self, route: Route) {
        self.push_history(&route);
        self.enter(route, false);
    }

    /// "New chat": back to an empty view, even when already at `/`.
    pub fn new_chat(&self) {
        self.push_history(&Route::Home);
        self.enter(Route::Home, true);
    }

    fn push_history(&self, route: &Route) {
        if let Err(e) = self.navigator.navigate(route) {
            log::warn!("Navigation to {} failed: {}", route.path(), e);
        }
    }

    pub async fn delete_conversation(&self, id: &str) {
        self.store.delete(id).await;
        let viewing = self.state.borrow().route.conversation_id() == Some(id);
        if viewing {
            self.navigate(Route::Home);
        }
    }

    pub async fn delete_all(&self) {
        self.store.delete_all().await;
        self.new_chat();
    }

    /// Send one message through the full append protocol.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        // Composing → Sending
        let (route, epoch) = {
            let mut state = self.state.borrow_mut();
            state.transcript.push(ChatMessage::user(text));
            state.in_flight += 1;
            (state.route.clone(), state.view_epoch)
        };
        let _in_flight = InFlightGuard {
            state: self.state.clone(),
            event_bus: self.event_bus.clone(),
        };
        self.event_bus.emit(ChatEvent::SendStarted);
        self.event_bus.emit(ChatEvent::TranscriptChanged);

        let token = self.auth.token();
        let result = self.completion.send_message(text, token.as_deref()).await;

        if !self.state.borrow().mounted {
            log::debug!("Session torn down; discarding reply");
            return SendOutcome::Discarded;
        }

        let user = ChatMessage::user(text);
        let outcome = match result {
            Ok(reply) => {
                let assistant = ChatMessage::assistant(reply);
                self.show(epoch, assistant.clone());
                self.on_reply(text, &route, epoch, vec![user, assistant]).await
            }
            Err(e) => {
                let error = e.to_string();
                log::warn!("Chat request failed: {}", error);
                let failure = ChatMessage::error(&error);
                self.show(epoch, failure.clone());
                self.event_bus.emit(ChatEvent::SendFailed { message: error.clone() });
                let persisted_to = self.on_failure(&route, epoch, vec![user, failure]).await;
                SendOutcome::Failed { error, persisted_to }
            }
        };
        self.settle(epoch);
        outcome
    }

    /// Sending → Succeeded
    async fn on_reply(
        &self,
        text: &str,
        route: &Route,
        epoch: u64,
        exchange: Vec<ChatMessage>,
    ) -> SendOutcome {
        if let Some(id) = self.authoritative_id(route, epoch) {
            let persisted = self.store.append_messages(&id, exchange).await;
            if !persisted {
                log::debug!("Conversation {} is gone; reply not persisted", id);
            }
            return SendOutcome::Delivered {
                conversation_id: id,
                created: false,
                persisted,
            };
        }

        // Claim the id and insert the record before the first await so a
        // reply landing while the store persists appends after this exchange.
        let id = self.store.allocate_id();
        let messages = {
            let mut state = self.state.borrow_mut();
            if state.view_epoch == epoch {
                state.identity.remember(&id);
                let mut messages = std::mem::take(&mut state.unpersisted);
                messages.extend(exchange);
                messages
            } else {
                state.detached = Some((epoch, id.clone()));
                exchange
            }
        };
        self.store.create_with(id.clone(), derive_title(text), messages).await;

        // Only pull the view along if it still shows this session.
        if self.state.borrow().view_epoch == epoch {
            self.navigate(Route::chat(id.clone()));
        }
        SendOutcome::Delivered {
            conversation_id: id,
            created: true,
            persisted: true,
        }
    }

    /// Sending → Failed. No conversation is ever created from a failure.
    async fn on_failure(
        &self,
        route: &Route,
        epoch: u64,
        exchange: Vec<ChatMessage>,
    ) -> Option<String> {
        match self.authoritative_id(route, epoch) {
            Some(id) => self
                .store
                .append_messages(&id, exchange)
                .await
                .then_some(id),
            None => {
                let mut state = self.state.borrow_mut();
                if state.view_epoch == epoch {
                    state.unpersisted.extend(exchange);
                }
                None
            }
        }
    }

    /// The route captured at send time wins, even if the view moved on;
    /// otherwise whatever the sending view created in the meantime.
    fn authoritative_id(&self, route: &Route, epoch: u64) -> Option<String> {
        let state = self.state.borrow();
        if state.view_epoch == epoch {
            return state.identity.resolve(route).into_id();
        }
        // The live reference belongs to a later view
        route.conversation_id().map(str::to_owned).or_else(|| {
            state
                .detached
                .as_ref()
                .filter(|(created_in, _)| *created_in == epoch)
                .map(|(_, id)| id.clone())
        })
    }

    /// Once the last send of a view settles, show the stored transcript so
    /// the thread matches what a reload would display.
    fn settle(&self, epoch: u64) {
        {
            let mut state = self.state.borrow_mut();
            if state.in_flight > 1 || state.view_epoch != epoch {
                return;
            }
            let stored = state
                .route
                .conversation_id()
                .and_then(|id| self.store.get(id))
                .map(|chat| chat.messages);
            match stored {
                Some(messages) if messages != state.transcript => state.transcript = messages,
                _ => return,
            }
        }
        self.event_bus.emit(ChatEvent::TranscriptChanged);
    }

    fn show(&self, epoch: u64, message: ChatMessage) {
        {
            let mut state = self.state.borrow_mut();
            if state.view_epoch != epoch {
                return;
            }
            state.transcript.push(message);
        }
        self.event_bus.emit(ChatEvent::TranscriptChanged);
    }
}

fn load_transcript(store: &ChatStore, route: &Route) -> Vec<ChatMessage> {
    route
        .conversation_id()
        .and_then(|id| store.get(id))
        .map(|chat| chat.messages)
        .unwrap_or_default()
}

/// Clears the in-flight count on every exit path, including a dropped future.
struct InFlightGuard {
    state: Rc<RefCell<SessionState>>,
    event_bus: EventBus,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.in_flight = state.in_flight.saturating_sub(1);
        drop(state);
        self.event_bus.emit(ChatEvent::SendFinished);
    }
}

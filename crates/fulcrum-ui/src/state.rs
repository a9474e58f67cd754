//! UI-level state that drives rendering.
//! This is a read-only projection of the chat session, store and auth,
//! refreshed each frame after draining the EventBus.

use fulcrum_core::auth::AuthSession;
use fulcrum_core::session::ChatSession;
use fulcrum_types::conversation::ConversationSummary;
use fulcrum_types::event::ChatEvent;
use fulcrum_types::message::{ChatMessage, Role};
use fulcrum_types::route::Route;
use fulcrum_types::user::User;

pub const STATUS_READY: &str = "Ready";
pub const STATUS_SENDING: &str = "Thinking...";

/// State visible to UI panels
pub struct UiState {
    /// Visible thread of the active view
    pub messages: Vec<ChatEntry>,
    /// Sidebar list, most recent first
    pub conversations: Vec<ConversationSummary>,
    /// Conversation named by the route, if any
    pub active_id: Option<String>,
    /// Composer content
    pub input_text: String,
    pub is_sending: bool,
    /// Status line text
    pub status_text: String,
    pub user_name: Option<String>,
    pub show_sidebar: bool,
    /// Projection is behind the core and needs a fresh snapshot
    stale: bool,
}

/// A chat entry for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub role: Role,
    pub content: String,
    pub is_error: bool,
}

impl From<ChatMessage> for ChatEntry {
    fn from(message: ChatMessage) -> Self {
        Self {
            is_error: message.is_error(),
            role: message.role,
            content: message.content,
        }
    }
}

/// Everything the panels read from the core, captured at one instant.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub transcript: Vec<ChatMessage>,
    pub conversations: Vec<ConversationSummary>,
    pub route: Route,
    pub is_sending: bool,
    pub user: Option<User>,
}

impl Snapshot {
    pub fn capture(session: &ChatSession, auth: &AuthSession) -> Self {
        Self {
            transcript: session.transcript(),
            conversations: session.store().summaries(),
            route: session.route(),
            is_sending: session.is_sending(),
            user: auth.user(),
        }
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            conversations: Vec::new(),
            active_id: None,
            input_text: String::new(),
            is_sending: false,
            status_text: STATUS_READY.to_string(),
            user_name: None,
            show_sidebar: true,
            stale: true,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<ChatEvent>) {
        for event in events {
            match event {
                ChatEvent::SendStarted => {
                    self.is_sending = true;
                    self.status_text = STATUS_SENDING.to_string();
                }
                ChatEvent::SendFailed { message } => {
                    self.status_text = format!("Error: {}", message);
                }
                ChatEvent::SendFinished => {
                    // A failure message stays up until the next send
                    if self.status_text == STATUS_SENDING {
                        self.status_text = STATUS_READY.to_string();
                    }
                }
                ChatEvent::Navigated { .. } => {
                    self.status_text = STATUS_READY.to_string();
                }
                ChatEvent::StoreLoaded { .. }
                | ChatEvent::ConversationCreated { .. }
                | ChatEvent::ConversationUpdated { .. }
                | ChatEvent::ConversationDeleted { .. }
                | ChatEvent::ConversationsCleared
                | ChatEvent::TranscriptChanged
                | ChatEvent::AuthChanged { .. } => {}
            }
            self.stale = true;
        }
    }

    pub fn needs_refresh(&self) -> bool {
        self.stale
    }

    /// Refresh the projection from the core if any event marked it stale
    pub fn sync(&mut self, session: &ChatSession, auth: &AuthSession) {
        if self.stale {
            self.apply(Snapshot::capture(session, auth));
        }
    }

    pub fn apply(&mut self, snapshot: Snapshot) {
        self.messages = snapshot.transcript.into_iter().map(ChatEntry::from).collect();
        self.conversations = snapshot.conversations;
        self.active_id = snapshot.route.conversation_id().map(str::to_owned);
        self.is_sending = snapshot.is_sending;
        self.user_name = snapshot.user.as_ref().map(|u| u.display_name().to_string());
        self.stale = false;
    }

    /// Take the composer text for sending; `None` when blank or a send is pending
    pub fn take_input(&mut self) -> Option<String> {
        if self.is_sending {
            return None;
        }
        let text = self.input_text.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.input_text.clear();
        Some(text)
    }

    /// Nothing said yet in this view
    pub fn shows_greeting(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

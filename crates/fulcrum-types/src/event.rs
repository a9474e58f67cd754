use serde::{Deserialize, Serialize};

/// Events emitted by the store, auth and chat session.
/// UI subscribes to these for reactive updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatEvent {
    /// Store was hydrated from durable storage
    StoreLoaded { count: usize },

    /// A conversation record was inserted (or replaced)
    ConversationCreated { id: String },

    /// A conversation's title or transcript changed
    ConversationUpdated { id: String },

    /// A conversation was removed
    ConversationDeleted { id: String },

    /// Every conversation was removed
    ConversationsCleared,

    /// The visible transcript changed
    TranscriptChanged,

    /// A message went out to the completion API
    SendStarted,

    /// A send settled (success, failure or discard)
    SendFinished,

    /// A send failed; the message is shown in the transcript too
    SendFailed { message: String },

    /// The active route changed
    Navigated { path: String },

    /// Token obtained or lost
    AuthChanged { authenticated: bool },
}

use serde::{Deserialize, Serialize};
use crate::message::{ChatMessage, Role};

/// Title given to a conversation before one is derived from its messages.
pub const DEFAULT_TITLE: &str = "New chat";
/// Longest derived title, in characters, before the ellipsis marker.
pub const TITLE_MAX_CHARS: usize = 36;
pub const TITLE_ELLIPSIS: &str = "...";

/// A persisted conversation.
///
/// Field names are camelCase on the wire so the durable blob keeps
/// the `{ id, title, messages, updatedAt }` shape. Only `id` is required
/// when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Milliseconds since the Unix epoch; never decreases for a given record
    #[serde(default)]
    pub updated_at: i64,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Conversation {
    pub fn new(id: String, now_millis: i64) -> Self {
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            updated_at: now_millis,
        }
    }

    /// Apply a partial update. Only the provided fields change;
    /// the timestamp is refreshed but never moves backwards.
    pub fn apply(&mut self, patch: ConversationPatch, now_millis: i64) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(messages) = patch.messages {
            self.messages = messages;
        }
        self.touch(now_millis);
    }

    pub fn touch(&mut self, now_millis: i64) {
        self.updated_at = self.updated_at.max(now_millis);
    }

    /// The first message the user wrote, if any
    pub fn first_user_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.role == Role::User)
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            updated_at: self.updated_at,
            message_count: self.messages.len(),
        }
    }
}

/// Partial update applied by `update`; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationPatch {
    pub title: Option<String>,
    pub messages: Option<Vec<ChatMessage>>,
}

impl ConversationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = Some(messages);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.messages.is_none()
    }
}

/// Summary of a conversation for the sidebar listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub updated_at: i64,
    pub message_count: usize,
}

/// Derive a display title from the opening user message.
///
/// Counts characters, not bytes, so multibyte text is never split.
pub fn derive_title(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    match text.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TITLE_ELLIPSIS),
        None => text.to_string(),
    }
}

/// Allocate a fresh conversation id: `chat-{millis}-{random}`.
///
/// The random suffix is taken from a v4 UUID; collisions are not defended against.
pub fn generate_id(now_millis: i64) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("chat-{}-{}", now_millis, &suffix[..7])
}

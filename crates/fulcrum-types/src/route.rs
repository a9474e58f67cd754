//! Routing surface: which view is active and which conversation it names.

use serde::{Deserialize, Serialize};

/// Reserved id meaning "about to create"; never a real conversation.
pub const NEW_CHAT_PLACEHOLDER: &str = "new";

const CHAT_PREFIX: &str = "/chat/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// No conversation selected (`/`)
    #[default]
    Home,
    /// Conversation `{id}` (`/chat/{id}`), possibly the placeholder
    Chat { id: String },
}

impl Route {
    pub fn chat(id: impl Into<String>) -> Self {
        Route::Chat { id: id.into() }
    }

    pub fn new_chat() -> Self {
        Route::chat(NEW_CHAT_PLACEHOLDER)
    }

    /// Parse a location pathname. Anything unrecognised is `Home`.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        match path.strip_prefix(CHAT_PREFIX) {
            Some(id) => {
                let id = id.trim_end_matches('/');
                if id.is_empty() || id.contains('/') {
                    Route::Home
                } else {
                    Route::chat(id)
                }
            }
            None => Route::Home,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Chat { id } => format!("{}{}", CHAT_PREFIX, id),
        }
    }

    /// The conversation id this route names, unless it is `Home` or the placeholder.
    pub fn conversation_id(&self) -> Option<&str> {
        match self {
            Route::Chat { id } if id != NEW_CHAT_PLACEHOLDER => Some(id),
            _ => None,
        }
    }

    /// True for the routes that start a fresh conversation.
    pub fn is_new_conversation(&self) -> bool {
        self.conversation_id().is_none()
    }
}

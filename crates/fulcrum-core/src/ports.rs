//! Port traits — the hexagonal architecture boundary.
//!
//! These traits are defined here in `fulcrum-core` (pure Rust).
//! Implementations live in `fulcrum-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use fulcrum_types::{Result, route::Route};

// ─── Completion Port ─────────────────────────────────────────

#[async_trait(?Send)]
pub trait CompletionPort {
    /// Send one user-authored message and return the reply text.
    /// No conversation id or history travels with the request.
    async fn send_message(&self, message: &str, token: Option<&str>) -> Result<String>;
}

// ─── Token Port ──────────────────────────────────────────────

#[async_trait(?Send)]
pub trait TokenPort {
    /// Obtain an opaque bearer token for subsequent protected calls
    async fn fetch_token(&self) -> Result<String>;
}

// ─── Storage Port ────────────────────────────────────────────

/// Named string slots that survive page reloads.
#[async_trait(?Send)]
pub trait StoragePort {
    /// Read a slot
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a slot wholesale
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot entirely
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a slot exists
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Navigation Port ─────────────────────────────────────────

pub trait Navigator {
    /// Reflect `route` in the address bar
    fn navigate(&self, route: &Route) -> Result<()>;
}

// ─── Clock ───────────────────────────────────────────────────

pub trait Clock {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// Wall clock backed by chrono (`Date.now()` under wasm)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

//! Bearer token and signed-in user.
//!
//! The token is fetched once per application load before any chat call.
//! When that fails the session stays unauthenticated: later protected
//! calls go out without a token and fail at the server instead of retrying.

use std::cell::RefCell;
use std::rc::Rc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

use fulcrum_types::{event::ChatEvent, user::User};
use crate::event_bus::EventBus;
use crate::ports::{Clock, StoragePort, TokenPort};

#[derive(Default)]
struct AuthState {
    token: Option<String>,
    user: Option<User>,
}

/// Token and user, shared across clones.
#[derive(Clone)]
pub struct AuthSession {
    state: Rc<RefCell<AuthState>>,
    storage: Rc<dyn StoragePort>,
    clock: Rc<dyn Clock>,
    key: Rc<str>,
    event_bus: EventBus,
}

impl AuthSession {
    /// Pick up a token persisted by an earlier load. An expired JWT is dropped.
    pub async fn restore(
        storage: Rc<dyn StoragePort>,
        clock: Rc<dyn Clock>,
        key: &str,
        event_bus: EventBus,
    ) -> Self {
        let session = Self {
            state: Rc::new(RefCell::new(AuthState::default())),
            storage,
            clock,
            key: Rc::from(key),
            event_bus,
        };

        match session.storage.get(key).await {
            Ok(Some(token)) => {
                let stale = decode_jwt(&token).is_some()
                    && is_token_expired(&token, session.clock.now_millis());
                if stale {
                    log::info!("Discarding expired stored token");
                    session.forget_token().await;
                } else {
                    session.state.borrow_mut().token = Some(token);
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("Stored token unreadable: {}", e),
        }
        session
    }

    /// Acquire a fresh token. Failure degrades to unauthenticated.
    pub async fn bootstrap(&self, port: &dyn TokenPort) {
        match port.fetch_token().await {
            Ok(token) => {
                log::info!("Auth token acquired");
                self.login(token, User::guest()).await;
            }
            Err(e) => {
                log::warn!("Token bootstrap failed, continuing unauthenticated: {}", e);
                self.logout().await;
            }
        }
    }

    pub async fn login(&self, token: String, user: User) {
        if let Err(e) = self.storage.set(&self.key, &token).await {
            log::warn!("Failed to persist auth token: {}", e);
        }
        {
            let mut state = self.state.borrow_mut();
            state.token = Some(token);
            state.user = Some(user);
        }
        self.event_bus.emit(ChatEvent::AuthChanged { authenticated: true });
    }

    pub async fn logout(&self) {
        self.forget_token().await;
        *self.state.borrow_mut() = AuthState::default();
        self.event_bus.emit(ChatEvent::AuthChanged { authenticated: false });
    }

    async fn forget_token(&self) {
        if let Err(e) = self.storage.delete(&self.key).await {
            log::warn!("Failed to remove auth token: {}", e);
        }
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().token.is_some()
    }
}

/// Decode the payload segment of a JWT. Not a signature check.
pub fn decode_jwt(token: &str) -> Option<Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    claims.is_object().then_some(claims)
}

/// True unless `token` is a JWT carrying an `exp` claim still in the future.
pub fn is_token_expired(token: &str, now_millis: i64) -> bool {
    let exp = decode_jwt(token).and_then(|claims| claims.get("exp").and_then(Value::as_i64));
    match exp {
        Some(exp) => now_millis >= exp.saturating_mul(1000),
        None => true,
    }
}

//! Address-bar routing over the History API.
//!
//! Outgoing navigation goes through `pushState`; incoming changes
//! (back/forward, manual edits) are picked up by polling the location
//! once per frame with a [`RouteWatcher`].

use wasm_bindgen::JsValue;

use fulcrum_core::ports::Navigator;
use fulcrum_types::{route::Route, ChatError, Result};
use crate::js_error;

/// `location.pathname`, or `None` outside a browser.
pub fn current_path() -> Option<String> {
    web_sys::window()?.location().pathname().ok()
}

pub fn current_route() -> Route {
    current_path()
        .map(|path| Route::parse(&path))
        .unwrap_or_default()
}

/// Pushes a history entry per navigation.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryNavigator;

impl Navigator for HistoryNavigator {
    fn navigate(&self, route: &Route) -> Result<()> {
        let path = route.path();
        if current_path().as_deref() == Some(path.as_str()) {
            return Ok(());
        }

        let window = web_sys::window()
            .ok_or_else(|| ChatError::Navigation("No window object".to_string()))?;
        let history = window
            .history()
            .map_err(|e| ChatError::Navigation(js_error(e)))?;
        history
            .push_state_with_url(&JsValue::NULL, "", Some(&path))
            .map_err(|e| ChatError::Navigation(js_error(e)))?;

        log::debug!("pushState {}", path);
        Ok(())
    }
}

/// Detects location changes the app did not initiate itself.
#[derive(Debug, Clone)]
pub struct RouteWatcher {
    last_path: String,
}

impl RouteWatcher {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            last_path: initial_path.into(),
        }
    }

    /// Start from the current location.
    pub fn from_location() -> Self {
        Self::new(current_path().unwrap_or_else(|| Route::Home.path()))
    }

    /// Check the live location.
    pub fn poll(&mut self) -> Option<Route> {
        let path = current_path()?;
        self.observe(&path)
    }

    /// Feed a path; returns the new route when it differs from the last one seen.
    pub fn observe(&mut self, path: &str) -> Option<Route> {
        if path == self.last_path {
            return None;
        }
        self.last_path = path.to_string();
        Some(Route::parse(path))
    }
}

//! Session identity resolver.
//!
//! Decides which conversation the next persisted write targets. The route
//! wins when it names a real conversation; otherwise a conversation created
//! earlier in this view is reused until the route catches up with it.

use fulcrum_types::route::Route;

/// Where the authoritative conversation id came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The route names it
    Route(String),
    /// Created earlier in this view; the route has not caught up yet
    Reference(String),
    /// No conversation yet; one must be created before writing
    Unassigned,
}

impl Resolution {
    pub fn id(&self) -> Option<&str> {
        match self {
            Resolution::Route(id) | Resolution::Reference(id) => Some(id),
            Resolution::Unassigned => None,
        }
    }

    pub fn into_id(self) -> Option<String> {
        match self {
            Resolution::Route(id) | Resolution::Reference(id) => Some(id),
            Resolution::Unassigned => None,
        }
    }
}

/// Transient per-view cache of the conversation created in this session.
/// Never persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionIdentity {
    reference: Option<String>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Remember a conversation created before the route reflects it.
    pub fn remember(&mut self, id: impl Into<String>) {
        self.reference = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.reference = None;
    }

    /// Route precedence first, then the cached reference.
    pub fn resolve(&self, route: &Route) -> Resolution {
        if let Some(id) = route.conversation_id() {
            return Resolution::Route(id.to_string());
        }
        match &self.reference {
            Some(id) => Resolution::Reference(id.clone()),
            None => Resolution::Unassigned,
        }
    }

    /// Keep the reference only while the route is catching up to it.
    ///
    /// Returns true when `route` is that catch-up navigation, i.e. it names
    /// the referenced conversation.
    pub fn on_route_change(&mut self, route: &Route) -> bool {
        let catching_up = matches!(
            (route.conversation_id(), self.reference.as_deref()),
            (Some(id), Some(reference)) if id == reference
        );
        if !catching_up {
            self.reference = None;
        }
        catching_up
    }
}

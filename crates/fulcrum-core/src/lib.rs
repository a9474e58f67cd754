//! Fulcrum core — conversation session manager.
//!
//! Owns the persisted chat store, resolves which conversation a message
//! belongs to, and drives the send → reply → persist protocol. Everything
//! platform-specific sits behind the traits in [`ports`].

pub mod ports;
pub mod event_bus;
pub mod store;
pub mod resolver;
pub mod auth;
pub mod session;

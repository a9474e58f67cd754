pub mod message;
pub mod conversation;
pub mod route;
pub mod event;
pub mod config;
pub mod error;
pub mod user;


pub use error::ChatError;
pub type Result<T> = std::result::Result<T, ChatError>;

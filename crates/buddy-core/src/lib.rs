pub mod buddy;
pub mod chat;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod style;

// Re-export common error type
pub use error::{BuddyError, Result};

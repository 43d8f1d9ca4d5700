//! Session domain module.
//!
//! Tracks which buddy is active and which view is shown. Session state is
//! process-local and never persisted.
//!
//! # Module Structure
//!
//! - `view_mode`: `ViewMode` and the `Transition` outcome type
//! - `controller`: `SessionController` state machine and `SessionToken`

mod controller;
mod view_mode;

// Re-export public API
pub use controller::{SessionController, SessionToken};
pub use view_mode::{Transition, ViewMode};

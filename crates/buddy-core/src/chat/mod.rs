//! Chat domain module.
//!
//! - `message`: `ChatMessage` and `Sender`
//! - `log`: `ChatLog`, the in-memory log of one session
//! - `responder`: `ChatResponder` seam and the template implementation

mod log;
mod message;
mod responder;

pub use log::{ChatLog, greeting};
pub use message::{ChatMessage, Sender};
pub use responder::{ChatResponder, FALLBACK_REPLY, TemplateResponder, reply_for_tag};

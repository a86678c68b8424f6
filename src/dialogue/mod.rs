//! External dialogue-service boundary
//!
//! The AI chat service lives behind this trait; the core only sees text in,
//! text out. Implementations make a blocking round-trip to the service and
//! fail with `ServiceUnreachable`.

use crate::Result;

/// Blocking round-trip to the chat-completion service
pub trait DialogueForwarder: Send + Sync {
    /// Forward one dialogue utterance and return the service's reply text.
    fn converse(&self, text: &str) -> Result<String>;
}

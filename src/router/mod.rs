//! Reply types, response locale, and final reply routing
//!
//! The router is pure selection: it forwards whichever reply the resolved
//! intent produced, and guards the invariant that exactly one reply source
//! was used per cycle.

use crate::intent::Intent;
use crate::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How quickly the user can expect this reply class to arrive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencyClass {
    /// Deterministic local query, sub-second
    Fast,
    /// AI round-trip
    Ai,
}

/// The single spoken reply produced for an utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub latency_class: LatencyClass,
}

impl Reply {
    pub fn fast(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            latency_class: LatencyClass::Fast,
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            latency_class: LatencyClass::Ai,
        }
    }
}

/// Fixed rendering locale for system-query responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseLocale {
    ZhTw,
    En,
}

impl ResponseLocale {
    /// Parse a BCP-47-ish tag; unknown tags fall back to zh-TW.
    pub fn parse(tag: &str) -> Self {
        let lower = tag.trim().to_ascii_lowercase();
        if lower.starts_with("en") {
            ResponseLocale::En
        } else if lower.starts_with("zh") {
            ResponseLocale::ZhTw
        } else {
            warn!(locale = tag, "unrecognized locale, falling back to zh-TW");
            ResponseLocale::ZhTw
        }
    }

    pub fn is_chinese(self) -> bool {
        self == ResponseLocale::ZhTw
    }
}

/// Unifies dispatcher and dialogue replies into the one reply per cycle
pub struct ResponseRouter;

impl ResponseRouter {
    /// Forward the reply matching the intent
    ///
    /// System replies pass through unchanged; dialogue replies are tagged
    /// `LatencyClass::Ai`. Any other combination of sources means the
    /// pipeline violated the one-source-per-cycle invariant.
    pub fn route(
        intent: &Intent,
        system_reply: Option<Reply>,
        dialogue_reply: Option<String>,
    ) -> Result<Reply> {
        match (intent, system_reply, dialogue_reply) {
            (Intent::SystemQuery { .. }, Some(reply), None) => Ok(reply),
            (Intent::Dialogue { .. }, None, Some(text)) => Ok(Reply::ai(text)),
            _ => Err(AssistantError::ChannelError(
                "reply source does not match the resolved intent".to_string(),
            )),
        }
    }
}

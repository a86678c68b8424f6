//! Transcription data model and the engine abstraction
//!
//! Defines the immutable value types produced by speech recognition engines
//! and the `TranscriptionProvider` seam behind which the actual models live.

pub mod selector;

pub use selector::{EngineSelector, SelectionEvent, SelectionLog, SelectionMode};

use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mono audio clip handed to transcription engines
///
/// The decision core never inspects the samples; it only carries them from
/// the recorder to whichever engine the selector picks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One discrete spoken input, processed end-to-end to exactly one reply
#[derive(Debug, Clone)]
pub struct Utterance {
    pub id: Uuid,
    pub audio: AudioClip,
    pub captured_at: DateTime<Utc>,
}

impl Utterance {
    /// Wrap a finished recording; the capture timestamp is taken now.
    pub fn new(audio: AudioClip) -> Self {
        Self {
            id: Uuid::new_v4(),
            audio,
            captured_at: Utc::now(),
        }
    }
}

/// Which of the two configured engines produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineId {
    /// General-purpose model
    Primary,
    /// Language-specialized model
    Secondary,
}

impl EngineId {
    /// The fallback counterpart of this engine
    pub fn other(self) -> Self {
        match self {
            EngineId::Primary => EngineId::Secondary,
            EngineId::Secondary => EngineId::Primary,
        }
    }
}

/// Language reported by an engine for a transcription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedLanguage {
    Zh,
    En,
    Unknown,
}

/// Immutable result of one engine invocation
///
/// Confidence is the engine-reported value in [0, 1]. Engines are not
/// calibrated against each other; the selector compares the raw values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub engine_id: EngineId,
    pub confidence: f32,
    pub detected_language: DetectedLanguage,
}

/// Recorded justification for which engine's transcript was used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionReason {
    PrimaryConfident,
    SecondaryPreferredLanguage,
    FallbackAfterFailure,
}

/// The single transcript kept for an utterance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedTranscript {
    pub text: String,
    pub source_engine: EngineId,
    pub reason: SelectionReason,
}

/// A speech recognition engine producing text, confidence, and language
///
/// Implementations wrap the actual model inference and fail with
/// `EngineUnavailable` or `EngineTimeout`; the selector's fallback chain
/// absorbs both.
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe a clip, optionally biased towards a language.
    fn transcribe(
        &self,
        audio: &AudioClip,
        hint_language: Option<DetectedLanguage>,
    ) -> Result<TranscriptionResult>;
}

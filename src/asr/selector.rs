//! Engine selection policy over the primary/secondary transcription engines
//!
//! The selector decides which engine to invoke for an utterance, applies the
//! confidence/language acceptance rules, and falls back to the other engine
//! when an invocation fails. Every decision is appended to a shared
//! `SelectionLog` so engine behavior stays observable and regression-testable.

use crate::asr::{
    DetectedLanguage, EngineId, SelectedTranscript, SelectionReason, TranscriptionProvider,
    TranscriptionResult, Utterance,
};
use crate::{AssistantError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Runtime-configurable engine selection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    AlwaysPrimary,
    AlwaysSecondary,
    Auto,
}

/// One recorded selection decision
#[derive(Debug, Clone)]
pub struct SelectionEvent {
    pub utterance_id: Uuid,
    pub chosen: EngineId,
    pub reason: SelectionReason,
    pub primary_confidence: Option<f32>,
    pub secondary_confidence: Option<f32>,
    pub elapsed_ms: u64,
}

/// Per-engine invocation counters
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineStats {
    pub success_count: u64,
    pub total_count: u64,
}

impl EngineStats {
    /// Fraction of invocations that produced a result, if any were made.
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_count == 0 {
            None
        } else {
            Some(self.success_count as f64 / self.total_count as f64)
        }
    }
}

/// Observability sink shared between the selector and its observers
///
/// Holds the selection-event history and per-engine success counters.
#[derive(Default)]
pub struct SelectionLog {
    events: Mutex<Vec<SelectionEvent>>,
    primary_stats: Mutex<EngineStats>,
    secondary_stats: Mutex<EngineStats>,
}

impl SelectionLog {
    fn record(&self, event: SelectionEvent) {
        self.events.lock().push(event);
    }

    fn record_attempt(&self, engine: EngineId, success: bool) {
        let mut stats = match engine {
            EngineId::Primary => self.primary_stats.lock(),
            EngineId::Secondary => self.secondary_stats.lock(),
        };
        stats.total_count += 1;
        if success {
            stats.success_count += 1;
        }
    }

    /// Snapshot of all recorded selection events
    pub fn events(&self) -> Vec<SelectionEvent> {
        self.events.lock().clone()
    }

    /// Snapshot of the invocation counters for one engine
    pub fn stats(&self, engine: EngineId) -> EngineStats {
        match engine {
            EngineId::Primary => *self.primary_stats.lock(),
            EngineId::Secondary => *self.secondary_stats.lock(),
        }
    }
}

/// Chooses which engine transcribes an utterance and which result is kept
pub struct EngineSelector {
    primary: Box<dyn TranscriptionProvider>,
    secondary: Box<dyn TranscriptionProvider>,
    mode: SelectionMode,
    language_confidence_threshold: f32,
    target_language: DetectedLanguage,
    log: Arc<SelectionLog>,
}

impl EngineSelector {
    pub fn new(
        primary: Box<dyn TranscriptionProvider>,
        secondary: Box<dyn TranscriptionProvider>,
        mode: SelectionMode,
        language_confidence_threshold: f32,
        target_language: DetectedLanguage,
    ) -> Self {
        Self {
            primary,
            secondary,
            mode,
            language_confidence_threshold,
            target_language,
            log: Arc::new(SelectionLog::default()),
        }
    }

    /// Share the selection log with an external observer (UI, tests).
    pub fn log(&self) -> Arc<SelectionLog> {
        Arc::clone(&self.log)
    }

    /// Resolve one utterance to exactly one transcript
    ///
    /// Fails with `TranscriptionUnavailable` only when every engine in the
    /// fallback chain failed; individual engine errors are never surfaced.
    pub fn select(&self, utterance: &Utterance) -> Result<SelectedTranscript> {
        let started = Instant::now();
        match self.mode {
            SelectionMode::AlwaysPrimary => self.select_fixed(utterance, EngineId::Primary, started),
            SelectionMode::AlwaysSecondary => {
                self.select_fixed(utterance, EngineId::Secondary, started)
            }
            SelectionMode::Auto => self.select_auto(utterance, started),
        }
    }

    fn invoke(&self, engine: EngineId, utterance: &Utterance) -> Result<TranscriptionResult> {
        let provider = match engine {
            EngineId::Primary => &self.primary,
            EngineId::Secondary => &self.secondary,
        };
        let result = provider.transcribe(&utterance.audio, Some(self.target_language));
        self.log.record_attempt(engine, result.is_ok());
        match &result {
            Ok(r) => debug!(
                ?engine,
                confidence = r.confidence,
                language = ?r.detected_language,
                "engine produced transcript"
            ),
            Err(e) => warn!(?engine, error = %e, "engine invocation failed"),
        }
        result
    }

    fn accept(
        &self,
        utterance: &Utterance,
        result: TranscriptionResult,
        reason: SelectionReason,
        started: Instant,
        primary_confidence: Option<f32>,
        secondary_confidence: Option<f32>,
    ) -> SelectedTranscript {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let event = SelectionEvent {
            utterance_id: utterance.id,
            chosen: result.engine_id,
            reason,
            primary_confidence,
            secondary_confidence,
            elapsed_ms,
        };
        info!(
            utterance = %utterance.id,
            chosen = ?event.chosen,
            reason = ?reason,
            elapsed_ms,
            "transcript selected"
        );
        self.log.record(event);
        SelectedTranscript {
            text: result.text,
            source_engine: result.engine_id,
            reason,
        }
    }

    /// ALWAYS_* modes: one configured engine, one fallback attempt.
    fn select_fixed(
        &self,
        utterance: &Utterance,
        engine: EngineId,
        started: Instant,
    ) -> Result<SelectedTranscript> {
        match self.invoke(engine, utterance) {
            Ok(result) => {
                let reason = match engine {
                    EngineId::Primary => SelectionReason::PrimaryConfident,
                    EngineId::Secondary => SelectionReason::SecondaryPreferredLanguage,
                };
                let (pc, sc) = confidence_slots(&result);
                Ok(self.accept(utterance, result, reason, started, pc, sc))
            }
            Err(first) => {
                let fallback = engine.other();
                warn!(?engine, ?fallback, "configured engine failed, trying fallback");
                match self.invoke(fallback, utterance) {
                    Ok(result) => {
                        let (pc, sc) = confidence_slots(&result);
                        Ok(self.accept(
                            utterance,
                            result,
                            SelectionReason::FallbackAfterFailure,
                            started,
                            pc,
                            sc,
                        ))
                    }
                    Err(second) => Err(AssistantError::TranscriptionUnavailable(format!(
                        "{engine:?}: {first}; {fallback:?}: {second}"
                    ))),
                }
            }
        }
    }

    /// AUTO mode: primary first, secondary consulted when primary is not a
    /// confident target-language result.
    fn select_auto(&self, utterance: &Utterance, started: Instant) -> Result<SelectedTranscript> {
        let primary = match self.invoke(EngineId::Primary, utterance) {
            Ok(result) => result,
            Err(first) => {
                warn!("primary failed in auto mode, trying secondary");
                return match self.invoke(EngineId::Secondary, utterance) {
                    Ok(result) => {
                        let sc = Some(result.confidence);
                        Ok(self.accept(
                            utterance,
                            result,
                            SelectionReason::FallbackAfterFailure,
                            started,
                            None,
                            sc,
                        ))
                    }
                    Err(second) => Err(AssistantError::TranscriptionUnavailable(format!(
                        "primary: {first}; secondary: {second}"
                    ))),
                };
            }
        };

        if primary.detected_language == DetectedLanguage::Zh
            && primary.confidence >= self.language_confidence_threshold
        {
            let pc = Some(primary.confidence);
            return Ok(self.accept(
                utterance,
                primary,
                SelectionReason::PrimaryConfident,
                started,
                pc,
                None,
            ));
        }

        let pc = Some(primary.confidence);
        match self.invoke(EngineId::Secondary, utterance) {
            Err(e) => {
                // Secondary failing never loses the primary's result
                warn!(error = %e, "secondary failed, keeping primary result");
                Ok(self.accept(
                    utterance,
                    primary,
                    SelectionReason::FallbackAfterFailure,
                    started,
                    pc,
                    None,
                ))
            }
            Ok(secondary) => {
                let sc = Some(secondary.confidence);
                let prefer_secondary = secondary.confidence > primary.confidence
                    || (secondary.confidence == primary.confidence
                        && primary.detected_language != self.target_language);
                if prefer_secondary {
                    Ok(self.accept(
                        utterance,
                        secondary,
                        SelectionReason::SecondaryPreferredLanguage,
                        started,
                        pc,
                        sc,
                    ))
                } else {
                    Ok(self.accept(
                        utterance,
                        primary,
                        SelectionReason::PrimaryConfident,
                        started,
                        pc,
                        sc,
                    ))
                }
            }
        }
    }
}

fn confidence_slots(result: &TranscriptionResult) -> (Option<f32>, Option<f32>) {
    match result.engine_id {
        EngineId::Primary => (Some(result.confidence), None),
        EngineId::Secondary => (None, Some(result.confidence)),
    }
}

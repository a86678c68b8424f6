//! Per-utterance processing pipeline
//!
//! Drives one spoken input end-to-end: engine selection, intent
//! classification, then exactly one of the system dispatcher or the dialogue
//! service, unified into a single reply for speech synthesis. Processing is
//! single-utterance-at-a-time; the only state shared across cycles is the
//! immutable configuration and the selector's observability log.

use crate::asr::{
    DetectedLanguage, EngineSelector, SelectionLog, TranscriptionProvider, Utterance,
};
use crate::dialogue::DialogueForwarder;
use crate::integration::AssistantConfig;
use crate::intent::{Intent, IntentClassifier};
use crate::router::{Reply, ResponseLocale, ResponseRouter};
use crate::system::SystemQueryDispatcher;
use crate::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// The assembled decision core
pub struct Pipeline {
    selector: EngineSelector,
    classifier: IntentClassifier,
    dispatcher: SystemQueryDispatcher,
    forwarder: Box<dyn DialogueForwarder>,
    locale: ResponseLocale,
}

impl Pipeline {
    /// Assemble the pipeline from a validated configuration and the external
    /// collaborators.
    pub fn new(
        config: &AssistantConfig,
        primary: Box<dyn TranscriptionProvider>,
        secondary: Box<dyn TranscriptionProvider>,
        forwarder: Box<dyn DialogueForwarder>,
    ) -> Result<Self> {
        config.validate()?;
        let locale = config.locale();
        let target_language = if locale.is_chinese() {
            DetectedLanguage::Zh
        } else {
            DetectedLanguage::En
        };
        info!(
            primary = %config.primary_engine,
            secondary = %config.secondary_engine,
            mode = ?config.selection_mode,
            locale = %config.target_locale,
            "assembling pipeline"
        );
        let selector = EngineSelector::new(
            primary,
            secondary,
            config.selection_mode,
            config.language_confidence_threshold,
            target_language,
        );
        let dispatcher = SystemQueryDispatcher::new(
            config.working_directory.clone(),
            locale,
            config.query_timeout,
        );
        Ok(Self {
            selector,
            classifier: IntentClassifier::new(),
            dispatcher,
            forwarder,
            locale,
        })
    }

    /// Swap in a custom trigger table
    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Share the engine selection log for observability
    pub fn selection_log(&self) -> Arc<SelectionLog> {
        self.selector.log()
    }

    /// Process one utterance to exactly one reply
    ///
    /// The only error surfaced is `TranscriptionUnavailable`; the caller
    /// speaks its `user_message()` and waits for the next utterance. Every
    /// downstream failure is already a reply.
    pub fn run_cycle(&self, utterance: &Utterance) -> Result<Reply> {
        let transcript = self.selector.select(utterance)?;
        info!(
            engine = ?transcript.source_engine,
            reason = ?transcript.reason,
            text = %transcript.text,
            "transcript selected"
        );

        let intent = self.classifier.classify(&transcript.text);
        let reply = match &intent {
            Intent::SystemQuery { kind, raw_text } => {
                let dispatched = self.dispatcher.dispatch(*kind, raw_text);
                ResponseRouter::route(&intent, Some(dispatched), None)?
            }
            Intent::Dialogue { raw_text } => match self.forwarder.converse(raw_text) {
                Ok(answer) => ResponseRouter::route(&intent, None, Some(answer))?,
                Err(err) => {
                    warn!(error = %err, "dialogue service failed, replying with user message");
                    Reply::ai(err.user_message(self.locale))
                }
            },
        };
        info!(latency = ?reply.latency_class, "cycle complete");
        Ok(reply)
    }
}

use anyhow::Result;
use parley::asr::{
    AudioClip, DetectedLanguage, EngineId, TranscriptionProvider, TranscriptionResult, Utterance,
};
use parley::dialogue::DialogueForwarder;
use parley::integration::{AssistantConfig, Pipeline};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Canned engine used to exercise the pipeline without any model loaded
struct CannedEngine {
    engine_id: EngineId,
    text: &'static str,
    confidence: f32,
}

impl TranscriptionProvider for CannedEngine {
    fn transcribe(
        &self,
        _audio: &AudioClip,
        _hint_language: Option<DetectedLanguage>,
    ) -> parley::Result<TranscriptionResult> {
        Ok(TranscriptionResult {
            text: self.text.to_string(),
            engine_id: self.engine_id,
            confidence: self.confidence,
            detected_language: DetectedLanguage::Zh,
        })
    }
}

struct EchoForwarder;

impl DialogueForwarder for EchoForwarder {
    fn converse(&self, text: &str) -> parley::Result<String> {
        Ok(format!("你說：{text}"))
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting parley demo cycle");

    let config = AssistantConfig::default();
    let pipeline = Pipeline::new(
        &config,
        Box::new(CannedEngine {
            engine_id: EngineId::Primary,
            text: "現在幾點",
            confidence: 0.9,
        }),
        Box::new(CannedEngine {
            engine_id: EngineId::Secondary,
            text: "現在幾點",
            confidence: 0.8,
        }),
        Box::new(EchoForwarder),
    )?;

    let utterance = Utterance::new(AudioClip::new(vec![0.0; 16000], 16000));
    let reply = pipeline.run_cycle(&utterance)?;
    println!("[{:?}] {}", reply.latency_class, reply.text);

    Ok(())
}

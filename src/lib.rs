pub mod asr;
pub mod dialogue;
pub mod integration;
pub mod intent;
pub mod router;
pub mod system;

use router::ResponseLocale;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AssistantError {
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Engine timed out: {0}")]
    EngineTimeout(String),

    #[error("All transcription engines failed: {0}")]
    TranscriptionUnavailable(String),

    #[error("No files found in directory: {0}")]
    EmptyDirectory(String),

    #[error("Query timed out after {0} seconds")]
    QueryTimeout(u64),

    #[error("Dialogue service unreachable: {0}")]
    ServiceUnreachable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for AssistantError {
    fn from(e: std::io::Error) -> Self {
        AssistantError::IoError(e.to_string())
    }
}

impl AssistantError {
    /// Check if this error is recoverable
    ///
    /// Recoverable errors resolve into a spoken reply or a retry-eligible
    /// cycle; non-recoverable errors require operator intervention.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // A single engine failing is absorbed by the fallback chain
            AssistantError::EngineUnavailable(_) => true,
            AssistantError::EngineTimeout(_) => true,
            // The whole cycle failed but the user can simply speak again
            AssistantError::TranscriptionUnavailable(_) => true,
            // Dispatcher failures become user-facing replies
            AssistantError::EmptyDirectory(_) => true,
            AssistantError::QueryTimeout(_) => true,
            AssistantError::IoError(_) => true,
            // Dialogue service may come back on its own
            AssistantError::ServiceUnreachable(_) => true,
            // Config errors require user intervention
            AssistantError::ConfigError(_) => false,
            // Channel errors indicate internal issues
            AssistantError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description of the error in the response locale
    ///
    /// Returns a message suitable for handing to speech synthesis.
    pub fn user_message(&self, locale: ResponseLocale) -> String {
        if locale.is_chinese() {
            match self {
                AssistantError::EngineUnavailable(_)
                | AssistantError::EngineTimeout(_)
                | AssistantError::TranscriptionUnavailable(_) => {
                    "抱歉，我沒有聽清楚，請再說一次。".to_string()
                }
                AssistantError::EmptyDirectory(_) => "目前目錄下沒有找到檔案。".to_string(),
                AssistantError::QueryTimeout(_) => {
                    "抱歉，這個查詢花了太久，請稍後再試。".to_string()
                }
                AssistantError::ServiceUnreachable(_) => {
                    "抱歉，AI 服務目前無法使用，請稍後再試。".to_string()
                }
                AssistantError::ConfigError(_) => "設定有誤，請檢查設定後重新啟動。".to_string(),
                AssistantError::ChannelError(_) => "系統內部發生錯誤，請再試一次。".to_string(),
                AssistantError::IoError(_) => "讀取檔案系統時發生錯誤。".to_string(),
            }
        } else {
            match self {
                AssistantError::EngineUnavailable(_)
                | AssistantError::EngineTimeout(_)
                | AssistantError::TranscriptionUnavailable(_) => {
                    "Sorry, I didn't catch that. Please try again.".to_string()
                }
                AssistantError::EmptyDirectory(_) => {
                    "No files were found in the current directory.".to_string()
                }
                AssistantError::QueryTimeout(_) => {
                    "Sorry, that query took too long. Please try again later.".to_string()
                }
                AssistantError::ServiceUnreachable(_) => {
                    "Sorry, the AI service is currently unavailable. Please try again later."
                        .to_string()
                }
                AssistantError::ConfigError(_) => {
                    "Configuration error. Please check settings and restart.".to_string()
                }
                AssistantError::ChannelError(_) => {
                    "An internal error occurred. Please try again.".to_string()
                }
                AssistantError::IoError(_) => "A file system error occurred.".to_string(),
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(AssistantError::EngineTimeout("primary".into()).is_recoverable());
        assert!(AssistantError::TranscriptionUnavailable("both failed".into()).is_recoverable());
        assert!(AssistantError::QueryTimeout(10).is_recoverable());
        assert!(!AssistantError::ConfigError("bad threshold".into()).is_recoverable());
        assert!(!AssistantError::ChannelError("worker gone".into()).is_recoverable());
    }

    #[test]
    fn test_user_message_follows_locale() {
        let err = AssistantError::ServiceUnreachable("connection refused".into());
        assert!(err.user_message(ResponseLocale::ZhTw).contains("AI 服務"));
        assert!(err.user_message(ResponseLocale::En).contains("AI service"));
    }

    #[test]
    fn test_empty_directory_message_is_a_reply_not_an_apology() {
        let err = AssistantError::EmptyDirectory("/tmp/empty".into());
        let msg = err.user_message(ResponseLocale::ZhTw);
        assert!(msg.contains("沒有找到檔案"));
    }
}

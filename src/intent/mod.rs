//! Intent classification: system query vs open dialogue
//!
//! Classification is a total function over transcribed text. A fixed,
//! priority-ordered trigger table decides whether an utterance is one of the
//! deterministic system queries; everything else is dialogue for the AI
//! service.

pub mod triggers;

pub use triggers::{TriggerEntry, TriggerTable};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The deterministic local queries the assistant can answer without AI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    CurrentTime,
    CurrentDate,
    ListDirectory,
    CountFiles,
    LastModifiedFile,
    SystemInfo,
    DiskSpace,
}

/// What an utterance asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Deterministic local query, resolved without the AI service
    SystemQuery { kind: QueryKind, raw_text: String },
    /// Anything else, forwarded to the chat service
    Dialogue { raw_text: String },
}

impl Intent {
    pub fn raw_text(&self) -> &str {
        match self {
            Intent::SystemQuery { raw_text, .. } => raw_text,
            Intent::Dialogue { raw_text } => raw_text,
        }
    }
}

/// Maps transcribed text to exactly one intent
pub struct IntentClassifier {
    table: TriggerTable,
}

impl IntentClassifier {
    /// Classifier with the built-in trigger table
    pub fn new() -> Self {
        Self::with_table(TriggerTable::builtin())
    }

    /// Classifier with a custom (e.g. deserialized) trigger table
    pub fn with_table(table: TriggerTable) -> Self {
        Self { table }
    }

    pub fn table_version(&self) -> u32 {
        self.table.version
    }

    /// Classify text; total, never fails
    pub fn classify(&self, text: &str) -> Intent {
        match self.table.match_kind(text) {
            Some(kind) => {
                debug!(?kind, text, "system query detected");
                Intent::SystemQuery {
                    kind,
                    raw_text: text.to_string(),
                }
            }
            None => Intent::Dialogue {
                raw_text: text.to_string(),
            },
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(text: &str) -> Option<QueryKind> {
        match IntentClassifier::new().classify(text) {
            Intent::SystemQuery { kind, .. } => Some(kind),
            Intent::Dialogue { .. } => None,
        }
    }

    #[test]
    fn test_every_query_kind_is_reachable() {
        assert_eq!(kind_of("現在幾點"), Some(QueryKind::CurrentTime));
        assert_eq!(kind_of("今天幾號"), Some(QueryKind::CurrentDate));
        assert_eq!(kind_of("列出目錄"), Some(QueryKind::ListDirectory));
        assert_eq!(kind_of("這裡有幾個檔案"), Some(QueryKind::CountFiles));
        assert_eq!(kind_of("最後修改的檔案是哪個"), Some(QueryKind::LastModifiedFile));
        assert_eq!(kind_of("查一下系統資訊"), Some(QueryKind::SystemInfo));
        assert_eq!(kind_of("磁碟空間還剩多少"), Some(QueryKind::DiskSpace));
    }

    #[test]
    fn test_english_phrasings_are_covered() {
        assert_eq!(kind_of("What time is it?"), Some(QueryKind::CurrentTime));
        assert_eq!(kind_of("show me the last modified file"), Some(QueryKind::LastModifiedFile));
        assert_eq!(kind_of("how many files are in here"), Some(QueryKind::CountFiles));
        assert_eq!(kind_of("how much disk space is left"), Some(QueryKind::DiskSpace));
    }

    #[test]
    fn test_unmatched_text_is_dialogue() {
        let intent = IntentClassifier::new().classify("講個笑話給我聽");
        assert_eq!(
            intent,
            Intent::Dialogue {
                raw_text: "講個笑話給我聽".to_string()
            }
        );
    }

    #[test]
    fn test_classify_is_total_on_degenerate_input() {
        // Empty, whitespace, punctuation-only: still exactly one intent
        for text in ["", "   ", "？！。", "\n\t"] {
            match IntentClassifier::new().classify(text) {
                Intent::Dialogue { raw_text } => assert_eq!(raw_text, text),
                other => panic!("degenerate input classified as {other:?}"),
            }
        }
    }

    // Priority-order laws, one test per overlapping pair. Each input is
    // crafted to match both kinds' patterns; the earlier entry must win.

    #[test]
    fn test_priority_last_modified_file_beats_count_files() {
        assert_eq!(
            kind_of("count the files and tell me the last modified file"),
            Some(QueryKind::LastModifiedFile)
        );
    }

    #[test]
    fn test_priority_last_modified_file_beats_list_directory() {
        // "列出...檔案" would match ListDirectory on its own
        assert_eq!(
            kind_of("列出最後一個被修改的檔案"),
            Some(QueryKind::LastModifiedFile)
        );
    }

    #[test]
    fn test_priority_count_files_beats_list_directory() {
        assert_eq!(kind_of("list how many files there are"), Some(QueryKind::CountFiles));
    }

    #[test]
    fn test_priority_disk_space_beats_list_directory() {
        assert_eq!(
            kind_of("what is the disk usage of this directory contents"),
            Some(QueryKind::DiskSpace)
        );
    }

    #[test]
    fn test_priority_date_beats_time() {
        assert_eq!(kind_of("今天的日期和時間"), Some(QueryKind::CurrentDate));
        assert_eq!(kind_of("what is the date and time"), Some(QueryKind::CurrentDate));
    }

    #[test]
    fn test_last_modified_wins_for_any_text_mentioning_file_generically() {
        // A last-modified trigger plus a generic "file" mention must never
        // drift to another file-ish kind.
        for text in [
            "最後一個被修改的檔案是哪個檔案",
            "which file is the last modified file",
            "the newest file among my files",
        ] {
            assert_eq!(kind_of(text), Some(QueryKind::LastModifiedFile), "text: {text}");
        }
    }

    #[test]
    fn test_custom_table_changes_classification() {
        let json = r#"{
            "version": 2,
            "entries": [
                { "kind": "current_time", "phrases": ["报时"] }
            ]
        }"#;
        let classifier = IntentClassifier::with_table(TriggerTable::from_json(json).unwrap());
        assert_eq!(classifier.table_version(), 2);
        match classifier.classify("请报时") {
            Intent::SystemQuery { kind, .. } => assert_eq!(kind, QueryKind::CurrentTime),
            other => panic!("expected system query, got {other:?}"),
        }
        // The built-in vocabulary is gone with the custom table
        match classifier.classify("現在幾點") {
            Intent::Dialogue { .. } => {}
            other => panic!("expected dialogue, got {other:?}"),
        }
    }
}

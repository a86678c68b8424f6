//! Versioned trigger-pattern table for system-query detection
//!
//! The table is data, not logic: it can be serialized, shipped alongside the
//! assistant, and replaced without touching the matching code. Entry order is
//! the priority order: more specific phrasings come before more general
//! ones, and the first matching entry wins.

use crate::intent::QueryKind;
use crate::{AssistantError, Result};
use serde::{Deserialize, Serialize};

/// Version of the built-in table shipped with this crate
pub const BUILTIN_TABLE_VERSION: u32 = 1;

/// Trigger phrases for one query kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerEntry {
    pub kind: QueryKind,
    pub phrases: Vec<String>,
}

/// Ordered trigger table; entry order is the classification priority
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerTable {
    pub version: u32,
    pub entries: Vec<TriggerEntry>,
}

impl TriggerTable {
    /// The built-in zh-TW/English table
    ///
    /// Ordering constraints baked into this table:
    /// - `LastModifiedFile` precedes `CountFiles` and `ListDirectory`; all
    ///   three vocabularies mention files.
    /// - `DiskSpace` precedes `ListDirectory` ("disk usage of this
    ///   directory" is a disk query).
    /// - `CurrentDate` precedes `CurrentTime` (a phrase naming both resolves
    ///   to the date query).
    pub fn builtin() -> Self {
        let entry = |kind: QueryKind, phrases: &[&str]| TriggerEntry {
            kind,
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        };
        Self {
            version: BUILTIN_TABLE_VERSION,
            entries: vec![
                entry(
                    QueryKind::LastModifiedFile,
                    &[
                        "最後一個被修改的檔案",
                        "最後修改的檔案",
                        "最近修改的檔案",
                        "最新的檔案",
                        "last modified file",
                        "most recently modified file",
                        "last changed file",
                        "newest file",
                    ],
                ),
                entry(
                    QueryKind::CountFiles,
                    &[
                        "有幾個檔案",
                        "檔案數量",
                        "多少個檔案",
                        "how many files",
                        "count the files",
                        "number of files",
                        "file count",
                    ],
                ),
                entry(
                    QueryKind::DiskSpace,
                    &[
                        "磁碟空間",
                        "硬碟空間",
                        "磁碟使用",
                        "剩多少空間",
                        "disk space",
                        "disk usage",
                        "free space",
                        "space left",
                    ],
                ),
                entry(
                    QueryKind::SystemInfo,
                    &[
                        "系統資訊",
                        "系統訊息",
                        "電腦資訊",
                        "什麼系統",
                        "system info",
                        "system information",
                        "about this computer",
                    ],
                ),
                entry(
                    QueryKind::ListDirectory,
                    &[
                        "列出目錄",
                        "目錄內容",
                        "列出檔案",
                        "資料夾裡有什麼",
                        "目錄裡有什麼",
                        "list the directory",
                        "list files",
                        "show the directory",
                        "directory contents",
                        "what is in this folder",
                    ],
                ),
                entry(
                    QueryKind::CurrentDate,
                    &[
                        "今天幾號",
                        "日期",
                        "幾月幾號",
                        "今天星期幾",
                        "what is the date",
                        "todays date",
                        "what day is it",
                        "current date",
                    ],
                ),
                entry(
                    QueryKind::CurrentTime,
                    &[
                        "現在幾點",
                        "幾點",
                        "時間",
                        "what time",
                        "current time",
                        "time is it",
                    ],
                ),
            ],
        }
    }

    /// Load a table from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AssistantError::ConfigError(format!("invalid trigger table: {e}")))
    }

    /// First query kind whose pattern set matches the text, in table order
    pub fn match_kind(&self, text: &str) -> Option<QueryKind> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return None;
        }
        for entry in &self.entries {
            if entry.phrases.iter().any(|p| phrase_matches(p, &normalized)) {
                return Some(entry.kind);
            }
        }
        None
    }
}

impl Default for TriggerTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Characters stripped before matching: whitespace plus ASCII and common
/// CJK punctuation that ASR engines insert freely.
fn is_ignorable(c: char) -> bool {
    c.is_whitespace()
        || c.is_ascii_punctuation()
        || matches!(
            c,
            '，' | '。' | '？' | '！' | '、' | '：' | '；' | '「' | '」' | '『' | '』' | '（'
                | '）' | '…' | '・'
        )
}

/// Lowercase and strip punctuation/whitespace for containment matching
pub(crate) fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !is_ignorable(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Match one phrase against already-normalized text
///
/// Single-token phrases match by contiguous containment. Multi-token
/// phrases match when every token appears in order, tolerating function
/// words the engine inserted between them.
fn phrase_matches(phrase: &str, normalized_text: &str) -> bool {
    let tokens: Vec<String> = phrase.split_whitespace().map(normalize).collect();
    match tokens.len() {
        0 => false,
        1 => normalized_text.contains(tokens[0].as_str()),
        _ => {
            let mut rest = normalized_text;
            for token in &tokens {
                match rest.find(token.as_str()) {
                    Some(pos) => rest = &rest[pos + token.len()..],
                    None => return false,
                }
            }
            true
        }
    }
}

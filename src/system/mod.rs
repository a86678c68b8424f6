//! Deterministic system-query execution
//!
//! Each query kind performs one read-only local operation and renders a
//! fixed-locale response string. Queries run on a worker thread bounded by
//! the configured timeout; a query that overruns is abandoned (the worker's
//! directory handles drop when it exits) and the user hears an apology
//! instead of an error. Dispatch never fails; every internal error is
//! recovered into a spoken reply.

mod host;

use crate::intent::QueryKind;
use crate::router::{Reply, ResponseLocale};
use crate::{AssistantError, Result};
use chrono::{DateTime, Local};
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// Executes system queries against the configured working directory
pub struct SystemQueryDispatcher {
    working_directory: PathBuf,
    locale: ResponseLocale,
    query_timeout: Duration,
}

impl SystemQueryDispatcher {
    pub fn new(working_directory: PathBuf, locale: ResponseLocale, query_timeout: Duration) -> Self {
        Self {
            working_directory,
            locale,
            query_timeout,
        }
    }

    /// Resolve one system query to a spoken reply
    ///
    /// The input text is never interpreted as a path; only the configured
    /// working directory is ever touched.
    pub fn dispatch(&self, kind: QueryKind, raw_text: &str) -> Reply {
        debug!(?kind, raw_text, "dispatching system query");
        let dir = self.working_directory.clone();
        let locale = self.locale;
        let text = match self.run_with_timeout(move || execute(kind, &dir, locale)) {
            Ok(text) => text,
            Err(err) => {
                warn!(?kind, error = %err, "system query failed, replying with user message");
                err.user_message(self.locale)
            }
        };
        Reply::fast(text)
    }

    /// Run a query job on a worker thread, bounded by the query timeout
    ///
    /// On timeout the receiver is dropped; the worker's eventual send fails
    /// silently and the thread exits, releasing its handles.
    fn run_with_timeout<F>(&self, job: F) -> Result<String>
    where
        F: FnOnce() -> Result<String> + Send + 'static,
    {
        let (tx, rx) = bounded(1);
        thread::spawn(move || {
            let _ = tx.send(job());
        });
        match rx.recv_timeout(self.query_timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                Err(AssistantError::QueryTimeout(self.query_timeout.as_secs()))
            }
            Err(RecvTimeoutError::Disconnected) => Err(AssistantError::ChannelError(
                "query worker exited without a result".to_string(),
            )),
        }
    }
}

fn execute(kind: QueryKind, dir: &Path, locale: ResponseLocale) -> Result<String> {
    match kind {
        QueryKind::CurrentTime => Ok(render_time(Local::now(), locale)),
        QueryKind::CurrentDate => Ok(render_date(Local::now(), locale)),
        QueryKind::ListDirectory => list_directory(dir, locale),
        QueryKind::CountFiles => count_files(dir, locale),
        QueryKind::LastModifiedFile => last_modified_file(dir, locale),
        QueryKind::SystemInfo => Ok(host::system_info(locale)),
        QueryKind::DiskSpace => host::disk_space(dir, locale),
    }
}

fn render_time(now: DateTime<Local>, locale: ResponseLocale) -> String {
    if locale.is_chinese() {
        format!("現在時間是 {}。", now.format("%Y年%m月%d日 %H:%M:%S"))
    } else {
        format!("The current time is {}.", now.format("%Y-%m-%d %H:%M:%S"))
    }
}

fn render_date(now: DateTime<Local>, locale: ResponseLocale) -> String {
    if locale.is_chinese() {
        format!("今天是 {}。", now.format("%Y年%m月%d日"))
    } else {
        format!("Today is {}.", now.format("%Y-%m-%d"))
    }
}

/// Spoken label for the working directory: its name, or the full path when
/// the name is empty (filesystem root).
fn dir_label(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

/// A directory entry relevant to file queries
#[derive(Debug, Clone)]
struct FileEntry {
    name: String,
    modified: SystemTime,
    size: u64,
}

/// Visible (non-hidden) entries of the directory, split into directory and
/// file names; files carry their metadata.
fn scan(dir: &Path) -> Result<(Vec<String>, Vec<FileEntry>)> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            dirs.push(name);
        } else if metadata.is_file() {
            files.push(FileEntry {
                name,
                modified: metadata.modified()?,
                size: metadata.len(),
            });
        }
    }
    dirs.sort();
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok((dirs, files))
}

fn list_directory(dir: &Path, locale: ResponseLocale) -> Result<String> {
    let (dirs, files) = scan(dir)?;
    let label = dir_label(dir);
    if dirs.is_empty() && files.is_empty() {
        return Ok(if locale.is_chinese() {
            format!("目錄 '{label}' 是空的。")
        } else {
            format!("Directory '{label}' is empty.")
        });
    }
    let names: Vec<&str> = dirs
        .iter()
        .map(String::as_str)
        .chain(files.iter().map(|f| f.name.as_str()))
        .collect();
    Ok(if locale.is_chinese() {
        format!(
            "目錄 '{label}' 中有 {} 個資料夾、{} 個檔案：{}。",
            dirs.len(),
            files.len(),
            names.join("、")
        )
    } else {
        format!(
            "Directory '{label}' has {} folders and {} files: {}.",
            dirs.len(),
            files.len(),
            names.join(", ")
        )
    })
}

fn count_files(dir: &Path, locale: ResponseLocale) -> Result<String> {
    let (dirs, files) = scan(dir)?;
    let label = dir_label(dir);
    let total = dirs.len() + files.len();
    Ok(if locale.is_chinese() {
        format!(
            "目前路徑 '{label}' 下共有 {} 個檔案，{} 個資料夾，總計 {total} 個項目。",
            files.len(),
            dirs.len(),
        )
    } else {
        format!(
            "Directory '{label}' contains {} files and {} folders, {total} items in total.",
            files.len(),
            dirs.len(),
        )
    })
}

/// Newest entry by modification time; ties broken by lexicographic name
fn pick_latest(files: Vec<FileEntry>) -> Option<FileEntry> {
    let mut best: Option<FileEntry> = None;
    for file in files {
        let replace = match &best {
            None => true,
            Some(current) => {
                file.modified > current.modified
                    || (file.modified == current.modified && file.name < current.name)
            }
        };
        if replace {
            best = Some(file);
        }
    }
    best
}

fn last_modified_file(dir: &Path, locale: ResponseLocale) -> Result<String> {
    let (_, files) = scan(dir)?;
    let latest = pick_latest(files)
        .ok_or_else(|| AssistantError::EmptyDirectory(dir.display().to_string()))?;
    let label = dir_label(dir);
    let modified: DateTime<Local> = latest.modified.into();
    Ok(if locale.is_chinese() {
        format!(
            "目錄 '{label}' 中最後被修改的檔案是：檔案名稱：{}，修改時間：{}，檔案大小：{} bytes。",
            latest.name,
            modified.format("%Y年%m月%d日 %H:%M:%S"),
            latest.size,
        )
    } else {
        format!(
            "The most recently modified file in '{label}' is {}, modified {}, {} bytes.",
            latest.name,
            modified.format("%Y-%m-%d %H:%M:%S"),
            latest.size,
        )
    })
}

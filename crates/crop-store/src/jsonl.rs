//! JSON-lines analysis store
//!
//! Each record is one JSON object terminated by `\n`. The file is only ever
//! opened in append mode; a single async mutex serializes writers so each
//! line lands whole. A line left unterminated by a failed write (or found
//! at the end of the file on open) is closed off before the next record.

use crate::{AnalysisStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use crop_core::{AnalysisRecord, NewAnalysisRecord};
use std::path::{Path, PathBuf};
use std::io;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug)]
struct Writer {
    file: File,
    next_id: u64,
    /// File does not end with `\n`
    needs_newline: bool,
}

/// Append-only file store
#[derive(Debug)]
pub struct JsonlStore {
    path: PathBuf,
    writer: Mutex<Writer>,
}

impl JsonlStore {
    /// Open (or create) the file at `path`.
    ///
    /// Ids continue after the highest id already present. Lines that do not
    /// decode are skipped with a warning.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let (next_id, needs_newline) = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                (last_id(&text, &path) + 1, bytes.last().is_some_and(|b| *b != b'\n'))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => (1, false),
            Err(e) => return Err(e.into()),
        };
        if needs_newline {
            tracing::warn!(path = %path.display(), "store ends with an unterminated line");
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        tracing::info!(path = %path.display(), next_id, "opened analysis store");

        Ok(Self {
            path,
            writer: Mutex::new(Writer {
                file,
                next_id,
                needs_newline,
            }),
        })
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn last_id(text: &str, path: &Path) -> u64 {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<AnalysisRecord>(line) {
            Ok(record) => Some(record.id),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping undecodable store line");
                None
            }
        })
        .max()
        .unwrap_or(0)
}

async fn write_line(file: &mut File, line: &[u8]) -> io::Result<()> {
    file.write_all(line).await?;
    file.flush().await
}

#[async_trait]
impl AnalysisStore for JsonlStore {
    async fn append(&self, record: NewAnalysisRecord) -> Result<AnalysisRecord, StoreError> {
        let mut writer = self.writer.lock().await;

        let stored = record.into_record(writer.next_id, Utc::now());
        let json = serde_json::to_vec(&stored)?;

        let mut line = Vec::with_capacity(json.len() + 2);
        if writer.needs_newline {
            line.push(b'\n');
        }
        line.extend_from_slice(&json);
        line.push(b'\n');

        if let Err(e) = write_line(&mut writer.file, &line).await {
            writer.needs_newline = true;
            tracing::warn!(path = %self.path.display(), error = %e, "analysis record write failed");
            return Err(e.into());
        }
        writer.needs_newline = false;
        writer.next_id += 1;

        tracing::debug!(id = stored.id, path = %self.path.display(), "analysis record appended");
        Ok(stored)
    }
}

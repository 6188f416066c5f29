//! Per-session, append-only evaluation history.
//!
//! Records are never updated or deleted here. Two submissions under the same session
//! always end up as two records; writes for one session are serialised.

pub mod handlers;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::evaluation::EvaluationInputs;
use crate::rubric::models::FormattedEvaluation;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("History serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid session identifier")]
    InvalidSession,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub session_id: String,
    pub mode: String,
    pub inputs: EvaluationInputs,
    pub evaluation: FormattedEvaluation,
    pub timestamp: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn new(session_id: &str, inputs: EvaluationInputs, evaluation: FormattedEvaluation) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            mode: evaluation.mode.clone(),
            timestamp: evaluation.timestamp,
            inputs,
            evaluation,
        }
    }
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Adds one record; never overwrites earlier records for the session.
    async fn append(&self, session_id: &str, record: HistoryRecord) -> Result<(), HistoryError>;

    /// All records for the session, newest first. Unknown sessions yield an empty list.
    async fn list(&self, session_id: &str) -> Result<Vec<HistoryRecord>, HistoryError>;
}

fn newest_first(records: &mut [HistoryRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Session ids become directory names, so only a conservative character set is allowed.
fn check_session_id(session_id: &str) -> Result<(), HistoryError> {
    let valid = !session_id.is_empty()
        && session_id.len() <= 64
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(HistoryError::InvalidSession)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FileHistoryStore
// ────────────────────────────────────────────────────────────────────────────

/// One pretty-printed JSON file per submission under `<root>/<session_id>/`.
pub struct FileHistoryStore {
    root: PathBuf,
    session_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl FileHistoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn session_lock(&self, session_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .session_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(session_id.to_string()).or_default().clone()
    }

    /// Forgets the session's lock once no other append holds or awaits it.
    fn release_lock(&self, session_id: &str, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self
            .session_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // One reference in the map plus ours; clones are only taken under this mutex.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(session_id);
        }
    }

    async fn write_record(&self, session_id: &str, record: &HistoryRecord) -> Result<(), HistoryError> {
        let dir = self.root.join(session_id);
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(Self::file_name(record));
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(record)?;
        let written = match tokio::fs::write(&tmp, body).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                debug!("Could not remove {}: {cleanup}", tmp.display());
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn file_name(record: &HistoryRecord) -> String {
        format!(
            "evaluation_{}_{}.json",
            record.timestamp.format("%Y%m%d_%H%M%S_%6f"),
            record.id.simple()
        )
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn append(&self, session_id: &str, record: HistoryRecord) -> Result<(), HistoryError> {
        check_session_id(session_id)?;
        let lock = self.session_lock(session_id);
        let written = {
            let _guard = lock.lock().await;
            self.write_record(session_id, &record).await
        };
        self.release_lock(session_id, lock);
        written?;

        debug!("Saved evaluation {} for session {session_id}", record.id);
        Ok(())
    }

    async fn list(&self, session_id: &str) -> Result<Vec<HistoryRecord>, HistoryError> {
        check_session_id(session_id)?;
        let dir = self.root.join(session_id);

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = tokio::fs::read(&path)
                .await
                .map_err(HistoryError::from)
                .and_then(|bytes| serde_json::from_slice::<HistoryRecord>(&bytes).map_err(Into::into));
            match parsed {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping unreadable history file {}: {e}", path.display()),
            }
        }

        newest_first(&mut records);
        Ok(records)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryHistoryStore
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<HashMap<String, Vec<HistoryRecord>>>,
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, session_id: &str, record: HistoryRecord) -> Result<(), HistoryError> {
        check_session_id(session_id)?;
        let mut guard = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.entry(session_id.to_string()).or_default().push(record);
        Ok(())
    }

    async fn list(&self, session_id: &str) -> Result<Vec<HistoryRecord>, HistoryError> {
        check_session_id(session_id)?;
        let guard = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut records = guard.get(session_id).cloned().unwrap_or_default();
        newest_first(&mut records);
        Ok(records)
    }
}

//! Analytics subsystem: append-only JSON event log
//!
//! The log is a single pretty-printed JSON array on disk. Every append is a
//! full read-modify-write, so `EventLog` serializes them behind one async
//! mutex and replaces the file via write-to-temp + rename. Two processes
//! sharing one file can still lose updates; one server per file is assumed.

use std::path::{Path, PathBuf};

use reflect_core::{AnalyticsEvent, AnalyticsSummary, ReflectError};
use tokio::sync::Mutex;

pub struct EventLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fire-and-forget append. Storage errors are logged and swallowed.
    pub async fn append(&self, event: AnalyticsEvent) {
        if let Err(e) = self.try_append(event).await {
            tracing::error!(path = %self.path.display(), error = %e, "Analytics logging error");
        }
    }

    pub async fn try_append(&self, event: AnalyticsEvent) -> Result<(), ReflectError> {
        event.validate()?;

        let _guard = self.write_lock.lock().await;

        let mut events = self.read_unlocked().await?;
        events.push(event);

        let body = serde_json::to_vec_pretty(&events)?;
        replace_file(&self.path, &self.tmp_path(), &body).await?;

        tracing::debug!(count = events.len(), "Analytics event appended");
        Ok(())
    }

    /// All events in append order. A missing file is an empty log.
    pub async fn read_all(&self) -> Result<Vec<AnalyticsEvent>, ReflectError> {
        self.read_unlocked().await
    }

    /// Counts recomputed from the full log on every call.
    pub async fn aggregate(&self) -> Result<AnalyticsSummary, ReflectError> {
        let events = self.read_all().await?;
        Ok(AnalyticsSummary::from_events(&events))
    }

    async fn read_unlocked(&self) -> Result<Vec<AnalyticsEvent>, ReflectError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "analytics.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Write `body` to `tmp`, then rename it over `path`. A failed rename removes
/// the temp file so no stray `.tmp` outlives the error.
async fn replace_file(path: &Path, tmp: &Path, body: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(tmp, body).await?;
    if let Err(rename_err) = tokio::fs::rename(tmp, path).await {
        if let Err(e) = tokio::fs::remove_file(tmp).await {
            tracing::warn!(path = %tmp.display(), error = %e, "Failed to remove analytics temp file");
        }
        return Err(rename_err);
    }
    Ok(())
}

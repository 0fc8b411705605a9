//! Submission sinks for completed answer records.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::answers::AnswerRecord;

/// A finished answer record, packaged for hand-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub submitted_at: DateTime<Utc>,
    pub answers: AnswerRecord,
}

/// External collaborator receiving submissions.
pub trait Submitter: Send + Sync {
    fn submit(&self, submission: &Submission) -> Result<()>;
}

/// Emits the submission as a structured log event and keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSubmitter;

impl Submitter for LogSubmitter {
    fn submit(&self, submission: &Submission) -> Result<()> {
        let payload = serde_json::to_string(submission).context("serialize submission")?;
        info!(submitted_at = %submission.submitted_at, payload = %payload, "submit");
        Ok(())
    }
}

/// Writes each submission as a JSON file into an outbox directory.
#[derive(Debug, Clone)]
pub struct OutboxSubmitter {
    dir: PathBuf,
}

impl OutboxSubmitter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a submission is written to, derived from its timestamp.
    pub fn path_for(&self, submission: &Submission) -> PathBuf {
        let stamp = submission.submitted_at.format("%Y%m%dT%H%M%S%.6fZ");
        self.dir.join(format!("submission-{stamp}.json"))
    }
}

impl Submitter for OutboxSubmitter {
    fn submit(&self, submission: &Submission) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create outbox {}", self.dir.display()))?;
        let path = self.path_for(submission);
        let mut buf = serde_json::to_string_pretty(submission).context("serialize submission")?;
        buf.push('\n');
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, buf)
            .with_context(|| format!("write temp submission {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("write submission {}", path.display()))?;
        debug!(path = %path.display(), "submission written to outbox");
        Ok(())
    }
}

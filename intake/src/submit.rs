//! Packaging of the final answer record for hand-off.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::core::answers::AnswerRecord;
use crate::io::submitter::{Submission, Submitter};

/// Packages answer snapshots and hands them to a [`Submitter`].
///
/// No structural validation happens here: whatever the wizard holds when the
/// terminal step completes is what gets submitted.
pub struct SubmissionHandler {
    submitter: Box<dyn Submitter>,
}

impl SubmissionHandler {
    pub fn new(submitter: impl Submitter + 'static) -> Self {
        Self {
            submitter: Box::new(submitter),
        }
    }

    /// Snapshot `answers` into a timestamped submission.
    pub fn package(answers: &AnswerRecord) -> Submission {
        Submission {
            submitted_at: Utc::now(),
            answers: answers.clone(),
        }
    }

    pub fn submit(&self, answers: &AnswerRecord) -> Result<Submission> {
        let submission = Self::package(answers);
        self.submitter
            .submit(&submission)
            .context("hand off submission")?;
        info!(submitted_at = %submission.submitted_at, "answers submitted");
        Ok(submission)
    }
}

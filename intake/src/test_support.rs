//! Test-only doubles for the verifier, token store and submitter.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::io::submitter::{Submission, Submitter};
use crate::io::token_store::TokenStore;
use crate::io::verifier::{VerifyError, Verifier};

/// Build an owned name list.
pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

type Outcome = Result<Vec<String>, VerifyError>;

/// Verifier returning queued outcomes in order and recording every token.
#[derive(Clone, Default)]
pub struct ScriptedVerifier {
    outcomes: Arc<Mutex<VecDeque<Outcome>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedVerifier {
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(outcomes.into())),
            calls: Arc::default(),
        }
    }

    /// Tokens passed to `verify`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl Verifier for ScriptedVerifier {
    async fn verify(&self, token: &str) -> Result<Vec<String>, VerifyError> {
        self.calls.lock().expect("calls lock").push(token.to_string());
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .pop_front()
            .unwrap_or_else(|| Err(VerifyError::Transport("no scripted outcome".to_string())))
    }
}

/// A verification waiting for the test to settle it.
pub struct PendingCall {
    pub token: String,
    reply: oneshot::Sender<Outcome>,
}

impl PendingCall {
    pub fn settle(self, outcome: Outcome) {
        // The gate may have been dropped; nothing to settle then.
        let _ = self.reply.send(outcome);
    }
}

/// Verifier whose calls stay pending until the test settles them.
///
/// Lets tests control the order in which overlapping verifications finish.
#[derive(Clone)]
pub struct PendingVerifier {
    calls: mpsc::UnboundedSender<PendingCall>,
}

impl PendingVerifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PendingCall>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { calls: tx }, rx)
    }
}

#[async_trait]
impl Verifier for PendingVerifier {
    async fn verify(&self, token: &str) -> Result<Vec<String>, VerifyError> {
        let (reply, settled) = oneshot::channel();
        self.calls
            .send(PendingCall {
                token: token.to_string(),
                reply,
            })
            .map_err(|_| VerifyError::Transport("test harness gone".to_string()))?;
        settled
            .await
            .unwrap_or_else(|_| Err(VerifyError::Transport("call dropped".to_string())))
    }
}

/// In-memory token store shared between a test and the gate under test.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
    fail_writes: bool,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.to_string()))),
            fail_writes: false,
        }
    }

    /// Store whose `save` and `clear` always fail.
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().expect("token lock").clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token())
    }

    fn save(&self, token: &str) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow!("token store is read-only"));
        }
        *self.token.lock().expect("token lock") = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow!("token store is read-only"));
        }
        *self.token.lock().expect("token lock") = None;
        Ok(())
    }
}

/// Submitter that keeps every submission it receives.
#[derive(Clone, Default)]
pub struct RecordingSubmitter {
    received: Arc<Mutex<Vec<Submission>>>,
    fail: bool,
}

impl RecordingSubmitter {
    /// Submitter that refuses every hand-off.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn received(&self) -> Vec<Submission> {
        self.received.lock().expect("received lock").clone()
    }
}

impl Submitter for RecordingSubmitter {
    fn submit(&self, submission: &Submission) -> Result<()> {
        if self.fail {
            return Err(anyhow!("submission endpoint unavailable"));
        }
        self.received
            .lock()
            .expect("received lock")
            .push(submission.clone());
        Ok(())
    }
}

//! Application-root context tying the gate, the wizard and submission together.
//!
//! One [`IntakeContext`] is built at startup and passed to whatever drives the
//! form (the CLI, the UI server). The wizard lives inside it and follows the
//! session: it is mounted fresh on the first authenticated access and
//! discarded on submission or as soon as the session is no longer
//! authenticated.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::fields::FieldPatch;
use crate::core::invariants::{FieldError, check_patch, stale_selection, validate_record};
use crate::core::types::Step;
use crate::core::wizard::WizardController;
use crate::io::config::IntakeConfig;
use crate::io::submitter::{OutboxSubmitter, Submission, Submitter};
use crate::io::token_store::FileTokenStore;
use crate::io::verifier::HttpVerifier;
use crate::session::{Session, SessionGate};
use crate::submit::SubmissionHandler;

/// Failures of context operations that a caller may want to tell apart.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("answers can only be submitted from the {} step", Step::Encounter)]
    NotAtTerminalStep,
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("submission failed: {0:#}")]
    Submission(anyhow::Error),
}

pub struct IntakeContext {
    gate: SessionGate,
    wizard: Mutex<Option<WizardController>>,
    submissions: SubmissionHandler,
}

impl IntakeContext {
    pub fn new(gate: SessionGate, submissions: SubmissionHandler) -> Self {
        Self {
            gate,
            wizard: Mutex::new(None),
            submissions,
        }
    }

    /// Production wiring: HTTP verifier, file token store, outbox submitter.
    pub fn from_config(cfg: &IntakeConfig) -> Result<Self> {
        Self::with_submitter(cfg, OutboxSubmitter::new(&cfg.outbox_dir))
    }

    /// Like [`IntakeContext::from_config`] but handing submissions to `submitter`.
    pub fn with_submitter(
        cfg: &IntakeConfig,
        submitter: impl Submitter + 'static,
    ) -> Result<Self> {
        let gate = SessionGate::new(
            HttpVerifier::from_config(cfg)?,
            FileTokenStore::new(&cfg.token_path),
        );
        Ok(Self::new(gate, SubmissionHandler::new(submitter)))
    }

    pub fn session(&self) -> Session {
        self.gate.snapshot()
    }

    pub async fn restore_session(&self) -> Session {
        let session = self.gate.restore_session().await;
        self.follow_session(&session);
        session
    }

    pub async fn login_with_credential(&self, credential: Option<&str>) -> Session {
        let session = self.gate.login_with_credential(credential).await;
        self.follow_session(&session);
        session
    }

    pub fn logout(&self) -> Result<Session> {
        let session = self.gate.logout()?;
        self.follow_session(&session);
        Ok(session)
    }

    /// Run `f` against the mounted wizard, mounting a fresh one if needed.
    pub fn with_wizard<R>(
        &self,
        f: impl FnOnce(&mut WizardController) -> R,
    ) -> Result<R, IntakeError> {
        let authenticated = self.gate.is_authenticated();
        let mut slot = self.lock_wizard();
        if !authenticated {
            if slot.take().is_some() {
                info!("session lost, wizard discarded");
            }
            return Err(IntakeError::NotAuthenticated);
        }
        let wizard = slot.get_or_insert_with(|| {
            info!("wizard mounted");
            WizardController::new()
        });
        Ok(f(wizard))
    }

    /// Write one field.
    ///
    /// In `Existing` mode a selection outside the known names is rejected, and
    /// switching into that mode drops a selection that is not known.
    pub fn set_field(&self, patch: FieldPatch) -> Result<(), IntakeError> {
        let known_names = self.gate.known_names();
        self.with_wizard(|wizard| {
            check_patch(&patch, wizard.answers(), &known_names)?;
            wizard.set_field(patch);
            drop_stale_selection(wizard, &known_names);
            Ok::<_, FieldError>(())
        })??;
        Ok(())
    }

    /// Hand the current answers off and discard the wizard.
    ///
    /// Only the terminal step completes the form. The answers are submitted
    /// as they are; inconsistencies are only logged. On a failed hand-off the
    /// wizard is kept so the user can retry.
    pub fn submit(&self) -> Result<Submission, IntakeError> {
        let answers = self
            .with_wizard(|wizard| {
                (wizard.current_step() == Step::Encounter).then(|| wizard.answers().clone())
            })?
            .ok_or(IntakeError::NotAtTerminalStep)?;
        for problem in validate_record(&answers, &self.gate.known_names()) {
            warn!(problem = %problem, "submitting inconsistent answers");
        }
        let submission = self
            .submissions
            .submit(&answers)
            .map_err(IntakeError::Submission)?;
        self.lock_wizard().take();
        info!("wizard discarded after submission");
        Ok(submission)
    }

    /// True while a wizard is mounted.
    pub fn wizard_mounted(&self) -> bool {
        self.lock_wizard().is_some()
    }

    fn follow_session(&self, session: &Session) {
        let mut slot = self.lock_wizard();
        if !session.authenticated {
            if slot.take().is_some() {
                info!("session lost, wizard discarded");
            }
        } else if let Some(wizard) = slot.as_mut() {
            drop_stale_selection(wizard, &session.known_names);
        }
    }

    fn lock_wizard(&self) -> MutexGuard<'_, Option<WizardController>> {
        self.wizard.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn drop_stale_selection(wizard: &mut WizardController, known_names: &[String]) {
    if let Some(stale) = stale_selection(wizard.answers(), known_names) {
        info!(partner = %stale, "selected partner no longer known, selection cleared");
        wizard.set_field(FieldPatch::SelectedPartner(String::new()));
    }
}

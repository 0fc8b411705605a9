//! Step sequencing for the three-step intake wizard.

use std::collections::BTreeSet;

use tracing::debug;

use crate::core::answers::AnswerRecord;
use crate::core::fields::{FieldId, FieldPatch};
use crate::core::resolver::active_fields;
use crate::core::types::Step;

/// Owns the current step and the answer record for one form session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardController {
    current: Step,
    answers: AnswerRecord,
}

impl WizardController {
    /// Fresh wizard positioned on the first step with empty answers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> Step {
        self.current
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    /// Move forward one step. No-op on the terminal step.
    pub fn advance(&mut self) -> Step {
        if let Some(next) = self.current.next() {
            debug!(from = %self.current, to = %next, "wizard advance");
            self.current = next;
        }
        self.current
    }

    /// Move back one step. No-op on the first step.
    pub fn retreat(&mut self) -> Step {
        if let Some(prev) = self.current.prev() {
            debug!(from = %self.current, to = %prev, "wizard retreat");
            self.current = prev;
        }
        self.current
    }

    /// Revisit `step` if it is the current step or an earlier one.
    ///
    /// Returns `false` and leaves the position unchanged for later steps.
    pub fn jump_to(&mut self, step: Step) -> bool {
        if step > self.current {
            debug!(current = %self.current, requested = %step, "wizard jump rejected");
            return false;
        }
        self.current = step;
        true
    }

    /// Write one field. Values on branches that become inactive are kept.
    pub fn set_field(&mut self, patch: FieldPatch) {
        debug!(field = %patch.field(), "wizard set field");
        self.answers.apply(patch);
    }

    pub fn read_field(&self, field: FieldId) -> FieldPatch {
        self.answers.read(field)
    }

    pub fn active_fields(&self, step: Step) -> BTreeSet<FieldId> {
        active_fields(step, &self.answers)
    }
}

//! Non-interactive wizard runs driven by a list of field patches.

use std::collections::BTreeSet;

use tracing::debug;

use crate::context::{IntakeContext, IntakeError};
use crate::core::answers::AnswerRecord;
use crate::core::fields::{FieldId, FieldPatch};
use crate::core::resolver::active_fields;
use crate::core::types::Step;
use crate::io::submitter::Submission;

/// Fields that were active when the wizard left each step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    pub active: BTreeSet<FieldId>,
}

/// Outcome of walking the wizard end to end.
#[derive(Debug, Clone, PartialEq)]
pub struct FillOutcome {
    pub steps: Vec<StepReport>,
    pub submission: Submission,
}

/// Walk the wizard forward from its current step, applying the patches owned
/// by each step while the wizard is on it, then submit from the terminal step.
pub fn fill_and_submit(
    ctx: &IntakeContext,
    patches: &[FieldPatch],
) -> Result<FillOutcome, IntakeError> {
    let mut steps = Vec::new();
    let mut current = ctx.with_wizard(|wizard| wizard.current_step())?;
    loop {
        debug!(step = %current, "filling step");
        for patch in patches.iter().filter(|patch| patch.field().step() == current) {
            ctx.set_field(patch.clone())?;
        }
        let (active, next) = ctx.with_wizard(|wizard| {
            let active = wizard.active_fields(current);
            (active, wizard.advance())
        })?;
        steps.push(StepReport {
            step: current,
            active,
        });
        if next == current {
            break;
        }
        current = next;
    }
    let submission = ctx.submit()?;
    Ok(FillOutcome { steps, submission })
}

/// Active fields per step for `patches`, without any session.
pub fn preview(patches: &[FieldPatch]) -> Vec<StepReport> {
    let mut answers = AnswerRecord::default();
    for patch in patches {
        answers.apply(patch.clone());
    }
    Step::ALL
        .into_iter()
        .map(|step| StepReport {
            step,
            active: active_fields(step, &answers),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Answer, PartnerMode};
    use crate::session::SessionGate;
    use crate::submit::SubmissionHandler;
    use crate::test_support::{MemoryTokenStore, RecordingSubmitter, ScriptedVerifier, names};

    fn patches() -> Vec<FieldPatch> {
        vec![
            FieldPatch::HasEncounter(Some(Answer::No)),
            FieldPatch::PartnerMode(Some(PartnerMode::Existing)),
            FieldPatch::SelectedPartner("Ana".to_string()),
            FieldPatch::HasPlan(Some(Answer::Yes)),
            FieldPatch::PlanIsNow(false),
        ]
    }

    #[test]
    fn preview_reports_each_step() {
        let report = preview(&patches());
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].active, BTreeSet::from([FieldId::SelectedPartner]));
        assert_eq!(report[1].active.len(), 5);
        assert!(report[2].active.is_empty());
    }

    #[tokio::test]
    async fn fill_walks_steps_and_submits() {
        let recorder = RecordingSubmitter::default();
        let gate = SessionGate::new(
            ScriptedVerifier::new(vec![Ok(names(&["Ana"]))]),
            MemoryTokenStore::default(),
        );
        let ctx = IntakeContext::new(gate, SubmissionHandler::new(recorder.clone()));
        ctx.login_with_credential(Some("cred")).await;

        let outcome = fill_and_submit(&ctx, &patches()).expect("fill");

        assert_eq!(outcome.steps, preview(&patches()));
        assert_eq!(outcome.submission.answers.partner.selected, "Ana");
        assert_eq!(recorder.received().len(), 1);
    }

    #[tokio::test]
    async fn fill_resumes_from_wizard_position() {
        let recorder = RecordingSubmitter::default();
        let gate = SessionGate::new(
            ScriptedVerifier::new(vec![Ok(names(&["Ana"]))]),
            MemoryTokenStore::default(),
        );
        let ctx = IntakeContext::new(gate, SubmissionHandler::new(recorder.clone()));
        ctx.login_with_credential(Some("cred")).await;
        ctx.with_wizard(|wizard| wizard.advance()).expect("wizard");

        let outcome = fill_and_submit(&ctx, &patches()).expect("fill");

        let walked: Vec<Step> = outcome.steps.iter().map(|report| report.step).collect();
        assert_eq!(walked, vec![Step::Plan, Step::Encounter]);
        assert_eq!(outcome.submission.answers.partner.mode, None);
        assert_eq!(outcome.submission.answers.plan.has_plan, Some(Answer::Yes));
    }

    #[test]
    fn fill_requires_session() {
        let gate = SessionGate::new(ScriptedVerifier::default(), MemoryTokenStore::default());
        let ctx = IntakeContext::new(gate, SubmissionHandler::new(RecordingSubmitter::default()));
        let err = fill_and_submit(&ctx, &patches()).expect_err("gated");
        assert!(matches!(err, IntakeError::NotAuthenticated));
    }
}

//! Deterministic field relevance for each wizard step.

use std::collections::BTreeSet;

use crate::core::answers::AnswerRecord;
use crate::core::fields::FieldId;
use crate::core::types::{Answer, PartnerMode, Step};

const NEW_PARTNER_FIELDS: [FieldId; 4] = [
    FieldId::PartnerName,
    FieldId::PartnerLastName,
    FieldId::PartnerSocialHandle,
    FieldId::PartnerNickname,
];

const ENCOUNTER_FIELDS: [FieldId; 9] = [
    FieldId::EncounterStartDate,
    FieldId::EncounterStartTime,
    FieldId::EncounterEndDate,
    FieldId::EncounterEndTime,
    FieldId::EncounterRating,
    FieldId::EncounterWouldRepeat,
    FieldId::EncounterMemorable,
    FieldId::EncounterComment,
    FieldId::EncounterInitiative,
];

/// Fields currently relevant on `step` given the answers so far.
///
/// The step's own enabling flag (partner mode, has-plan, has-encounter) is
/// always shown and is never part of the set. Location fields are stored but
/// never reported.
pub fn active_fields(step: Step, answers: &AnswerRecord) -> BTreeSet<FieldId> {
    let mut active = BTreeSet::new();
    match step {
        Step::Partner => match answers.partner.mode {
            Some(PartnerMode::New) => active.extend(NEW_PARTNER_FIELDS),
            Some(PartnerMode::Existing) => {
                active.insert(FieldId::SelectedPartner);
            }
            None => {}
        },
        Step::Plan => {
            if answers.plan.has_plan == Some(Answer::Yes) {
                active.extend([FieldId::PlanKind, FieldId::PlanDetails, FieldId::PlanIsNow]);
                if !answers.plan.is_now {
                    active.extend([FieldId::PlanDate, FieldId::PlanTime]);
                }
            }
        }
        Step::Encounter => {
            if answers.encounter.has_encounter == Some(Answer::Yes) {
                active.extend(ENCOUNTER_FIELDS);
            }
        }
    }
    active
}

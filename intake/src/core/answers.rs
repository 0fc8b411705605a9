//! The answer record accumulated across the wizard steps.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::core::fields::{FieldId, FieldPatch};
use crate::core::types::{Answer, Initiative, Location, PartnerMode, PlanKind, Rating};

/// Structured record built by the wizard, one section per step.
///
/// Writes go through [`AnswerRecord::apply`]; nothing here clears a section
/// when its enabling flag changes. Values on an inactive branch are kept and
/// simply not reported by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerRecord {
    pub partner: PartnerSection,
    pub plan: PlanSection,
    pub encounter: EncounterSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartnerSection {
    pub mode: Option<PartnerMode>,
    /// Name picked from the known list when `mode` is `Existing`; empty if none.
    pub selected: String,
    pub name: String,
    pub last_name: String,
    pub social_handle: String,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSection {
    pub has_plan: Option<Answer>,
    pub kind: Option<PlanKind>,
    pub details: String,
    /// Plan happens right now; date and time are only asked when false.
    pub is_now: bool,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Location,
    pub at_location: Option<Answer>,
}

impl Default for PlanSection {
    fn default() -> Self {
        Self {
            has_plan: None,
            kind: None,
            details: String::new(),
            is_now: true,
            date: None,
            time: None,
            location: Location::default(),
            at_location: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterSection {
    pub has_encounter: Option<Answer>,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub rating: Rating,
    pub would_repeat: bool,
    pub memorable: bool,
    pub comment: String,
    pub at_location: Option<Answer>,
    pub location: Location,
    pub initiative: Option<Initiative>,
}

impl AnswerRecord {
    /// Write the patch's value into its field. Never touches any other field.
    pub fn apply(&mut self, patch: FieldPatch) {
        let (partner, plan, encounter) = (&mut self.partner, &mut self.plan, &mut self.encounter);
        match patch {
            FieldPatch::PartnerMode(v) => partner.mode = v,
            FieldPatch::SelectedPartner(v) => partner.selected = v,
            FieldPatch::PartnerName(v) => partner.name = v,
            FieldPatch::PartnerLastName(v) => partner.last_name = v,
            FieldPatch::PartnerSocialHandle(v) => partner.social_handle = v,
            FieldPatch::PartnerNickname(v) => partner.nickname = v,
            FieldPatch::HasPlan(v) => plan.has_plan = v,
            FieldPatch::PlanKind(v) => plan.kind = v,
            FieldPatch::PlanDetails(v) => plan.details = v,
            FieldPatch::PlanIsNow(v) => plan.is_now = v,
            FieldPatch::PlanDate(v) => plan.date = v,
            FieldPatch::PlanTime(v) => plan.time = v,
            FieldPatch::PlanLocation(v) => plan.location = v,
            FieldPatch::AtPlanLocation(v) => plan.at_location = v,
            FieldPatch::HasEncounter(v) => encounter.has_encounter = v,
            FieldPatch::EncounterStartDate(v) => encounter.start_date = v,
            FieldPatch::EncounterStartTime(v) => encounter.start_time = v,
            FieldPatch::EncounterEndDate(v) => encounter.end_date = v,
            FieldPatch::EncounterEndTime(v) => encounter.end_time = v,
            FieldPatch::EncounterRating(v) => encounter.rating = v,
            FieldPatch::EncounterWouldRepeat(v) => encounter.would_repeat = v,
            FieldPatch::EncounterMemorable(v) => encounter.memorable = v,
            FieldPatch::EncounterComment(v) => encounter.comment = v,
            FieldPatch::AtEncounterLocation(v) => encounter.at_location = v,
            FieldPatch::EncounterLocation(v) => encounter.location = v,
            FieldPatch::EncounterInitiative(v) => encounter.initiative = v,
        }
    }

    /// Current value of `field`, as the patch that would reproduce it.
    pub fn read(&self, field: FieldId) -> FieldPatch {
        let (partner, plan, encounter) = (&self.partner, &self.plan, &self.encounter);
        match field {
            FieldId::PartnerMode => FieldPatch::PartnerMode(partner.mode),
            FieldId::SelectedPartner => FieldPatch::SelectedPartner(partner.selected.clone()),
            FieldId::PartnerName => FieldPatch::PartnerName(partner.name.clone()),
            FieldId::PartnerLastName => FieldPatch::PartnerLastName(partner.last_name.clone()),
            FieldId::PartnerSocialHandle => {
                FieldPatch::PartnerSocialHandle(partner.social_handle.clone())
            }
            FieldId::PartnerNickname => FieldPatch::PartnerNickname(partner.nickname.clone()),
            FieldId::HasPlan => FieldPatch::HasPlan(plan.has_plan),
            FieldId::PlanKind => FieldPatch::PlanKind(plan.kind),
            FieldId::PlanDetails => FieldPatch::PlanDetails(plan.details.clone()),
            FieldId::PlanIsNow => FieldPatch::PlanIsNow(plan.is_now),
            FieldId::PlanDate => FieldPatch::PlanDate(plan.date),
            FieldId::PlanTime => FieldPatch::PlanTime(plan.time),
            FieldId::PlanLocation => FieldPatch::PlanLocation(plan.location),
            FieldId::AtPlanLocation => FieldPatch::AtPlanLocation(plan.at_location),
            FieldId::HasEncounter => FieldPatch::HasEncounter(encounter.has_encounter),
            FieldId::EncounterStartDate => FieldPatch::EncounterStartDate(encounter.start_date),
            FieldId::EncounterStartTime => FieldPatch::EncounterStartTime(encounter.start_time),
            FieldId::EncounterEndDate => FieldPatch::EncounterEndDate(encounter.end_date),
            FieldId::EncounterEndTime => FieldPatch::EncounterEndTime(encounter.end_time),
            FieldId::EncounterRating => FieldPatch::EncounterRating(encounter.rating),
            FieldId::EncounterWouldRepeat => {
                FieldPatch::EncounterWouldRepeat(encounter.would_repeat)
            }
            FieldId::EncounterMemorable => FieldPatch::EncounterMemorable(encounter.memorable),
            FieldId::EncounterComment => FieldPatch::EncounterComment(encounter.comment.clone()),
            FieldId::AtEncounterLocation => FieldPatch::AtEncounterLocation(encounter.at_location),
            FieldId::EncounterLocation => FieldPatch::EncounterLocation(encounter.location),
            FieldId::EncounterInitiative => FieldPatch::EncounterInitiative(encounter.initiative),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_patches() -> Vec<FieldPatch> {
        vec![
            FieldPatch::PartnerMode(Some(PartnerMode::New)),
            FieldPatch::SelectedPartner("Ana".to_string()),
            FieldPatch::PartnerName("Lucia".to_string()),
            FieldPatch::PartnerLastName("Rojas".to_string()),
            FieldPatch::PartnerSocialHandle("@lucia".to_string()),
            FieldPatch::PartnerNickname("Lu".to_string()),
            FieldPatch::HasPlan(Some(Answer::No)),
            FieldPatch::PlanKind(Some(PlanKind::Study)),
            FieldPatch::PlanDetails("library".to_string()),
            FieldPatch::PlanIsNow(false),
            FieldPatch::PlanDate(NaiveDate::from_ymd_opt(2024, 2, 29)),
            FieldPatch::PlanTime(NaiveTime::from_hms_opt(20, 15, 0)),
            FieldPatch::PlanLocation(Location {
                lat: Some(4.65),
                lng: None,
            }),
            FieldPatch::AtPlanLocation(Some(Answer::Yes)),
            FieldPatch::HasEncounter(Some(Answer::Yes)),
            FieldPatch::EncounterStartDate(NaiveDate::from_ymd_opt(2024, 3, 1)),
            FieldPatch::EncounterStartTime(NaiveTime::from_hms_opt(22, 0, 0)),
            FieldPatch::EncounterEndDate(NaiveDate::from_ymd_opt(2024, 3, 2)),
            FieldPatch::EncounterEndTime(NaiveTime::from_hms_opt(1, 30, 0)),
            FieldPatch::EncounterRating(Rating::new(4).expect("rating")),
            FieldPatch::EncounterWouldRepeat(true),
            FieldPatch::EncounterMemorable(true),
            FieldPatch::EncounterComment("good".to_string()),
            FieldPatch::AtEncounterLocation(Some(Answer::No)),
            FieldPatch::EncounterLocation(Location {
                lat: Some(-33.4),
                lng: Some(-70.6),
            }),
            FieldPatch::EncounterInitiative(Some(Initiative::Assist)),
        ]
    }

    #[test]
    fn every_field_reads_back_what_was_written() {
        let patches = sample_patches();
        assert_eq!(patches.len(), FieldId::ALL.len());
        let mut record = AnswerRecord::default();
        for patch in patches {
            let field = patch.field();
            record.apply(patch.clone());
            assert_eq!(record.read(field), patch, "field {field}");
        }
    }

    #[test]
    fn apply_leaves_other_fields_untouched() {
        let mut record = AnswerRecord::default();
        record.apply(FieldPatch::PartnerName("Lucia".to_string()));
        record.apply(FieldPatch::PartnerMode(Some(PartnerMode::Existing)));
        assert_eq!(record.partner.name, "Lucia");
        assert_eq!(record.plan, PlanSection::default());
    }

    #[test]
    fn default_plan_is_now() {
        let record = AnswerRecord::default();
        assert!(record.plan.is_now);
        assert_eq!(record.encounter.rating.stars(), 0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let record: AnswerRecord =
            serde_json::from_str(r#"{"plan":{"has_plan":"yes"}}"#).expect("parse");
        assert_eq!(record.plan.has_plan, Some(Answer::Yes));
        assert!(record.plan.is_now);
        assert_eq!(record.partner, PartnerSection::default());
    }
}

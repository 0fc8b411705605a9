//! Closed set of form fields and the typed patches that assign them.
//!
//! Every edit the wizard accepts is a [`FieldPatch`]: one field, one value of
//! the field's own type. [`FieldId`] names a field without a value and is what
//! the resolver reports.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::core::types::{Answer, Initiative, Location, PartnerMode, PlanKind, Rating, Step};

/// Identifier of a single field of the answer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    PartnerMode,
    SelectedPartner,
    PartnerName,
    PartnerLastName,
    PartnerSocialHandle,
    PartnerNickname,
    HasPlan,
    PlanKind,
    PlanDetails,
    PlanIsNow,
    PlanDate,
    PlanTime,
    PlanLocation,
    AtPlanLocation,
    HasEncounter,
    EncounterStartDate,
    EncounterStartTime,
    EncounterEndDate,
    EncounterEndTime,
    EncounterRating,
    EncounterWouldRepeat,
    EncounterMemorable,
    EncounterComment,
    AtEncounterLocation,
    EncounterLocation,
    EncounterInitiative,
}

impl FieldId {
    pub const ALL: [FieldId; 26] = [
        FieldId::PartnerMode,
        FieldId::SelectedPartner,
        FieldId::PartnerName,
        FieldId::PartnerLastName,
        FieldId::PartnerSocialHandle,
        FieldId::PartnerNickname,
        FieldId::HasPlan,
        FieldId::PlanKind,
        FieldId::PlanDetails,
        FieldId::PlanIsNow,
        FieldId::PlanDate,
        FieldId::PlanTime,
        FieldId::PlanLocation,
        FieldId::AtPlanLocation,
        FieldId::HasEncounter,
        FieldId::EncounterStartDate,
        FieldId::EncounterStartTime,
        FieldId::EncounterEndDate,
        FieldId::EncounterEndTime,
        FieldId::EncounterRating,
        FieldId::EncounterWouldRepeat,
        FieldId::EncounterMemorable,
        FieldId::EncounterComment,
        FieldId::AtEncounterLocation,
        FieldId::EncounterLocation,
        FieldId::EncounterInitiative,
    ];

    /// Step whose section owns this field.
    pub fn step(self) -> Step {
        use FieldId as F;
        match self {
            F::PartnerMode
            | F::SelectedPartner
            | F::PartnerName
            | F::PartnerLastName
            | F::PartnerSocialHandle
            | F::PartnerNickname => Step::Partner,
            F::HasPlan
            | F::PlanKind
            | F::PlanDetails
            | F::PlanIsNow
            | F::PlanDate
            | F::PlanTime
            | F::PlanLocation
            | F::AtPlanLocation => Step::Plan,
            F::HasEncounter
            | F::EncounterStartDate
            | F::EncounterStartTime
            | F::EncounterEndDate
            | F::EncounterEndTime
            | F::EncounterRating
            | F::EncounterWouldRepeat
            | F::EncounterMemorable
            | F::EncounterComment
            | F::AtEncounterLocation
            | F::EncounterLocation
            | F::EncounterInitiative => Step::Encounter,
        }
    }

    pub fn as_str(self) -> &'static str {
        use FieldId as F;
        match self {
            F::PartnerMode => "partner_mode",
            F::SelectedPartner => "selected_partner",
            F::PartnerName => "partner_name",
            F::PartnerLastName => "partner_last_name",
            F::PartnerSocialHandle => "partner_social_handle",
            F::PartnerNickname => "partner_nickname",
            F::HasPlan => "has_plan",
            F::PlanKind => "plan_kind",
            F::PlanDetails => "plan_details",
            F::PlanIsNow => "plan_is_now",
            F::PlanDate => "plan_date",
            F::PlanTime => "plan_time",
            F::PlanLocation => "plan_location",
            F::AtPlanLocation => "at_plan_location",
            F::HasEncounter => "has_encounter",
            F::EncounterStartDate => "encounter_start_date",
            F::EncounterStartTime => "encounter_start_time",
            F::EncounterEndDate => "encounter_end_date",
            F::EncounterEndTime => "encounter_end_time",
            F::EncounterRating => "encounter_rating",
            F::EncounterWouldRepeat => "encounter_would_repeat",
            F::EncounterMemorable => "encounter_memorable",
            F::EncounterComment => "encounter_comment",
            F::AtEncounterLocation => "at_encounter_location",
            F::EncounterLocation => "encounter_location",
            F::EncounterInitiative => "encounter_initiative",
        }
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed assignment of one value to one field.
///
/// Serialized adjacently tagged, e.g. `{"field":"plan_is_now","value":false}`,
/// so patches can travel over HTTP or be listed in a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldPatch {
    PartnerMode(Option<PartnerMode>),
    SelectedPartner(String),
    PartnerName(String),
    PartnerLastName(String),
    PartnerSocialHandle(String),
    PartnerNickname(String),
    HasPlan(Option<Answer>),
    PlanKind(Option<PlanKind>),
    PlanDetails(String),
    PlanIsNow(bool),
    PlanDate(Option<NaiveDate>),
    PlanTime(Option<NaiveTime>),
    PlanLocation(Location),
    AtPlanLocation(Option<Answer>),
    HasEncounter(Option<Answer>),
    EncounterStartDate(Option<NaiveDate>),
    EncounterStartTime(Option<NaiveTime>),
    EncounterEndDate(Option<NaiveDate>),
    EncounterEndTime(Option<NaiveTime>),
    EncounterRating(Rating),
    EncounterWouldRepeat(bool),
    EncounterMemorable(bool),
    EncounterComment(String),
    AtEncounterLocation(Option<Answer>),
    EncounterLocation(Location),
    EncounterInitiative(Option<Initiative>),
}

impl FieldPatch {
    /// The field this patch writes.
    pub fn field(&self) -> FieldId {
        use FieldPatch as P;
        match self {
            P::PartnerMode(_) => FieldId::PartnerMode,
            P::SelectedPartner(_) => FieldId::SelectedPartner,
            P::PartnerName(_) => FieldId::PartnerName,
            P::PartnerLastName(_) => FieldId::PartnerLastName,
            P::PartnerSocialHandle(_) => FieldId::PartnerSocialHandle,
            P::PartnerNickname(_) => FieldId::PartnerNickname,
            P::HasPlan(_) => FieldId::HasPlan,
            P::PlanKind(_) => FieldId::PlanKind,
            P::PlanDetails(_) => FieldId::PlanDetails,
            P::PlanIsNow(_) => FieldId::PlanIsNow,
            P::PlanDate(_) => FieldId::PlanDate,
            P::PlanTime(_) => FieldId::PlanTime,
            P::PlanLocation(_) => FieldId::PlanLocation,
            P::AtPlanLocation(_) => FieldId::AtPlanLocation,
            P::HasEncounter(_) => FieldId::HasEncounter,
            P::EncounterStartDate(_) => FieldId::EncounterStartDate,
            P::EncounterStartTime(_) => FieldId::EncounterStartTime,
            P::EncounterEndDate(_) => FieldId::EncounterEndDate,
            P::EncounterEndTime(_) => FieldId::EncounterEndTime,
            P::EncounterRating(_) => FieldId::EncounterRating,
            P::EncounterWouldRepeat(_) => FieldId::EncounterWouldRepeat,
            P::EncounterMemorable(_) => FieldId::EncounterMemorable,
            P::EncounterComment(_) => FieldId::EncounterComment,
            P::AtEncounterLocation(_) => FieldId::AtEncounterLocation,
            P::EncounterLocation(_) => FieldId::EncounterLocation,
            P::EncounterInitiative(_) => FieldId::EncounterInitiative,
        }
    }
}

//! Shared deterministic types for the intake wizard.
//!
//! These types define the stable vocabulary of the form: steps, enumerated
//! answers and small value objects. They carry no I/O and serialize to the
//! wire values the submission collaborator expects.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wizard step, in the fixed order the form is walked.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Partner,
    Plan,
    Encounter,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Partner, Step::Plan, Step::Encounter];

    /// Following step, or `None` at the terminal step.
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Partner => Some(Step::Plan),
            Step::Plan => Some(Step::Encounter),
            Step::Encounter => None,
        }
    }

    /// Preceding step, or `None` at the first step.
    pub fn prev(self) -> Option<Step> {
        match self {
            Step::Partner => None,
            Step::Plan => Some(Step::Partner),
            Step::Encounter => Some(Step::Plan),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Partner => "partner",
            Step::Plan => "plan",
            Step::Encounter => "encounter",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A yes/no radio answer. Unanswered is modelled as `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

/// Whether the partner is entered from scratch or picked from the known list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerMode {
    New,
    Existing,
}

/// Kind of plan. Serialized with the values the backend already stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanKind {
    #[serde(rename = "comer")]
    Eat,
    #[serde(rename = "bailar")]
    Dance,
    #[serde(rename = "pola")]
    Drinks,
    #[serde(rename = "netflix")]
    Netflix,
    #[serde(rename = "ver-partido")]
    WatchMatch,
    #[serde(rename = "estudiar")]
    Study,
    #[serde(rename = "de-momento")]
    Spontaneous,
}

/// Who took the initiative in the encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Initiative {
    #[serde(rename = "gol")]
    Goal,
    #[serde(rename = "asistencia")]
    Assist,
    #[serde(rename = "auto-gol")]
    OwnGoal,
}

/// Star rating in `0..=5`, where 0 means "not rated".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating {0} is out of range 0..={max}", max = Rating::MAX)]
pub struct RatingOutOfRange(pub u8);

impl Rating {
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Result<Self, RatingOutOfRange> {
        if stars > Self::MAX {
            return Err(RatingOutOfRange(stars));
        }
        Ok(Self(stars))
    }

    pub fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A captured position; either coordinate may still be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_order_is_partner_plan_encounter() {
        assert!(Step::Partner < Step::Plan);
        assert!(Step::Plan < Step::Encounter);
        assert_eq!(Step::Partner.next(), Some(Step::Plan));
        assert_eq!(Step::Encounter.next(), None);
        assert_eq!(Step::Partner.prev(), None);
        assert_eq!(Step::Encounter.prev(), Some(Step::Plan));
    }

    #[test]
    fn rating_rejects_more_than_five_stars() {
        assert_eq!(Rating::new(5).map(Rating::stars), Ok(5));
        assert_eq!(Rating::new(6), Err(RatingOutOfRange(6)));
        let parsed: Result<Rating, _> = serde_json::from_str("9");
        assert!(parsed.is_err());
    }

    #[test]
    fn enumerations_use_backend_wire_values() {
        assert_eq!(
            serde_json::to_string(&PlanKind::WatchMatch).expect("json"),
            "\"ver-partido\""
        );
        assert_eq!(
            serde_json::to_string(&Initiative::OwnGoal).expect("json"),
            "\"auto-gol\""
        );
        let mode: PartnerMode = serde_json::from_str("\"existing\"").expect("parse");
        assert_eq!(mode, PartnerMode::Existing);
    }
}

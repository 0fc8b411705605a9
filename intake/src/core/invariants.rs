//! Cross-checks between the answer record and the session's known names.

use thiserror::Error;

use crate::core::answers::AnswerRecord;
use crate::core::fields::FieldPatch;
use crate::core::types::PartnerMode;

/// A field edit that would break an answer-record invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("partner '{0}' is not in the known partner list")]
    UnknownPartner(String),
}

/// Reject a partner selection that is not one of `known_names` while the
/// record is in `Existing` mode.
///
/// The empty selection means "nothing chosen yet" and is always accepted.
/// Every other patch is accepted unconditionally; a mode switch that leaves a
/// stale selection behind is handled by [`stale_selection`].
pub fn check_patch(
    patch: &FieldPatch,
    answers: &AnswerRecord,
    known_names: &[String],
) -> Result<(), FieldError> {
    match patch {
        FieldPatch::SelectedPartner(name)
            if answers.partner.mode == Some(PartnerMode::Existing)
                && !is_known(name, known_names) =>
        {
            Err(FieldError::UnknownPartner(name.clone()))
        }
        _ => Ok(()),
    }
}

/// The current selection, if the record is in `Existing` mode and the
/// selection is not one of `known_names`.
pub fn stale_selection<'a>(answers: &'a AnswerRecord, known_names: &[String]) -> Option<&'a str> {
    let partner = &answers.partner;
    (partner.mode == Some(PartnerMode::Existing) && !is_known(&partner.selected, known_names))
        .then_some(partner.selected.as_str())
}

/// Check record-level invariants against the known names:
/// - partner mode `Existing` requires the selection to be empty or known
pub fn validate_record(answers: &AnswerRecord, known_names: &[String]) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(selected) = stale_selection(answers, known_names) {
        errors.push(format!("partner: selected '{selected}' is not a known partner"));
    }
    errors
}

fn is_known(name: &str, known_names: &[String]) -> bool {
    name.is_empty() || known_names.iter().any(|known| known == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["Ana".to_string(), "Beto".to_string()]
    }

    fn record_in(mode: PartnerMode) -> AnswerRecord {
        let mut record = AnswerRecord::default();
        record.apply(FieldPatch::PartnerMode(Some(mode)));
        record
    }

    #[test]
    fn known_or_empty_selection_is_accepted() {
        let record = record_in(PartnerMode::Existing);
        assert_eq!(
            check_patch(&FieldPatch::SelectedPartner("Beto".into()), &record, &names()),
            Ok(())
        );
        assert_eq!(
            check_patch(&FieldPatch::SelectedPartner(String::new()), &record, &names()),
            Ok(())
        );
    }

    #[test]
    fn unknown_selection_is_rejected_in_existing_mode() {
        let record = record_in(PartnerMode::Existing);
        let err = check_patch(&FieldPatch::SelectedPartner("Zoe".into()), &record, &names())
            .expect_err("unknown partner");
        assert_eq!(err, FieldError::UnknownPartner("Zoe".to_string()));
    }

    #[test]
    fn selection_is_unchecked_outside_existing_mode() {
        let patch = FieldPatch::SelectedPartner("Zoe".into());
        assert_eq!(check_patch(&patch, &record_in(PartnerMode::New), &names()), Ok(()));
        assert_eq!(check_patch(&patch, &AnswerRecord::default(), &names()), Ok(()));
    }

    #[test]
    fn new_partner_text_is_not_checked() {
        let record = record_in(PartnerMode::Existing);
        assert_eq!(check_patch(&FieldPatch::PartnerName("Zoe".into()), &record, &[]), Ok(()));
    }

    #[test]
    fn stale_selection_reports_unknown_name_in_existing_mode() {
        let mut record = record_in(PartnerMode::New);
        record.apply(FieldPatch::SelectedPartner("Zoe".into()));
        assert_eq!(stale_selection(&record, &names()), None);

        record.apply(FieldPatch::PartnerMode(Some(PartnerMode::Existing)));
        assert_eq!(stale_selection(&record, &names()), Some("Zoe"));

        record.apply(FieldPatch::SelectedPartner("Ana".into()));
        assert_eq!(stale_selection(&record, &names()), None);
    }

    #[test]
    fn validate_record_flags_stale_selection_only_in_existing_mode() {
        let mut record = AnswerRecord::default();
        record.apply(FieldPatch::SelectedPartner("Ana".into()));
        assert!(validate_record(&record, &[]).is_empty());

        record.apply(FieldPatch::PartnerMode(Some(PartnerMode::Existing)));
        let errors = validate_record(&record, &[]);
        assert!(errors.iter().any(|err| err.contains("not a known partner")));
        assert!(validate_record(&record, &names()).is_empty());
    }
}

//! Generic vocabulary membership check.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::vocabulary::PermittedVocabulary;

/// Outcome of checking observed values against a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermValidation {
    /// Whether every observed value is permitted.
    pub valid: bool,
    /// Observed values missing from the vocabulary.
    pub unmatched: BTreeSet<String>,
}

impl TermValidation {
    pub fn passed() -> Self {
        Self {
            valid: true,
            unmatched: BTreeSet::new(),
        }
    }
}

/// Check observed values against `vocabulary`.
///
/// Missing values are ignored. Matching is exact: no case folding, no
/// trimming, no fuzzy matching.
pub fn validate_terms<'a, I>(observed: I, vocabulary: &PermittedVocabulary) -> TermValidation
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let unmatched: BTreeSet<String> = observed
        .into_iter()
        .flatten()
        .filter(|v| !vocabulary.contains(v))
        .map(str::to_string)
        .collect();
    TermValidation {
        valid: unmatched.is_empty(),
        unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subset_is_valid() {
        let vocab = PermittedVocabulary::fixed(&["liver", "heart"]);
        let result = validate_terms([Some("liver"), None, Some("heart"), Some("liver")], &vocab);
        assert_eq!(result, TermValidation::passed());
    }

    #[test]
    fn test_unmatched_reported_once() {
        let vocab = PermittedVocabulary::fixed(&["liver"]);
        let result = validate_terms([Some("Liver"), Some("kidney"), Some("kidney")], &vocab);
        assert!(!result.valid);
        assert_eq!(
            result.unmatched.into_iter().collect::<Vec<_>>(),
            vec!["Liver", "kidney"]
        );
    }

    #[test]
    fn test_no_observations() {
        let vocab = PermittedVocabulary::fixed(&[]);
        assert!(validate_terms(Vec::<Option<&str>>::new(), &vocab).valid);
        assert!(validate_terms([None, None], &vocab).valid);
    }
}

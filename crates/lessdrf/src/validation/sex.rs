//! `characteristics[sex]` codes.

use crate::vocabulary::PermittedVocabulary;

use super::terms::{validate_terms, TermValidation};

/// The accepted sex codes.
pub const SEX_CODES: [&str; 3] = ["M", "F", "unknown"];

pub fn sex_vocabulary() -> PermittedVocabulary {
    PermittedVocabulary::fixed(&SEX_CODES)
}

/// Check a sex column against [`SEX_CODES`].
pub fn validate_sex<'a, I>(values: I) -> TermValidation
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    validate_terms(values, &sex_vocabulary())
}

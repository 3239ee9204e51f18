//! `characteristics[age]` format check.
//!
//! Ages are written as years, months and days, e.g. `1Y 2M 3D`, a range
//! `48Y-84Y`, or a compound `20Y/2M`. Whitespace between parts is allowed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static AGE_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:\s*\d+\s*Y)?(?:\s*\d+\s*M)?(?:\s*\d+\s*D)?",
        r"(?:\s*-\s*\d+\s*Y)?(?:\s*-\s*\d+\s*M)?(?:\s*-\s*\d+\s*D)?",
        r"/?",
        r"(?:\s*\d+\s*Y)?(?:\s*\d+\s*M)?(?:\s*\d+\s*D)?$",
    ))
    .expect("age pattern is valid")
});

/// Values that stand for "no age given" and always pass.
pub const EMPTY_AGE_VALUES: [&str; 4] = ["", "empty", "None", "Not available"];

/// Outcome of an age column check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeValidation {
    pub valid: bool,
    /// Failing cells in row order, repeats included.
    pub offending: Vec<String>,
}

/// Whether a single value is an acceptable age.
pub fn is_valid_age(value: &str) -> bool {
    EMPTY_AGE_VALUES.contains(&value) || AGE_FORMAT.is_match(value)
}

/// Check every cell of an age column.
pub fn validate_age<'a, I>(values: I) -> AgeValidation
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let offending: Vec<String> = values
        .into_iter()
        .flatten()
        .filter(|v| !is_valid_age(v))
        .map(str::to_string)
        .collect();
    AgeValidation {
        valid: offending.is_empty(),
        offending,
    }
}

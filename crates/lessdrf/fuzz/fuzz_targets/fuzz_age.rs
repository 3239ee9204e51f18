//! Fuzz target for the age format check.
//!
//! The check must never panic, and a column is valid exactly when no cell
//! is reported as offending.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lessdrf::validation::{is_valid_age, validate_age};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let _ = is_valid_age(&input);

    let cells: Vec<Option<&str>> = input.split('\n').map(Some).collect();
    let result = validate_age(cells.iter().copied());
    assert_eq!(result.valid, result.offending.is_empty());
});

//! Validation of column values against permitted vocabularies and formats.
//!
//! Failed checks are values, not errors: callers inspect
//! [`TermValidation`] and [`AgeValidation`] and decide what to clear.

mod age;
mod organism;
mod sex;
mod table_check;
mod terms;

pub use age::{is_valid_age, validate_age, AgeValidation, EMPTY_AGE_VALUES};
pub use organism::{validate_organisms, OrganismSynonyms, OrganismValidation};
pub use sex::{sex_vocabulary, validate_sex, SEX_CODES};
pub use table_check::{check_all, check_table, ColumnCheck, ColumnReport, TableCheck};
pub use terms::{validate_terms, TermValidation};

pub const AGE_COLUMN: &str = "characteristics[age]";
pub const SEX_COLUMN: &str = "characteristics[sex]";
pub const ORGANISM_COLUMN: &str = "characteristics[organism]";

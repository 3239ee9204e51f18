//! Whole-table validation of an SDRF working table.

use serde::Serialize;

use crate::error::Result;
use crate::table::WorkingTable;
use crate::vocabulary::VocabularyStore;

use super::age::{validate_age, AgeValidation};
use super::sex::validate_sex;
use super::terms::{validate_terms, TermValidation};
use super::{AGE_COLUMN, ORGANISM_COLUMN, SEX_COLUMN};

/// What was found in one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnCheck {
    /// Values checked against a vocabulary.
    Terms(TermValidation),
    /// Age format check.
    Age(AgeValidation),
    /// No vocabulary applies to the column.
    Unchecked,
}

impl ColumnCheck {
    pub fn passed(&self) -> bool {
        match self {
            ColumnCheck::Terms(t) => t.valid,
            ColumnCheck::Age(a) => a.valid,
            ColumnCheck::Unchecked => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReport {
    pub column: String,
    pub check: ColumnCheck,
}

/// Per-column results of [`check_table`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableCheck {
    pub reports: Vec<ColumnReport>,
}

impl TableCheck {
    pub fn is_valid(&self) -> bool {
        self.reports.iter().all(|r| r.check.passed())
    }

    /// Columns holding values that failed their check.
    pub fn columns_to_clear(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|r| !r.check.passed())
            .map(|r| r.column.as_str())
            .collect()
    }

    pub fn report(&self, column: &str) -> Option<&ColumnReport> {
        self.reports.iter().find(|r| r.column == column)
    }

    /// Blank every failed column; returns the cleared column names.
    pub fn clear_failed(&self, table: &mut WorkingTable) -> Result<Vec<String>> {
        let mut cleared = Vec::new();
        for column in self.columns_to_clear() {
            table.clear_column(column)?;
            tracing::info!(column, "cleared column");
            cleared.push(column.to_string());
        }
        Ok(cleared)
    }
}

/// Check `columns` of `table`.
///
/// Age and sex columns use their format checks. Other columns are checked
/// against the store's vocabulary for them; the organism column falls back
/// to the union of the loaded organism categories.
pub fn check_table<S: AsRef<str>>(
    table: &WorkingTable,
    columns: &[S],
    store: &VocabularyStore,
) -> Result<TableCheck> {
    let mut reports = Vec::with_capacity(columns.len());
    for column in columns {
        let column = column.as_ref();
        let values = table.column_values(column)?;

        let check = match column {
            AGE_COLUMN => ColumnCheck::Age(validate_age(values)),
            SEX_COLUMN => ColumnCheck::Terms(validate_sex(values)),
            _ => match store.for_column(column) {
                Some(vocabulary) => ColumnCheck::Terms(validate_terms(values, vocabulary)),
                None if column == ORGANISM_COLUMN => match store.all_organisms() {
                    Some(vocabulary) => ColumnCheck::Terms(validate_terms(values, &vocabulary)),
                    None => ColumnCheck::Unchecked,
                },
                None => ColumnCheck::Unchecked,
            },
        };

        if !check.passed() {
            tracing::warn!(column, "column contains values outside its vocabulary");
        }
        reports.push(ColumnReport {
            column: column.to_string(),
            check,
        });
    }
    Ok(TableCheck { reports })
}

/// [`check_table`] over every column.
pub fn check_all(table: &WorkingTable, store: &VocabularyStore) -> Result<TableCheck> {
    check_table(table, table.headers(), store)
}

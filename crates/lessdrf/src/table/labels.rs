//! Label assignment: one row per (data file, label) pair.

use indexmap::IndexMap;

use crate::error::{Result, SdrfError};

use super::{WorkingTable, DATA_FILE_COLUMN};

/// Column holding the label of each row.
pub const LABEL_COLUMN: &str = "comment[label]";

/// Key standing for every data file of the table.
pub const ALL_FILES: &str = "ALL";

impl WorkingTable {
    /// Rebuild the rows so that each assigned label gets its own row.
    ///
    /// `assignments` maps a data file name, or [`ALL_FILES`], to its labels.
    /// For every entry the matching rows are copied once per label with
    /// `comment[label]` set. Rows of data files without an entry are dropped.
    /// The result is sorted by data file, keeping insertion order among
    /// equal names. An empty map leaves the table untouched.
    pub fn assign_labels(&mut self, assignments: &IndexMap<String, Vec<String>>) -> Result<()> {
        if assignments.is_empty() {
            return Ok(());
        }
        let file_index = self.require_column(DATA_FILE_COLUMN)?;
        if let Some(unknown) = assignments.keys().find(|file| {
            *file != ALL_FILES
                && !self
                    .rows
                    .iter()
                    .any(|row| row[file_index].as_deref() == Some(file.as_str()))
        }) {
            return Err(SdrfError::InvalidChoice {
                column: DATA_FILE_COLUMN.to_string(),
                value: unknown.clone(),
            });
        }
        let label_index = self.ensure_column(LABEL_COLUMN);

        let mut rows = Vec::new();
        for (file, labels) in assignments {
            let source: Vec<&Vec<Option<String>>> = if file == ALL_FILES {
                self.rows.iter().collect()
            } else {
                self.rows
                    .iter()
                    .filter(|row| row[file_index].as_deref() == Some(file.as_str()))
                    .collect()
            };
            for label in labels {
                for row in &source {
                    let mut copy = (*row).clone();
                    copy[label_index] = Some(label.clone());
                    rows.push(copy);
                }
            }
        }

        rows.sort_by(|a, b| match (&a[file_index], &b[file_index]) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        tracing::info!(before = self.rows.len(), after = rows.len(), "assigned labels");
        self.rows = rows;
        Ok(())
    }
}

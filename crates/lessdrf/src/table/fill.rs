//! Column fill strategies.
//!
//! One decision function turns a column's permitted values into a
//! [`FillStrategy`]; one apply function writes it into the table and hands
//! back a [`ColumnEditor`] for every column the user still has to fill in.

use indexmap::IndexSet;
use serde::Serialize;

use crate::error::{Result, SdrfError};
use crate::ontology::resolve_selection;

use super::{is_missing, WorkingTable};

/// Option offered first so a cell can be left blank.
pub const BLANK_OPTION: &str = "";

/// Explicit "not available" option.
pub const NA_OPTION: &str = "NA";

/// How a column gets its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FillStrategy {
    /// Unconstrained text.
    FreeText,
    /// The same value in every row.
    Constant { value: String },
    /// One value per row out of `options`.
    Choice { options: Vec<String> },
    /// Up to `slots` values per row, spread over `{column}`, `{column}_1`, ...
    MultiChoice { options: Vec<String>, slots: usize },
}

impl FillStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            FillStrategy::FreeText => "free text",
            FillStrategy::Constant { .. } => "constant",
            FillStrategy::Choice { .. } => "choice",
            FillStrategy::MultiChoice { .. } => "multiple choice",
        }
    }
}

/// Options of a choice column: blank, `NA`, then the permitted values.
pub fn choice_options<S: AsRef<str>>(permitted: &[S]) -> Vec<String> {
    let mut options: IndexSet<String> = IndexSet::new();
    options.insert(BLANK_OPTION.to_string());
    options.insert(NA_OPTION.to_string());
    options.extend(permitted.iter().map(|v| v.as_ref().to_string()));
    options.into_iter().collect()
}

/// Options of a column filled from picked ontology terms: blank, then the
/// picked labels. `NA` is left out since it is not an ontology term.
pub fn selection_options<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let mut options: IndexSet<String> = IndexSet::new();
    options.insert(BLANK_OPTION.to_string());
    options.extend(labels.iter().map(|v| v.as_ref().to_string()));
    options.into_iter().collect()
}

/// Pick a strategy for a column.
///
/// No permitted values, or an empty list, means free text; a single value is
/// a constant; more values give a choice column, or a multi-value column
/// when `slots_per_row` asks for more than one slot.
pub fn decide(permitted: Option<&[String]>, slots_per_row: Option<usize>) -> FillStrategy {
    let permitted = match permitted {
        None | Some([]) => return FillStrategy::FreeText,
        Some(values) => values,
    };
    if let [only] = permitted {
        return FillStrategy::Constant {
            value: only.clone(),
        };
    }
    let options = choice_options(permitted);
    match slots_per_row {
        Some(slots) if slots > 1 => FillStrategy::MultiChoice { options, slots },
        _ => FillStrategy::Choice { options },
    }
}

/// An editable column together with the values its cells may take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnEditor {
    pub column: String,
    /// `None` for free text.
    pub options: Option<Vec<String>>,
}

impl ColumnEditor {
    /// Whether a cell value is acceptable for this column.
    pub fn allows(&self, value: &str) -> bool {
        match &self.options {
            None => true,
            Some(options) => is_missing(value) || options.iter().any(|o| o == value),
        }
    }

    /// Write edited cells back into the table.
    ///
    /// Blank and `"empty"` cells become missing values. Nothing is written
    /// when any value falls outside the options.
    pub fn accept(&self, table: &mut WorkingTable, edited: Vec<Option<String>>) -> Result<()> {
        if let Some(bad) = edited.iter().flatten().find(|v| !self.allows(v)) {
            return Err(SdrfError::InvalidChoice {
                column: self.column.clone(),
                value: bad.clone(),
            });
        }
        table.set_column(&self.column, edited)
    }
}

/// Apply a strategy to `column`, creating it (and any sibling columns) as needed.
pub fn apply(
    table: &mut WorkingTable,
    column: &str,
    strategy: &FillStrategy,
) -> Result<Vec<ColumnEditor>> {
    let editors = match strategy {
        FillStrategy::Constant { value } => {
            table.set_constant(column, value);
            Vec::new()
        }
        FillStrategy::FreeText => {
            table.ensure_column(column);
            vec![ColumnEditor {
                column: column.to_string(),
                options: None,
            }]
        }
        FillStrategy::Choice { options } => {
            table.ensure_column(column);
            vec![ColumnEditor {
                column: column.to_string(),
                options: Some(options.clone()),
            }]
        }
        FillStrategy::MultiChoice { options, slots } => {
            table.ensure_column(column);
            let mut columns = vec![column.to_string()];
            for i in 1..*slots {
                let sibling = format!("{column}_{i}");
                let previous = columns.last().map(String::as_str).unwrap_or(column);
                table.insert_column_after(previous, &sibling)?;
                columns.push(sibling);
            }
            columns
                .into_iter()
                .map(|column| ColumnEditor {
                    column,
                    options: Some(options.clone()),
                })
                .collect()
        }
    };
    table.restore_missing();
    tracing::debug!(column, strategy = strategy.label(), editors = editors.len(), "applied fill strategy");
    Ok(editors)
}

/// [`decide`] then [`apply`]; with `allow_multiple_per_row` there is one
/// slot per permitted value.
pub fn decide_and_apply(
    table: &mut WorkingTable,
    column: &str,
    permitted: Option<&[String]>,
    allow_multiple_per_row: bool,
) -> Result<Vec<ColumnEditor>> {
    let slots = if allow_multiple_per_row {
        permitted.map(<[String]>::len)
    } else {
        None
    };
    apply(table, column, &decide(permitted, slots))
}

/// [`decide`] then [`apply`] with an explicit number of values per row.
pub fn decide_and_apply_slots(
    table: &mut WorkingTable,
    column: &str,
    permitted: Option<&[String]>,
    slots: usize,
) -> Result<Vec<ColumnEditor>> {
    apply(table, column, &decide(permitted, Some(slots)))
}

/// Turn terms picked in a tree or autocomplete widget into a strategy.
///
/// Selections may be tree path values; their last segment is used.
/// Exactly `expected` terms must be picked. One term fills the column;
/// several give a choice column, or a multi-value column when
/// `within_one_row` is set. Only the picked terms and a blank are offered.
pub fn strategy_from_selection<S: AsRef<str>>(
    selected: &[S],
    expected: usize,
    within_one_row: bool,
) -> Result<FillStrategy> {
    let labels = resolve_selection(selected);
    if labels.len() != expected {
        return Err(SdrfError::SelectionCount {
            expected,
            actual: labels.len(),
        });
    }
    Ok(match labels.as_slice() {
        [] => FillStrategy::FreeText,
        [only] => FillStrategy::Constant {
            value: only.clone(),
        },
        _ if within_one_row => FillStrategy::MultiChoice {
            options: selection_options(&labels),
            slots: expected,
        },
        _ => FillStrategy::Choice {
            options: selection_options(&labels),
        },
    })
}

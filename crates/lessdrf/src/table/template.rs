//! Species templates and raw data file names.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, SdrfError};

use super::WorkingTable;

/// Column holding one raw file name per row.
pub const DATA_FILE_COLUMN: &str = "comment[data file]";

/// Empty columns appended to every new template.
pub const TEMPLATE_EXTRA_COLUMNS: [&str; 3] = [
    "comment[modification parameters]",
    "comment[fragment mass tolerance]",
    "comment[precursor mass tolerance]",
];

/// Species-specific SDRF starting templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeciesTemplate {
    Human,
    CellLine,
    Default,
    Invertebrates,
    Plants,
    Vertebrates,
}

impl SpeciesTemplate {
    pub const ALL: [SpeciesTemplate; 6] = [
        SpeciesTemplate::Human,
        SpeciesTemplate::CellLine,
        SpeciesTemplate::Default,
        SpeciesTemplate::Invertebrates,
        SpeciesTemplate::Plants,
        SpeciesTemplate::Vertebrates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesTemplate::Human => "human",
            SpeciesTemplate::CellLine => "cell-line",
            SpeciesTemplate::Default => "default",
            SpeciesTemplate::Invertebrates => "invertebrates",
            SpeciesTemplate::Plants => "plants",
            SpeciesTemplate::Vertebrates => "vertebrates",
        }
    }

    /// File name of the template inside a templates directory.
    pub fn file_name(&self) -> String {
        format!("sdrf-{}.sdrf.tsv", self.as_str())
    }
}

impl fmt::Display for SpeciesTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeciesTemplate {
    type Err = SdrfError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        SpeciesTemplate::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                SdrfError::Config(format!(
                    "unknown species template '{s}', expected one of: {}",
                    SpeciesTemplate::ALL.map(|t| t.as_str()).join(", ")
                ))
            })
    }
}

impl WorkingTable {
    /// Start a new table from `<dir>/sdrf-<species>.sdrf.tsv`.
    pub fn from_template(dir: impl AsRef<Path>, species: SpeciesTemplate) -> Result<Self> {
        let path = dir.as_ref().join(species.file_name());
        let mut table = Self::load(&path)?;
        for column in TEMPLATE_EXTRA_COLUMNS {
            table.ensure_column(column);
        }
        tracing::info!(species = %species, columns = table.column_count(), "created table from template");
        Ok(table)
    }
}

/// Split a pasted list of raw file names.
///
/// The separator is the first of comma, tab and space that occurs in the
/// input; names are trimmed and blanks dropped.
pub fn split_file_names(input: &str) -> Vec<String> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }
    let separator = [',', '\t', ' '].into_iter().find(|&c| input.contains(c));
    match separator {
        Some(sep) => input
            .split(sep)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect(),
        None => vec![input.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_species_parse() {
        assert_eq!("cell-line".parse::<SpeciesTemplate>().unwrap(), SpeciesTemplate::CellLine);
        assert_eq!(" Human ".parse::<SpeciesTemplate>().unwrap(), SpeciesTemplate::Human);
        assert!("fungi".parse::<SpeciesTemplate>().is_err());
        assert_eq!(SpeciesTemplate::Plants.file_name(), "sdrf-plants.sdrf.tsv");
    }

    #[test]
    fn test_split_file_names() {
        assert_eq!(split_file_names("a.raw, b.raw,c.raw"), vec!["a.raw", "b.raw", "c.raw"]);
        assert_eq!(split_file_names("a.raw\tb.raw"), vec!["a.raw", "b.raw"]);
        assert_eq!(split_file_names("a.raw b.raw"), vec!["a.raw", "b.raw"]);
        assert_eq!(split_file_names(" single.raw "), vec!["single.raw"]);
        assert!(split_file_names("   ").is_empty());
    }

    #[test]
    fn test_from_template_appends_extra_columns() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("sdrf-human.sdrf.tsv"),
            "source name\tcharacteristics[organism]\tcomment[data file]\n",
        )
        .unwrap();

        let table = WorkingTable::from_template(dir.path(), SpeciesTemplate::Human).unwrap();
        assert_eq!(table.column_count(), 6);
        assert!(table.has_column("comment[precursor mass tolerance]"));
        assert_eq!(table.row_count(), 0);

        let err = WorkingTable::from_template(dir.path(), SpeciesTemplate::Plants).unwrap_err();
        assert!(matches!(err, SdrfError::Io { .. }));
    }
}

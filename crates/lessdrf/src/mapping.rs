//! Copying columns of a local metadata sheet into the SDRF table.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{Result, SdrfError};
use crate::table::WorkingTable;
use crate::validation::{
    validate_age, validate_organisms, validate_sex, validate_terms, OrganismSynonyms, AGE_COLUMN,
    ORGANISM_COLUMN, SEX_COLUMN,
};
use crate::vocabulary::VocabularyStore;

/// Columns whose values are copied without any vocabulary check.
pub const VALUE_COLUMNS: [&str; 5] = [
    "source name",
    "assay name",
    "comment[data file]",
    "comment[fraction identifier]",
    "comment[technical replicate]",
];

/// What [`map_metadata_column`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappingOutcome {
    /// Values were copied unchanged.
    Copied,
    /// Organism names were normalized, then copied.
    Normalized { replaced: usize },
    /// Values outside the column's vocabulary; nothing was copied.
    InvalidTerms { unmatched: BTreeSet<String> },
    /// Malformed ages; nothing was copied.
    InvalidAges { offending: Vec<String> },
    /// No vocabulary is known for the column; nothing was copied.
    NoVocabulary,
}

impl MappingOutcome {
    pub fn applied(&self) -> bool {
        matches!(self, MappingOutcome::Copied | MappingOutcome::Normalized { .. })
    }
}

/// Validate `metadata[metadata_column]` for `sdrf_column` and copy it into `table`.
///
/// Both tables must have the same number of rows.
pub fn map_metadata_column(
    table: &mut WorkingTable,
    sdrf_column: &str,
    metadata: &WorkingTable,
    metadata_column: &str,
    store: &VocabularyStore,
    synonyms: &OrganismSynonyms,
) -> Result<MappingOutcome> {
    if metadata.row_count() != table.row_count() {
        return Err(SdrfError::RowCountMismatch {
            expected: table.row_count(),
            actual: metadata.row_count(),
        });
    }
    let values = metadata.column_values(metadata_column)?;
    let owned = || values.iter().map(|v| v.map(str::to_string)).collect::<Vec<_>>();

    let outcome = if sdrf_column == ORGANISM_COLUMN {
        let vocabulary = store
            .for_column(sdrf_column)
            .cloned()
            .or_else(|| store.all_organisms())
            .unwrap_or_else(|| synonyms.vocabulary());
        let result = validate_organisms(values.iter().copied(), synonyms, &vocabulary);
        if result.validation.valid {
            let replaced = values
                .iter()
                .zip(&result.normalized)
                .filter(|(before, after)| before.as_deref() != after.as_deref())
                .count();
            table.set_column(sdrf_column, result.normalized)?;
            MappingOutcome::Normalized { replaced }
        } else {
            MappingOutcome::InvalidTerms {
                unmatched: result.validation.unmatched,
            }
        }
    } else if VALUE_COLUMNS.contains(&sdrf_column) {
        table.set_column(sdrf_column, owned())?;
        MappingOutcome::Copied
    } else if sdrf_column == AGE_COLUMN {
        let result = validate_age(values.iter().copied());
        if result.valid {
            table.set_column(sdrf_column, owned())?;
            MappingOutcome::Copied
        } else {
            MappingOutcome::InvalidAges {
                offending: result.offending,
            }
        }
    } else {
        let result = if sdrf_column == SEX_COLUMN {
            Some(validate_sex(values.iter().copied()))
        } else {
            store
                .for_column(sdrf_column)
                .map(|vocabulary| validate_terms(values.iter().copied(), vocabulary))
        };
        match result {
            Some(r) if r.valid => {
                table.set_column(sdrf_column, owned())?;
                MappingOutcome::Copied
            }
            Some(r) => MappingOutcome::InvalidTerms {
                unmatched: r.unmatched,
            },
            None => MappingOutcome::NoVocabulary,
        }
    };

    if outcome.applied() {
        tracing::info!(from = metadata_column, to = sdrf_column, "mapped metadata column");
    } else {
        tracing::warn!(from = metadata_column, to = sdrf_column, ?outcome, "metadata column not mapped");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::PermittedVocabulary;

    fn sdrf() -> WorkingTable {
        let mut table = WorkingTable::new(["source name", ORGANISM_COLUMN, AGE_COLUMN]);
        table.resize_rows(2);
        table
    }

    fn metadata() -> WorkingTable {
        let tsv = "id\tspecies\tage\tsex\ttissue\n\
                   p1\thuman\t58Y\tF\tliver\n\
                   p2\tHomo sapiens\told\tmale\tspleen\n";
        WorkingTable::read_tsv(tsv.as_bytes()).unwrap()
    }

    fn store() -> VocabularyStore {
        let mut store = VocabularyStore::new();
        store.insert(
            "all_organism_part_elements",
            PermittedVocabulary::fixed(&["liver", "heart"]),
        );
        store
    }

    #[test]
    fn test_organism_normalized_against_synonyms() {
        let mut table = sdrf();
        let outcome = map_metadata_column(
            &mut table,
            ORGANISM_COLUMN,
            &metadata(),
            "species",
            &store(),
            &OrganismSynonyms::standard(),
        )
        .unwrap();
        assert_eq!(outcome, MappingOutcome::Normalized { replaced: 1 });
        assert_eq!(table.cell(0, ORGANISM_COLUMN), Some("Homo sapiens"));
    }

    #[test]
    fn test_value_column_copied() {
        let mut table = sdrf();
        let outcome = map_metadata_column(
            &mut table,
            "source name",
            &metadata(),
            "id",
            &store(),
            &OrganismSynonyms::standard(),
        )
        .unwrap();
        assert_eq!(outcome, MappingOutcome::Copied);
        assert_eq!(table.cell(1, "source name"), Some("p2"));
    }

    #[test]
    fn test_rejections_leave_table_alone() {
        let mut table = sdrf();
        let synonyms = OrganismSynonyms::standard();
        let meta = metadata();

        let outcome = map_metadata_column(&mut table, AGE_COLUMN, &meta, "age", &store(), &synonyms).unwrap();
        assert_eq!(outcome, MappingOutcome::InvalidAges { offending: vec!["old".into()] });

        let outcome = map_metadata_column(&mut table, SEX_COLUMN, &meta, "sex", &store(), &synonyms).unwrap();
        assert!(matches!(outcome, MappingOutcome::InvalidTerms { ref unmatched } if unmatched.contains("male")));
        assert!(!table.has_column(SEX_COLUMN));

        let outcome = map_metadata_column(
            &mut table,
            "characteristics[organism part]",
            &meta,
            "tissue",
            &store(),
            &synonyms,
        )
        .unwrap();
        assert!(!outcome.applied());

        let outcome = map_metadata_column(
            &mut table,
            "characteristics[cell type]",
            &meta,
            "tissue",
            &store(),
            &synonyms,
        )
        .unwrap();
        assert_eq!(outcome, MappingOutcome::NoVocabulary);
    }

    #[test]
    fn test_row_count_must_match() {
        let mut table = WorkingTable::new(["source name"]);
        table.resize_rows(5);
        let err = map_metadata_column(
            &mut table,
            "source name",
            &metadata(),
            "id",
            &store(),
            &OrganismSynonyms::standard(),
        )
        .unwrap_err();
        assert!(matches!(err, SdrfError::RowCountMismatch { expected: 5, actual: 2 }));
    }
}

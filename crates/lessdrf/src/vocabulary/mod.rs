//! Permitted vocabularies: the label sets a column's values are checked against.

mod search;
mod store;

pub use search::{autocomplete, AutocompleteOutcome};
pub use store::{VocabularyStore, ORGANISM_CATEGORIES};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::ontology::FlatTermList;

/// Where a vocabulary's terms came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularySource {
    /// Flattened subclass tree of an ontology term.
    Ontology,
    /// A fixed literal list, such as the sex codes.
    Fixed,
    /// Canonical names of the organism synonym table.
    OrganismSynonyms,
    /// A precomputed `.json.gz` data file.
    DataFile,
}

/// Set of labels a column may contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermittedVocabulary {
    terms: IndexSet<String>,
    source: VocabularySource,
}

impl PermittedVocabulary {
    pub fn new<I, S>(terms: I, source: VocabularySource) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            source,
        }
    }

    /// Vocabulary of a flattened ontology tree.
    pub fn from_term_list(list: &FlatTermList) -> Self {
        Self {
            terms: list.clone(),
            source: VocabularySource::Ontology,
        }
    }

    /// Vocabulary of literal values.
    pub fn fixed(values: &[&str]) -> Self {
        Self::new(values.iter().copied(), VocabularySource::Fixed)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn source(&self) -> VocabularySource {
        self.source
    }

    pub fn terms(&self) -> &IndexSet<String> {
        &self.terms
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Add every term of `other`, keeping this vocabulary's source.
    pub fn extend_from(&mut self, other: &PermittedVocabulary) {
        self.terms.extend(other.terms.iter().cloned());
    }
}

/// Data-file key of the vocabulary belonging to an SDRF column.
///
/// `characteristics[organism part]` becomes `all_organism_part_elements`.
/// Columns without brackets use their whole name.
pub fn vocabulary_key(column: &str) -> String {
    let inner = column
        .rsplit('[')
        .next()
        .unwrap_or(column)
        .split(']')
        .next()
        .unwrap_or_default();
    format!("all_{}_elements", inner.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_key() {
        assert_eq!(
            vocabulary_key("characteristics[organism part]"),
            "all_organism_part_elements"
        );
        assert_eq!(vocabulary_key("comment[instrument]"), "all_instrument_elements");
        assert_eq!(
            vocabulary_key("factor value[disease]"),
            "all_disease_elements"
        );
        assert_eq!(vocabulary_key("source name"), "all_source_name_elements");
    }

    #[test]
    fn test_fixed_vocabulary() {
        let sex = PermittedVocabulary::fixed(&["M", "F", "unknown"]);
        assert_eq!(sex.len(), 3);
        assert!(sex.contains("unknown"));
        assert!(!sex.contains("NA"));
        assert_eq!(sex.source(), VocabularySource::Fixed);
    }

    #[test]
    fn test_extend_keeps_order_and_source() {
        let mut a = PermittedVocabulary::new(["b", "a"], VocabularySource::DataFile);
        a.extend_from(&PermittedVocabulary::fixed(&["a", "c"]));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(a.source(), VocabularySource::DataFile);
    }
}

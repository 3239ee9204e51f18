//! Organism name normalization.
//!
//! Common spellings of eight laboratory organisms are folded to their
//! scientific names before the organism column is validated.

use serde::Serialize;

use crate::vocabulary::{PermittedVocabulary, VocabularySource};

use super::terms::{validate_terms, TermValidation};

const STANDARD_SYNONYMS: &[(&str, &[&str])] = &[
    ("Homo sapiens", &["Human", "human", "homo sapiens", "Homo Sapiens"]),
    ("Mus musculus", &["mouse", "Mouse", "Mus Musculus", "mus musculus"]),
    (
        "Arabidopsis thaliana",
        &[
            "arabidopsis thaliana",
            "Arabidopsis Thaliana",
            "arabidopsis",
            "Arabidopsis",
            "thale cress",
        ],
    ),
    (
        "Drosophila melanogaster",
        &[
            "drosophila",
            "Drosophila",
            "Drosophila Melanogsaster",
            "drosophila melanogaster",
            "fruitfly",
            "fruit fly",
        ],
    ),
    (
        "Saccharomyces cerevisiae",
        &[
            "Saccharomyces Cerevisiae",
            "saccharomyces cerevisiae",
            "brewer's yeast",
            "Brewer's yeast",
        ],
    ),
    (
        "Caenorhabditis elegans",
        &[
            "C. Elegans",
            "C. elegans",
            "c. elegans",
            "caenorhabditis elegans",
            "Caenorhabditis Elegans",
            "worm",
            "Worm",
        ],
    ),
    (
        "Danio rerio",
        &["Danio Rerio", "danio rerio", "zebrafish", "Zebrafish"],
    ),
    (
        "Escherichia coli",
        &["E. Coli", "E. coli", "e. coli", "Escherichia Coli", "escherichia coli"],
    ),
];

/// Ordered table of canonical organism names and their variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganismSynonyms {
    entries: Vec<(String, Vec<String>)>,
}

impl OrganismSynonyms {
    /// The built-in table of eight organisms.
    pub fn standard() -> Self {
        Self::from_entries(
            STANDARD_SYNONYMS
                .iter()
                .map(|(canonical, variants)| (*canonical, variants.iter().copied())),
        )
    }

    /// Build a table from `(canonical, variants)` pairs, in lookup order.
    pub fn from_entries<I, C, V, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(c, v)| (c.into(), v.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    /// Canonical name for one value.
    ///
    /// When several entries list the value, the last one wins.
    pub fn canonical<'a>(&'a self, value: &'a str) -> &'a str {
        self.entries
            .iter()
            .rev()
            .find(|(_, variants)| variants.iter().any(|v| v == value))
            .map(|(canonical, _)| canonical.as_str())
            .unwrap_or(value)
    }

    /// Normalize a column; missing values stay missing and unknown names pass through.
    pub fn normalize<'a, I>(&self, values: I) -> Vec<Option<String>>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        values
            .into_iter()
            .map(|v| v.map(|v| self.canonical(v).to_string()))
            .collect()
    }

    /// Vocabulary made of the canonical names.
    pub fn vocabulary(&self) -> PermittedVocabulary {
        PermittedVocabulary::new(self.canonical_names(), VocabularySource::OrganismSynonyms)
    }
}

impl Default for OrganismSynonyms {
    fn default() -> Self {
        Self::standard()
    }
}

/// Normalized organism column and its validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganismValidation {
    pub normalized: Vec<Option<String>>,
    pub validation: TermValidation,
}

/// Normalize organism names, then check them against `vocabulary`.
pub fn validate_organisms<'a, I>(
    values: I,
    synonyms: &OrganismSynonyms,
    vocabulary: &PermittedVocabulary,
) -> OrganismValidation
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let normalized = synonyms.normalize(values);
    let validation = validate_terms(normalized.iter().map(|v| v.as_deref()), vocabulary);
    OrganismValidation {
        normalized,
        validation,
    }
}

//! Directory of precomputed `.json.gz` vocabularies.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::compression::read_gzipped_json;
use crate::error::{Result, SdrfError};
use crate::ontology::flatten_nested;
use crate::table::UnimodCatalog;

use super::{vocabulary_key, PermittedVocabulary, VocabularySource};

/// File-name fragments that mark a taxonomy (organism) vocabulary.
pub const ORGANISM_CATEGORIES: &[&str] = &[
    "eukaryota",
    "archaea",
    "bacteria",
    "virus",
    "unclassified",
    "other_sequences",
];

const DATA_FILE_SUFFIX: &str = ".json.gz";

/// Vocabularies keyed by data-file key, plus the organism vocabularies
/// keyed by taxonomy category.
#[derive(Debug, Clone, Default)]
pub struct VocabularyStore {
    vocabularies: HashMap<String, PermittedVocabulary>,
    organisms: BTreeMap<String, PermittedVocabulary>,
}

impl VocabularyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `<key>.json.gz` file in `dir`.
    ///
    /// Each file holds a JSON list of labels or a nested term tree. Other
    /// files and the Unimod catalog are skipped.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| SdrfError::io(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SdrfError::io(dir, e))?;
            paths.push(entry.path());
        }
        paths.sort();

        let mut store = Self::new();
        for path in paths {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(key) = name.strip_suffix(DATA_FILE_SUFFIX) else {
                tracing::debug!(path = %path.display(), "skipping non data file");
                continue;
            };
            if key == UnimodCatalog::DATA_KEY {
                continue;
            }
            let key = key.to_string();
            let document: Value = read_gzipped_json(&path)?;
            let vocabulary = vocabulary_from_document(&document).map_err(|e| match e {
                SdrfError::MalformedTree(msg) => {
                    SdrfError::MalformedTree(format!("{}: {msg}", path.display()))
                }
                other => other,
            })?;

            match organism_category(&key) {
                Some(category) => match store.organisms.get_mut(category) {
                    Some(existing) => existing.extend_from(&vocabulary),
                    None => {
                        store.organisms.insert(category.to_string(), vocabulary);
                    }
                },
                None => {
                    store.vocabularies.insert(key, vocabulary);
                }
            }
        }

        tracing::info!(
            dir = %dir.display(),
            vocabularies = store.vocabularies.len(),
            organism_categories = store.organisms.len(),
            "loaded vocabularies"
        );
        Ok(store)
    }

    pub fn insert(&mut self, key: impl Into<String>, vocabulary: PermittedVocabulary) {
        self.vocabularies.insert(key.into(), vocabulary);
    }

    pub fn insert_organisms(&mut self, category: impl Into<String>, vocabulary: PermittedVocabulary) {
        self.organisms.insert(category.into(), vocabulary);
    }

    pub fn get(&self, key: &str) -> Option<&PermittedVocabulary> {
        self.vocabularies.get(key)
    }

    /// Vocabulary for an SDRF column, looked up through [`vocabulary_key`].
    pub fn for_column(&self, column: &str) -> Option<&PermittedVocabulary> {
        self.get(&vocabulary_key(column))
    }

    pub fn len(&self) -> usize {
        self.vocabularies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabularies.is_empty() && self.organisms.is_empty()
    }

    /// Sorted data-file keys.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.vocabularies.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn organism_category(&self, category: &str) -> Option<&PermittedVocabulary> {
        self.organisms.get(category)
    }

    pub fn organism_categories(&self) -> impl Iterator<Item = &str> {
        self.organisms.keys().map(String::as_str)
    }

    /// Union of every organism category, or `None` when none were loaded.
    pub fn all_organisms(&self) -> Option<PermittedVocabulary> {
        let mut categories = self.organisms.values();
        let mut all = categories.next()?.clone();
        for vocabulary in categories {
            all.extend_from(vocabulary);
        }
        Some(all)
    }
}

fn organism_category(key: &str) -> Option<&'static str> {
    let normalized = key.replace(' ', "_");
    ORGANISM_CATEGORIES
        .iter()
        .copied()
        .find(|category| normalized.contains(category))
}

fn vocabulary_from_document(document: &Value) -> Result<PermittedVocabulary> {
    match document {
        Value::Array(items) => Ok(PermittedVocabulary::new(
            items.iter().filter_map(|v| v.as_str()),
            VocabularySource::DataFile,
        )),
        other => {
            let terms = flatten_nested(other)?;
            Ok(PermittedVocabulary::new(terms, VocabularySource::DataFile))
        }
    }
}

//! Runtime configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SdrfError};

/// The `is_a` predicate as written in OBO and OBO-Graphs documents.
pub const IS_A: &str = "is_a";

/// `part_of` in its OBO shorthand.
pub const PART_OF: &str = "part_of";

/// `part_of` as a BFO IRI, the form used by OBO-Graphs JSON exports.
pub const BFO_PART_OF: &str = "http://purl.obolibrary.org/obo/BFO_0000050";

/// MONDO branch kept out of every tree: it is large and irrelevant to SDRF.
pub const MONDO_EXCLUDED_ROOT: &str = "http://purl.obolibrary.org/obo/MONDO_0011876";

/// Options applied when writing the final SDRF file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Value written to `comment[tool metadata]`.
    pub tool_metadata: String,
    /// Text written for missing cells.
    pub missing_value: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            tool_metadata: format!("lesSDRF v{}", env!("CARGO_PKG_VERSION")),
            missing_value: String::new(),
        }
    }
}

/// Configuration for ontology traversal, validation limits and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdrfConfig {
    /// Edge predicates followed when building subclass trees.
    pub accepted_predicates: Vec<String>,
    /// Term ids never placed in any tree.
    pub excluded_term_ids: Vec<String>,
    /// Maximum number of autocomplete matches shown before asking to refine.
    pub autocomplete_limit: usize,
    /// Maximum number of raw data file names for a new table.
    pub max_data_files: usize,
    /// Maximum number of samples in an uploaded intermediate table.
    pub max_uploaded_samples: usize,
    /// Export settings.
    pub export: ExportOptions,
}

impl Default for SdrfConfig {
    fn default() -> Self {
        Self {
            accepted_predicates: vec![IS_A.to_string(), PART_OF.to_string(), BFO_PART_OF.to_string()],
            excluded_term_ids: vec![MONDO_EXCLUDED_ROOT.to_string()],
            autocomplete_limit: 500,
            max_data_files: 2000,
            max_uploaded_samples: 500,
            export: ExportOptions::default(),
        }
    }
}

impl SdrfConfig {
    /// Load a configuration from a JSON file; absent fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SdrfError::io(path, e))?;
        let config: SdrfConfig = serde_json::from_reader(BufReader::new(file))?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.accepted_predicates.is_empty() {
            return Err(SdrfError::Config(
                "accepted_predicates must not be empty".to_string(),
            ));
        }
        if self.autocomplete_limit == 0 {
            return Err(SdrfError::Config(
                "autocomplete_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

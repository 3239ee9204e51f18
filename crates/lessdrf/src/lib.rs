//! lessdrf: ontology-driven building blocks for writing SDRF proteomics metadata.
//!
//! The library turns ontology graphs into term pickers and checks that a
//! sample table only uses the terms it is allowed to.
//!
//! # Core Pieces
//!
//! - **Subclass trees**: every descendant of an ontology term, placed once,
//!   from OBO-Graphs JSON or OBO files
//! - **Projections**: flat term lists for autocomplete and path-valued nodes
//!   for tree-select widgets
//! - **Validation**: vocabulary membership, age format, sex codes and
//!   organism name normalization
//! - **Column filling**: constant, choice, multi-choice or free-text columns,
//!   and the final SDRF export
//! - **Labels and modifications**: one row per data file and label, and
//!   modification parameters in SDRF key-value notation
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lessdrf::{OntologyRepository, SdrfConfig, Session, WorkingTable};
//!
//! let mut repo = OntologyRepository::new(&SdrfConfig::default());
//! repo.register_graph("efo", "data/efo.json.gz").unwrap();
//! let repo = Arc::new(repo);
//!
//! let mut session = Session::new(Arc::clone(&repo), WorkingTable::load("sdrf.tsv").unwrap());
//! let tree = session.term_tree("efo", "EFO:0000408", "disease").unwrap();
//! println!("{} disease terms", tree.len());
//!
//! session
//!     .fill_from_selection("characteristics[disease]", &["disease,cancer"], 1, false)
//!     .unwrap();
//! session.export(std::io::stdout()).unwrap();
//! ```

pub mod compression;
pub mod config;
pub mod error;
pub mod export;
pub mod mapping;
pub mod ontology;
pub mod session;
pub mod table;
pub mod validation;
pub mod vocabulary;

pub use config::{ExportOptions, SdrfConfig};
pub use error::{Result, SdrfError};
pub use export::{export_sdrf, to_sdrf_string};
pub use mapping::{map_metadata_column, MappingOutcome};
pub use ontology::{
    FlatTermList, OboOntology, OntologyGraphIndex, OntologyRepository, SubclassTree,
    SubclassTreeBuilder, TreeUiNode,
};
pub use session::Session;
pub use table::fill::{decide, decide_and_apply, ColumnEditor, FillStrategy};
pub use table::{
    write_modifications, ModificationParameter, ModificationPosition, ModificationType,
    SpeciesTemplate, UnimodCatalog, WorkingTable,
};
pub use validation::{
    check_table, validate_age, validate_sex, validate_terms, AgeValidation, OrganismSynonyms,
    TableCheck, TermValidation,
};
pub use vocabulary::{vocabulary_key, PermittedVocabulary, VocabularyStore};

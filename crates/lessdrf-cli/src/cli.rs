//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// lessdrf: ontology-driven SDRF metadata for proteomics
#[derive(Parser)]
#[command(name = "lessdrf")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file (traversal rules, limits, export options)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the subclass tree of an ontology term
    Tree {
        /// OBO-Graphs JSON file (optionally gzipped) or OBO file
        #[arg(value_name = "ONTOLOGY")]
        ontology: PathBuf,

        /// Root term id
        #[arg(short, long)]
        term: String,

        /// Label used for the root
        #[arg(short, long)]
        label: String,

        /// Read the ontology as an OBO flat file
        #[arg(long)]
        obo: bool,

        /// Output shape
        #[arg(short, long, value_enum, default_value_t = TreeFormat::Nested)]
        format: TreeFormat,

        /// Output path; gzipped when it ends in .gz (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start a new SDRF table from a species template and raw file names
    New {
        /// Directory holding the sdrf-<species>.sdrf.tsv templates
        #[arg(long, value_name = "DIR")]
        templates: PathBuf,

        /// Template species (human, cell-line, default, invertebrates, plants, vertebrates)
        #[arg(short, long, default_value = "default")]
        species: String,

        /// Raw data file names, separated by commas, tabs or spaces
        #[arg(short, long)]
        files: String,

        /// Output path for the working table (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a table against the permitted vocabularies
    Check {
        /// Working table (TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Directory of all_*_elements.json.gz vocabulary files
        #[arg(long, value_name = "DIR")]
        vocabularies: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search a vocabulary for terms containing a query
    Search {
        /// Directory of all_*_elements.json.gz vocabulary files
        #[arg(long, value_name = "DIR")]
        vocabularies: PathBuf,

        /// SDRF column whose vocabulary is searched, e.g. characteristics[organism]
        #[arg(short, long)]
        column: String,

        /// Text to look for
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Write the final SDRF file
    Export {
        /// Working table (TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Text written for missing cells
        #[arg(long)]
        missing_value: Option<String>,
    },
}

/// Shape of the tree written by `lessdrf tree`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TreeFormat {
    /// Nested label document
    #[default]
    Nested,
    /// Path-valued nodes for tree-select widgets
    Ui,
    /// Flat list of labels
    Flat,
}

//! Tree command - build and write the subclass tree of a term.

use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use lessdrf::compression::write_gzipped_json;
use lessdrf::{OntologyRepository, SdrfConfig};

use super::output_writer;
use crate::cli::TreeFormat;

pub fn run(
    config: &SdrfConfig,
    ontology: PathBuf,
    term: &str,
    label: &str,
    obo: bool,
    format: TreeFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut repository = OntologyRepository::new(config);
    let name = ontology.to_string_lossy().into_owned();
    if obo {
        repository.register_obo(&name, &ontology)?;
    } else {
        repository.register_graph(&name, &ontology)?;
    }

    let tree = repository.subclass_tree(&name, term, label)?;
    tracing::info!(term, terms = tree.len(), "built subclass tree");

    let document = match format {
        TreeFormat::Nested => tree.to_nested_json(),
        TreeFormat::Ui => serde_json::to_value(tree.to_ui_nodes())?,
        TreeFormat::Flat => serde_json::to_value(tree.flatten())?,
    };

    match output {
        Some(path) if path.extension().is_some_and(|e| e == "gz") => {
            write_gzipped_json(&path, &document)?;
            eprintln!(
                "{} {} terms to {}",
                "Wrote".green().bold(),
                tree.len(),
                path.display()
            );
        }
        output => {
            let mut writer = output_writer(output.as_deref())?;
            if format == TreeFormat::Flat {
                for term in tree.flatten() {
                    writeln!(writer, "{}", term)?;
                }
            } else {
                serde_json::to_writer_pretty(&mut writer, &document)?;
                writeln!(writer)?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}

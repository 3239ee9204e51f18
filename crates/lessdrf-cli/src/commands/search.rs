//! Search command - autocomplete over a vocabulary.

use std::path::PathBuf;

use colored::Colorize;
use lessdrf::vocabulary::{autocomplete, AutocompleteOutcome};
use lessdrf::validation::ORGANISM_COLUMN;
use lessdrf::{SdrfConfig, VocabularyStore};

pub fn run(
    config: &SdrfConfig,
    vocabularies: PathBuf,
    column: &str,
    query: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = VocabularyStore::load_dir(&vocabularies)?;

    let organisms;
    let vocabulary = match store.for_column(column) {
        Some(vocabulary) => vocabulary,
        None if column == ORGANISM_COLUMN => {
            organisms = store
                .all_organisms()
                .ok_or("No organism vocabulary files found")?;
            &organisms
        }
        None => return Err(format!("No vocabulary for column '{}'", column).into()),
    };

    match autocomplete(vocabulary.iter(), query, config.autocomplete_limit) {
        AutocompleteOutcome::Matches { exact, matches } => {
            if let Some(exact) = &exact {
                println!("{} {}", "Exact:".green().bold(), exact);
            }
            for term in matches.iter().filter(|m| Some(*m) != exact.as_ref()) {
                println!("  {}", term);
            }
        }
        AutocompleteOutcome::TooMany { count } => {
            println!(
                "{} {} terms match '{}'; refine the query",
                "Too many:".yellow().bold(),
                count,
                query
            );
        }
        AutocompleteOutcome::NoMatch => {
            println!("{} '{}'", "No match for".red(), query);
        }
    }

    Ok(())
}

//! Example: Build the subclass tree of an ontology term.
//!
//! Usage:
//!   cargo run --example build_tree -- <ontology.json[.gz]|ontology.obo> <term id> <label>
//!
//! Example:
//!   cargo run --example build_tree -- data/efo.json.gz http://www.ebi.ac.uk/efo/EFO_0000408 disease

use std::env;
use std::path::Path;

use lessdrf::ontology::{BuildStats, GraphSource, TraversalRules};
use lessdrf::{OboOntology, OntologyGraphIndex, SubclassTree, SubclassTreeBuilder};

fn build(path: &Path, term_id: &str, label: &str) -> lessdrf::Result<(SubclassTree, BuildStats)> {
    if path.extension().is_some_and(|e| e == "obo") {
        let obo = OboOntology::load(path)?;
        SubclassTreeBuilder::new(&obo).build_with_stats(term_id, label)
    } else {
        let index = OntologyGraphIndex::load(path)?;
        let rules = TraversalRules::default();
        SubclassTreeBuilder::new(GraphSource::new(&index, &rules)).build_with_stats(term_id, label)
    }
}

fn main() -> lessdrf::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: cargo run --example build_tree -- <ontology> <term id> <label>");
        eprintln!("\nExample:");
        eprintln!(
            "  cargo run --example build_tree -- data/efo.json.gz http://www.ebi.ac.uk/efo/EFO_0000408 disease"
        );
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", args[1]);
        std::process::exit(1);
    }

    let (tree, stats) = build(path, &args[2], &args[3])?;

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Subclass tree: {} ({})", args[3], args[2]);
    println!("{}", separator);
    println!();

    println!("## Build");
    println!("  Terms placed: {}", tree.len());
    println!("  Relocated:    {}", stats.relocations);
    println!("  Refused:      {}", stats.refused);
    println!();

    println!("## First terms");
    for term in tree.flatten().iter().take(20) {
        println!("  {}", term);
    }
    println!();

    println!("## Nested");
    println!(
        "{}",
        serde_json::to_string_pretty(&tree.to_nested_json()).unwrap_or_default()
    );

    Ok(())
}

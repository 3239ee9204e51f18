//! Check command - validate a table against the permitted vocabularies.

use std::path::PathBuf;

use colored::Colorize;
use lessdrf::validation::{check_all, ColumnCheck};
use lessdrf::{VocabularyStore, WorkingTable};

pub fn run(
    file: PathBuf,
    vocabularies: PathBuf,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = WorkingTable::load(&file)?;
    let store = VocabularyStore::load_dir(&vocabularies)?;
    let check = check_all(&table, &store)?;

    if json_output {
        let report = serde_json::json!({
            "file": file.display().to_string(),
            "valid": check.is_valid(),
            "columns_to_clear": check.columns_to_clear(),
            "reports": check.reports,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Checking".cyan().bold(),
        file.display().to_string().white()
    );
    println!();

    for report in &check.reports {
        match &report.check {
            ColumnCheck::Unchecked => {
                if verbose {
                    println!("  {} {}", "-".dimmed(), report.column.dimmed());
                }
            }
            ColumnCheck::Terms(t) if t.valid => {
                println!("  {} {}", "✓".green(), report.column);
            }
            ColumnCheck::Age(a) if a.valid => {
                println!("  {} {}", "✓".green(), report.column);
            }
            ColumnCheck::Terms(t) => {
                println!("  {} {}", "✗".red(), report.column.red().bold());
                for term in &t.unmatched {
                    println!("      not permitted: {}", term.yellow());
                }
            }
            ColumnCheck::Age(a) => {
                println!("  {} {}", "✗".red(), report.column.red().bold());
                for age in &a.offending {
                    println!("      bad age: {}", age.yellow());
                }
            }
        }
    }
    println!();

    if check.is_valid() {
        println!("{}", "All checked columns are valid.".green().bold());
        Ok(())
    } else {
        println!(
            "{} {}",
            "Columns to clear:".yellow().bold(),
            check.columns_to_clear().join(", ")
        );
        Err("Table contains values outside the permitted vocabularies".into())
    }
}

//! New command - start a working table from a species template.

use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use lessdrf::table::split_file_names;
use lessdrf::{SdrfConfig, SpeciesTemplate, WorkingTable};

use super::output_writer;

pub fn run(
    config: &SdrfConfig,
    templates: PathBuf,
    species: &str,
    files: &str,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let species: SpeciesTemplate = species.parse()?;
    let names = split_file_names(files);
    if names.is_empty() {
        return Err("No raw file names given".into());
    }

    let mut table = WorkingTable::from_template(&templates, species)?;
    table.assign_data_files(&names, config.max_data_files)?;

    let mut writer = output_writer(output.as_deref())?;
    table.write_tsv(&mut writer)?;
    writer.flush()?;

    if let Some(path) = output {
        eprintln!(
            "{} {} table with {} rows and {} columns at {}",
            "Created".green().bold(),
            species.to_string().cyan(),
            table.row_count(),
            table.column_count(),
            path.display()
        );
    }

    Ok(())
}

//! Export command - write the final SDRF file.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use lessdrf::{OntologyRepository, SdrfConfig, Session, WorkingTable};

use super::output_writer;

pub fn run(
    config: &SdrfConfig,
    file: PathBuf,
    output: Option<PathBuf>,
    missing_value: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config.clone();
    if let Some(missing_value) = missing_value {
        config.export.missing_value = missing_value;
    }

    let table = WorkingTable::load(&file)?;
    let session = Session::new(Arc::new(OntologyRepository::new(&config)), table).with_config(config);

    let mut writer = output_writer(output.as_deref())?;
    session.export(&mut writer)?;
    writer.flush()?;

    if let Some(path) = output {
        eprintln!(
            "{} {} samples to {}",
            "Exported".green().bold(),
            session.table().row_count(),
            path.display()
        );
    }

    Ok(())
}

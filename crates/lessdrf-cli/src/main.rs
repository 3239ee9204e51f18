//! lessdrf CLI - ontology trees, vocabulary checks and SDRF export.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use lessdrf::SdrfConfig;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match cli.config.as_deref().map(SdrfConfig::from_file).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Tree {
            ontology,
            term,
            label,
            obo,
            format,
            output,
        } => commands::tree::run(&config, ontology, &term, &label, obo, format, output),

        Commands::New {
            templates,
            species,
            files,
            output,
        } => commands::new::run(&config, templates, &species, &files, output),

        Commands::Check {
            file,
            vocabularies,
            json,
        } => commands::check::run(file, vocabularies, json, cli.verbose),

        Commands::Search {
            vocabularies,
            column,
            query,
        } => commands::search::run(&config, vocabularies, &column, &query),

        Commands::Export {
            file,
            output,
            missing_value,
        } => commands::export::run(&config, file, output, missing_value),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

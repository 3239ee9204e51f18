//! CLI command implementations.

pub mod check;
pub mod export;
pub mod new;
pub mod search;
pub mod tree;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Buffered writer to `path`, or stdout when no path is given.
pub(crate) fn output_writer(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

//! Gzip-at-rest helpers for ontology graphs and vocabulary data files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::error::{Result, SdrfError};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Whether a byte buffer starts with the gzip magic number.
pub fn is_gzipped(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[..2] == GZIP_MAGIC
}

/// Raw file contents together with their SHA-256 fingerprint.
pub(crate) struct LoadedFile {
    pub contents: Vec<u8>,
    pub fingerprint: String,
}

/// Read a file fully, decompressing it when it is gzipped.
///
/// The fingerprint is computed over the bytes as stored on disk.
pub(crate) fn read_file(path: &Path) -> Result<LoadedFile> {
    let mut raw = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut raw))
        .map_err(|e| SdrfError::io(path, e))?;

    let mut hasher = Sha256::new();
    hasher.update(&raw);
    let fingerprint = format!("sha256:{:x}", hasher.finalize());

    let contents = if is_gzipped(&raw) {
        let mut decoded = Vec::with_capacity(raw.len() * 4);
        GzDecoder::new(raw.as_slice())
            .read_to_end(&mut decoded)
            .map_err(|e| SdrfError::io(path, e))?;
        decoded
    } else {
        raw
    };

    Ok(LoadedFile {
        contents,
        fingerprint,
    })
}

/// Store a value as gzipped JSON.
pub fn write_gzipped_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| SdrfError::io(path, e))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, value)?;
    encoder
        .finish()
        .and_then(|mut w| w.flush())
        .map_err(|e| SdrfError::io(path, e))?;
    tracing::debug!(path = %path.display(), "stored gzipped json");
    Ok(())
}

/// Open a gzipped JSON file and deserialize its contents.
pub fn read_gzipped_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SdrfError::io(path, e))?;
    let decoder = GzDecoder::new(BufReader::new(file));
    Ok(serde_json::from_reader(BufReader::new(decoder))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_gzipped_json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("all_organism_part_elements.json.gz");
        let terms = vec!["liver".to_string(), "heart".to_string()];

        write_gzipped_json(&path, &terms).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(is_gzipped(&bytes));

        let back: Vec<String> = read_gzipped_json(&path).unwrap();
        assert_eq!(back, terms);
    }

    #[test]
    fn test_read_file_plain_and_gzipped_match() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("graph.json");
        let packed = dir.path().join("graph.json.gz");
        std::fs::write(&plain, br#"{"graphs":[]}"#).unwrap();
        write_gzipped_json(&packed, &serde_json::json!({"graphs": []})).unwrap();

        let a = read_file(&plain).unwrap();
        let b = read_file(&packed).unwrap();
        assert_eq!(a.contents, b.contents);
        assert_ne!(a.fingerprint, b.fingerprint);
        assert!(a.fingerprint.starts_with("sha256:"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_gzipped_json::<Vec<String>>("/nonexistent/terms.json.gz").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/terms.json.gz"));
    }
}

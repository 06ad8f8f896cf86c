//! Input discovery and parsing.

use std::fs;
use std::path::{Path, PathBuf};

use geoload_core_common::{Dataset, JsonValue};
use log::debug;

use crate::error::{FormatError, IoError, Result};

/// File extension of input files. Matched case-sensitively.
pub const INPUT_EXTENSION: &str = "geojson";

/// Lists the `*.geojson` files directly inside `dir`, sorted by path.
///
/// # Errors
///
/// Returns [`IoError::DirectoryNotFound`] if `dir` is not a directory, or
/// [`IoError::ReadDir`] if it cannot be listed.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IoError::DirectoryNotFound {
            path: dir.to_path_buf(),
        }
        .into());
    }

    let read_dir_error = |source| IoError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == INPUT_EXTENSION) {
            inputs.push(path);
        }
    }
    inputs.sort();
    debug!("Found {} input file(s) in {}", inputs.len(), dir.display());
    Ok(inputs)
}

/// Name of the dataset stored at `path`: the file name without extension.
#[must_use]
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reads and parses one input file.
///
/// # Errors
///
/// Returns [`IoError::Read`] if the file cannot be read, or
/// [`FormatError::Parse`] if it is not valid JSON.
pub fn read_dataset(path: &Path) -> Result<Dataset> {
    let text = fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: JsonValue = serde_json::from_str(&text).map_err(|e| FormatError::Parse {
        path: path.to_path_buf(),
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;

    let dataset = Dataset::from_json(dataset_name(path), &document);
    debug!("Parsed {} feature(s) from {}", dataset.len(), path.display());
    Ok(dataset)
}

//! Read traces from a JSON file or a directory of JSON files.

use super::parser::parse_traces_str;
use super::TraceReader;
use crate::model::Trace;
use crate::utils::error::InputError;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads Jaeger JSON exports from disk
///
/// A directory is scanned non-recursively for `*.json` files, in path order.
#[derive(Debug, Clone)]
pub struct JsonFileReader {
    path: PathBuf,
}

impl JsonFileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_directory(&self, dir: &Path) -> Result<Vec<Trace>, InputError> {
        info!("Reading trace files from directory: {}", dir.display());

        let entries = fs::read_dir(dir).map_err(|source| InputError::ReadFailed {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| InputError::ReadFailed {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && has_json_extension(&path) {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            warn!("No JSON files found in directory: {}", dir.display());
        }

        let mut traces = Vec::new();
        for file in &files {
            traces.extend(read_trace_file(file)?);
        }
        Ok(traces)
    }
}

impl TraceReader for JsonFileReader {
    fn read_traces(&self) -> Result<Vec<Trace>, InputError> {
        if self.path.is_file() {
            read_trace_file(&self.path)
        } else if self.path.is_dir() {
            self.read_directory(&self.path)
        } else {
            Err(InputError::NotFound(self.path.clone()))
        }
    }
}

/// Read every trace in one file; `source_name` defaults to the file stem
///
/// # Errors
/// * `InputError::ReadFailed` - the file cannot be read
/// * `InputError::ParseFailed` - the payload is not valid trace JSON
pub fn read_trace_file(path: &Path) -> Result<Vec<Trace>, InputError> {
    info!("Reading trace file: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|source| InputError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let mut traces = parse_traces_str(&contents).map_err(|source| InputError::ParseFailed {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        for trace in traces.iter_mut().filter(|t| t.source_name.is_none()) {
            trace.source_name = Some(stem.to_string());
        }
    }

    info!("Loaded {} trace(s) from {}", traces.len(), path.display());
    Ok(traces)
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_json_extension() {
        assert!(has_json_extension(Path::new("a/trace.json")));
        assert!(has_json_extension(Path::new("TRACE.JSON")));
        assert!(!has_json_extension(Path::new("trace.json.bak")));
        assert!(!has_json_extension(Path::new("trace")));
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let reader = JsonFileReader::new("/definitely/not/here.json");
        assert!(matches!(reader.read_traces(), Err(InputError::NotFound(_))));
    }
}

//! PlantUML source writer.

use crate::diagram::Diagram;
use crate::normalize::sanitize_identifier;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write a diagram to `<output_dir>/<name>.puml`
///
/// **Public** - main entry point for diagram output
///
/// Characters outside `[A-Za-z0-9_]` in the name are replaced so the file
/// name is portable.
///
/// # Returns
/// Path of the written file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - directory cannot be created or target is a directory
pub fn write_diagram(
    diagram: &Diagram,
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf, OutputError> {
    let path = output_dir
        .as_ref()
        .join(format!("{}.puml", sanitize_identifier(&diagram.name)));

    super::validate_path(&path)?;
    super::ensure_parent_dir(&path)?;

    let file = File::create(&path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(diagram.source.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Saved {} diagram: {} ({} bytes)",
        diagram.diagram_type,
        path.display(),
        super::file_size(&path)
    );
    Ok(path)
}

/// Write several diagrams into the same directory
pub fn write_diagrams(
    diagrams: &[Diagram],
    output_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, OutputError> {
    let output_dir = output_dir.as_ref();
    diagrams
        .iter()
        .map(|d| write_diagram(d, output_dir))
        .collect()
}

//! Reading the scenario and writing generated files.

use std::path::{Path, PathBuf};

use crate::error::{Result, TestgenError};
use crate::models::GeneratedTest;

/// Reads the scenario file, rejecting missing or blank input.
pub fn read_scenario(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(TestgenError::InputNotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Err(TestgenError::EmptyInput);
    }
    Ok(text)
}

/// Writes `test` into `output_dir`, creating the directory and overwriting an existing file.
///
/// Returns the written path.
pub fn write_test_file(output_dir: &Path, test: &GeneratedTest) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(&test.filename);

    let mut content = test.content.clone();
    if !content.ends_with('\n') {
        content.push('\n');
    }
    std::fs::write(&path, content)?;

    tracing::debug!("Wrote {} ({} bytes)", path.display(), test.content.len());
    Ok(path)
}

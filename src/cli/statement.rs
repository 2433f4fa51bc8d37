//! Statement file commands

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{VaultError, VaultResult};
use crate::ofx::{combine_files, validate};

/// Check one statement file; an issue is returned as an error
pub fn validate_statement(file: &Path) -> VaultResult<()> {
    let text = fs::read_to_string(file)
        .map_err(|e| VaultError::Io(format!("Failed to read {}: {}", file.display(), e)))?;

    match validate(&text) {
        None => {
            println!("{}: OK", file.display());
            Ok(())
        }
        Some(issue) => Err(issue.into()),
    }
}

/// Combine statement files into one new file in `out_dir`
pub fn combine_statements(files: &[PathBuf], out_dir: &Path) -> VaultResult<()> {
    let path = combine_files(files, out_dir)?;
    println!("Combined statement written to {}", path.display());
    Ok(())
}

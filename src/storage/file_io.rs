//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::LedgerError;

/// Read a file as text, returning `None` if it doesn't exist
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<Option<String>, LedgerError> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    fs::read_to_string(path)
        .map(Some)
        .map_err(|e| LedgerError::Storage(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write bytes to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all, so a crash
/// mid-write never leaves a truncated collection behind.
pub fn write_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<(), LedgerError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| LedgerError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents)
        .map_err(|e| LedgerError::Storage(format!("Failed to write data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| LedgerError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| LedgerError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LedgerError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Serialize `data` as pretty JSON and write it atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let bytes = serde_json::to_vec_pretty(data)
        .map_err(|e| LedgerError::Storage(format!("Failed to serialize data: {}", e)))?;
    write_atomic(path, &bytes)
}

/// Remove a file, treating a missing file as success
pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> Result<(), LedgerError> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LedgerError::Storage(format!(
            "Failed to remove {}: {}",
            path.display(),
            e
        ))),
    }
}

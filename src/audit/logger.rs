//! Append-only audit log
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{LedgerError, LedgerResult};

use super::entry::AuditEntry;

/// Writes audit entries to a JSONL file
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    /// Create a logger that appends to `log_path`
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry
    pub fn log(&self, entry: &AuditEntry) -> LedgerResult<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| LedgerError::Io(format!("Failed to create audit directory: {}", e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| LedgerError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| LedgerError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .map_err(|e| LedgerError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    ///
    /// Lines that don't parse (e.g. a torn final write) are skipped.
    pub fn read_all(&self) -> LedgerResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                LedgerError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(
                    line = line_num + 1,
                    error = %e,
                    "skipping unreadable audit entry"
                ),
            }
        }

        Ok(entries)
    }

    /// Read the most recent `count` entries
    pub fn read_recent(&self, count: usize) -> LedgerResult<Vec<AuditEntry>> {
        let mut all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries.split_off(start))
    }

    /// Number of entries in the log
    pub fn entry_count(&self) -> LedgerResult<usize> {
        Ok(self.read_all()?.len())
    }

    /// Get the path to the audit log file
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("logs").join("audit.log"));
        (logger, temp_dir)
    }

    fn group_entry(id: usize) -> AuditEntry {
        AuditEntry::create(
            EntityType::Group,
            format!("g{}", id),
            Some(format!("Trip {}", id)),
            &json!({"name": format!("Trip {}", id), "members": []}),
        )
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        logger.log(&group_entry(1)).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Group);
    }

    #[test]
    fn test_read_recent() {
        let (logger, _temp) = create_test_logger();
        for i in 0..10 {
            logger.log(&group_entry(i)).unwrap();
        }

        assert_eq!(logger.entry_count().unwrap(), 10);
        let recent = logger.read_recent(3).unwrap();
        let ids: Vec<_> = recent.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["g7", "g8", "g9"]);
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();
        assert_eq!(logger.entry_count().unwrap(), 0);
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_torn_line_is_skipped() {
        let (logger, _temp) = create_test_logger();
        logger.log(&group_entry(1)).unwrap();

        let mut file = OpenOptions::new().append(true).open(logger.path()).unwrap();
        write!(file, "{{\"timestamp\": ").unwrap();

        assert_eq!(logger.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_survives_restart() {
        let (logger, _temp) = create_test_logger();
        logger.log(&group_entry(1)).unwrap();

        let reopened = AuditLogger::new(logger.path().clone());
        assert_eq!(reopened.read_all().unwrap().len(), 1);
    }
}

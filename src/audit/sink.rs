//! Log sinks for audit records
//!
//! A sink is where finished records go. `JsonlLogSink` appends each record as
//! one JSON line and flushes immediately; `MemoryLogSink` keeps records in a
//! shared buffer.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::SinkError;

use super::entry::AuditRecord;

/// Destination for audit records
pub trait LogSink: Send + Sync {
    fn append(&self, record: &AuditRecord) -> Result<(), SinkError>;
}

/// Shared on/off switch for activity logging
///
/// Clones share the same flag, so a host can keep one handle and flip
/// logging off for a bulk import while recorders built from it go quiet.
#[derive(Debug, Clone)]
pub struct LogStatus {
    enabled: Arc<AtomicBool>,
}

impl LogStatus {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

impl Default for LogStatus {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Appends records to a line-delimited JSON (JSONL) file
pub struct JsonlLogSink {
    /// Path to the log file
    log_path: PathBuf,
}

impl JsonlLogSink {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Read all records from the log file, oldest first
    pub fn read_all(&self) -> Result<Vec<AuditRecord>, SinkError> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| SinkError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                SinkError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let record: AuditRecord = serde_json::from_str(&line).map_err(|e| {
                SinkError::Serialization(format!(
                    "Failed to parse audit record at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            records.push(record);
        }

        Ok(records)
    }

    /// Read the most recent `count` records
    pub fn read_recent(&self, count: usize) -> Result<Vec<AuditRecord>, SinkError> {
        let all_records = self.read_all()?;
        let start = all_records.len().saturating_sub(count);
        Ok(all_records[start..].to_vec())
    }

    /// Number of non-empty lines in the log
    pub fn entry_count(&self) -> Result<usize, SinkError> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| SinkError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut count = 0;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                SinkError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if !line.trim().is_empty() {
                count += 1;
            }
        }

        Ok(count)
    }

    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

impl LogSink for JsonlLogSink {
    fn append(&self, record: &AuditRecord) -> Result<(), SinkError> {
        let json = serde_json::to_string(record).map_err(|e| {
            SinkError::Serialization(format!("Failed to serialize audit record: {}", e))
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| SinkError::Io(format!("Failed to open audit log: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| SinkError::Io(format!("Failed to write audit record: {}", e)))?;

        file.flush()
            .map_err(|e| SinkError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }
}

/// In-memory sink. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogSink {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far
    pub fn records(&self) -> Vec<AuditRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.records.lock() {
            Ok(records) => records.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemoryLogSink {
    fn append(&self, record: &AuditRecord) -> Result<(), SinkError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| SinkError::Unavailable("memory sink lock poisoned".into()))?;
        records.push(record.clone());
        Ok(())
    }
}

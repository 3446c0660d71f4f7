//! Audit record data structures
//!
//! Defines the unit handed to a log sink: which log it belongs to, what
//! happened, to which subject, and what changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::diff::ChangeSet;
use crate::models::{ModelEvent, ModelSnapshot};

/// Reference to the model a record is about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Type label of the model
    pub subject_type: String,

    /// Primary key of the model, when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<Value>,
}

impl Subject {
    pub fn of(model: &ModelSnapshot) -> Self {
        Self {
            subject_type: model.type_name.clone(),
            subject_id: model.key.clone(),
        }
    }
}

/// A single audit log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record ID
    pub id: Uuid,

    /// When the record was built (UTC)
    pub timestamp: DateTime<Utc>,

    /// Logical log channel
    pub log_name: String,

    /// Lifecycle event that produced the record
    pub event: ModelEvent,

    /// Human-readable summary, e.g. "Invoice Item Created by Jane"
    pub description: String,

    pub subject: Subject,

    /// Changed attributes; absent when nothing loggable changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ChangeSet>,
}

impl AuditRecord {
    pub fn new(
        log_name: impl Into<String>,
        event: ModelEvent,
        description: impl Into<String>,
        subject: Subject,
        properties: Option<ChangeSet>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            log_name: log_name.into(),
            event,
            description: description.into(),
            subject,
            properties,
        }
    }

    /// Format the record for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.log_name,
            self.event,
            self.description
        );

        if let Some(id) = &self.subject.subject_id {
            let id = match id {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            output.push_str(&format!(" ({} #{})", self.subject.subject_type, id));
        }

        if let Some(changes) = &self.properties {
            output.push_str(&format!("\n  Changes: {}", changes.summary()));
        }

        output
    }
}

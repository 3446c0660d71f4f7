//! Record CLI command
//!
//! Reads a JSON event document and records it through the audit recorder.
//!
//! ```json
//! {
//!   "model": {
//!     "type_name": "invoice",
//!     "key": 42,
//!     "original": {"status": "pending"},
//!     "changes": {"status": "paid"}
//!   },
//!   "actor": {"user": {"id": "7", "name": "Jane Doe"}}
//! }
//! ```
//!
//! `actor` may be omitted (no session) or a `{"generic": {"id": ...}}`
//! placeholder. `description` replaces the generated description and keeps
//! the per-event rules. `attributes` replaces the candidate set as well.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::audit::{AuditRecord, AuditRecorder};
use crate::auth::StaticAuthContext;
use crate::error::{AuditError, AuditResult};
use crate::models::{candidate_from_value, ModelEvent, ModelSnapshot, Principal};

/// Arguments for `record`
#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Lifecycle event: created, updated or deleted
    pub event: ModelEvent,

    /// Read the event document from a file instead of stdin
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Write to this log instead of the configured one
    #[arg(short, long)]
    pub log: Option<String>,
}

/// A model event as handed over by the host application
#[derive(Debug, Deserialize)]
pub struct EventDocument {
    pub model: ModelSnapshot,
    #[serde(default)]
    pub actor: Option<Principal>,
    #[serde(default)]
    pub description: Option<String>,
    /// Explicit candidate attributes; anything but an object logs no diff
    #[serde(default)]
    pub attributes: Option<Value>,
}

impl EventDocument {
    pub fn parse(input: &str) -> AuditResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| AuditError::Input(format!("Invalid event document: {}", e)))
    }
}

/// Handle the record command
pub fn handle_record_command(recorder: &AuditRecorder, args: RecordArgs) -> AuditResult<()> {
    let input = match &args.file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            AuditError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let document = EventDocument::parse(&input)?;
    let recorder = match args.log {
        Some(name) => recorder.using_log(name),
        None => recorder.clone(),
    };

    match record_document(&recorder, args.event, &document)? {
        Some(record) => println!("{}", record.format_human_readable()),
        None => println!("Nothing recorded."),
    }

    Ok(())
}

/// Record a parsed event document
pub fn record_document(
    recorder: &AuditRecorder,
    event: ModelEvent,
    document: &EventDocument,
) -> AuditResult<Option<AuditRecord>> {
    let auth = StaticAuthContext::new(document.actor.clone());

    let Some(attributes) = document.attributes.as_ref() else {
        return recorder.handle_described(
            event,
            &auth,
            &document.model,
            document.description.as_deref(),
        );
    };

    let candidate = candidate_from_value(attributes);
    if candidate.is_none() {
        debug!("Candidate attributes are not an object; logging without a diff");
    }

    recorder.emit(
        &auth,
        &document.model,
        event,
        document.description.as_deref(),
        candidate,
    )
}

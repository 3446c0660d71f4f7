//! Audit logging for model lifecycle events
//!
//! Turns create, update and delete events on models into audit records with
//! before/after attribute diffs.
//!
//! # Architecture
//!
//! - `AuditRecorder`: entry points for each lifecycle event; builds the
//!   description ("Invoice Item Created by Jane Doe") and the diff.
//! - `loggable_attributes` / `diff_against`: compute which visible,
//!   non-hidden, non-timestamp fields actually changed.
//! - `AuditRecord`: the unit handed to a sink.
//! - `LogSink`: where records go. `JsonlLogSink` writes a line-delimited
//!   JSON file, `MemoryLogSink` keeps them in memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use model_audit::audit::{AuditRecorder, JsonlLogSink};
//! use model_audit::auth::StaticAuthContext;
//! use model_audit::models::ModelSnapshot;
//!
//! let recorder = AuditRecorder::new("Model", Arc::new(JsonlLogSink::new(log_path)));
//!
//! let model = ModelSnapshot::new("invoice_item")
//!     .with_key(1)
//!     .with_attributes(attributes);
//! recorder.on_created(&StaticAuthContext::guest(), &model)?;
//! ```

mod diff;
mod entry;
mod headline;
mod recorder;
mod sink;

pub use diff::{
    diff_against, loggable_attributes, ChangeSet, DiffPolicy, REMEMBER_TOKEN, TIMESTAMP_FIELDS,
};
pub use entry::{AuditRecord, Subject};
pub use headline::headline;
pub use recorder::AuditRecorder;
pub use sink::{JsonlLogSink, LogSink, LogStatus, MemoryLogSink};

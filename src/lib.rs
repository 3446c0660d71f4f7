//! model-audit - audit logging for model lifecycle events
//!
//! Hooks into an ORM's create/update/delete events and writes human-readable
//! activity records ("Invoice Item Created by Jane Doe") with before/after
//! attribute diffs. Storage of records and authentication are left to
//! collaborators behind small traits.
//!
//! # Architecture
//!
//! - `models`: model snapshots, lifecycle events and principals
//! - `auth`: authentication context and display-name resolution
//! - `audit`: the recorder, the diff algorithm, records and sinks
//! - `config`: path resolution and user settings
//! - `cli`: command handlers for the `model-audit` binary
//! - `error`: error types
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use model_audit::audit::{AuditRecorder, MemoryLogSink};
//! use model_audit::auth::StaticAuthContext;
//! use model_audit::models::{ModelSnapshot, UserIdentity};
//!
//! let sink = MemoryLogSink::new();
//! let recorder = AuditRecorder::new("Model", Arc::new(sink.clone()));
//! let auth = StaticAuthContext::authenticated(UserIdentity::new("7").with_name("Jane"));
//!
//! recorder.on_updated(&auth, &invoice)?;
//! ```

pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;

pub use audit::{AuditRecord, AuditRecorder};
pub use error::{AuditError, AuditResult};

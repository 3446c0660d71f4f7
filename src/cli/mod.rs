//! CLI command handlers
//!
//! Bridges clap argument parsing with the audit recorder and log sink.

pub mod record;
pub mod show;

pub use record::{handle_record_command, RecordArgs};
pub use show::{handle_show_command, ShowArgs};

//! Show CLI command
//!
//! Prints the most recent records from the JSONL audit log.

use clap::Args;

use crate::audit::JsonlLogSink;
use crate::error::{AuditError, AuditResult};

/// Arguments for `show`
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Number of records to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,

    /// Only show records from this log
    #[arg(short, long)]
    pub log: Option<String>,

    /// Print raw JSON lines
    #[arg(long)]
    pub json: bool,
}

/// Handle the show command
pub fn handle_show_command(sink: &JsonlLogSink, args: ShowArgs) -> AuditResult<()> {
    if args.limit == 0 {
        return Err(AuditError::Input("--limit must be at least 1".into()));
    }

    let mut records = sink.read_all()?;

    if let Some(log) = &args.log {
        records.retain(|r| &r.log_name == log);
    }

    let start = records.len().saturating_sub(args.limit);
    let records = &records[start..];

    if records.is_empty() {
        println!("No audit records found.");
        return Ok(());
    }

    for record in records {
        if args.json {
            println!("{}", serde_json::to_string(record)?);
        } else {
            println!("{}", record.format_human_readable());
        }
    }

    Ok(())
}

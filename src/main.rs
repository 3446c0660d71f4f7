use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use model_audit::audit::{AuditRecorder, JsonlLogSink};
use model_audit::cli::{handle_record_command, handle_show_command, RecordArgs, ShowArgs};
use model_audit::config::{AuditPaths, Settings};

#[derive(Parser)]
#[command(
    name = "model-audit",
    version,
    about = "Audit log for model create, update and delete events",
    long_about = "model-audit records model lifecycle events as human-readable \
                  activity entries with before/after attribute diffs, and lets \
                  you inspect the resulting log."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a model event read from a JSON document
    Record(RecordArgs),

    /// Show recent audit records
    #[command(alias = "log")]
    Show(ShowArgs),

    /// Write default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = AuditPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Record(args)) => {
            paths.ensure_directories()?;
            let sink = JsonlLogSink::new(paths.audit_log());
            let recorder = AuditRecorder::from_settings(&settings, Arc::new(sink));
            handle_record_command(&recorder, args)?;
        }
        Some(Commands::Show(args)) => {
            let sink = JsonlLogSink::new(paths.audit_log());
            handle_show_command(&sink, args)?;
        }
        Some(Commands::Init) => {
            settings.save(&paths)?;
            println!("Initialized model-audit at: {}", paths.base_dir().display());
        }
        Some(Commands::Config) => {
            println!("model-audit Configuration");
            println!("=========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Log name:              {}", settings.log_name);
            println!("  Logging enabled:       {}", settings.enabled);
            println!("  Excluded fields:       {}", settings.excluded_fields.join(", "));
            println!(
                "  Ignored update fields: {}",
                settings.ignored_update_fields.join(", ")
            );
        }
        None => {
            println!("model-audit - audit log for model lifecycle events");
            println!();
            println!("Run 'model-audit --help' for usage information.");
        }
    }

    Ok(())
}

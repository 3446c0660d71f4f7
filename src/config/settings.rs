//! User settings for model-audit
//!
//! Controls the default log name, whether logging starts enabled, and which
//! fields the diff ignores.

use serde::{Deserialize, Serialize};

use super::paths::AuditPaths;
use crate::audit::{DiffPolicy, LogStatus, REMEMBER_TOKEN, TIMESTAMP_FIELDS};
use crate::error::AuditError;

/// User settings for model-audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Log channel records are written to
    #[serde(default = "default_log_name")]
    pub log_name: String,

    /// Whether activity logging starts enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Fields never included in a diff
    #[serde(default = "default_excluded_fields")]
    pub excluded_fields: Vec<String>,

    /// Updates that only change one of these fields are not logged
    #[serde(default = "default_ignored_update_fields")]
    pub ignored_update_fields: Vec<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_log_name() -> String {
    "Model".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_excluded_fields() -> Vec<String> {
    TIMESTAMP_FIELDS.iter().map(|f| f.to_string()).collect()
}

fn default_ignored_update_fields() -> Vec<String> {
    vec![REMEMBER_TOKEN.to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            log_name: default_log_name(),
            enabled: default_enabled(),
            excluded_fields: default_excluded_fields(),
            ignored_update_fields: default_ignored_update_fields(),
        }
    }
}

impl Settings {
    pub fn diff_policy(&self) -> DiffPolicy {
        DiffPolicy {
            excluded_fields: self.excluded_fields.clone(),
            ignored_update_fields: self.ignored_update_fields.clone(),
        }
    }

    /// A fresh log status handle reflecting `enabled`
    pub fn log_status(&self) -> LogStatus {
        LogStatus::new(self.enabled)
    }

    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &AuditPaths) -> Result<Self, AuditError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                AuditError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                AuditError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AuditPaths) -> Result<(), AuditError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            AuditError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            AuditError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

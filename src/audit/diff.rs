//! Attribute diffs for audit records
//!
//! Works out which of a model's candidate attributes actually changed,
//! after applying the model's visible/hidden lists and dropping housekeeping
//! timestamp fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Attributes, ModelSnapshot};

/// Fields that never show up in a diff
pub const TIMESTAMP_FIELDS: [&str; 3] = ["created_at", "updated_at", "deleted_at"];

/// Updates touching only this field are not logged
pub const REMEMBER_TOKEN: &str = "remember_token";

/// Field-level rules applied while diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPolicy {
    /// Dropped from every diff regardless of visibility
    pub excluded_fields: Vec<String>,
    /// An update whose only change is one of these fields is suppressed
    pub ignored_update_fields: Vec<String>,
}

impl Default for DiffPolicy {
    fn default() -> Self {
        Self {
            excluded_fields: TIMESTAMP_FIELDS.iter().map(|f| f.to_string()).collect(),
            ignored_update_fields: vec![REMEMBER_TOKEN.to_string()],
        }
    }
}

impl DiffPolicy {
    /// True when a change set consists of exactly one ignorable field
    pub fn suppresses_update(&self, changes: &Attributes) -> bool {
        changes.len() == 1
            && changes
                .keys()
                .all(|key| self.ignored_update_fields.iter().any(|f| f == key))
    }

    fn is_excluded(&self, key: &str) -> bool {
        self.excluded_fields.iter().any(|f| f == key)
    }
}

/// New and old values of the fields that changed
///
/// Both maps always carry the same keys. An `old` value of `null` for a key
/// with no original value means the field did not exist before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub attributes: Attributes,
    pub old: Attributes,
}

impl ChangeSet {
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// One-line summary, e.g. `status: "pending" -> "paid"`
    pub fn summary(&self) -> String {
        self.attributes
            .iter()
            .map(|(key, new)| {
                let old = self.old.get(key).unwrap_or(&Value::Null);
                format!("{}: {} -> {}", key, format_value(old), format_value(new))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Compute the loggable diff of `candidate` against `original`
///
/// Returns `None` when there is no candidate mapping or when no surviving
/// field differs from its original value. Values are compared strictly, so
/// `1` and `"1"` differ, and a key missing from `original` differs from any
/// value including `null`.
pub fn diff_against(
    model: &ModelSnapshot,
    candidate: Option<&Attributes>,
    original: &Attributes,
    policy: &DiffPolicy,
) -> Option<ChangeSet> {
    let candidate = candidate?;

    let mut attributes = Attributes::new();
    let mut old = Attributes::new();

    for (key, value) in candidate {
        if !model.visible.is_empty() && !model.visible.contains(key) {
            continue;
        }
        if model.hidden.contains(key) {
            continue;
        }
        if policy.is_excluded(key) {
            continue;
        }

        let previous = original.get(key);
        if previous != Some(value) {
            attributes.insert(key.clone(), value.clone());
            old.insert(key.clone(), previous.cloned().unwrap_or(Value::Null));
        }
    }

    if attributes.is_empty() {
        None
    } else {
        Some(ChangeSet { attributes, old })
    }
}

/// Compute the loggable diff of `candidate` against the model's original values
pub fn loggable_attributes(
    model: &ModelSnapshot,
    candidate: Option<&Attributes>,
    policy: &DiffPolicy,
) -> Option<ChangeSet> {
    diff_against(model, candidate, &model.original, policy)
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            // Truncate long strings
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

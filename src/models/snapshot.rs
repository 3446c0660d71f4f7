//! Model snapshots
//!
//! A `ModelSnapshot` is what the ORM hands over when a lifecycle event fires:
//! the current attributes, the values as they were loaded, the fields the
//! last save changed, and the model's serialization allow/deny lists.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute name to value mapping, in insertion order
pub type Attributes = Map<String, Value>;

/// Lifecycle events the recorder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelEvent {
    Created,
    Updated,
    Deleted,
}

impl ModelEvent {
    /// Label used in descriptions and stored records
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelEvent::Created => "Created",
            ModelEvent::Updated => "Updated",
            ModelEvent::Deleted => "Deleted",
        }
    }
}

impl std::fmt::Display for ModelEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "created" | "create" => Ok(ModelEvent::Created),
            "updated" | "update" => Ok(ModelEvent::Updated),
            "deleted" | "delete" => Ok(ModelEvent::Deleted),
            other => Err(format!("unknown model event: {}", other)),
        }
    }
}

/// The affected domain object at the time of an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// Type label supplied by the caller (e.g. `invoice_item`, `BlogPost`)
    pub type_name: String,

    /// Primary key, used to correlate the record with its subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,

    /// Current attribute values
    #[serde(default)]
    pub attributes: Attributes,

    /// Values as they were before the pending change
    #[serde(default)]
    pub original: Attributes,

    /// Fields the ORM reports as changed by the last save
    #[serde(default)]
    pub changes: Attributes,

    /// Allow-list of serializable fields; empty means no restriction
    #[serde(default)]
    pub visible: Vec<String>,

    /// Deny-list of serializable fields
    #[serde(default)]
    pub hidden: Vec<String>,
}

impl ModelSnapshot {
    /// Create an empty snapshot of the given type
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<Value>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_original(mut self, original: Attributes) -> Self {
        self.original = original;
        self
    }

    pub fn with_changes(mut self, changes: Attributes) -> Self {
        self.changes = changes;
        self
    }

    pub fn with_visible<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visible = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hidden<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// Narrow an arbitrary JSON value to a candidate attribute mapping
///
/// Anything other than an object (null, scalars, arrays) yields `None`,
/// which the diff treats as "nothing to log".
pub fn candidate_from_value(value: &Value) -> Option<&Attributes> {
    value.as_object()
}

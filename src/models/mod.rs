//! Core data models
//!
//! Snapshots of audited models and the identities that act on them.

pub mod principal;
pub mod snapshot;

pub use principal::{ActorIdentity, Principal, UserIdentity};
pub use snapshot::{candidate_from_value, Attributes, ModelEvent, ModelSnapshot};

//! Principals and actor identities

use serde::{Deserialize, Serialize};

/// A fully resolved domain user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Whoever the authentication layer says is logged in
///
/// A `Generic` principal passes authentication but is not backed by a domain
/// user (e.g. a placeholder built from a token or basic-auth header).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Principal {
    Generic { id: String },
    User(UserIdentity),
}

impl Principal {
    pub fn generic(id: impl Into<String>) -> Self {
        Principal::Generic { id: id.into() }
    }

    /// True when the principal is a full domain user
    pub fn is_full_user(&self) -> bool {
        matches!(self, Principal::User(_))
    }

    pub fn id(&self) -> &str {
        match self {
            Principal::Generic { id } => id,
            Principal::User(user) => &user.id,
        }
    }
}

impl From<UserIdentity> for Principal {
    fn from(user: UserIdentity) -> Self {
        Principal::User(user)
    }
}

/// Who performed an action, as shown in descriptions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorIdentity {
    Anonymous,
    Named(String),
}

impl std::fmt::Display for ActorIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorIdentity::Anonymous => write!(f, "Anonymous"),
            ActorIdentity::Named(name) => write!(f, "{}", name),
        }
    }
}

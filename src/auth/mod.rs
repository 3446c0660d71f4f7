//! Authentication collaborators
//!
//! The recorder never looks up session state on its own. Callers pass an
//! [`AuthContext`] into every entry point, and the host application supplies a
//! [`UserDisplayResolver`] once, when the recorder is built.

use crate::error::AuthError;
use crate::models::Principal;

/// Access to the request's authentication state
pub trait AuthContext {
    /// The currently authenticated principal, if any
    fn current_user(&self) -> Result<Option<Principal>, AuthError>;

    /// Whether the principal is a real domain user rather than a placeholder
    fn is_authenticated_full_user(&self, principal: &Principal) -> bool {
        principal.is_full_user()
    }
}

/// Turns a principal into the name shown in descriptions
pub trait UserDisplayResolver: Send + Sync {
    fn display_name(&self, principal: &Principal) -> String;
}

/// Resolves users by name, then email, then id
#[derive(Debug, Clone, Copy, Default)]
pub struct NameResolver;

impl UserDisplayResolver for NameResolver {
    fn display_name(&self, principal: &Principal) -> String {
        match principal {
            Principal::User(user) => user
                .name
                .as_deref()
                .or(user.email.as_deref())
                .unwrap_or(&user.id)
                .to_string(),
            Principal::Generic { id } => id.clone(),
        }
    }
}

/// An authentication context with a fixed principal
///
/// Useful for background jobs, command-line tools and tests, where there is
/// no session to consult.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthContext {
    principal: Option<Principal>,
}

impl StaticAuthContext {
    /// A context with nobody logged in
    pub fn guest() -> Self {
        Self { principal: None }
    }

    pub fn new(principal: Option<Principal>) -> Self {
        Self { principal }
    }

    pub fn authenticated(principal: impl Into<Principal>) -> Self {
        Self {
            principal: Some(principal.into()),
        }
    }
}

impl AuthContext for StaticAuthContext {
    fn current_user(&self) -> Result<Option<Principal>, AuthError> {
        Ok(self.principal.clone())
    }
}

use serde::{Deserialize, Serialize};

/// Opaque user/session information handed to the access layer.
///
/// The role is carried as the raw claim string; interpreting it against the
/// closed role set is the domain's job, so unknown claims survive intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    display_name: String,
    email: Option<String>,
    role_claim: String,
}

impl UserIdentity {
    /// Creates a user identity from session data.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        display_name: impl Into<String>,
        email: Option<String>,
        role_claim: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            email,
            role_claim: role_claim.into(),
        }
    }

    /// Returns the stable subject claim from the identity provider.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the raw role claim attached to the session.
    #[must_use]
    pub fn role_claim(&self) -> &str {
        self.role_claim.as_str()
    }
}

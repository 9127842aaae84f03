use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scope::Scope;
use crate::subject::{Subject, SubjectKind};

/// Credential source that produced an [`AuthSubject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    None,
    Cookie,
    CustomerSessionToken,
    #[serde(rename = "oauth2_access_token")]
    OAuth2AccessToken,
    PersonalAccessToken,
    OrganizationAccessToken,
}

impl AuthMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Cookie => "cookie",
            Self::CustomerSessionToken => "customer_session_token",
            Self::OAuth2AccessToken => "oauth2_access_token",
            Self::PersonalAccessToken => "personal_access_token",
            Self::OrganizationAccessToken => "organization_access_token",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of authentication for one request: the subject, the scopes it
/// holds and the credential source that vouched for it.
///
/// An anonymous `AuthSubject` always has no scopes and [`AuthMethod::None`];
/// the constructors enforce this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSubject {
    subject: Subject,
    scopes: BTreeSet<Scope>,
    auth_method: AuthMethod,
}

impl AuthSubject {
    /// The subject of a request that presented no credential.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            subject: Subject::Anonymous,
            scopes: BTreeSet::new(),
            auth_method: AuthMethod::None,
        }
    }

    /// Build an authenticated subject.
    ///
    /// Passing [`Subject::Anonymous`] yields [`AuthSubject::anonymous`] and
    /// discards `scopes` and `auth_method`.
    #[must_use]
    pub fn new(subject: Subject, scopes: BTreeSet<Scope>, auth_method: AuthMethod) -> Self {
        if subject.is_anonymous() {
            return Self::anonymous();
        }
        Self {
            subject,
            scopes,
            auth_method,
        }
    }

    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    #[must_use]
    pub fn kind(&self) -> SubjectKind {
        self.subject.kind()
    }

    #[must_use]
    pub fn scopes(&self) -> &BTreeSet<Scope> {
        &self.scopes
    }

    #[must_use]
    pub fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.subject.is_anonymous()
    }

    /// Whether the subject holds at least one of `required`.
    #[must_use]
    pub fn has_any_scope(&self, required: &BTreeSet<Scope>) -> bool {
        !self.scopes.is_disjoint(required)
    }
}

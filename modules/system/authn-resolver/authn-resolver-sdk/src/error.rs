//! Error types for the `AuthN` resolver.

use std::collections::BTreeSet;

use authgate_security::{Scope, SubjectKindSet, scope_string};
use thiserror::Error;

/// Infrastructure failures raised by credential probes.
///
/// A probe that merely fails to recognise a credential reports it through
/// [`crate::CredentialResult`]; these variants are for when the lookup itself
/// could not run.
#[derive(Debug, Error)]
pub enum AuthNResolverError {
    /// The credential store could not be reached.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Why a request was refused.
///
/// The first four variants are client errors and are never retried. `Backend`
/// carries a probe failure through unchanged.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential was presented and the endpoint does not accept anonymous
    /// callers.
    #[error("authentication required")]
    Unauthorized,

    /// A credential was presented but is unusable, or it resolves to a kind of
    /// subject the endpoint does not accept. In the latter case
    /// `allowed_subjects` lists what the endpoint does accept.
    #[error("{}", invalid_credential_message(.allowed_subjects))]
    InvalidCredential {
        allowed_subjects: Option<SubjectKindSet>,
    },

    /// The subject is authenticated but its account is blocked.
    #[error("not permitted")]
    NotPermitted,

    /// The subject holds none of the scopes the endpoint requires.
    #[error("insufficient scope: requires one of '{}'", scope_string(.required_scopes))]
    InsufficientScope { required_scopes: BTreeSet<Scope> },

    /// A credential probe could not run.
    #[error(transparent)]
    Backend(#[from] AuthNResolverError),
}

impl AuthError {
    /// The presented credential did not resolve to an identity.
    #[must_use]
    pub fn invalid_credential() -> Self {
        Self::InvalidCredential {
            allowed_subjects: None,
        }
    }

    /// The credential resolved to a subject kind outside `allowed`.
    #[must_use]
    pub fn subject_not_allowed(allowed: SubjectKindSet) -> Self {
        Self::InvalidCredential {
            allowed_subjects: Some(allowed),
        }
    }

    #[must_use]
    pub fn insufficient_scope(required_scopes: BTreeSet<Scope>) -> Self {
        Self::InsufficientScope { required_scopes }
    }
}

#[allow(clippy::ref_option)]
fn invalid_credential_message(allowed_subjects: &Option<SubjectKindSet>) -> String {
    match allowed_subjects {
        Some(allowed) => format!(
            "the subject of this credential is not valid for this endpoint (allowed: {allowed})"
        ),
        None => "the credential is invalid, expired or revoked".to_owned(),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use authgate_security::SubjectKind;

    use super::*;

    #[test]
    fn invalid_credential_message_names_allowed_kinds() {
        let err = AuthError::subject_not_allowed(SubjectKindSet::of(&[
            SubjectKind::Organization,
            SubjectKind::User,
        ]));
        assert_eq!(
            err.to_string(),
            "the subject of this credential is not valid for this endpoint (allowed: User Organization)"
        );
        assert_eq!(
            AuthError::invalid_credential().to_string(),
            "the credential is invalid, expired or revoked"
        );
    }

    #[test]
    fn insufficient_scope_message_lists_required_scopes() {
        let err = AuthError::insufficient_scope(BTreeSet::from([
            Scope::ProductsWrite,
            Scope::BenefitsWrite,
        ]));
        assert_eq!(
            err.to_string(),
            "insufficient scope: requires one of 'benefits:write products:write'"
        );
    }

    #[test]
    fn backend_error_is_transparent() {
        let err: AuthError = AuthNResolverError::ServiceUnavailable("db down".to_owned()).into();
        assert_eq!(err.to_string(), "service unavailable: db down");
    }
}

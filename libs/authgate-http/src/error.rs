//! Mapping authentication failures to HTTP responses.

use authgate_security::scope_string;
use authn_resolver_sdk::{AuthError, AuthNResolverError};
use axum::response::{IntoResponse, Response};
use http::header::WWW_AUTHENTICATE;
use http::{HeaderValue, StatusCode};

use crate::problem::Problem;

/// An [`AuthError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct AuthRejection(pub AuthError);

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl AuthRejection {
    /// Status code this rejection maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AuthError::Unauthorized | AuthError::InvalidCredential { .. } => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::NotPermitted | AuthError::InsufficientScope { .. } => StatusCode::FORBIDDEN,
            AuthError::Backend(AuthNResolverError::ServiceUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AuthError::Backend(AuthNResolverError::Internal(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// `WWW-Authenticate` challenge per RFC 6750, if any.
    #[must_use]
    pub fn challenge(&self) -> Option<String> {
        match &self.0 {
            AuthError::Unauthorized => Some("Bearer".to_owned()),
            AuthError::InvalidCredential { .. } => {
                Some(r#"Bearer error="invalid_token""#.to_owned())
            }
            AuthError::InsufficientScope { required_scopes } => Some(format!(
                r#"Bearer error="insufficient_scope", scope="{}""#,
                scope_string(required_scopes)
            )),
            AuthError::NotPermitted | AuthError::Backend(_) => None,
        }
    }

    fn problem(&self) -> Problem {
        let status = self.status();
        let title = status.canonical_reason().unwrap_or("Error");
        let detail = match &self.0 {
            AuthError::Backend(AuthNResolverError::ServiceUnavailable(_)) => {
                "Authentication service unavailable".to_owned()
            }
            AuthError::Backend(AuthNResolverError::Internal(_)) => {
                "Internal authentication error".to_owned()
            }
            other => other.to_string(),
        };
        Problem::new(status, title, detail)
    }
}

/// Log authentication failures at appropriate levels.
///
/// Cognitive complexity is inflated by tracing macro expansion.
#[allow(clippy::cognitive_complexity)]
fn log_auth_error(err: &AuthError) {
    match err {
        AuthError::Backend(AuthNResolverError::ServiceUnavailable(msg)) => {
            tracing::error!("AuthN service unavailable: {msg}");
        }
        AuthError::Backend(AuthNResolverError::Internal(msg)) => {
            tracing::error!("AuthN internal error: {msg}");
        }
        other => tracing::debug!("AuthN rejected: {other}"),
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        log_auth_error(&self.0);
        let challenge = self.challenge();
        let mut response = self.problem().into_response();
        if let Some(value) = challenge.and_then(|c| HeaderValue::from_str(&c).ok()) {
            response.headers_mut().insert(WWW_AUTHENTICATE, value);
        }
        response
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::BTreeSet;

    use authgate_security::{Scope, SubjectKind, SubjectKindSet};

    use super::*;

    fn response(err: AuthError) -> Response {
        AuthRejection(err).into_response()
    }

    fn challenge(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
    }

    #[test]
    fn unauthorized_is_401_with_bare_challenge() {
        let resp = response(AuthError::Unauthorized);
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(challenge(&resp), Some("Bearer"));
    }

    #[test]
    fn invalid_credential_is_401_invalid_token() {
        let resp = response(AuthError::subject_not_allowed(SubjectKindSet::of(&[
            SubjectKind::User,
        ])));
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(challenge(&resp), Some(r#"Bearer error="invalid_token""#));
    }

    #[test]
    fn not_permitted_is_403_without_challenge() {
        let resp = response(AuthError::NotPermitted);
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(challenge(&resp), None);
    }

    #[test]
    fn insufficient_scope_lists_required_scopes() {
        let resp = response(AuthError::insufficient_scope(BTreeSet::from([
            Scope::OrdersRead,
            Scope::CheckoutsRead,
        ])));
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            challenge(&resp),
            Some(r#"Bearer error="insufficient_scope", scope="checkouts:read orders:read""#)
        );
    }

    #[test]
    fn backend_failures_hide_details() {
        let rejection = AuthRejection(AuthError::Backend(AuthNResolverError::Internal(
            "db password wrong".to_owned(),
        )));
        assert_eq!(rejection.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!rejection.problem().detail.contains("password"));

        let rejection = AuthRejection(AuthError::Backend(
            AuthNResolverError::ServiceUnavailable("timeout".to_owned()),
        ));
        assert_eq!(rejection.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(rejection.challenge(), None);
    }
}

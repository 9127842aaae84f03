//! Extractor for the authenticated subject.

use authgate_security::AuthSubject;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::problem::Problem;

/// The `AuthSubject` resolved by [`EndpointAuthLayer`](crate::EndpointAuthLayer).
#[derive(Debug, Clone)]
pub struct AuthSubjectExt(pub AuthSubject);

/// The route was not wrapped in an [`EndpointAuthLayer`](crate::EndpointAuthLayer).
#[derive(Debug, Clone, Copy)]
pub struct MissingAuthSubject;

impl IntoResponse for MissingAuthSubject {
    fn into_response(self) -> Response {
        tracing::error!("AuthSubject not found - endpoint auth layer not configured");
        Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "Authentication is not configured for this endpoint",
        )
        .into_response()
    }
}

impl<S> FromRequestParts<S> for AuthSubjectExt
where
    S: Send + Sync,
{
    type Rejection = MissingAuthSubject;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthSubject>()
            .cloned()
            .map(AuthSubjectExt)
            .ok_or(MissingAuthSubject)
    }
}

//! Tower middleware that authenticates requests for one endpoint.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use authn_resolver_sdk::{CredentialRequest, EndpointAuthenticator};
use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::error::AuthRejection;

/// Layer that authenticates every request against an endpoint's policy.
///
/// On success the resolved `AuthSubject` is stored in the request extensions
/// for [`AuthSubjectExt`](crate::AuthSubjectExt); on failure the request is
/// answered with a problem response and never reaches the handler.
///
/// # Example
/// ```ignore
/// let orders = authn.endpoint(EndpointAuthPolicy::new([SubjectKind::User], [Scope::OrdersRead]));
/// router = router.route("/orders", get(list_orders).route_layer(EndpointAuthLayer::new(orders)));
/// ```
#[derive(Clone)]
pub struct EndpointAuthLayer {
    auth: Arc<dyn EndpointAuthenticator>,
}

impl EndpointAuthLayer {
    #[must_use]
    pub fn new(auth: impl EndpointAuthenticator + 'static) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }

    #[must_use]
    pub fn from_arc(auth: Arc<dyn EndpointAuthenticator>) -> Self {
        Self { auth }
    }

    /// The authenticator this layer enforces, for documentation.
    #[must_use]
    pub fn authenticator(&self) -> &dyn EndpointAuthenticator {
        self.auth.as_ref()
    }
}

impl<S> Layer<S> for EndpointAuthLayer {
    type Service = EndpointAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        EndpointAuthService {
            inner,
            auth: self.auth.clone(),
        }
    }
}

/// Service that authenticates requests before handing them on.
#[derive(Clone)]
pub struct EndpointAuthService<S> {
    inner: S,
    auth: Arc<dyn EndpointAuthenticator>,
}

impl<S> Service<Request<Body>> for EndpointAuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let auth = self.auth.clone();
        let not_ready_inner = self.inner.clone();
        let mut ready_inner = std::mem::replace(&mut self.inner, not_ready_inner);

        Box::pin(async move {
            if is_preflight_request(request.method(), request.headers()) {
                return ready_inner.call(request).await;
            }

            let outcome = auth
                .authenticate(&CredentialRequest::new(request.headers()))
                .await;

            match outcome {
                Ok(subject) => {
                    request.extensions_mut().insert(subject);
                    ready_inner.call(request).await
                }
                Err(err) => Ok(AuthRejection(err).into_response()),
            }
        })
    }
}

/// Check if this is a CORS preflight request
///
/// Preflight requests are OPTIONS requests with:
/// - Origin header present
/// - Access-Control-Request-Method header present
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(axum::http::header::ORIGIN)
        && headers.contains_key(axum::http::header::ACCESS_CONTROL_REQUEST_METHOD)
}

// Layer behavior is covered in tests/endpoint_layer.rs against a full Router.

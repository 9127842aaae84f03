//! Public API trait consumed by the HTTP layer.

use async_trait::async_trait;
use authgate_security::{AuthSubject, EndpointAuthPolicy, Scope};

use crate::error::AuthError;
use crate::models::{CredentialRequest, CredentialSource};

/// Authentication bound to a single endpoint.
///
/// One value is built per endpoint at startup and shared by every request
/// to it:
///
/// ```ignore
/// let auth = factory.endpoint(EndpointAuthPolicy::new([SubjectKind::User], [Scope::OrdersRead]));
/// let subject = auth.authenticate(&CredentialRequest::new(req.headers())).await?;
/// ```
#[async_trait]
pub trait EndpointAuthenticator: Send + Sync {
    /// Resolve the request's subject and check it against the endpoint
    /// policy.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if nothing was presented and anonymous access is off
    /// - `InvalidCredential` if a credential is unusable or of the wrong kind
    /// - `NotPermitted` if the subject is blocked
    /// - `InsufficientScope` if none of the required scopes is granted
    /// - `Backend` if a credential probe failed
    async fn authenticate(&self, request: &CredentialRequest<'_>)
    -> Result<AuthSubject, AuthError>;

    /// The policy this endpoint enforces.
    fn policy(&self) -> &EndpointAuthPolicy;

    /// Credential sources consulted for this endpoint, in priority order.
    fn credential_sources(&self) -> &[CredentialSource];

    /// Required scopes minus reserved ones, sorted. For documentation.
    fn documented_scopes(&self) -> &[Scope];
}

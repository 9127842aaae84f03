//! Binding endpoint policies to authorizers and resolvers.

use std::sync::Arc;

use async_trait::async_trait;
use authgate_security::{AuthSubject, EndpointAuthPolicy, Scope, SubjectKind};
use authn_resolver_sdk::{
    AuthError, CredentialRequest, CredentialSource, EndpointAuthenticator, SubjectReporter,
};

use super::authorizer::Authorizer;
use super::registry::{SubjectFactoryRegistry, SubjectResolver};

/// Builds per-endpoint authorizers.
///
/// Authorizers are cheap and built fresh on every call. The resolvers paired
/// with them come from the shared [`SubjectFactoryRegistry`].
#[derive(Clone)]
pub struct AuthorizerFactory {
    registry: Arc<SubjectFactoryRegistry>,
    reporter: Arc<dyn SubjectReporter>,
}

impl AuthorizerFactory {
    #[must_use]
    pub fn new(registry: Arc<SubjectFactoryRegistry>, reporter: Arc<dyn SubjectReporter>) -> Self {
        Self { registry, reporter }
    }

    /// Authorizer for an endpoint accepting `allowed_subject_kinds` and
    /// requiring at least one of `required_scopes`, together with the scopes
    /// to advertise in API documentation.
    #[must_use]
    pub fn build(
        &self,
        allowed_subject_kinds: impl IntoIterator<Item = SubjectKind>,
        required_scopes: impl IntoIterator<Item = Scope>,
    ) -> (Authorizer, Vec<Scope>) {
        self.build_for(EndpointAuthPolicy::new(
            allowed_subject_kinds,
            required_scopes,
        ))
    }

    /// Same as [`Self::build`], for an existing policy value.
    #[must_use]
    pub fn build_for(&self, policy: EndpointAuthPolicy) -> (Authorizer, Vec<Scope>) {
        let documented = policy.documented_scopes();
        let authorizer = Authorizer::new(Arc::new(policy), Arc::clone(&self.reporter));
        (authorizer, documented)
    }

    /// Everything an HTTP route needs to authenticate requests under
    /// `policy`.
    #[must_use]
    pub fn endpoint(&self, policy: EndpointAuthPolicy) -> EndpointAuth {
        let resolver = self
            .registry
            .get_resolver(policy.allowed_subject_kinds());
        let (authorizer, documented_scopes) = self.build_for(policy);
        EndpointAuth {
            resolver,
            authorizer,
            documented_scopes,
        }
    }
}

/// A resolver and an authorizer bound to one endpoint.
#[derive(Clone)]
pub struct EndpointAuth {
    resolver: Arc<SubjectResolver>,
    authorizer: Authorizer,
    documented_scopes: Vec<Scope>,
}

impl EndpointAuth {
    #[must_use]
    pub fn resolver(&self) -> &Arc<SubjectResolver> {
        &self.resolver
    }

    #[must_use]
    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }
}

#[async_trait]
impl EndpointAuthenticator for EndpointAuth {
    async fn authenticate(
        &self,
        request: &CredentialRequest<'_>,
    ) -> Result<AuthSubject, AuthError> {
        let subject = self.resolver.resolve(request).await?;
        self.authorizer.authorize(subject)
    }

    fn policy(&self) -> &EndpointAuthPolicy {
        self.authorizer.policy()
    }

    fn credential_sources(&self) -> &[CredentialSource] {
        self.resolver.credential_sources()
    }

    fn documented_scopes(&self) -> &[Scope] {
        &self.documented_scopes
    }
}

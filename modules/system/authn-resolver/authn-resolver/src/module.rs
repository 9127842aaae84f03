//! `AuthN` resolver module.

use std::sync::Arc;

use authgate_security::EndpointAuthPolicy;
use authn_resolver_sdk::SubjectReporter;
use tracing::info;

use crate::config::AuthNResolverConfig;
use crate::domain::{
    AuthorizerFactory, EndpointAuth, NoopSubjectReporter, Probes, SubjectFactoryRegistry,
    TracingSubjectReporter,
};

/// `AuthN` Resolver module.
///
/// Owns the resolver registry and the authorizer factory. Build it once at
/// startup, then ask it for an [`EndpointAuth`] per route:
///
/// ```ignore
/// let authn = AuthNResolver::new(&cfg, Probes::from_plugin(&plugin));
/// let orders = authn.endpoint(EndpointAuthPolicy::new([SubjectKind::User], [Scope::OrdersRead]));
/// ```
pub struct AuthNResolver {
    registry: Arc<SubjectFactoryRegistry>,
    factory: AuthorizerFactory,
}

impl AuthNResolver {
    /// Module wired with the default tracing reporter.
    #[must_use]
    pub fn new(cfg: &AuthNResolverConfig, probes: Probes) -> Self {
        Self::with_reporter(cfg, probes, Arc::new(TracingSubjectReporter))
    }

    #[tracing::instrument(skip_all, fields(report_subjects = cfg.report_subjects))]
    #[must_use]
    pub fn with_reporter(
        cfg: &AuthNResolverConfig,
        probes: Probes,
        reporter: Arc<dyn SubjectReporter>,
    ) -> Self {
        let reporter: Arc<dyn SubjectReporter> = if cfg.report_subjects {
            reporter
        } else {
            Arc::new(NoopSubjectReporter)
        };

        let registry = Arc::new(SubjectFactoryRegistry::new(probes));
        let factory = AuthorizerFactory::new(Arc::clone(&registry), reporter);
        info!("Initialized authn_resolver");

        Self { registry, factory }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<SubjectFactoryRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn factory(&self) -> &AuthorizerFactory {
        &self.factory
    }

    /// Shorthand for [`AuthorizerFactory::endpoint`].
    #[must_use]
    pub fn endpoint(&self, policy: EndpointAuthPolicy) -> EndpointAuth {
        self.factory.endpoint(policy)
    }
}

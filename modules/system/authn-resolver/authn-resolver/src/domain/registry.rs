//! Per-endpoint subject resolvers, memoized by the set of accepted subject
//! kinds.

use std::sync::Arc;

use authgate_security::{AuthSubject, SubjectKind, SubjectKindSet};
use authn_resolver_sdk::{
    AuthError, AuthNResolverError, CredentialProbe, CredentialRequest, CredentialResult,
    CredentialSource,
};
use dashmap::DashMap;
use tracing::debug;

use super::probes::Probes;
use super::resolver::{ProbeResults, resolve_subject};

/// Credential sources worth probing when an endpoint accepts `kinds`, in
/// priority order.
///
/// Anonymous needs no probe. Every other kind pulls in the sources that can
/// yield it.
#[must_use]
pub fn credential_sources_for(kinds: SubjectKindSet) -> Vec<CredentialSource> {
    let user = kinds.contains(SubjectKind::User);
    let organization = kinds.contains(SubjectKind::Organization);
    let customer = kinds.contains(SubjectKind::Customer);

    CredentialSource::PRIORITY
        .into_iter()
        .filter(|source| match source {
            CredentialSource::CustomerSession => customer,
            CredentialSource::WebSession | CredentialSource::PersonalAccessToken => user,
            CredentialSource::OAuth2Token => user || organization,
            CredentialSource::OrganizationAccessToken => organization,
        })
        .collect()
}

/// Resolves the subject of a request for endpoints accepting one particular
/// set of subject kinds.
///
/// Only the probes returned by [`credential_sources_for`] are ever invoked.
pub struct SubjectResolver {
    allowed: SubjectKindSet,
    sources: Vec<CredentialSource>,
    probes: Arc<Probes>,
}

impl SubjectResolver {
    fn new(allowed: SubjectKindSet, probes: Arc<Probes>) -> Self {
        Self {
            allowed,
            sources: credential_sources_for(allowed),
            probes,
        }
    }

    /// Subject kinds this resolver was built for.
    #[must_use]
    pub fn allowed_subject_kinds(&self) -> SubjectKindSet {
        self.allowed
    }

    /// Sources this resolver probes, in priority order.
    #[must_use]
    pub fn credential_sources(&self) -> &[CredentialSource] {
        &self.sources
    }

    fn selects(&self, source: CredentialSource) -> bool {
        self.sources.contains(&source)
    }

    /// Run the selected probes concurrently and merge what they found.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredential`] if credential material was
    /// presented but nothing resolved, and [`AuthError::Backend`] if any probe
    /// could not run.
    #[tracing::instrument(skip_all, fields(allowed = %self.allowed))]
    pub async fn resolve(&self, request: &CredentialRequest<'_>) -> Result<AuthSubject, AuthError> {
        let probes = &self.probes;
        let (
            customer_session,
            web_session,
            oauth2_token,
            personal_access_token,
            organization_access_token,
        ) = tokio::try_join!(
            run(
                self.selects(CredentialSource::CustomerSession),
                probes.customer_session.as_ref(),
                request,
            ),
            run(
                self.selects(CredentialSource::WebSession),
                probes.web_session.as_ref(),
                request,
            ),
            run(
                self.selects(CredentialSource::OAuth2Token),
                probes.oauth2_token.as_ref(),
                request,
            ),
            run(
                self.selects(CredentialSource::PersonalAccessToken),
                probes.personal_access_token.as_ref(),
                request,
            ),
            run(
                self.selects(CredentialSource::OrganizationAccessToken),
                probes.organization_access_token.as_ref(),
                request,
            ),
        )?;

        resolve_subject(ProbeResults {
            customer_session,
            web_session,
            oauth2_token,
            personal_access_token,
            organization_access_token,
        })
    }
}

async fn run<C>(
    selected: bool,
    probe: &dyn CredentialProbe<C>,
    request: &CredentialRequest<'_>,
) -> Result<CredentialResult<C>, AuthNResolverError> {
    if !selected {
        return Ok(CredentialResult::absent());
    }
    probe.probe(request).await
}

/// Hands out one shared [`SubjectResolver`] per distinct set of accepted
/// subject kinds.
pub struct SubjectFactoryRegistry {
    probes: Arc<Probes>,
    cache: DashMap<SubjectKindSet, Arc<SubjectResolver>>,
}

impl SubjectFactoryRegistry {
    #[must_use]
    pub fn new(probes: Probes) -> Self {
        Self {
            probes: Arc::new(probes),
            cache: DashMap::new(),
        }
    }

    /// Resolver for endpoints accepting `allowed`.
    ///
    /// Repeated calls with an equal set return the same `Arc`.
    #[must_use]
    pub fn get_resolver(&self, allowed: SubjectKindSet) -> Arc<SubjectResolver> {
        if let Some(resolver) = self.cache.get(&allowed) {
            return Arc::clone(resolver.value());
        }

        let entry = self.cache.entry(allowed).or_insert_with(|| {
            debug!(%allowed, "building subject resolver");
            Arc::new(SubjectResolver::new(allowed, Arc::clone(&self.probes)))
        });
        Arc::clone(entry.value())
    }

    /// Number of distinct resolvers built so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

//! The set of credential probes available to the resolver.

use std::sync::Arc;

use async_trait::async_trait;
use authn_resolver_sdk::{
    AuthNResolverError, CredentialProbe, CredentialRequest, CredentialResult, CustomerSession,
    OAuth2Token, OrganizationAccessToken, PersonalAccessToken, UserSession,
};

/// One probe per credential source.
///
/// Sources without a configured probe never yield a credential.
pub struct Probes {
    pub(crate) customer_session: Arc<dyn CredentialProbe<CustomerSession>>,
    pub(crate) web_session: Arc<dyn CredentialProbe<UserSession>>,
    pub(crate) oauth2_token: Arc<dyn CredentialProbe<OAuth2Token>>,
    pub(crate) personal_access_token: Arc<dyn CredentialProbe<PersonalAccessToken>>,
    pub(crate) organization_access_token: Arc<dyn CredentialProbe<OrganizationAccessToken>>,
}

impl Probes {
    #[must_use]
    pub fn builder() -> ProbesBuilder {
        ProbesBuilder::default()
    }

    /// Use `plugin` for every credential source.
    #[must_use]
    pub fn from_plugin<P>(plugin: &Arc<P>) -> Self
    where
        P: CredentialProbe<CustomerSession>
            + CredentialProbe<UserSession>
            + CredentialProbe<OAuth2Token>
            + CredentialProbe<PersonalAccessToken>
            + CredentialProbe<OrganizationAccessToken>
            + 'static,
    {
        Self::builder()
            .customer_session(plugin.clone())
            .web_session(plugin.clone())
            .oauth2_token(plugin.clone())
            .personal_access_token(plugin.clone())
            .organization_access_token(plugin.clone())
            .build()
    }
}

#[derive(Default)]
pub struct ProbesBuilder {
    customer_session: Option<Arc<dyn CredentialProbe<CustomerSession>>>,
    web_session: Option<Arc<dyn CredentialProbe<UserSession>>>,
    oauth2_token: Option<Arc<dyn CredentialProbe<OAuth2Token>>>,
    personal_access_token: Option<Arc<dyn CredentialProbe<PersonalAccessToken>>>,
    organization_access_token: Option<Arc<dyn CredentialProbe<OrganizationAccessToken>>>,
}

impl ProbesBuilder {
    #[must_use]
    pub fn customer_session(mut self, probe: Arc<dyn CredentialProbe<CustomerSession>>) -> Self {
        self.customer_session = Some(probe);
        self
    }

    #[must_use]
    pub fn web_session(mut self, probe: Arc<dyn CredentialProbe<UserSession>>) -> Self {
        self.web_session = Some(probe);
        self
    }

    #[must_use]
    pub fn oauth2_token(mut self, probe: Arc<dyn CredentialProbe<OAuth2Token>>) -> Self {
        self.oauth2_token = Some(probe);
        self
    }

    #[must_use]
    pub fn personal_access_token(
        mut self,
        probe: Arc<dyn CredentialProbe<PersonalAccessToken>>,
    ) -> Self {
        self.personal_access_token = Some(probe);
        self
    }

    #[must_use]
    pub fn organization_access_token(
        mut self,
        probe: Arc<dyn CredentialProbe<OrganizationAccessToken>>,
    ) -> Self {
        self.organization_access_token = Some(probe);
        self
    }

    #[must_use]
    pub fn build(self) -> Probes {
        Probes {
            customer_session: self.customer_session.unwrap_or_else(|| Arc::new(NoCredential)),
            web_session: self.web_session.unwrap_or_else(|| Arc::new(NoCredential)),
            oauth2_token: self.oauth2_token.unwrap_or_else(|| Arc::new(NoCredential)),
            personal_access_token: self
                .personal_access_token
                .unwrap_or_else(|| Arc::new(NoCredential)),
            organization_access_token: self
                .organization_access_token
                .unwrap_or_else(|| Arc::new(NoCredential)),
        }
    }
}

/// Probe for a source nobody configured.
struct NoCredential;

#[async_trait]
impl<C: Send + 'static> CredentialProbe<C> for NoCredential {
    async fn probe(
        &self,
        _request: &CredentialRequest<'_>,
    ) -> Result<CredentialResult<C>, AuthNResolverError> {
        Ok(CredentialResult::absent())
    }
}

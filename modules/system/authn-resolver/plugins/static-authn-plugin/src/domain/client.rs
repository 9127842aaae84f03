//! Credential probes backed by the static service.
//!
//! The token prefix picks which table a bearer token is looked up in. Every
//! bearer probe reports an attempt whenever a bearer token is present, so a
//! token no table knows fails instead of falling back to anonymous.

use async_trait::async_trait;
use authn_resolver_sdk::{
    AuthNResolverError, CredentialProbe, CredentialRequest, CredentialResult, CustomerSession,
    OAuth2Token, OrganizationAccessToken, PersonalAccessToken, UserSession,
};
use tracing::debug;

use super::service::{Service, TokenKind};

impl Service {
    /// Looks the bearer token up when it carries `kind`'s prefix. Any other
    /// bearer token is a rejected attempt for this source.
    fn bearer_lookup<C>(
        &self,
        request: &CredentialRequest<'_>,
        kind: TokenKind,
        source: &'static str,
        lookup: impl FnOnce(&str) -> Option<C>,
    ) -> CredentialResult<C> {
        match request.bearer_token() {
            None => CredentialResult::absent(),
            Some(token) if self.token_kind(token) == Some(kind) => outcome(source, lookup(token)),
            Some(_) => CredentialResult::rejected(),
        }
    }
}

fn outcome<C>(source: &'static str, credential: Option<C>) -> CredentialResult<C> {
    if credential.is_none() {
        debug!(source, "unknown credential");
    }
    CredentialResult::looked_up(credential)
}

#[async_trait]
impl CredentialProbe<CustomerSession> for Service {
    // A customer session may also arrive as a cookie, which is read before
    // an unrelated bearer token counts as a failed attempt.
    async fn probe(
        &self,
        request: &CredentialRequest<'_>,
    ) -> Result<CredentialResult<CustomerSession>, AuthNResolverError> {
        let from_bearer = self.bearer_lookup(
            request,
            TokenKind::CustomerSession,
            "customer_session",
            |token| self.customer_session(token),
        );
        let prefixed_bearer = request
            .bearer_token()
            .is_some_and(|token| self.token_kind(token) == Some(TokenKind::CustomerSession));
        let cookie = request
            .cookie(self.customer_session_cookie())
            .filter(|_| !prefixed_bearer);
        Ok(cookie.map_or(from_bearer, |token| {
            outcome("customer_session", self.customer_session(token))
        }))
    }
}

#[async_trait]
impl CredentialProbe<UserSession> for Service {
    // Unknown cookies count as no cookie at all: browsers keep sending
    // expired session cookies.
    async fn probe(
        &self,
        request: &CredentialRequest<'_>,
    ) -> Result<CredentialResult<UserSession>, AuthNResolverError> {
        let session = request
            .cookie(self.web_session_cookie())
            .and_then(|token| self.web_session(token));
        Ok(session.map_or_else(CredentialResult::absent, CredentialResult::present))
    }
}

#[async_trait]
impl CredentialProbe<OAuth2Token> for Service {
    async fn probe(
        &self,
        request: &CredentialRequest<'_>,
    ) -> Result<CredentialResult<OAuth2Token>, AuthNResolverError> {
        Ok(self.bearer_lookup(request, TokenKind::OAuth2, "oauth2_token", |token| {
            self.oauth2_token(token)
        }))
    }
}

#[async_trait]
impl CredentialProbe<PersonalAccessToken> for Service {
    async fn probe(
        &self,
        request: &CredentialRequest<'_>,
    ) -> Result<CredentialResult<PersonalAccessToken>, AuthNResolverError> {
        Ok(self.bearer_lookup(
            request,
            TokenKind::PersonalAccessToken,
            "personal_access_token",
            |token| self.personal_access_token(token),
        ))
    }
}

#[async_trait]
impl CredentialProbe<OrganizationAccessToken> for Service {
    async fn probe(
        &self,
        request: &CredentialRequest<'_>,
    ) -> Result<CredentialResult<OrganizationAccessToken>, AuthNResolverError> {
        Ok(self.bearer_lookup(
            request,
            TokenKind::OrganizationAccessToken,
            "organization_access_token",
            |token| self.organization_access_token(token),
        ))
    }
}

//! Merging probe results into a single subject.

use std::collections::BTreeSet;

use authgate_security::{AuthMethod, AuthSubject, Scope, Subject};
use authn_resolver_sdk::{
    AuthError, CredentialResult, CredentialSource, CustomerSession, OAuth2Token,
    OrganizationAccessToken, PersonalAccessToken, UserSession,
};
use tracing::debug;

/// Everything the probes found on one request. Sources that were not probed
/// stay [`CredentialResult::absent`].
#[derive(Debug, Default)]
pub struct ProbeResults {
    pub customer_session: CredentialResult<CustomerSession>,
    pub web_session: CredentialResult<UserSession>,
    pub oauth2_token: CredentialResult<OAuth2Token>,
    pub personal_access_token: CredentialResult<PersonalAccessToken>,
    pub organization_access_token: CredentialResult<OrganizationAccessToken>,
}

impl ProbeResults {
    /// Sources for which the caller supplied credential material.
    #[must_use]
    pub fn attempted_sources(&self) -> Vec<CredentialSource> {
        [
            (
                CredentialSource::CustomerSession,
                self.customer_session.authorization_attempted,
            ),
            (
                CredentialSource::WebSession,
                self.web_session.authorization_attempted,
            ),
            (
                CredentialSource::OAuth2Token,
                self.oauth2_token.authorization_attempted,
            ),
            (
                CredentialSource::PersonalAccessToken,
                self.personal_access_token.authorization_attempted,
            ),
            (
                CredentialSource::OrganizationAccessToken,
                self.organization_access_token.authorization_attempted,
            ),
        ]
        .into_iter()
        .filter_map(|(source, attempted)| attempted.then_some(source))
        .collect()
    }
}

/// Pick the acting subject from probe results.
///
/// Sessions outrank bearer tokens; among them the order is customer portal
/// session, web session, OAuth2 token, personal access token, organization
/// access token. With no credential at all the caller is anonymous.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredential`] when nothing resolved but some
/// credential material was presented.
pub fn resolve_subject(results: ProbeResults) -> Result<AuthSubject, AuthError> {
    let attempted = results.attempted_sources();
    let ProbeResults {
        customer_session,
        web_session,
        oauth2_token,
        personal_access_token,
        organization_access_token,
    } = results;

    if let Some(session) = customer_session.credential {
        return Ok(AuthSubject::new(
            Subject::Customer(session.customer),
            BTreeSet::from([Scope::CustomerPortalWrite]),
            AuthMethod::CustomerSessionToken,
        ));
    }

    if let Some(session) = web_session.credential {
        return Ok(AuthSubject::new(
            Subject::User(session.user),
            BTreeSet::from([Scope::WebDefault]),
            AuthMethod::Cookie,
        ));
    }

    if let Some(token) = oauth2_token.credential {
        return Ok(AuthSubject::new(
            token.sub.into(),
            token.scopes,
            AuthMethod::OAuth2AccessToken,
        ));
    }

    if let Some(token) = personal_access_token.credential {
        return Ok(AuthSubject::new(
            Subject::User(token.user),
            token.scopes,
            AuthMethod::PersonalAccessToken,
        ));
    }

    if let Some(token) = organization_access_token.credential {
        return Ok(AuthSubject::new(
            Subject::Organization(token.organization),
            token.scopes,
            AuthMethod::OrganizationAccessToken,
        ));
    }

    if !attempted.is_empty() {
        debug!(sources = ?attempted, "credential presented but not resolved");
        return Err(AuthError::invalid_credential());
    }

    Ok(AuthSubject::anonymous())
}

//! Credential records returned by probes, and the request view they read.

use std::collections::BTreeSet;
use std::fmt;

use authgate_security::{Customer, Organization, Scope, Subject, User};
use http::HeaderMap;
use http::header::{AUTHORIZATION, COOKIE};
use http::request::Parts;

/// A web session established by signing in through the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub user: User,
}

/// A customer portal session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSession {
    pub customer: Customer,
}

/// Entity an OAuth2 access token was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSubject {
    User(User),
    Organization(Organization),
}

impl From<TokenSubject> for Subject {
    fn from(sub: TokenSubject) -> Self {
        match sub {
            TokenSubject::User(user) => Self::User(user),
            TokenSubject::Organization(org) => Self::Organization(org),
        }
    }
}

/// An OAuth2 access token issued to a third-party client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2Token {
    pub sub: TokenSubject,
    pub scopes: BTreeSet<Scope>,
}

/// A personal access token owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken {
    pub user: User,
    pub scopes: BTreeSet<Scope>,
}

/// An organization access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationAccessToken {
    pub organization: Organization,
    pub scopes: BTreeSet<Scope>,
}

/// What one probe found on a request.
///
/// `authorization_attempted` is `true` when the caller supplied credential
/// material for this source at all, even if it did not resolve. That is what
/// separates "sent a bad credential" from "sent nothing".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialResult<C> {
    pub credential: Option<C>,
    pub authorization_attempted: bool,
}

impl<C> CredentialResult<C> {
    /// No credential material for this source.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            credential: None,
            authorization_attempted: false,
        }
    }

    /// Credential material was present but did not resolve.
    #[must_use]
    pub fn rejected() -> Self {
        Self {
            credential: None,
            authorization_attempted: true,
        }
    }

    /// A valid credential.
    #[must_use]
    pub fn present(credential: C) -> Self {
        Self {
            credential: Some(credential),
            authorization_attempted: true,
        }
    }

    /// Shorthand for a lookup outcome: `None` becomes [`Self::rejected`].
    #[must_use]
    pub fn looked_up(credential: Option<C>) -> Self {
        credential.map_or_else(Self::rejected, Self::present)
    }
}

impl<C> Default for CredentialResult<C> {
    fn default() -> Self {
        Self::absent()
    }
}

/// The five places a credential can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CredentialSource {
    CustomerSession,
    WebSession,
    OAuth2Token,
    PersonalAccessToken,
    OrganizationAccessToken,
}

impl CredentialSource {
    /// Sources in resolution priority order.
    pub const PRIORITY: [Self; 5] = [
        Self::CustomerSession,
        Self::WebSession,
        Self::OAuth2Token,
        Self::PersonalAccessToken,
        Self::OrganizationAccessToken,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CustomerSession => "customer_session",
            Self::WebSession => "web_session",
            Self::OAuth2Token => "oauth2_token",
            Self::PersonalAccessToken => "personal_access_token",
            Self::OrganizationAccessToken => "organization_access_token",
        }
    }
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view over the parts of a request a probe may inspect.
#[derive(Debug, Clone, Copy)]
pub struct CredentialRequest<'a> {
    headers: &'a HeaderMap,
}

impl<'a> CredentialRequest<'a> {
    #[must_use]
    pub fn new(headers: &'a HeaderMap) -> Self {
        Self { headers }
    }

    #[must_use]
    pub fn from_parts(parts: &'a Parts) -> Self {
        Self::new(&parts.headers)
    }

    #[must_use]
    pub fn headers(&self) -> &'a HeaderMap {
        self.headers
    }

    /// Value of a header, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Token from an `Authorization: Bearer <token>` header. The scheme is
    /// matched case-insensitively; an empty token counts as absent.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&'a str> {
        let value = self.headers.get(AUTHORIZATION)?.to_str().ok()?;
        let (scheme, token) = value.split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        let token = token.trim();
        (!token.is_empty()).then_some(token)
    }

    /// Value of the named cookie across all `Cookie` headers.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&'a str> {
        self.headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.trim_matches('"'))
            .filter(|value| !value.is_empty())
    }
}

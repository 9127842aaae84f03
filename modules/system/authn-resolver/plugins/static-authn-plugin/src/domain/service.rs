//! Service implementation for the static `AuthN` resolver plugin.

use std::collections::{BTreeSet, HashMap};

use anyhow::{Context, bail};
use authgate_security::{Customer, Organization, Scope, User, parse_scope_string};
use authn_resolver_sdk::{
    CustomerSession, OAuth2Token, OrganizationAccessToken, PersonalAccessToken, TokenSubject,
    UserSession,
};

use crate::config::{
    AuthNMode, OrganizationConfig, StaticAuthNPluginConfig, TokenMapping, TokenOwner,
    TokenPrefixes, UserConfig,
};

/// Kind of bearer token, decided by its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    CustomerSession,
    OAuth2,
    PersonalAccessToken,
    OrganizationAccessToken,
}

/// Static `AuthN` resolver service.
///
/// Answers credential lookups from tables built once from configuration.
pub struct Service {
    mode: AuthNMode,
    web_session_cookie: String,
    customer_session_cookie: String,
    prefixes: TokenPrefixes,
    default_user: User,
    default_scopes: BTreeSet<Scope>,
    web_sessions: HashMap<String, User>,
    customer_sessions: HashMap<String, Customer>,
    oauth2_tokens: HashMap<String, OAuth2Token>,
    personal_access_tokens: HashMap<String, PersonalAccessToken>,
    organization_access_tokens: HashMap<String, OrganizationAccessToken>,
}

impl Service {
    /// Create a service from plugin configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a session or token refers to an unknown subject, a
    /// token's prefix matches no token kind, its owner does not fit its kind,
    /// or its scopes are unknown or reserved.
    pub fn from_config(cfg: &StaticAuthNPluginConfig) -> anyhow::Result<Self> {
        let users: HashMap<_, _> = cfg.users.iter().map(|u| (u.id, user(u))).collect();
        let organizations: HashMap<_, _> = cfg
            .organizations
            .iter()
            .map(|o| (o.id, organization(o)))
            .collect();
        let customers: HashMap<_, _> = cfg
            .customers
            .iter()
            .map(|c| {
                let customer = Customer {
                    id: c.id,
                    email: c.email.clone(),
                    organization_id: c.organization_id,
                };
                (c.id, customer)
            })
            .collect();

        let mut web_sessions = HashMap::new();
        for session in &cfg.web_sessions {
            let user = users.get(&session.subject_id).with_context(|| {
                format!("web session refers to unknown user {}", session.subject_id)
            })?;
            web_sessions.insert(session.token.clone(), user.clone());
        }

        let mut customer_sessions = HashMap::new();
        for session in &cfg.customer_sessions {
            let customer = customers.get(&session.subject_id).with_context(|| {
                format!(
                    "customer session refers to unknown customer {}",
                    session.subject_id
                )
            })?;
            customer_sessions.insert(session.token.clone(), customer.clone());
        }

        let mut service = Self {
            mode: cfg.mode,
            web_session_cookie: cfg.web_session_cookie.clone(),
            customer_session_cookie: cfg.customer_session_cookie.clone(),
            prefixes: cfg.token_prefixes.clone(),
            default_user: user(&cfg.default_user),
            default_scopes: token_scopes(&cfg.default_scopes).context("invalid default_scopes")?,
            web_sessions,
            customer_sessions,
            oauth2_tokens: HashMap::new(),
            personal_access_tokens: HashMap::new(),
            organization_access_tokens: HashMap::new(),
        };

        for mapping in &cfg.tokens {
            service
                .add_token(mapping, &users, &organizations)
                .with_context(|| format!("invalid token mapping '{}'", mapping.token))?;
        }

        Ok(service)
    }

    fn add_token(
        &mut self,
        mapping: &TokenMapping,
        users: &HashMap<uuid::Uuid, User>,
        organizations: &HashMap<uuid::Uuid, Organization>,
    ) -> anyhow::Result<()> {
        let scopes = token_scopes(&mapping.scopes)?;
        let owner = match mapping.owner {
            TokenOwner::User(id) => TokenSubject::User(
                users
                    .get(&id)
                    .cloned()
                    .with_context(|| format!("unknown user {id}"))?,
            ),
            TokenOwner::Organization(id) => TokenSubject::Organization(
                organizations
                    .get(&id)
                    .cloned()
                    .with_context(|| format!("unknown organization {id}"))?,
            ),
        };
        let token = mapping.token.clone();

        match (self.token_kind(&mapping.token), owner) {
            (Some(TokenKind::OAuth2), sub) => {
                self.oauth2_tokens.insert(token, OAuth2Token { sub, scopes });
            }
            (Some(TokenKind::PersonalAccessToken), TokenSubject::User(user)) => {
                self.personal_access_tokens
                    .insert(token, PersonalAccessToken { user, scopes });
            }
            (
                Some(TokenKind::OrganizationAccessToken),
                TokenSubject::Organization(organization),
            ) => {
                self.organization_access_tokens.insert(
                    token,
                    OrganizationAccessToken {
                        organization,
                        scopes,
                    },
                );
            }
            (Some(TokenKind::PersonalAccessToken), TokenSubject::Organization(_)) => {
                bail!("personal access tokens must be owned by a user")
            }
            (Some(TokenKind::OrganizationAccessToken), TokenSubject::User(_)) => {
                bail!("organization access tokens must be owned by an organization")
            }
            (Some(TokenKind::CustomerSession), _) => {
                bail!("customer session tokens belong in customer_sessions")
            }
            (None, _) => bail!("token matches no configured prefix"),
        }
        Ok(())
    }

    #[must_use]
    pub fn mode(&self) -> AuthNMode {
        self.mode
    }

    #[must_use]
    pub fn web_session_cookie(&self) -> &str {
        &self.web_session_cookie
    }

    #[must_use]
    pub fn customer_session_cookie(&self) -> &str {
        &self.customer_session_cookie
    }

    /// Kind of a bearer token by prefix. Empty prefixes never match.
    #[must_use]
    pub fn token_kind(&self, token: &str) -> Option<TokenKind> {
        let prefixes = &self.prefixes;
        [
            (&prefixes.customer_session, TokenKind::CustomerSession),
            (&prefixes.oauth2, TokenKind::OAuth2),
            (
                &prefixes.personal_access_token,
                TokenKind::PersonalAccessToken,
            ),
            (
                &prefixes.organization_access_token,
                TokenKind::OrganizationAccessToken,
            ),
        ]
        .into_iter()
        .find(|(prefix, _)| !prefix.is_empty() && token.starts_with(prefix.as_str()))
        .map(|(_, kind)| kind)
    }

    /// Web session for a cookie value.
    #[must_use]
    pub fn web_session(&self, token: &str) -> Option<UserSession> {
        let user = match self.mode {
            AuthNMode::AcceptAll => self
                .web_sessions
                .get(token)
                .unwrap_or(&self.default_user),
            AuthNMode::StaticTokens => self.web_sessions.get(token)?,
        };
        Some(UserSession { user: user.clone() })
    }

    #[must_use]
    pub fn customer_session(&self, token: &str) -> Option<CustomerSession> {
        self.customer_sessions
            .get(token)
            .map(|customer| CustomerSession {
                customer: customer.clone(),
            })
    }

    #[must_use]
    pub fn oauth2_token(&self, token: &str) -> Option<OAuth2Token> {
        self.oauth2_tokens.get(token).cloned()
    }

    #[must_use]
    pub fn personal_access_token(&self, token: &str) -> Option<PersonalAccessToken> {
        if let Some(found) = self.personal_access_tokens.get(token) {
            return Some(found.clone());
        }
        match self.mode {
            AuthNMode::AcceptAll => Some(PersonalAccessToken {
                user: self.default_user.clone(),
                scopes: self.default_scopes.clone(),
            }),
            AuthNMode::StaticTokens => None,
        }
    }

    #[must_use]
    pub fn organization_access_token(&self, token: &str) -> Option<OrganizationAccessToken> {
        self.organization_access_tokens.get(token).cloned()
    }
}

fn user(cfg: &UserConfig) -> User {
    User {
        id: cfg.id,
        email: cfg.email.clone(),
        blocked_at: cfg.blocked_at,
    }
}

fn organization(cfg: &OrganizationConfig) -> Organization {
    Organization {
        id: cfg.id,
        slug: cfg.slug.clone(),
        blocked_at: cfg.blocked_at,
    }
}

/// Parse a token's scope string. Reserved scopes cannot be granted to a
/// token.
fn token_scopes(value: &str) -> anyhow::Result<BTreeSet<Scope>> {
    let scopes = parse_scope_string(value)?;
    if let Some(reserved) = scopes.iter().find(|s| s.is_reserved()) {
        bail!("scope '{reserved}' is reserved and cannot be granted to a token");
    }
    Ok(scopes)
}

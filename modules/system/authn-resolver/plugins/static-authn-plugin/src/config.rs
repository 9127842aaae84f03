//! Configuration for the static `AuthN` resolver plugin.

use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// Environment variable prefix for overrides, e.g.
/// `AUTHGATE_STATIC_AUTHN__MODE=static_tokens`.
pub const ENV_PREFIX: &str = "AUTHGATE_STATIC_AUTHN__";

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAuthNPluginConfig {
    /// Authentication mode.
    pub mode: AuthNMode,

    /// Cookie carrying the web session token.
    pub web_session_cookie: String,

    /// Cookie carrying the customer portal session token. The same token is
    /// also accepted as a bearer token with the customer session prefix.
    pub customer_session_cookie: String,

    /// Bearer token prefixes identifying each token kind.
    pub token_prefixes: TokenPrefixes,

    /// Identity returned in `accept_all` mode.
    pub default_user: UserConfig,

    /// Space-separated scopes granted to personal access tokens in
    /// `accept_all` mode.
    pub default_scopes: String,

    pub users: Vec<UserConfig>,
    pub organizations: Vec<OrganizationConfig>,
    pub customers: Vec<CustomerConfig>,

    /// Web session tokens, mapped to user ids.
    pub web_sessions: Vec<SessionMapping>,

    /// Customer portal session tokens, mapped to customer ids.
    pub customer_sessions: Vec<SessionMapping>,

    /// Bearer tokens. The prefix decides the token kind.
    pub tokens: Vec<TokenMapping>,
}

impl Default for StaticAuthNPluginConfig {
    fn default() -> Self {
        Self {
            mode: AuthNMode::StaticTokens,
            web_session_cookie: "session".to_owned(),
            customer_session_cookie: "customer_session".to_owned(),
            token_prefixes: TokenPrefixes::default(),
            default_user: UserConfig::default(),
            default_scopes: String::new(),
            users: Vec::new(),
            organizations: Vec::new(),
            customers: Vec::new(),
            web_sessions: Vec::new(),
            customer_sessions: Vec::new(),
            tokens: Vec::new(),
        }
    }
}

impl StaticAuthNPluginConfig {
    /// Load from an optional YAML file, then apply [`ENV_PREFIX`] overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the merged result does
    /// not deserialize.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| match path {
                Some(path) => format!("invalid static authn config in {}", path.display()),
                None => "invalid static authn config".to_owned(),
            })
    }
}

/// Authentication mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthNMode {
    /// Any web session cookie and any personal access token resolve to the
    /// default user. Other sources behave as in `static_tokens`.
    AcceptAll,
    /// Only configured sessions and tokens resolve.
    #[default]
    StaticTokens,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenPrefixes {
    pub customer_session: String,
    pub oauth2: String,
    pub personal_access_token: String,
    pub organization_access_token: String,
}

impl Default for TokenPrefixes {
    fn default() -> Self {
        Self {
            customer_session: "cst_".to_owned(),
            oauth2: "oauth2_".to_owned(),
            personal_access_token: "pat_".to_owned(),
            organization_access_token: "oat_".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    pub id: Uuid,
    pub email: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub blocked_at: Option<OffsetDateTime>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            email: "dev@localhost".to_owned(),
            blocked_at: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrganizationConfig {
    pub id: Uuid,
    pub slug: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub blocked_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerConfig {
    pub id: Uuid,
    pub email: String,
    pub organization_id: Uuid,
}

/// Maps a session token to the id of the user or customer it belongs to.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionMapping {
    pub token: String,
    pub subject_id: Uuid,
}

/// Who a bearer token acts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenOwner {
    User(Uuid),
    Organization(Uuid),
}

/// Maps a bearer token to its owner and granted scopes.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// The bearer token value to match.
    pub token: String,
    pub owner: TokenOwner,
    /// Space-separated scope string, e.g. `"user:read orders:read"`.
    #[serde(default)]
    pub scopes: String,
}

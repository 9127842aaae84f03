//! OpenAPI security schemes and per-operation requirements.
//!
//! Every credential source gets a named security scheme. An endpoint lists
//! one requirement per source it consults, so generated clients know which
//! credentials work and which scopes a token must carry.

use authgate_security::SubjectKind;
use authn_resolver_sdk::{CredentialSource, EndpointAuthenticator};
use utoipa::Modify;
use utoipa::openapi::OpenApi;
use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme,
};

/// Scheme name registered for a credential source.
#[must_use]
pub fn scheme_name(source: CredentialSource) -> &'static str {
    source.as_str()
}

/// Security scheme describing how a credential source is presented.
#[must_use]
pub fn security_scheme(source: CredentialSource, web_session_cookie: &str) -> SecurityScheme {
    match source {
        CredentialSource::WebSession => {
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                web_session_cookie,
                "Dashboard session cookie",
            )))
        }
        CredentialSource::CustomerSession => bearer("Customer portal session token"),
        CredentialSource::OAuth2Token => bearer("OAuth2 access token"),
        CredentialSource::PersonalAccessToken => bearer("Personal access token"),
        CredentialSource::OrganizationAccessToken => bearer("Organization access token"),
    }
}

fn bearer(description: &str) -> SecurityScheme {
    SecurityScheme::Http(
        HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .description(Some(description))
            .build(),
    )
}

/// All security schemes, keyed by scheme name, in resolution priority order.
#[must_use]
pub fn security_schemes(web_session_cookie: &str) -> Vec<(&'static str, SecurityScheme)> {
    CredentialSource::PRIORITY
        .into_iter()
        .map(|source| {
            (
                scheme_name(source),
                security_scheme(source, web_session_cookie),
            )
        })
        .collect()
}

/// Security requirements for one endpoint.
///
/// Session cookies carry no scopes in the document; tokens list the
/// documented scopes. Endpoints open to anonymous callers add an empty
/// requirement, which marks authentication as optional.
#[must_use]
pub fn security_requirements(endpoint: &dyn EndpointAuthenticator) -> Vec<SecurityRequirement> {
    let scopes: Vec<String> = endpoint
        .documented_scopes()
        .iter()
        .map(ToString::to_string)
        .collect();

    let mut requirements: Vec<SecurityRequirement> = endpoint
        .credential_sources()
        .iter()
        .map(|source| match source {
            CredentialSource::WebSession => {
                SecurityRequirement::new(scheme_name(*source), Vec::<String>::new())
            }
            _ => SecurityRequirement::new(scheme_name(*source), scopes.clone()),
        })
        .collect();

    if endpoint.policy().allows(SubjectKind::Anonymous) {
        requirements.push(SecurityRequirement::default());
    }
    requirements
}

/// Registers every credential source's security scheme on a document.
#[derive(Debug, Clone)]
pub struct SecuritySchemesAddon {
    pub web_session_cookie: String,
}

impl Default for SecuritySchemesAddon {
    fn default() -> Self {
        Self {
            web_session_cookie: "session".to_owned(),
        }
    }
}

impl Modify for SecuritySchemesAddon {
    fn modify(&self, openapi: &mut OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        for (name, scheme) in security_schemes(&self.web_session_cookie) {
            components.add_security_scheme(name, scheme);
        }
    }
}

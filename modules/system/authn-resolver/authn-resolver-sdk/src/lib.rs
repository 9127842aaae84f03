//! `AuthN` Resolver SDK
//!
//! This crate provides the contracts around request authentication:
//!
//! - [`CredentialProbe`] - Plugin trait, one per credential source
//! - [`SubjectReporter`] - Observability collaborator
//! - [`EndpointAuthenticator`] - Per-endpoint API consumed by the HTTP layer
//! - Credential models and [`CredentialResult`]
//! - [`AuthError`] and [`AuthNResolverError`]
//!
//! ## Usage
//!
//! ```ignore
//! use authn_resolver_sdk::{CredentialRequest, EndpointAuthenticator};
//!
//! let subject = endpoint.authenticate(&CredentialRequest::new(&headers)).await?;
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::EndpointAuthenticator;
pub use error::{AuthError, AuthNResolverError};
pub use models::{
    CredentialRequest, CredentialResult, CredentialSource, CustomerSession, OAuth2Token,
    OrganizationAccessToken, PersonalAccessToken, TokenSubject, UserSession,
};
pub use plugin_api::{CredentialProbe, SubjectReporter};

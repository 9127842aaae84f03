#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Identity model shared by the credential resolvers, the endpoint
//! authorizer and the HTTP layer.

pub mod auth_subject;
pub mod policy;
pub mod scope;
pub mod subject;

pub use auth_subject::{AuthMethod, AuthSubject};
pub use policy::EndpointAuthPolicy;
pub use scope::{
    RESERVED_SCOPES, Scope, ScopeParseError, documented_scopes, parse_scope_string, scope_string,
};
pub use subject::{Customer, Organization, Subject, SubjectKind, SubjectKindSet, User};

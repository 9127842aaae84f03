//! `AuthN` Resolver Module
//!
//! Works out who is calling an endpoint and whether they may.
//!
//! Per request, the [`SubjectResolver`] for the endpoint's accepted subject
//! kinds runs only the credential probes that can yield those kinds, picks a
//! subject by fixed priority, and the endpoint's [`Authorizer`] enforces its
//! [`EndpointAuthPolicy`](authgate_security::EndpointAuthPolicy).
//!
//! Resolvers are memoized in the [`SubjectFactoryRegistry`]; authorizers are
//! built per endpoint by the [`AuthorizerFactory`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;

pub use config::AuthNResolverConfig;
pub use domain::{
    Authorizer, AuthorizerFactory, EndpointAuth, NoopSubjectReporter, ProbeResults, Probes,
    ProbesBuilder, SubjectFactoryRegistry, SubjectResolver, TracingSubjectReporter,
    credential_sources_for, resolve_subject,
};
pub use module::AuthNResolver;

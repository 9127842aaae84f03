//! Domain layer for the `AuthN` resolver.

pub mod authorizer;
pub mod factory;
pub mod probes;
pub mod registry;
pub mod reporter;
pub mod resolver;

pub use authorizer::Authorizer;
pub use factory::{AuthorizerFactory, EndpointAuth};
pub use probes::{Probes, ProbesBuilder};
pub use registry::{SubjectFactoryRegistry, SubjectResolver, credential_sources_for};
pub use reporter::{NoopSubjectReporter, TracingSubjectReporter};
pub use resolver::{ProbeResults, resolve_subject};

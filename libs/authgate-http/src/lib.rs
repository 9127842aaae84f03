//! Axum integration for endpoint authentication.
//!
//! Wrap a route in [`EndpointAuthLayer`] to authenticate it, pull the result
//! out with [`AuthSubjectExt`], and describe it in OpenAPI with
//! [`openapi::security_requirements`]. Failures are answered with RFC 9457
//! problem documents and RFC 6750 `WWW-Authenticate` challenges.

pub mod error;
pub mod extract;
pub mod layer;
pub mod openapi;
pub mod problem;

pub use error::AuthRejection;
pub use extract::{AuthSubjectExt, MissingAuthSubject};
pub use layer::{EndpointAuthLayer, EndpointAuthService};
pub use openapi::{SecuritySchemesAddon, security_requirements, security_schemes};
pub use problem::{APPLICATION_PROBLEM_JSON, Problem};

//! Traits implemented by credential plugins.
//!
//! A plugin provides one [`CredentialProbe`] per credential source it knows
//! how to look up, plus optionally a [`SubjectReporter`].

use async_trait::async_trait;
use authgate_security::AuthSubject;

use crate::error::AuthNResolverError;
use crate::models::{CredentialRequest, CredentialResult};

/// Looks up one kind of credential on a request.
///
/// Implementations must not depend on other probes: the resolver may run
/// them concurrently and in any order.
#[async_trait]
pub trait CredentialProbe<C>: Send + Sync {
    /// Inspect the request for this source's credential material.
    ///
    /// Return [`CredentialResult::absent`] when there is none,
    /// [`CredentialResult::rejected`] when it is present but invalid, expired
    /// or unknown, and [`CredentialResult::present`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`AuthNResolverError`] only when the lookup itself cannot run,
    /// e.g. the credential store is unreachable.
    async fn probe(
        &self,
        request: &CredentialRequest<'_>,
    ) -> Result<CredentialResult<C>, AuthNResolverError>;
}

/// Records the authenticated subject with an error-reporting or monitoring
/// backend.
///
/// Called once per authorized request. Must not block; a failure is logged
/// and otherwise ignored.
pub trait SubjectReporter: Send + Sync {
    /// # Errors
    ///
    /// Any error is swallowed by the caller.
    fn report(&self, auth_subject: &AuthSubject) -> anyhow::Result<()>;
}

//! Built-in [`SubjectReporter`] implementations.

use authgate_security::AuthSubject;
use authn_resolver_sdk::SubjectReporter;
use tracing::debug;

/// Emits the authenticated subject as a `tracing` event, so it shows up
/// alongside whatever the request logs next.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSubjectReporter;

impl SubjectReporter for TracingSubjectReporter {
    fn report(&self, auth_subject: &AuthSubject) -> anyhow::Result<()> {
        let subject = auth_subject.subject();
        debug!(
            subject_kind = %subject.kind(),
            subject_id = ?subject.id(),
            auth_method = %auth_subject.auth_method(),
            "authenticated subject"
        );
        Ok(())
    }
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSubjectReporter;

impl SubjectReporter for NoopSubjectReporter {
    fn report(&self, _auth_subject: &AuthSubject) -> anyhow::Result<()> {
        Ok(())
    }
}

//! Enforcing an endpoint policy on a resolved subject.

use std::sync::Arc;

use authgate_security::{AuthSubject, EndpointAuthPolicy, SubjectKind};
use authn_resolver_sdk::{AuthError, SubjectReporter};
use tracing::{debug, warn};

/// Checks resolved subjects against one endpoint's policy.
#[derive(Clone)]
pub struct Authorizer {
    policy: Arc<EndpointAuthPolicy>,
    reporter: Arc<dyn SubjectReporter>,
}

impl Authorizer {
    #[must_use]
    pub fn new(policy: Arc<EndpointAuthPolicy>, reporter: Arc<dyn SubjectReporter>) -> Self {
        Self { policy, reporter }
    }

    #[must_use]
    pub fn policy(&self) -> &EndpointAuthPolicy {
        &self.policy
    }

    /// Let `auth_subject` through, or say why not.
    ///
    /// Anonymous callers are judged on whether the endpoint accepts them and
    /// nothing else. Authenticated subjects are reported, then must be
    /// unblocked, of an accepted kind, and hold at least one of the required
    /// scopes (if any are required).
    ///
    /// # Errors
    ///
    /// - [`AuthError::Unauthorized`] for an anonymous caller on a closed endpoint
    /// - [`AuthError::NotPermitted`] for a blocked user or organization
    /// - [`AuthError::InvalidCredential`] with the accepted kinds when the
    ///   subject kind is not accepted
    /// - [`AuthError::InsufficientScope`] with the full required set
    pub fn authorize(&self, auth_subject: AuthSubject) -> Result<AuthSubject, AuthError> {
        let allowed = self.policy.allowed_subject_kinds();

        if auth_subject.is_anonymous() {
            if allowed.contains(SubjectKind::Anonymous) {
                return Ok(auth_subject);
            }
            return Err(AuthError::Unauthorized);
        }

        if let Err(e) = self.reporter.report(&auth_subject) {
            warn!(error = %e, "failed to report authenticated subject");
        }

        if let Some(blocked_at) = auth_subject.subject().blocked_at() {
            debug!(
                subject_id = ?auth_subject.subject().id(),
                %blocked_at,
                "subject is blocked"
            );
            return Err(AuthError::NotPermitted);
        }

        if !allowed.contains(auth_subject.kind()) {
            debug!(
                kind = %auth_subject.kind(),
                %allowed,
                "subject kind not accepted by endpoint"
            );
            return Err(AuthError::subject_not_allowed(allowed));
        }

        let required = self.policy.required_scopes();
        if required.is_empty() || auth_subject.has_any_scope(required) {
            return Ok(auth_subject);
        }

        Err(AuthError::insufficient_scope(required.clone()))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use authgate_security::{AuthMethod, Customer, Organization, Scope, Subject, User};
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;
    use crate::domain::reporter::NoopSubjectReporter;

    #[derive(Default)]
    struct CountingReporter {
        calls: AtomicUsize,
    }

    impl SubjectReporter for CountingReporter {
        fn report(&self, _auth_subject: &AuthSubject) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn authorizer(
        kinds: impl IntoIterator<Item = SubjectKind>,
        scopes: impl IntoIterator<Item = Scope>,
    ) -> Authorizer {
        Authorizer::new(
            Arc::new(EndpointAuthPolicy::new(kinds, scopes)),
            Arc::new(NoopSubjectReporter),
        )
    }

    fn user_subject(scopes: impl IntoIterator<Item = Scope>) -> AuthSubject {
        AuthSubject::new(
            Subject::User(User {
                id: Uuid::new_v4(),
                email: "u@example.com".to_owned(),
                blocked_at: None,
            }),
            scopes.into_iter().collect(),
            AuthMethod::PersonalAccessToken,
        )
    }

    fn organization_subject(blocked_at: Option<OffsetDateTime>) -> AuthSubject {
        AuthSubject::new(
            Subject::Organization(Organization {
                id: Uuid::new_v4(),
                slug: "acme".to_owned(),
                blocked_at,
            }),
            BTreeSet::from([Scope::OrdersRead]),
            AuthMethod::OrganizationAccessToken,
        )
    }

    #[test]
    fn anonymous_passes_only_when_accepted() {
        let open = authorizer([SubjectKind::Anonymous, SubjectKind::User], [Scope::WebDefault]);
        assert_eq!(
            open.authorize(AuthSubject::anonymous()).unwrap(),
            AuthSubject::anonymous()
        );

        let closed = authorizer([SubjectKind::User], []);
        assert!(matches!(
            closed.authorize(AuthSubject::anonymous()),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn blocked_subject_is_not_permitted() {
        let auth = authorizer([SubjectKind::Organization], [Scope::OrdersRead]);
        let err = auth
            .authorize(organization_subject(Some(OffsetDateTime::UNIX_EPOCH)))
            .unwrap_err();
        assert!(matches!(err, AuthError::NotPermitted));
    }

    #[test]
    fn blocked_check_precedes_kind_check() {
        let auth = authorizer([SubjectKind::User], []);
        let err = auth
            .authorize(organization_subject(Some(OffsetDateTime::UNIX_EPOCH)))
            .unwrap_err();
        assert!(matches!(err, AuthError::NotPermitted));
    }

    #[test]
    fn wrong_kind_lists_accepted_kinds() {
        let auth = authorizer([SubjectKind::User, SubjectKind::Customer], []);
        let err = auth.authorize(organization_subject(None)).unwrap_err();
        match err {
            AuthError::InvalidCredential {
                allowed_subjects: Some(allowed),
            } => {
                assert!(allowed.contains(SubjectKind::User));
                assert!(allowed.contains(SubjectKind::Customer));
                assert_eq!(allowed.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn no_required_scopes_allows_any_accepted_subject() {
        let auth = authorizer([SubjectKind::User], []);
        let subject = user_subject([]);
        assert_eq!(auth.authorize(subject.clone()).unwrap(), subject);
    }

    #[test]
    fn one_matching_scope_is_enough() {
        let auth = authorizer(
            [SubjectKind::User],
            [Scope::ProductsRead, Scope::ProductsWrite],
        );
        let subject = user_subject([Scope::ProductsWrite, Scope::OrdersRead]);
        let authorized = auth.authorize(subject.clone()).unwrap();
        assert_eq!(authorized, subject);
        assert_eq!(authorized.scopes(), subject.scopes());
    }

    #[test]
    fn missing_scopes_report_full_required_set() {
        let auth = authorizer(
            [SubjectKind::User],
            [Scope::ProductsRead, Scope::ProductsWrite],
        );
        let err = auth
            .authorize(user_subject([Scope::OrdersRead]))
            .unwrap_err();
        match err {
            AuthError::InsufficientScope { required_scopes } => assert_eq!(
                required_scopes,
                BTreeSet::from([Scope::ProductsRead, Scope::ProductsWrite])
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reserved_scope_is_enforced_at_runtime() {
        let auth = authorizer([SubjectKind::User], [Scope::WebDefault]);
        assert!(auth.authorize(user_subject([Scope::WebDefault])).is_ok());
        assert!(matches!(
            auth.authorize(user_subject([Scope::UserRead])),
            Err(AuthError::InsufficientScope { .. })
        ));
    }

    #[test]
    fn authorize_is_idempotent() {
        let auth = authorizer([SubjectKind::User], [Scope::UserRead]);
        let subject = user_subject([Scope::UserRead]);
        let once = auth.authorize(subject).unwrap();
        let twice = auth.authorize(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn only_authenticated_subjects_are_reported() {
        let reporter = Arc::new(CountingReporter::default());
        let auth = Authorizer::new(
            Arc::new(EndpointAuthPolicy::new(
                [SubjectKind::Anonymous, SubjectKind::Customer],
                [],
            )),
            reporter.clone(),
        );

        auth.authorize(AuthSubject::anonymous()).unwrap();
        assert_eq!(reporter.calls.load(Ordering::SeqCst), 0);

        let customer = AuthSubject::new(
            Subject::Customer(Customer {
                id: Uuid::new_v4(),
                email: "c@example.com".to_owned(),
                organization_id: Uuid::new_v4(),
            }),
            BTreeSet::from([Scope::CustomerPortalWrite]),
            AuthMethod::CustomerSessionToken,
        );
        auth.authorize(customer).unwrap();
        assert_eq!(reporter.calls.load(Ordering::SeqCst), 1);
    }
}

//! Per-endpoint authentication policy.

use std::collections::BTreeSet;

use crate::scope::{self, Scope};
use crate::subject::{SubjectKind, SubjectKindSet};

/// What an endpoint accepts: which kinds of subject may call it and which
/// scopes (any one of) they must hold.
///
/// Declared once at startup and shared by every request to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointAuthPolicy {
    allowed_subject_kinds: SubjectKindSet,
    required_scopes: BTreeSet<Scope>,
}

impl EndpointAuthPolicy {
    #[must_use]
    pub fn new(
        allowed_subject_kinds: impl IntoIterator<Item = SubjectKind>,
        required_scopes: impl IntoIterator<Item = Scope>,
    ) -> Self {
        Self {
            allowed_subject_kinds: allowed_subject_kinds.into_iter().collect(),
            required_scopes: required_scopes.into_iter().collect(),
        }
    }

    /// Signed-in web user. Requires the implicit session scope.
    #[must_use]
    pub fn web_user() -> Self {
        Self::new([SubjectKind::User], [Scope::WebDefault])
    }

    /// Signed-in web user, or nobody at all.
    #[must_use]
    pub fn web_user_or_anonymous() -> Self {
        Self::new(
            [SubjectKind::Anonymous, SubjectKind::User],
            [Scope::WebDefault],
        )
    }

    #[must_use]
    pub fn allowed_subject_kinds(&self) -> SubjectKindSet {
        self.allowed_subject_kinds
    }

    #[must_use]
    pub fn required_scopes(&self) -> &BTreeSet<Scope> {
        &self.required_scopes
    }

    #[must_use]
    pub fn allows(&self, kind: SubjectKind) -> bool {
        self.allowed_subject_kinds.contains(kind)
    }

    /// Required scopes a client may legitimately request, for publication in
    /// API documentation. Reserved scopes are left out.
    #[must_use]
    pub fn documented_scopes(&self) -> Vec<Scope> {
        scope::documented_scopes(&self.required_scopes)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn web_user_documents_no_scopes() {
        let policy = EndpointAuthPolicy::web_user();
        assert!(policy.allows(SubjectKind::User));
        assert!(!policy.allows(SubjectKind::Anonymous));
        assert_eq!(policy.required_scopes(), &BTreeSet::from([Scope::WebDefault]));
        assert!(policy.documented_scopes().is_empty());
    }

    #[test]
    fn web_user_or_anonymous_allows_both() {
        let policy = EndpointAuthPolicy::web_user_or_anonymous();
        assert!(policy.allows(SubjectKind::User));
        assert!(policy.allows(SubjectKind::Anonymous));
        assert!(!policy.allows(SubjectKind::Organization));
    }

    #[test]
    fn documented_scopes_excludes_reserved() {
        let policy = EndpointAuthPolicy::new(
            [SubjectKind::User, SubjectKind::Organization],
            [Scope::WebDefault, Scope::WebhooksWrite],
        );
        assert_eq!(policy.documented_scopes(), vec![Scope::WebhooksWrite]);
    }
}

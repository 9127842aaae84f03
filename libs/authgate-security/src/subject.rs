//! Who is acting on a request.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// An end user of the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Set when the account has been administratively blocked.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub blocked_at: Option<OffsetDateTime>,
}

/// An organization acting through an organization-bound credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub slug: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub blocked_at: Option<OffsetDateTime>,
}

/// A customer of an organization, authenticated through the customer portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub email: String,
    pub organization_id: Uuid,
}

/// The resolved identity behind a request. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Anonymous,
    User(User),
    Organization(Organization),
    Customer(Customer),
}

impl Subject {
    #[must_use]
    pub fn kind(&self) -> SubjectKind {
        match self {
            Self::Anonymous => SubjectKind::Anonymous,
            Self::User(_) => SubjectKind::User,
            Self::Organization(_) => SubjectKind::Organization,
            Self::Customer(_) => SubjectKind::Customer,
        }
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Identifier of the underlying entity, `None` for anonymous callers.
    #[must_use]
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Self::Anonymous => None,
            Self::User(user) => Some(user.id),
            Self::Organization(org) => Some(org.id),
            Self::Customer(customer) => Some(customer.id),
        }
    }

    /// Block marker of the underlying entity. Only users and organizations
    /// can be blocked.
    #[must_use]
    pub fn blocked_at(&self) -> Option<OffsetDateTime> {
        match self {
            Self::User(user) => user.blocked_at,
            Self::Organization(org) => org.blocked_at,
            Self::Anonymous | Self::Customer(_) => None,
        }
    }
}

impl From<User> for Subject {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}

impl From<Organization> for Subject {
    fn from(org: Organization) -> Self {
        Self::Organization(org)
    }
}

impl From<Customer> for Subject {
    fn from(customer: Customer) -> Self {
        Self::Customer(customer)
    }
}

/// Discriminant of [`Subject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubjectKind {
    Anonymous,
    User,
    Organization,
    Customer,
}

impl SubjectKind {
    pub const ALL: [Self; 4] = [
        Self::Anonymous,
        Self::User,
        Self::Organization,
        Self::Customer,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "Anonymous",
            Self::User => "User",
            Self::Organization => "Organization",
            Self::Customer => "Customer",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Anonymous => 1,
            Self::User => 1 << 1,
            Self::Organization => 1 << 2,
            Self::Customer => 1 << 3,
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of subject kinds an endpoint accepts.
///
/// Stored as a bitset, so two sets holding the same kinds are equal and hash
/// identically regardless of how they were built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectKindSet(u8);

impl SubjectKindSet {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn of(kinds: &[SubjectKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        Self(bits)
    }

    #[must_use]
    pub const fn with(self, kind: SubjectKind) -> Self {
        Self(self.0 | kind.bit())
    }

    #[must_use]
    pub const fn contains(self, kind: SubjectKind) -> bool {
        self.0 & kind.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Kinds in canonical order.
    pub fn iter(self) -> impl Iterator<Item = SubjectKind> {
        SubjectKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl FromIterator<SubjectKind> for SubjectKindSet {
    fn from_iter<I: IntoIterator<Item = SubjectKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl fmt::Display for SubjectKindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for kind in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(kind.as_str())?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn user(blocked_at: Option<OffsetDateTime>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_owned(),
            blocked_at,
        }
    }

    #[test]
    fn kind_set_ignores_construction_order() {
        let a: SubjectKindSet = [SubjectKind::User, SubjectKind::Organization]
            .into_iter()
            .collect();
        let b: SubjectKindSet = [
            SubjectKind::Organization,
            SubjectKind::User,
            SubjectKind::User,
        ]
        .into_iter()
        .collect();
        assert_eq!(a, b);
        assert_eq!(a, SubjectKindSet::of(&[SubjectKind::User, SubjectKind::Organization]));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn kind_set_iterates_in_canonical_order_and_displays_names() {
        let set = SubjectKindSet::of(&[SubjectKind::Customer, SubjectKind::Anonymous]);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![SubjectKind::Anonymous, SubjectKind::Customer]
        );
        assert_eq!(set.to_string(), "Anonymous Customer");
        assert!(SubjectKindSet::empty().is_empty());
    }

    #[test]
    fn subject_reports_kind_and_id() {
        let u = user(None);
        let id = u.id;
        let subject = Subject::from(u);
        assert_eq!(subject.kind(), SubjectKind::User);
        assert_eq!(subject.id(), Some(id));
        assert_eq!(Subject::Anonymous.id(), None);
        assert!(Subject::Anonymous.is_anonymous());
    }

    #[test]
    fn only_users_and_organizations_carry_block_marker() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(Subject::from(user(Some(now))).blocked_at(), Some(now));

        let customer = Customer {
            id: Uuid::new_v4(),
            email: "buyer@example.com".to_owned(),
            organization_id: Uuid::new_v4(),
        };
        assert_eq!(Subject::from(customer).blocked_at(), None);
    }

    #[test]
    fn user_block_marker_is_rfc3339_and_optional() {
        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440001",
            "email": "a@example.com",
            "blocked_at": "2024-01-02T03:04:05Z"
        });
        let parsed: User = serde_json::from_value(json).unwrap();
        assert!(parsed.blocked_at.is_some());

        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440001",
            "email": "a@example.com"
        });
        let parsed: User = serde_json::from_value(json).unwrap();
        assert!(parsed.blocked_at.is_none());
    }
}

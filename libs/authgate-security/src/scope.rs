//! Permission scopes granted to an authenticated subject.
//!
//! Scopes form a closed enumeration. Their wire representation is the
//! string returned by [`Scope::as_str`]; anything else fails to parse.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a scope string does not name a known scope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scope '{0}'")]
pub struct ScopeParseError(pub String);

macro_rules! define_scopes {
    ($($(#[$meta:meta])* $variant:ident => $value:literal),+ $(,)?) => {
        /// A permission string a credential can carry.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Scope {
            $($(#[$meta])* $variant,)+
        }

        impl Scope {
            /// Every known scope, in declaration order.
            pub const ALL: &'static [Scope] = &[$(Scope::$variant,)+];

            /// Wire representation of the scope.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Scope::$variant => $value,)+
                }
            }
        }

        impl FromStr for Scope {
            type Err = ScopeParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Scope::$variant),)+
                    other => Err(ScopeParseError(other.to_owned())),
                }
            }
        }
    };
}

define_scopes! {
    Openid => "openid",
    Profile => "profile",
    Email => "email",
    UserRead => "user:read",
    UserWrite => "user:write",
    /// Implicitly granted to web sessions. Reserved.
    WebDefault => "web_default",
    OrganizationsRead => "organizations:read",
    OrganizationsWrite => "organizations:write",
    CustomFieldsRead => "custom_fields:read",
    CustomFieldsWrite => "custom_fields:write",
    DiscountsRead => "discounts:read",
    DiscountsWrite => "discounts:write",
    CheckoutLinksRead => "checkout_links:read",
    CheckoutLinksWrite => "checkout_links:write",
    CheckoutsRead => "checkouts:read",
    CheckoutsWrite => "checkouts:write",
    ProductsRead => "products:read",
    ProductsWrite => "products:write",
    BenefitsRead => "benefits:read",
    BenefitsWrite => "benefits:write",
    EventsRead => "events:read",
    EventsWrite => "events:write",
    MetersRead => "meters:read",
    MetersWrite => "meters:write",
    FilesRead => "files:read",
    FilesWrite => "files:write",
    SubscriptionsRead => "subscriptions:read",
    SubscriptionsWrite => "subscriptions:write",
    CustomersRead => "customers:read",
    CustomersWrite => "customers:write",
    CustomerSessionsWrite => "customer_sessions:write",
    OrdersRead => "orders:read",
    RefundsRead => "refunds:read",
    RefundsWrite => "refunds:write",
    PayoutsRead => "payouts:read",
    PayoutsWrite => "payouts:write",
    MetricsRead => "metrics:read",
    WebhooksRead => "webhooks:read",
    WebhooksWrite => "webhooks:write",
    ExternalOrganizationsRead => "external_organizations:read",
    LicenseKeysRead => "license_keys:read",
    LicenseKeysWrite => "license_keys:write",
    CustomerPortalRead => "customer_portal:read",
    CustomerPortalWrite => "customer_portal:write",
    NotificationRecipientsRead => "notification_recipients:read",
    NotificationRecipientsWrite => "notification_recipients:write",
}

/// Scopes that are never documented and can never be minted on a token.
pub const RESERVED_SCOPES: &[Scope] = &[Scope::WebDefault];

impl Scope {
    /// Whether the scope belongs to the reserved subset.
    #[must_use]
    pub fn is_reserved(self) -> bool {
        RESERVED_SCOPES.contains(&self)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a space-separated scope string as stored on token records.
///
/// # Errors
///
/// Returns [`ScopeParseError`] for the first token that is not a known scope.
pub fn parse_scope_string(raw: &str) -> Result<BTreeSet<Scope>, ScopeParseError> {
    raw.split_whitespace().map(str::parse).collect()
}

/// Render scopes as a space-separated string, sorted by their wire name.
#[must_use]
pub fn scope_string<'a>(scopes: impl IntoIterator<Item = &'a Scope>) -> String {
    let mut names: Vec<&str> = scopes.into_iter().map(|s| s.as_str()).collect();
    names.sort_unstable();
    names.join(" ")
}

/// Drop reserved scopes and sort the rest by wire name.
///
/// This is the list an API documentation generator may publish for an
/// endpoint.
#[must_use]
pub fn documented_scopes<'a>(scopes: impl IntoIterator<Item = &'a Scope>) -> Vec<Scope> {
    let mut visible: Vec<Scope> = scopes
        .into_iter()
        .copied()
        .filter(|s| !s.is_reserved())
        .collect();
    visible.sort_unstable_by_key(|s| s.as_str());
    visible.dedup();
    visible
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn every_scope_round_trips_through_its_wire_name() {
        for scope in Scope::ALL {
            assert_eq!(scope.as_str().parse::<Scope>().unwrap(), *scope);
        }
    }

    #[test]
    fn unknown_scope_is_rejected() {
        let err = "admin:everything".parse::<Scope>().unwrap_err();
        assert_eq!(err, ScopeParseError("admin:everything".to_owned()));
    }

    #[test]
    fn only_web_default_is_reserved() {
        let reserved: Vec<Scope> = Scope::ALL.iter().copied().filter(|s| s.is_reserved()).collect();
        assert_eq!(reserved, vec![Scope::WebDefault]);
    }

    #[test]
    fn parse_scope_string_splits_on_whitespace() {
        let scopes = parse_scope_string("  products:read\torders:read  products:read ").unwrap();
        assert_eq!(
            scopes,
            BTreeSet::from([Scope::ProductsRead, Scope::OrdersRead])
        );
    }

    #[test]
    fn parse_scope_string_fails_on_first_unknown() {
        let err = parse_scope_string("openid nope").unwrap_err();
        assert_eq!(err.0, "nope");
    }

    #[test]
    fn scope_string_is_sorted_by_name() {
        let scopes = [Scope::UserRead, Scope::Email, Scope::Openid];
        assert_eq!(scope_string(&scopes), "email openid user:read");
    }

    #[test]
    fn documented_scopes_drops_reserved_and_sorts() {
        let scopes = BTreeSet::from([
            Scope::WebDefault,
            Scope::SubscriptionsWrite,
            Scope::BenefitsRead,
        ]);
        assert_eq!(
            documented_scopes(&scopes),
            vec![Scope::BenefitsRead, Scope::SubscriptionsWrite]
        );
    }

    #[test]
    fn serde_uses_wire_name() {
        let json = serde_json::to_string(&Scope::CustomerPortalWrite).unwrap();
        assert_eq!(json, "\"customer_portal:write\"");

        let back: Scope = serde_json::from_str("\"license_keys:read\"").unwrap();
        assert_eq!(back, Scope::LicenseKeysRead);

        assert!(serde_json::from_str::<Scope>("\"bogus\"").is_err());
    }
}

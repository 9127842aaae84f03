#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static `AuthN` Resolver Plugin
//!
//! This plugin serves sessions and bearer tokens from configuration, for
//! development and testing. It implements the credential probe for every
//! source.
//!
//! ## Modes
//!
//! - **`static_tokens`** (default): Only configured sessions and tokens
//!   resolve.
//! - **`accept_all`**: Any web session cookie and any personal access token
//!   resolve to the default user.
//!
//! Bearer tokens are looked up in the table picked by their prefix (`cst_`,
//! `oauth2_`, `pat_`, `oat_` by default). Every token probe reports a failed
//! attempt for a bearer token it cannot resolve, so unknown, expired or
//! foreign tokens are rejected rather than treated as anonymous.
//!
//! ## Configuration
//!
//! ```yaml
//! mode: static_tokens
//! users:
//!   - id: "11111111-6a88-4768-9dfc-6bcd5187d9ed"
//!     email: "alice@example.com"
//! organizations:
//!   - id: "00000000-df51-5b42-9538-d2b56b7ee953"
//!     slug: "acme"
//! web_sessions:
//!   - token: "dev-session"
//!     subject_id: "11111111-6a88-4768-9dfc-6bcd5187d9ed"
//! tokens:
//!   - token: "pat_alice"
//!     owner:
//!       user: "11111111-6a88-4768-9dfc-6bcd5187d9ed"
//!     scopes: "user:read orders:read"
//! ```
//!
//! Any field can be overridden from the environment with the
//! `AUTHGATE_STATIC_AUTHN__` prefix.

pub mod config;
pub mod domain;
pub mod module;

pub use module::StaticAuthNPlugin;

//! Configuration for the `AuthN` resolver.

use serde::Deserialize;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthNResolverConfig {
    /// Hand every authenticated subject to the subject reporter.
    ///
    /// When off, the configured reporter is replaced with one that does
    /// nothing.
    pub report_subjects: bool,
}

impl Default for AuthNResolverConfig {
    fn default() -> Self {
        Self {
            report_subjects: true,
        }
    }
}

//! Static `AuthN` resolver plugin module.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{AuthNMode, StaticAuthNPluginConfig};
use crate::domain::Service;

/// Static `AuthN` resolver plugin module.
///
/// Serves credentials from configuration. The [`Service`] it holds is the
/// credential probe for all five sources:
///
/// ```ignore
/// let plugin = StaticAuthNPlugin::load(Some(Path::new("config/authn.yaml")))?;
/// let probes = Probes::from_plugin(plugin.service());
/// ```
pub struct StaticAuthNPlugin {
    service: Arc<Service>,
}

impl StaticAuthNPlugin {
    /// Load configuration from `path` plus environment overrides and build
    /// the plugin.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or is invalid.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let cfg = StaticAuthNPluginConfig::load(path)?;
        Self::init(&cfg)
    }

    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn init(cfg: &StaticAuthNPluginConfig) -> anyhow::Result<Self> {
        info!("Initializing static_authn_plugin");

        if cfg.mode == AuthNMode::AcceptAll {
            warn!(
                "Static AuthN plugin is running in `accept_all` mode: \
                 every web session cookie and personal access token resolves \
                 to the default user. Do NOT use this mode in production."
            );
        }

        info!(
            mode = ?cfg.mode,
            users = cfg.users.len(),
            organizations = cfg.organizations.len(),
            customers = cfg.customers.len(),
            token_count = cfg.tokens.len(),
            "Loaded plugin configuration"
        );

        let service = Arc::new(Service::from_config(cfg)?);
        info!("Static authn plugin initialized");

        Ok(Self { service })
    }

    #[must_use]
    pub fn service(&self) -> &Arc<Service> {
        &self.service
    }
}

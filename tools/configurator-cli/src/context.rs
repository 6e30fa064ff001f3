//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use turbo_commerce::catalog::ProductConfig;
use turbo_configurator::{
    CartGateway, CatalogApi, ConfigurationController, ConfiguratorConfig, FavoritesClient,
    TokenStore, VariantResolver,
};
use turbo_data::FetchClient;

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Configurator configuration.
    pub config: ConfiguratorConfig,
    /// Output handler.
    pub output: Output,
    client: FetchClient,
    tokens: TokenStore,
}

impl Context {
    /// Load the config file, apply overrides and build the HTTP client.
    pub fn load(
        config_path: Option<&str>,
        base_url: Option<&str>,
        token: Option<&str>,
        output: Output,
    ) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => ConfiguratorConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path))?,
            None => {
                let cwd = std::env::current_dir().context("Failed to get current directory")?;
                Self::find_config(&cwd).unwrap_or_default()
            }
        };

        if let Some(base_url) = base_url {
            config.api.base_url = base_url.to_string();
        }

        let client = config
            .fetch_client()
            .context("Failed to build HTTP client")?;
        let tokens = TokenStore::new();
        if let Some(token) = token {
            tokens.set(token);
        }

        tracing::debug!(base_url = %config.api.base_url, environment = ?config.environment, "context loaded");
        Ok(Self {
            config,
            output,
            client,
            tokens,
        })
    }

    /// Find a config file in the directory tree.
    fn find_config(start: &Path) -> Option<ConfiguratorConfig> {
        let config_names = ["configurator.toml", ".configurator.toml", "configurator.json"];

        let mut current = PathBuf::from(start);
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    match ConfiguratorConfig::load(&config_path) {
                        Ok(config) => return Some(config),
                        Err(e) => tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable config"),
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Controller for a product, resolving against the configured backend.
    pub fn controller(&self, product: ProductConfig) -> Result<ConfigurationController> {
        let lookup = CatalogApi::new(self.client.clone(), self.config.currency);
        let resolver = VariantResolver::new(Arc::new(lookup));
        ConfigurationController::new(product, resolver, (&self.config).into())
            .context("Failed to set up configurator")
    }

    /// Cart gateway using the configured token.
    pub fn cart(&self) -> CartGateway {
        CartGateway::new(self.client.clone(), self.tokens.clone(), self.config.currency)
    }

    /// Favorites client using the configured token.
    pub fn favorites(&self) -> FavoritesClient {
        FavoritesClient::new(self.client.clone(), self.tokens.clone())
    }
}

//! CLI command implementations.

pub mod add;
pub mod cart;
pub mod favorite;
pub mod resolve;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::Args;
use turbo_commerce::catalog::ProductConfig;
use turbo_commerce::{DimensionId, ValueId};
use turbo_configurator::{ConfigurationController, ConfiguratorView};

/// Arguments for the resolve command.
#[derive(Args)]
pub struct ResolveArgs {
    /// Product definition (JSON).
    #[arg(short, long)]
    pub product: PathBuf,

    /// Selected value, as `dimension=value`. Repeat per dimension.
    #[arg(short, long = "select", value_name = "DIMENSION=VALUE")]
    pub selections: Vec<String>,
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Item id to add. Required unless `--product` is given.
    #[arg(required_unless_present = "product")]
    pub item: Option<String>,

    /// Resolve the item from a product definition (JSON) instead.
    #[arg(short, long, conflicts_with = "item")]
    pub product: Option<PathBuf>,

    /// Selected value, as `dimension=value`. Repeat per dimension.
    #[arg(short, long = "select", value_name = "DIMENSION=VALUE", requires = "product")]
    pub selections: Vec<String>,

    /// Quantity.
    #[arg(short, long, default_value_t = 1)]
    pub qty: i64,

    /// Note for the seller.
    #[arg(short, long, default_value = "")]
    pub note: String,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {}

/// Arguments for the favorite command.
#[derive(Args)]
pub struct FavoriteArgs {
    /// Product id.
    pub product_id: String,
}

/// Parse `dimension=value`.
pub fn parse_selection(raw: &str) -> Result<(DimensionId, ValueId)> {
    match raw.split_once('=') {
        Some((dimension, value)) if !dimension.trim().is_empty() && !value.trim().is_empty() => {
            Ok((dimension.trim().into(), value.trim().into()))
        }
        _ => bail!("Invalid selection '{}', expected DIMENSION=VALUE", raw),
    }
}

/// Read a product definition from a JSON file.
pub fn load_product(path: &Path) -> Result<ProductConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read product file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse product file: {}", path.display()))
}

/// Apply every selection, then wait for the controller to settle.
pub async fn select_and_settle(
    controller: &ConfigurationController,
    selections: &[String],
) -> Result<ConfiguratorView> {
    for raw in selections {
        let (dimension, value) = parse_selection(raw)?;
        controller
            .select(dimension, value)
            .with_context(|| format!("Cannot select {}", raw))?;
    }

    let mut views = controller.subscribe();
    let view = views
        .wait_for(|view| !view.is_loading)
        .await
        .context("Configurator closed while resolving")?
        .clone();
    Ok(view)
}

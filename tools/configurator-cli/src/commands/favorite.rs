//! Favorite command.

use anyhow::{Context as _, Result};
use serde_json::json;
use turbo_commerce::ProductId;

use super::FavoriteArgs;
use crate::context::Context;

/// Run the favorite command.
pub async fn run(args: FavoriteArgs, ctx: &Context) -> Result<()> {
    let product_id = ProductId::new(args.product_id.as_str());
    let favorited = ctx
        .favorites()
        .toggle(&product_id)
        .await
        .with_context(|| format!("Failed to toggle favorite for product {}", product_id))?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "product_id": product_id, "favorited": favorited }));
    } else if favorited {
        ctx.output.success(&format!("Product {} added to favorites", product_id));
    } else {
        ctx.output.success(&format!("Product {} removed from favorites", product_id));
    }
    Ok(())
}

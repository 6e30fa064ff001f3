//! Cart command.

use anyhow::{Context as _, Result};
use serde_json::json;
use turbo_commerce::cart::CartSnapshot;

use super::CartArgs;
use crate::context::Context;

/// Run the cart command.
pub async fn run(_args: CartArgs, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Fetching cart...");
    let snapshot = ctx.cart().refresh().await;
    spinner.finish_and_clear();

    let snapshot = snapshot.context("Failed to fetch cart")?;
    print_snapshot(&snapshot, ctx);
    Ok(())
}

/// Print a cart snapshot.
pub fn print_snapshot(snapshot: &CartSnapshot, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&json!(snapshot));
        return;
    }

    ctx.output.header("Cart");
    if snapshot.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    for line in &snapshot.lines {
        let note = if line.note.is_empty() {
            String::new()
        } else {
            format!(" ({})", line.note)
        };
        ctx.output.list_item(&format!("{} x {}{}", line.quantity, line.item_id, note));
    }
    for total in &snapshot.totals_by_attribute {
        ctx.output.kv(&total.label, &total.total.display());
    }
    ctx.output.kv("Subtotal", &snapshot.subtotal.display());
    ctx.output.kv("Total", &snapshot.grand_total.display());
}

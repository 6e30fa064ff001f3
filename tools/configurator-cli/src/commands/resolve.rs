//! Resolve command.

use anyhow::Result;
use serde_json::json;
use turbo_configurator::ConfiguratorView;

use super::{load_product, select_and_settle, ResolveArgs};
use crate::context::Context;
use crate::output::format_price;

/// Run the resolve command.
pub async fn run(args: ResolveArgs, ctx: &Context) -> Result<()> {
    let product = load_product(&args.product)?;
    let controller = ctx.controller(product)?;

    let spinner = ctx.output.spinner("Resolving selection...");
    let view = select_and_settle(&controller, &args.selections).await;
    spinner.finish_and_clear();
    let view = view?;

    if ctx.output.is_json() {
        ctx.output.json(&view_json(&view));
        return Ok(());
    }

    ctx.output.header(&controller.product().name);
    print_view(&view, ctx);
    Ok(())
}

/// Print the read model.
pub fn print_view(view: &ConfiguratorView, ctx: &Context) {
    ctx.output.kv("Selection", &view.label);
    ctx.output.kv("Price", &format_price(view.display_price, view.compare_at_price));

    match (&view.variant, &view.error) {
        (Some(variant), _) => {
            ctx.output.kv("Variant", variant.id.as_str());
            ctx.output.kv("Stock", variant.stock.status_message());
        }
        (None, Some(error)) => ctx.output.warn(error.user_message()),
        (None, None) if !view.selection_complete => ctx.output.info("Select a value for every option."),
        (None, None) => {}
    }

    if view.can_add_to_cart {
        ctx.output.success("Ready to add to cart");
    }
}

pub fn view_json(view: &ConfiguratorView) -> serde_json::Value {
    json!({
        "selection_complete": view.selection_complete,
        "is_loading": view.is_loading,
        "variant": view.variant,
        "error": view.error.as_ref().map(|e| e.to_string()),
        "can_add_to_cart": view.can_add_to_cart,
        "display_price": view.display_price.display(),
        "compare_at_price": view.compare_at_price.map(|p| p.display()),
        "label": view.label,
        "stock": view.stock,
    })
}

//! Add-to-cart command.

use anyhow::{bail, Result};
use turbo_commerce::VariantId;
use turbo_configurator::CartError;

use super::{load_product, select_and_settle, AddArgs};
use crate::commands::cart::print_snapshot;
use crate::commands::resolve::print_view;
use crate::context::Context;

/// Run the add command.
pub async fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    let gateway = ctx.cart();

    let result = match (&args.product, &args.item) {
        (Some(path), _) => {
            let controller = ctx.controller(load_product(path)?)?;
            let spinner = ctx.output.spinner("Resolving selection...");
            let view = select_and_settle(&controller, &args.selections).await;
            spinner.finish_and_clear();
            let view = view?;

            if !view.can_add_to_cart {
                if !ctx.output.is_json() {
                    print_view(&view, ctx);
                }
                bail!("Selection cannot be added to the cart");
            }

            let spinner = ctx.output.spinner("Adding to cart...");
            let result = controller.add_to_cart(&gateway, args.qty, &args.note).await;
            spinner.finish_and_clear();
            result
        }
        (None, Some(item)) => {
            let spinner = ctx.output.spinner("Adding to cart...");
            let result = gateway
                .add_to_cart(&VariantId::new(item.as_str()), args.qty, &args.note)
                .await;
            spinner.finish_and_clear();
            result
        }
        (None, None) => bail!("Either an item id or --product is required"),
    };

    match result {
        Ok(snapshot) => {
            ctx.output.success("Added to cart");
            print_snapshot(&snapshot, ctx);
            Ok(())
        }
        Err(CartError::Unauthenticated) => {
            bail!("{} Set CONFIGURATOR_TOKEN or pass --token.", CartError::Unauthenticated.user_message())
        }
        Err(e) => {
            tracing::debug!(error = %e, "add to cart failed");
            bail!("{}", e.user_message())
        }
    }
}

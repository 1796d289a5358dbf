//! Catalog browsing commands.

use shopfront_core::ProductId;
use shopfront_session::ProductCatalog;

use super::{Context, describe_product};
use crate::error::CliError;

/// List a category.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
#[allow(clippy::print_stdout)]
pub async fn products(ctx: &Context, category: &str) -> Result<(), CliError> {
    let products = ctx.catalog.get_by_category(category).await?;
    if products.is_empty() {
        println!("No products in category {category:?}");
        return Ok(());
    }

    for product in &products {
        let marker = if ctx.store.active_cart().quantity_of(product.id) > 0 {
            " [in cart]"
        } else {
            ""
        };
        println!("{}{marker}", describe_product(product));
    }
    Ok(())
}

/// Show one product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the request fails.
#[allow(clippy::print_stdout)]
pub async fn product(ctx: &Context, id: ProductId) -> Result<(), CliError> {
    let product = ctx.catalog.get_by_id(id).await?;
    println!("{}", describe_product(&product));
    if let Some(image) = &product.image {
        println!("  {image}");
    }

    let in_cart = ctx.store.active_cart().quantity_of(id);
    if in_cart > 0 {
        println!("  {in_cart} in cart");
    }
    if ctx.store.active_wishlist().contains(id) {
        println!("  on wishlist");
    }
    Ok(())
}

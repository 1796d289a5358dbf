//! Cart and wishlist commands.
//!
//! Products are resolved through the catalog before they reach the session,
//! so the cart always holds a fresh snapshot.

use shopfront_core::ProductId;
use shopfront_session::ProductCatalog;

use super::{Context, print_cart, print_wishlist};
use crate::error::CliError;

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the product cannot be resolved or the write-back fails.
#[allow(clippy::print_stdout)]
pub async fn add(ctx: &mut Context, id: ProductId) -> Result<(), CliError> {
    let product = ctx.catalog.get_by_id(id).await?;
    let name = product.name.clone();
    let quantity = ctx.store.add_to_cart(product).await?;
    println!("{name}: {quantity} in cart");
    Ok(())
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns an error if the write-back fails.
#[allow(clippy::print_stdout)]
pub async fn remove(ctx: &mut Context, id: ProductId) -> Result<(), CliError> {
    if ctx.store.remove_from_cart(id).await? {
        println!("Removed #{id}");
    } else {
        println!("#{id} was not in the cart");
    }
    Ok(())
}

/// Set the quantity of an existing line.
///
/// # Errors
///
/// Returns an error for a non-positive quantity, a missing line or a failed
/// write-back.
pub async fn quantity(ctx: &mut Context, id: ProductId, quantity: i64) -> Result<(), CliError> {
    ctx.store.set_quantity(id, quantity).await?;
    print_cart(ctx.store.active_cart());
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the write-back fails.
pub async fn clear(ctx: &mut Context) -> Result<(), CliError> {
    ctx.store.clear_cart().await?;
    print_cart(ctx.store.active_cart());
    Ok(())
}

/// Save a product to the wishlist.
///
/// # Errors
///
/// Returns an error if the product cannot be resolved or the write-back fails.
#[allow(clippy::print_stdout)]
pub async fn wish_add(ctx: &mut Context, id: ProductId) -> Result<(), CliError> {
    let product = ctx.catalog.get_by_id(id).await?;
    let name = product.name.clone();
    if ctx.store.add_to_wishlist(product).await? {
        println!("Saved {name} to wishlist");
    } else {
        println!("{name} is already on the wishlist");
    }
    Ok(())
}

/// Remove a product from the wishlist.
///
/// # Errors
///
/// Returns an error if the write-back fails.
#[allow(clippy::print_stdout)]
pub async fn wish_remove(ctx: &mut Context, id: ProductId) -> Result<(), CliError> {
    if ctx.store.remove_from_wishlist(id).await? {
        println!("Removed #{id} from wishlist");
    } else {
        println!("#{id} was not on the wishlist");
    }
    Ok(())
}

/// Empty the wishlist.
///
/// # Errors
///
/// Returns an error if the write-back fails.
pub async fn wish_clear(ctx: &mut Context) -> Result<(), CliError> {
    ctx.store.clear_wishlist().await?;
    print_wishlist(ctx.store.active_wishlist());
    Ok(())
}

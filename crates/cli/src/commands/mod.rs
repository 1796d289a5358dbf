//! Command implementations.
//!
//! Each command receives a [`Context`] holding the restored session and its
//! collaborators. Output goes to stdout; diagnostics go through `tracing`.

pub mod account;
pub mod cart;
pub mod catalog;

use std::path::PathBuf;
use std::sync::Arc;

use shopfront_core::{Cart, ProductRef, Wishlist};
use shopfront_session::{
    HttpCatalog, JsonFileDirectory, SessionStore, ShopfrontConfig, UserDirectory,
};

use crate::error::CliError;
use crate::session_file;

/// Everything one invocation needs.
pub struct Context {
    pub store: SessionStore,
    pub catalog: HttpCatalog,
    pub directory: Arc<JsonFileDirectory>,
    session_path: PathBuf,
}

impl Context {
    /// Restore the saved session and wire it to the file directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the saved session cannot be read.
    pub async fn open(config: &ShopfrontConfig) -> Result<Self, CliError> {
        let session_path = config.session_path();
        let session = session_file::load(&session_path).await?;
        let directory = Arc::new(JsonFileDirectory::new(config.users_path()));
        let store = SessionStore::restore(
            Arc::clone(&directory) as Arc<dyn UserDirectory>,
            session,
        );

        Ok(Self {
            store,
            catalog: HttpCatalog::new(&config.catalog),
            directory,
            session_path,
        })
    }

    /// Save the session back for the next invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be written.
    pub async fn close(self) -> Result<(), CliError> {
        session_file::save(&self.session_path, self.store.session()).await
    }
}

fn describe_product(product: &ProductRef) -> String {
    let stock = if product.in_stock { "" } else { " (out of stock)" };
    format!(
        "#{} {} {}{stock}",
        product.id, product.name, product.unit_price
    )
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    println!("Cart ({} items):", cart.total_quantity());
    for line in cart.lines() {
        println!(
            "  {} x {} = {}",
            line.quantity,
            describe_product(&line.product),
            line.line_price()
        );
    }
    match cart.subtotal() {
        Some(subtotal) => println!("Subtotal: {subtotal}"),
        None => println!("Subtotal: n/a (mixed currencies)"),
    }
}

#[allow(clippy::print_stdout)]
fn print_wishlist(wishlist: &Wishlist) {
    if wishlist.is_empty() {
        println!("Wishlist is empty");
        return;
    }

    println!("Wishlist ({} items):", wishlist.len());
    for entry in wishlist.entries() {
        println!("  {}", describe_product(&entry.product));
    }
}

//! Account commands: register, login, logout, show, sync and users.

use secrecy::SecretString;
use tracing::warn;

use shopfront_session::{AuthState, SyncStatus, UserDirectory};

use super::{Context, print_cart, print_wishlist};
use crate::error::CliError;

/// Create an account seeded with the anonymous cart and wishlist.
///
/// # Errors
///
/// Returns an error if the email is invalid or already registered.
#[allow(clippy::print_stdout)]
pub async fn register(
    ctx: &mut Context,
    name: &str,
    email: &str,
    password: String,
) -> Result<(), CliError> {
    let password = SecretString::from(password);
    let account = ctx.store.register(name, email, &password).await?;

    println!(
        "Registered {} <{}> with {} cart lines and {} wishlist entries",
        account.display_name,
        account.email,
        account.cart.len(),
        account.wishlist.len()
    );
    println!("Run `shopfront login` to use the account");
    Ok(())
}

/// Log in and merge the anonymous cart and wishlist.
///
/// # Errors
///
/// Returns an error for bad credentials or an unavailable directory.
#[allow(clippy::print_stdout)]
pub async fn login(ctx: &mut Context, email: &str, password: String) -> Result<(), CliError> {
    let password = SecretString::from(password);
    ctx.store.login(email, &password).await?;

    if let Some(account) = ctx.store.current_user() {
        println!("Logged in as {} <{}>", account.display_name, account.email);
    }
    print_cart(ctx.store.active_cart());
    Ok(())
}

/// Log out, keeping the account's saved cart for the next login.
///
/// # Errors
///
/// Returns an error if pending account changes could not be saved. The
/// session is logged out either way.
#[allow(clippy::print_stdout)]
pub async fn logout(ctx: &mut Context) -> Result<(), CliError> {
    if !ctx.store.is_authenticated() {
        println!("Not logged in");
        return Ok(());
    }

    ctx.store.logout().await?;
    println!("Logged out");
    Ok(())
}

/// Print who is logged in, the active containers and the sync status.
#[allow(clippy::print_stdout)]
pub fn show(ctx: &Context) {
    let session = ctx.store.session();
    match session.auth() {
        AuthState::Anonymous => println!("Browsing anonymously (session {})", session.id()),
        AuthState::Authenticated { account } => println!(
            "Logged in as {} <{}> (session {})",
            account.display_name,
            account.email,
            session.id()
        ),
    }

    print_cart(ctx.store.active_cart());
    print_wishlist(ctx.store.active_wishlist());

    if let SyncStatus::Pending { reason } = ctx.store.sync_status() {
        println!("Unsaved account changes: {reason}");
        println!("Run `shopfront sync` to retry");
    }
}

/// Retry a pending write-back.
///
/// # Errors
///
/// Returns an error if the directory is still unavailable.
#[allow(clippy::print_stdout)]
pub async fn sync(ctx: &mut Context) -> Result<(), CliError> {
    if !ctx.store.sync_status().is_pending() {
        println!("Nothing to sync");
        return Ok(());
    }

    ctx.store.retry_sync().await?;
    println!("Account changes saved");
    Ok(())
}

/// List registered accounts. Credential hashes are never printed.
///
/// # Errors
///
/// Returns an error if the user directory cannot be read.
#[allow(clippy::print_stdout)]
pub async fn users(ctx: &Context) -> Result<(), CliError> {
    let accounts = ctx.directory.list().await?;
    if accounts.is_empty() {
        warn!(path = %ctx.directory.path().display(), "No accounts registered");
        return Ok(());
    }

    for account in accounts {
        println!(
            "{} <{}>  cart: {} items  wishlist: {}  since {}",
            account.display_name,
            account.email,
            account.cart.total_quantity(),
            account.wishlist.len(),
            account.created_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

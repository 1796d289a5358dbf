//! Shopfront CLI - Browse the catalog and manage a cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse a category and add a product
//! shopfront products electronics
//! shopfront add 9
//!
//! # Create an account seeded with the current cart, then log in
//! shopfront register -n "Ada" -e ada@example.com -p 'hunter2 hunter2'
//! shopfront login -e ada@example.com -p 'hunter2 hunter2'
//!
//! # Inspect the session
//! shopfront show
//! ```
//!
//! Every invocation restores the session from `session.json` in the data
//! directory, applies one command and saves the session back, so a shell
//! session behaves like one continuous browsing session.
//!
//! # Commands
//!
//! - `register`, `login`, `logout` - Account transitions
//! - `show` - Print the active cart, wishlist and sync status
//! - `products`, `product` - Catalog lookups
//! - `add`, `remove`, `quantity`, `clear` - Cart edits
//! - `wish` - Wishlist edits
//! - `sync` - Retry a failed account write-back
//! - `users` - List registered accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopfront_core::ProductId;
use shopfront_session::ShopfrontConfig;

mod commands;
mod error;
mod session_file;

use commands::Context;
use error::CliError;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront shopper CLI")]
struct Cli {
    /// Directory holding users.json and session.json (overrides `SHOPFRONT_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account from the current anonymous cart and wishlist
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address (case-sensitive)
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log in, merging the anonymous cart and wishlist into the account
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log out and start a fresh anonymous session
    Logout,
    /// Show the session, active cart and wishlist
    Show,
    /// List the products in a catalog category
    Products {
        /// Category name, e.g. `electronics`
        category: String,
    },
    /// Show a single catalog product
    Product {
        /// Product ID
        id: ProductId,
    },
    /// Add one unit of a product to the cart
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Remove a product's line from the cart
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Quantity {
        /// Product ID
        id: ProductId,

        /// New quantity (at least 1)
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Manage the wishlist
    Wish {
        #[command(subcommand)]
        action: WishAction,
    },
    /// Retry a pending account write-back
    Sync,
    /// List registered accounts
    Users,
}

#[derive(Subcommand)]
enum WishAction {
    /// Save a product to the wishlist
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Remove a product from the wishlist
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Empty the wishlist
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ShopfrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront=info,shopfront_session=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match ShopfrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Some(data_dir) = cli.data_dir.clone() {
        config.data_dir = data_dir;
    }

    // Sentry must be initialized before the subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing();

    let result = run(cli.command, &config).await;

    if let Err(e) = &result {
        tracing::error!("Command failed: {e}");
    }

    // Flush Sentry before exiting
    drop(sentry_guard);
    if result.is_err() {
        std::process::exit(1);
    }
}

/// Restore the session, apply `command` and save the session back.
///
/// The session is saved even when the command fails: a failed write-back
/// still leaves the change in the session, marked pending.
async fn run(command: Commands, config: &ShopfrontConfig) -> Result<(), CliError> {
    let mut ctx = Context::open(config).await?;
    let result = dispatch(&mut ctx, command).await;
    let saved = ctx.close().await;
    result.and(saved)
}

async fn dispatch(ctx: &mut Context, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Register {
            name,
            email,
            password,
        } => commands::account::register(ctx, &name, &email, password).await,
        Commands::Login { email, password } => {
            commands::account::login(ctx, &email, password).await
        }
        Commands::Logout => commands::account::logout(ctx).await,
        Commands::Show => {
            commands::account::show(ctx);
            Ok(())
        }
        Commands::Sync => commands::account::sync(ctx).await,
        Commands::Users => commands::account::users(ctx).await,
        Commands::Products { category } => commands::catalog::products(ctx, &category).await,
        Commands::Product { id } => commands::catalog::product(ctx, id).await,
        Commands::Add { id } => commands::cart::add(ctx, id).await,
        Commands::Remove { id } => commands::cart::remove(ctx, id).await,
        Commands::Quantity { id, quantity } => commands::cart::quantity(ctx, id, quantity).await,
        Commands::Clear => commands::cart::clear(ctx).await,
        Commands::Wish { action } => match action {
            WishAction::Add { id } => commands::cart::wish_add(ctx, id).await,
            WishAction::Remove { id } => commands::cart::wish_remove(ctx, id).await,
            WishAction::Clear => commands::cart::wish_clear(ctx).await,
        },
    }
}

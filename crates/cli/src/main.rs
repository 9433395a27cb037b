//! GoMarketplace CLI - inspect and edit a persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart (add --json for machine-readable output)
//! gm-cli cart show
//!
//! # Add a product
//! gm-cli cart add --id p1 --title "Widget" --image-url https://img/p1.png --price 10
//!
//! # Change quantities
//! gm-cli cart increment p1
//! gm-cli cart decrement p1
//!
//! # Forget the persisted cart
//! gm-cli cart clear
//! ```
//!
//! Each invocation opens the file-backed store, hydrates it, applies the
//! command and exits. A failed write is logged and does not fail the command.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use gomarketplace_cart::CartConfig;
use gomarketplace_core::{NewCartItem, ProductId};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "gm-cli")]
#[command(author, version, about = "GoMarketplace cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart lines, item count and total
    Show {
        /// Print the cart view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Append a product with a quantity of one
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product title
        #[arg(long)]
        title: String,

        /// Product image URL
        #[arg(long, default_value = "")]
        image_url: String,

        /// Unit price
        #[arg(long, value_parser = commands::cart::parse_price)]
        price: Decimal,
    },
    /// Add one unit to a product's lines
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit from a product's lines (never below zero)
    Decrement {
        /// Product ID
        id: String,
    },
    /// Remove the persisted cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
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

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = CartConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gomarketplace_cart=info,gm_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CartConfig) -> Result<(), commands::cart::CartCommandError> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show { json } => commands::cart::show(config, json).await?,
            CartAction::Add {
                id,
                title,
                image_url,
                price,
            } => {
                let item = NewCartItem::new(id, title, image_url, price);
                commands::cart::add(config, item).await?;
            }
            CartAction::Increment { id } => {
                commands::cart::increment(config, &ProductId::new(id)).await?;
            }
            CartAction::Decrement { id } => {
                commands::cart::decrement(config, &ProductId::new(id)).await?;
            }
            CartAction::Clear => commands::cart::clear(config).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_command() {
        let cli = Cli::try_parse_from([
            "gm-cli", "cart", "add", "--id", "p1", "--title", "Widget", "--price", "10.5",
        ]);
        let Ok(Cli {
            command: Commands::Cart {
                action: CartAction::Add { id, price, image_url, .. },
            },
        }) = cli
        else {
            panic!("expected cart add command");
        };
        assert_eq!(id, "p1");
        assert_eq!(price, Decimal::new(105, 1));
        assert!(image_url.is_empty());
    }

    #[test]
    fn test_negative_price_rejected() {
        let cli = Cli::try_parse_from([
            "gm-cli", "cart", "add", "--id", "p1", "--title", "Widget", "--price=-3",
        ]);
        let Err(err) = cli else {
            panic!("negative price should not parse");
        };
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("must not be negative"));
    }
}

//! Tiendita CLI - Catalog and cart management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! tiendita catalog
//!
//! # Inspect and edit the persisted cart
//! tiendita cart show
//! tiendita cart add p1
//! tiendita cart set p1 3
//! tiendita cart remove p1
//! ```
//!
//! The cart file is the same one the storefront uses (`TIENDITA_DATA_PATH`,
//! default `data/cart.json`), so edits here show up on the next page load.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tiendita")]
#[command(author, version, about = "Tiendita CLI tools")]
struct Cli {
    /// Cart storage file (overrides `TIENDITA_DATA_PATH`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Product list file (overrides `TIENDITA_CATALOG_PATH`)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Catalog,
    /// Inspect or edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: String,
    },
    /// Remove a product's line
    Remove {
        /// Product id
        id: String,
    },
    /// Set a line's quantity
    Set {
        /// Product id
        id: String,
        /// New quantity (1-10)
        quantity: String,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CliError> {
    let mut context = commands::Context::load(cli.data, cli.catalog)?;

    let output = match cli.command {
        Commands::Catalog => commands::catalog::list(&context),
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&context),
            CartAction::Add { id } => commands::cart::add(&mut context, &id)?,
            CartAction::Remove { id } => commands::cart::remove(&mut context, &id)?,
            CartAction::Set { id, quantity } => {
                commands::cart::set(&mut context, &id, &quantity)?
            }
        },
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

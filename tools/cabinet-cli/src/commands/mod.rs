//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod shop;

use clap::{Args, Subcommand};

/// Arguments for the shop command.
#[derive(Args)]
pub struct ShopArgs {
    /// Only show this category ("all" for everything).
    #[arg(short, long)]
    pub category: Option<String>,

    /// Filter by name, description or artist.
    #[arg(short, long)]
    pub search: Option<String>,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product id.
    pub id: String,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart (default).
    Show,

    /// Add a product to the cart.
    Add {
        /// Product id.
        id: String,

        /// How many to add.
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },

    /// Set the quantity of a line item (0 or less removes it).
    Update {
        /// Product id.
        id: String,

        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a line item.
    Remove {
        /// Product id.
        id: String,
    },

    /// Empty the cart.
    Clear,

    /// Review the cart for checkout.
    Checkout,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Initialize a new config file.
    Init {
        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },

    /// Check that the catalog and storage are usable.
    Validate,
}

//! Cabinet CLI - a terminal storefront for the cabinet of curiosities.
//!
//! Commands:
//! - `cabinet shop` - Browse the collection, by category or search
//! - `cabinet featured` - List featured pieces
//! - `cabinet product` - Show one product in detail
//! - `cabinet categories` - List categories
//! - `cabinet cart` - Show and change the persistent cart
//! - `cabinet config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CartArgs, ConfigArgs, ProductArgs, ShopArgs};

/// Cabinet CLI - browse the collection and keep a cart between sessions
#[derive(Parser)]
#[command(name = "cabinet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the collection
    Shop(ShopArgs),

    /// List featured pieces
    Featured,

    /// Show a product in detail
    Product(ProductArgs),

    /// List categories
    Categories,

    /// Show or change the cart
    Cart(CartArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Shop(args) => commands::shop::run(args, &ctx),
        Commands::Featured => commands::shop::featured(&ctx),
        Commands::Product(args) => commands::shop::product(args, &ctx),
        Commands::Categories => commands::shop::categories(&ctx),
        Commands::Cart(args) => commands::cart::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

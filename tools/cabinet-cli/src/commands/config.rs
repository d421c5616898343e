//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::{find_config_file, Context};

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");

    match find_config_file(&ctx.cwd) {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("[storage]");
    ctx.output.kv("data_dir", &ctx.data_dir().display().to_string());
    ctx.output.kv("cart_key", &ctx.config.storage.cart_key);

    ctx.output.info("[catalog]");
    match &ctx.config.catalog.path {
        Some(path) => ctx.output.kv("path", &ctx.resolve_path(path).display().to_string()),
        None => ctx.output.kv("path", "(built-in)"),
    }

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("cabinet.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();

    if ctx.config.storage.cart_key.trim().is_empty() {
        errors.push("storage.cart_key must not be empty".to_string());
    }

    match ctx.catalog() {
        Ok(catalog) => ctx.output.success(&format!(
            "Catalog: {} products in {} categories",
            catalog.products().len(),
            catalog.categories().len()
        )),
        Err(e) => errors.push(format!("{:#}", e)),
    }

    match ctx.open_store() {
        Ok(store) => ctx
            .output
            .success(&format!("Cart: {} items", store.item_count())),
        Err(e) => errors.push(format!("{:#}", e)),
    }

    if !errors.is_empty() {
        for error in &errors {
            ctx.output.error(error);
        }
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid");

    Ok(())
}

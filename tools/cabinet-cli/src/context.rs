//! CLI execution context.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context as _, Result};
use cabinet_cache::Cache;
use cabinet_commerce::cart::{CartStore, KvCartStorage};
use cabinet_commerce::catalog::Catalog;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            find_config_file(&cwd)
                .and_then(|path| match CliConfig::load(&path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                        None
                    }
                })
                .unwrap_or_default()
        };

        Ok(Self { config, output, cwd })
    }

    /// Directory holding the cart store.
    pub fn data_dir(&self) -> PathBuf {
        match &self.config.storage.data_dir {
            Some(dir) => self.resolve_path(dir),
            None => dirs_path().join("cabinet"),
        }
    }

    /// Open the persistent cart store.
    pub fn open_store(&self) -> Result<Rc<CartStore>> {
        let dir = self.data_dir();
        let cache = Cache::open_dir(&dir)
            .with_context(|| format!("Failed to open cart storage at {}", dir.display()))?;
        let storage = KvCartStorage::new(cache).with_key(self.config.storage.cart_key.clone());

        tracing::debug!(dir = %dir.display(), key = storage.key(), "opening cart");
        Ok(Rc::new(CartStore::open(storage)))
    }

    /// Load the configured catalog, or the built-in one.
    pub fn catalog(&self) -> Result<Catalog> {
        match &self.config.catalog.path {
            Some(path) => {
                let path = self.resolve_path(path);
                Catalog::from_path(&path)
                    .with_context(|| format!("Failed to load catalog from {}", path.display()))
            }
            None => Catalog::builtin().context("Built-in catalog is invalid"),
        }
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                return PathBuf::from(home).join(rest);
            }
        }
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find the nearest config file, walking up from `start`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from("/tmp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabinet_commerce::catalog::Product;

    fn context(dir: &Path, config: CliConfig) -> Context {
        Context {
            config,
            output: Output::new(false, true),
            cwd: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_find_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".cabinet.toml"), "").unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(".cabinet.toml"));
    }

    #[test]
    fn test_relative_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CliConfig::default();
        config.storage.data_dir = Some("state".to_string());

        let ctx = context(dir.path(), config);
        assert_eq!(ctx.data_dir(), dir.path().join("state"));
    }

    #[test]
    fn test_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CliConfig::default();
        config.storage.data_dir = Some(dir.path().to_string_lossy().into_owned());
        let ctx = context(dir.path(), config);

        let catalog = ctx.catalog().unwrap();
        let vase: &Product = catalog.get_by_id("moon-vase").unwrap();
        ctx.open_store().unwrap().add_item(vase.to_snapshot(), 2).unwrap();

        let reopened = ctx.open_store().unwrap();
        assert_eq!(reopened.item_count(), 2);
    }

    #[test]
    fn test_missing_catalog_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CliConfig::default();
        config.catalog.path = Some("missing.json".to_string());

        let ctx = context(dir.path(), config);
        assert!(ctx.catalog().is_err());
    }
}

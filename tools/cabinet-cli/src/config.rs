//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use cabinet_commerce::cart::CART_STORAGE_KEY;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, from the working directory upwards.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["cabinet.toml", ".cabinet.toml", "cabinet.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Where the cart is kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Which catalog to browse.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

/// Cart storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory holding the key-value store (default: platform data dir).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,

    /// Key the cart is stored under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_cart_key() -> String {
    CART_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            cart_key: default_cart_key(),
        }
    }
}

/// Catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// JSON catalog file to use instead of the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Generate a commented default config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Cabinet storefront configuration

[storage]
# data_dir = "~/.local/share/cabinet"
cart_key = "{CART_STORAGE_KEY}"

[catalog]
# path = "catalog.json"
"#
    )
}

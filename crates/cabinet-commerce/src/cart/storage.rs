//! Cart persistence.
//!
//! The whole cart is written to a single storage slot on every change and
//! read back whole when a store is opened. The stored value is a small JSON
//! envelope:
//!
//! ```json
//! {"version": 1, "items": [{"id": "moon-vase", "name": "Moon Vase", "price": 68.0,
//!   "image": "/images/moon-vase.jpg", "artist": "Noor Haddad", "quantity": 2}]}
//! ```
//!
//! A bare JSON array of items (the unversioned layout) is still accepted
//! when loading.

use cabinet_cache::Cache;
use serde::{Deserialize, Serialize};

use crate::cart::LineItem;
use crate::error::CommerceError;

/// Storage key the cart lives under.
pub const CART_STORAGE_KEY: &str = "cabinet-fragments-cart";

/// Version written into every persisted cart.
pub const CART_FORMAT_VERSION: u32 = 1;

/// Where a [`CartStore`](crate::cart::CartStore) keeps its items between runs.
pub trait CartStorage {
    /// Read the persisted items. `Ok(None)` means nothing was stored yet.
    fn load(&self) -> Result<Option<Vec<LineItem>>, CommerceError>;

    /// Replace the persisted items.
    fn save(&self, items: &[LineItem]) -> Result<(), CommerceError>;
}

#[derive(Serialize)]
struct PersistedCartRef<'a> {
    version: u32,
    items: &'a [LineItem],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedCart {
    Versioned { version: u32, items: Vec<LineItem> },
    Legacy(Vec<LineItem>),
}

impl PersistedCart {
    fn into_items(self) -> Result<Vec<LineItem>, CommerceError> {
        match self {
            PersistedCart::Versioned { version, items } if version == CART_FORMAT_VERSION => {
                Ok(items)
            }
            PersistedCart::Versioned { version, .. } => {
                Err(CommerceError::UnsupportedVersion(version))
            }
            PersistedCart::Legacy(items) => Ok(items),
        }
    }
}

/// Encode items in the persisted layout.
pub fn encode_cart(items: &[LineItem]) -> Result<String, CommerceError> {
    Ok(serde_json::to_string(&PersistedCartRef {
        version: CART_FORMAT_VERSION,
        items,
    })?)
}

/// Decode items from the persisted layout (versioned or bare array).
pub fn decode_cart(json: &str) -> Result<Vec<LineItem>, CommerceError> {
    serde_json::from_str::<PersistedCart>(json)?.into_items()
}

/// [`CartStorage`] backed by a key-value [`Cache`].
#[derive(Debug, Clone)]
pub struct KvCartStorage {
    cache: Cache,
    key: String,
}

impl KvCartStorage {
    /// Store the cart under [`CART_STORAGE_KEY`].
    pub fn new(cache: Cache) -> Self {
        Self {
            cache,
            key: CART_STORAGE_KEY.to_string(),
        }
    }

    /// Use a different storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Session-only storage; nothing survives the process.
    pub fn memory() -> Self {
        Self::new(Cache::memory())
    }

    /// The key this storage writes to.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl CartStorage for KvCartStorage {
    fn load(&self) -> Result<Option<Vec<LineItem>>, CommerceError> {
        match self.cache.get::<PersistedCart>(&self.key)? {
            Some(persisted) => Ok(Some(persisted.into_items()?)),
            None => Ok(None),
        }
    }

    fn save(&self, items: &[LineItem]) -> Result<(), CommerceError> {
        self.cache.set(
            &self.key,
            &PersistedCartRef {
                version: CART_FORMAT_VERSION,
                items,
            },
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ProductSnapshot;
    use cabinet_cache::{Backend, MemoryBackend};

    fn items() -> Vec<LineItem> {
        vec![
            ProductSnapshot::new("moon-vase", "Moon Vase", 68.0, "/moon.jpg", "Noor Haddad")
                .into_line_item(2),
            ProductSnapshot::new("moth-atlas", "Moth Atlas", 28.5, "/moth.jpg", "Ode Park")
                .into_line_item(1),
        ]
    }

    #[test]
    fn test_codec_roundtrip_preserves_order_and_fields() {
        let original = items();
        let json = encode_cart(&original).unwrap();
        let decoded = decode_cart(&json).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_encoded_layout() {
        let json = encode_cart(&items()[..1]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["items"][0]["id"], "moon-vase");
        assert_eq!(value["items"][0]["quantity"], 2);
        assert!(value["items"][0]["quantity"].is_i64());
        assert_eq!(value["items"][0]["price"], 68.0);
    }

    #[test]
    fn test_decode_legacy_array() {
        let json = r#"[{"id":"a","name":"A","price":10,"image":"/a.jpg","artist":"X","quantity":3}]"#;
        let decoded = decode_cart(json).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].quantity, 3);
        assert_eq!(decoded[0].price, 10.0);
    }

    #[test]
    fn test_decode_unknown_version() {
        let json = r#"{"version": 99, "items": []}"#;
        assert!(matches!(
            decode_cart(json),
            Err(CommerceError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_decode_malformed() {
        assert!(decode_cart("{\"items\": 4").is_err());
        assert!(decode_cart(r#"{"version": 1}"#).is_err());
        assert!(decode_cart(r#"[{"id": "a"}]"#).is_err());
    }

    #[test]
    fn test_kv_storage_load_empty() {
        assert!(KvCartStorage::memory().load().unwrap().is_none());
    }

    #[test]
    fn test_kv_storage_save_and_load() {
        let backend = MemoryBackend::new();
        let storage = KvCartStorage::new(Cache::new(backend.clone()));

        storage.save(&items()).unwrap();

        assert!(backend.exists(CART_STORAGE_KEY).unwrap());
        assert_eq!(storage.load().unwrap(), Some(items()));
    }

    #[test]
    fn test_kv_storage_custom_key() {
        let backend = MemoryBackend::new();
        let storage = KvCartStorage::new(Cache::new(backend.clone())).with_key("cart:guest");

        storage.save(&[]).unwrap();

        assert_eq!(storage.key(), "cart:guest");
        assert_eq!(backend.keys().unwrap(), vec!["cart:guest".to_string()]);
    }

    #[test]
    fn test_kv_storage_malformed_value() {
        let backend = MemoryBackend::new();
        backend.set(CART_STORAGE_KEY, b"not json at all").unwrap();
        let storage = KvCartStorage::new(Cache::new(backend));

        assert!(matches!(
            storage.load(),
            Err(CommerceError::SerializationError(_))
        ));
    }
}

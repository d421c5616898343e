//! Read-only in-memory catalog.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Category, Product, ALL_CATEGORIES};
use crate::error::CommerceError;
use crate::ids::{CategoryId, ProductId};

/// Catalog bundled with the crate.
const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// On-disk catalog layout.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogSeed {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

/// Static product catalog.
///
/// Products keep the order they were declared in; every query returns them
/// in that order.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, checking that ids are unique and every product
    /// points at a known category.
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Result<Self, CommerceError> {
        let mut category_ids = HashSet::new();
        for category in &categories {
            if category.is_wildcard() {
                return Err(CommerceError::ValidationError(format!(
                    "category id {:?} is reserved",
                    ALL_CATEGORIES
                )));
            }
            if !category_ids.insert(&category.id) {
                return Err(CommerceError::ValidationError(format!(
                    "duplicate category id: {}",
                    category.id
                )));
            }
        }

        let mut product_ids = HashSet::new();
        for product in &products {
            if !product_ids.insert(&product.id) {
                return Err(CommerceError::ValidationError(format!(
                    "duplicate product id: {}",
                    product.id
                )));
            }
            if !category_ids.contains(&product.category) {
                return Err(CommerceError::CategoryNotFound(product.category.to_string()));
            }
            if !product.price.is_finite() || product.price < 0.0 {
                return Err(CommerceError::InvalidPrice(product.price));
            }
        }

        debug!(
            categories = categories.len(),
            products = products.len(),
            "catalog loaded"
        );
        Ok(Self {
            categories,
            products,
        })
    }

    /// Parse a catalog from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        let seed: CatalogSeed = serde_json::from_str(json)?;
        Self::new(seed.categories, seed.products)
    }

    /// Load a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CommerceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CommerceError::ValidationError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// The catalog shipped with the storefront.
    pub fn builtin() -> Result<Self, CommerceError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// All products.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All real categories (the wildcard is not included).
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Look up a product.
    pub fn get_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Look up a product, failing if it is missing.
    pub fn require(&self, id: &ProductId) -> Result<&Product, CommerceError> {
        self.get_by_id(id.as_str())
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    /// Products in `category`. [`ALL_CATEGORIES`] returns everything and an
    /// unknown category returns nothing.
    pub fn get_by_category(&self, category: &str) -> Vec<&Product> {
        if category == ALL_CATEGORIES {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Free-text search over name, description and artist.
    ///
    /// Matching is a case-insensitive substring test. A blank query returns
    /// every product.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.products.iter().collect();
        }
        self.products.iter().filter(|p| p.matches(&needle)).collect()
    }

    /// Products flagged as featured.
    pub fn featured(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.featured).collect()
    }

    /// Number of products in each category, in category order.
    pub fn category_counts(&self) -> Vec<(&CategoryId, usize)> {
        self.categories
            .iter()
            .map(|c| {
                let count = self.products.iter().filter(|p| p.category == c.id).count();
                (&c.id, count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{
                "categories": [
                    {"id": "ceramics", "name": "Ceramics", "icon": "c"},
                    {"id": "prints", "name": "Prints", "icon": "p"}
                ],
                "products": [
                    {"id": "bowl", "name": "Ash Bowl", "price": 40, "image": "/b.jpg",
                     "category": "ceramics", "artist": "Mira Sol",
                     "description": "Glazed in wood ash", "featured": true},
                    {"id": "map", "name": "Tide Map", "price": 25.5, "image": "/m.jpg",
                     "category": "prints", "artist": "Ode Park",
                     "description": "Risograph of the harbour"},
                    {"id": "cup", "name": "Moss Cup", "price": 18, "image": "/c.jpg",
                     "category": "ceramics", "artist": "Mira Sol",
                     "description": "Small cup", "featured": true}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_get_by_id() {
        let catalog = catalog();
        assert_eq!(catalog.get_by_id("map").unwrap().name, "Tide Map");
        assert!(catalog.get_by_id("nope").is_none());
    }

    #[test]
    fn test_require_missing() {
        let catalog = catalog();
        let result = catalog.require(&ProductId::new("nope"));
        assert!(matches!(result, Err(CommerceError::ProductNotFound(id)) if id == "nope"));
    }

    #[test]
    fn test_get_by_category() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.get_by_category("ceramics")), vec!["bowl", "cup"]);
        assert_eq!(ids(&catalog.get_by_category("all")), vec!["bowl", "map", "cup"]);
        assert!(catalog.get_by_category("textiles").is_empty());
    }

    #[test]
    fn test_search() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.search("MIRA")), vec!["bowl", "cup"]);
        assert_eq!(ids(&catalog.search("harbour")), vec!["map"]);
        assert_eq!(ids(&catalog.search("moss")), vec!["cup"]);
        assert!(catalog.search("velvet").is_empty());
        assert_eq!(catalog.search("   ").len(), 3);
    }

    #[test]
    fn test_featured() {
        assert_eq!(ids(&catalog().featured()), vec!["bowl", "cup"]);
    }

    #[test]
    fn test_category_counts() {
        let catalog = catalog();
        let counts: Vec<(String, usize)> = catalog
            .category_counts()
            .into_iter()
            .map(|(id, n)| (id.to_string(), n))
            .collect();
        assert_eq!(
            counts,
            vec![("ceramics".to_string(), 2), ("prints".to_string(), 1)]
        );
    }

    #[test]
    fn test_rejects_unknown_category() {
        let result = Catalog::new(
            vec![],
            vec![serde_json::from_str(
                r#"{"id": "x", "name": "X", "price": 1, "image": "", "category": "void", "artist": ""}"#,
            )
            .unwrap()],
        );
        assert!(matches!(result, Err(CommerceError::CategoryNotFound(c)) if c == "void"));
    }

    #[test]
    fn test_rejects_duplicate_products() {
        let product: Product = serde_json::from_str(
            r#"{"id": "x", "name": "X", "price": 1, "image": "", "category": "prints", "artist": ""}"#,
        )
        .unwrap();
        let result = Catalog::new(
            vec![Category::new("prints", "Prints", "")],
            vec![product.clone(), product],
        );
        assert!(matches!(result, Err(CommerceError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_reserved_category() {
        let result = Catalog::new(vec![Category::all()], vec![]);
        assert!(matches!(result, Err(CommerceError::ValidationError(_))));
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.categories().len(), 5);
        assert!(!catalog.featured().is_empty());
        for category in catalog.categories() {
            assert!(!catalog.get_by_category(category.id.as_str()).is_empty());
        }
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"{"categories": [], "products": []}"#).unwrap();

        let catalog = Catalog::from_path(&path).unwrap();
        assert!(catalog.products().is_empty());
        assert!(Catalog::from_path(dir.path().join("missing.json")).is_err());
    }
}

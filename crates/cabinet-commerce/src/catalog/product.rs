//! Product records.

use crate::cart::ProductSnapshot;
use crate::ids::{CategoryId, ProductId};
use serde::{Deserialize, Serialize};

/// Rating at or above which a product is shown as a favourite.
pub const TOP_RATED_THRESHOLD: f64 = 4.8;

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: f64,
    /// Primary image URL.
    pub image: String,
    /// Additional gallery images.
    #[serde(default)]
    pub images: Vec<String>,
    /// Category this product belongs to.
    pub category: CategoryId,
    /// Maker of the piece.
    pub artist: String,
    /// Short description for listings.
    #[serde(default)]
    pub description: String,
    /// Longer story shown on the detail page.
    #[serde(default)]
    pub backstory: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub dimensions: String,
    /// Average rating, 0.0 to 5.0.
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews behind `rating`.
    #[serde(default)]
    pub reviews: u32,
    /// Whether the product appears in featured listings.
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// Snapshot of the fields a cart line item keeps.
    pub fn to_snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            artist: self.artist.clone(),
        }
    }

    /// Check if the product is rated highly enough to be highlighted.
    pub fn is_top_rated(&self) -> bool {
        self.rating >= TOP_RATED_THRESHOLD
    }

    /// All images, primary first.
    pub fn gallery(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.image.as_str())
            .chain(self.images.iter().map(String::as_str).filter(move |i| *i != self.image))
    }

    /// Case-insensitive match against name, description and artist.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.artist.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new("moon-vase"),
            name: "Moon Vase".to_string(),
            price: 68.0,
            image: "/img/moon-vase.jpg".to_string(),
            images: vec![
                "/img/moon-vase.jpg".to_string(),
                "/img/moon-vase-side.jpg".to_string(),
            ],
            category: CategoryId::new("ceramics"),
            artist: "Noor Haddad".to_string(),
            description: "A pale, lopsided vase".to_string(),
            backstory: String::new(),
            materials: vec!["stoneware".to_string()],
            dimensions: "18cm".to_string(),
            rating: 4.9,
            reviews: 12,
            featured: true,
        }
    }

    #[test]
    fn test_to_snapshot() {
        let snapshot = product().to_snapshot();
        assert_eq!(snapshot.id, "moon-vase");
        assert_eq!(snapshot.name, "Moon Vase");
        assert_eq!(snapshot.price, 68.0);
        assert_eq!(snapshot.artist, "Noor Haddad");
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let p = product();
        assert!(p.matches("moon"));
        assert!(p.matches("lopsided"));
        assert!(p.matches("haddad"));
        assert!(!p.matches("silver"));
    }

    #[test]
    fn test_gallery_skips_duplicate_primary() {
        let p = product();
        let gallery: Vec<&str> = p.gallery().collect();
        assert_eq!(gallery, vec!["/img/moon-vase.jpg", "/img/moon-vase-side.jpg"]);
    }

    #[test]
    fn test_top_rated() {
        let mut p = product();
        assert!(p.is_top_rated());
        p.rating = 4.7;
        assert!(!p.is_top_rated());
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "id": "p", "name": "P", "price": 1.5, "image": "/p.jpg",
            "category": "prints", "artist": "A"
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert!(p.images.is_empty());
        assert!(!p.featured);
        assert_eq!(p.reviews, 0);
    }
}

//! Category types for product organization.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// Wildcard category id matching every product.
pub const ALL_CATEGORIES: &str = "all";

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Short glyph shown next to the name.
    #[serde(default)]
    pub icon: String,
}

impl Category {
    /// Create a new category.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
        }
    }

    /// The pseudo-category listed before real ones in filters.
    pub fn all() -> Self {
        Self::new(ALL_CATEGORIES, "All Treasures", "\u{2727}")
    }

    /// Check if this is the wildcard category.
    pub fn is_wildcard(&self) -> bool {
        self.id == ALL_CATEGORIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard() {
        assert!(Category::all().is_wildcard());
        assert!(!Category::new("prints", "Prints", "").is_wildcard());
    }
}

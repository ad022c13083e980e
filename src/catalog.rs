// 🏭 Vehicle Catalog
// Which manufacturers sell in which vehicle category

use serde::{Deserialize, Serialize};

/// One vehicle category and the manufacturers that belong to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub category: String,
    pub manufacturers: Vec<String>,
}

impl CategoryEntry {
    pub fn new(category: &str, manufacturers: &[&str]) -> Self {
        CategoryEntry {
            category: category.to_string(),
            manufacturers: manufacturers.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Ordered category -> manufacturers mapping.
///
/// Order matters: the synthetic generator emits rows in catalog order, and
/// the same manufacturer may appear under several categories (Bajaj, TVS,
/// Mahindra).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleCatalog {
    entries: Vec<CategoryEntry>,
}

impl VehicleCatalog {
    pub fn new(entries: Vec<CategoryEntry>) -> Self {
        VehicleCatalog { entries }
    }

    /// Two-, three- and four-wheeler manufacturers of the Indian market
    pub fn with_defaults() -> Self {
        VehicleCatalog::new(vec![
            CategoryEntry::new("2W", &["Hero", "Honda", "Bajaj", "TVS", "Royal Enfield"]),
            CategoryEntry::new("3W", &["Bajaj", "Mahindra", "Piaggio", "TVS"]),
            CategoryEntry::new("4W", &["Maruti", "Hyundai", "Tata", "Mahindra", "Kia", "Toyota"]),
        ])
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn categories(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.category.as_str()).collect()
    }

    /// Manufacturers for a category; empty for an unknown category
    pub fn manufacturers_for(&self, category: &str) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.manufacturers.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, category: &str, manufacturer: &str) -> bool {
        self.manufacturers_for(category)
            .iter()
            .any(|m| m == manufacturer)
    }

    /// Number of (category, manufacturer) pairs, i.e. rows per month
    pub fn pair_count(&self) -> usize {
        self.entries.iter().map(|e| e.manufacturers.len()).sum()
    }
}

impl Default for VehicleCatalog {
    fn default() -> Self {
        VehicleCatalog::with_defaults()
    }
}

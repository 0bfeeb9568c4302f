// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Product catalog used to seed and label designs.
//!
//! The catalog is a read-only JSON array in the same shape the storefront
//! API serves. Only the fields the designer needs are modeled; unknown keys
//! are ignored.

use super::garment::{ApparelType, Category};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    /// Free-form product type as listed in the catalog ("t-shirt", "hoodie", ...).
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    pub price: f64,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
}

fn default_kind() -> String {
    ApparelType::TShirt.name().to_string()
}

impl Product {
    /// The apparel template this product is designed on, if the designer supports it.
    pub fn apparel_type(&self) -> Option<ApparelType> {
        self.kind.parse().ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Self::new(products))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        let catalog = Self::from_json(&json)
            .with_context(|| format!("parsing catalog {}", path.display()))?;
        log::info!("Loaded {} products from {}", catalog.products.len(), path.display());
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products of the given apparel type in a category, or every product of
    /// that type when the category has none.
    pub fn selection_pool(&self, apparel: ApparelType, category: Category) -> Vec<&Product> {
        let of_type: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.apparel_type() == Some(apparel))
            .collect();
        let in_category: Vec<&Product> = of_type
            .iter()
            .copied()
            .filter(|p| p.category == category)
            .collect();
        if in_category.is_empty() {
            of_type
        } else {
            in_category
        }
    }

    /// The product with `id` from the pool, else the first pooled product,
    /// else the first product in the catalog.
    pub fn pick<'a>(&'a self, pool: &[&'a Product], id: Option<&str>) -> Option<&'a Product> {
        id.and_then(|id| pool.iter().copied().find(|p| p.id == id))
            .or_else(|| pool.first().copied())
            .or_else(|| self.products.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {"id": "1", "name": "Classic Tee", "category": "men", "type": "t-shirt", "price": 499,
         "sizes": ["S", "M", "L"], "colors": ["white", "black"], "isFeatured": true},
        {"id": "2", "name": "Crop Tee", "category": "women", "type": "t-shirt", "price": 549},
        {"id": "3", "name": "Zip Hoodie", "category": "men", "type": "hoodie", "price": 1299,
         "stock": 10, "brand": "Fusion Wear"},
        {"id": "4", "name": "Denim Jacket", "category": "unisex", "type": "jacket", "price": 2499}
    ]"#;

    #[test]
    fn test_parses_storefront_shape() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.products().len(), 4);
        let tee = catalog.find("1").unwrap();
        assert!(tee.is_featured);
        assert_eq!(tee.sizes, vec!["S", "M", "L"]);
        assert_eq!(catalog.find("4").unwrap().apparel_type(), None);
    }

    #[test]
    fn test_selection_pool_falls_back_to_type() {
        let catalog = Catalog::from_json(CATALOG).unwrap();

        let women: Vec<&str> = catalog
            .selection_pool(ApparelType::TShirt, Category::Women)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(women, vec!["2"]);

        let kids: Vec<&str> = catalog
            .selection_pool(ApparelType::TShirt, Category::Kids)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(kids, vec!["1", "2"]);
    }

    #[test]
    fn test_pick_prefers_requested_id() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let pool = catalog.selection_pool(ApparelType::TShirt, Category::Kids);

        assert_eq!(catalog.pick(&pool, Some("2")).unwrap().id, "2");
        // Not in the pool, so the first pooled product wins
        assert_eq!(catalog.pick(&pool, Some("3")).unwrap().id, "1");
        assert_eq!(catalog.pick(&[], None).unwrap().id, "1");
    }

    #[test]
    fn test_seeded_configuration() {
        use crate::models::garment::GarmentConfiguration;

        let catalog = Catalog::from_json(CATALOG).unwrap();
        let config = GarmentConfiguration::seeded(catalog.find("3").unwrap());
        assert_eq!(config.apparel_type, ApparelType::Hoodie);
        assert_eq!(config.category, Category::Men);
        assert_eq!(config.product_id.as_deref(), Some("3"));

        // Unsupported types keep the default template
        let config = GarmentConfiguration::seeded(catalog.find("4").unwrap());
        assert_eq!(config.apparel_type, ApparelType::TShirt);
        assert_eq!(config.category, Category::Unisex);
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Cart hand-off payload.
//!
//! When a shopper commits a design, the configuration is frozen into a
//! cart line item and the designer starts over. The payload is write-once;
//! the designer never tracks it afterwards.

use super::design::{Side, Sides};
use super::garment::{ApparelType, BaseColor, Category, GarmentConfiguration};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: String,
    pub apparel_type: ApparelType,
    pub base_color: BaseColor,
    pub size: String,
    #[serde(default)]
    pub category: Category,
    pub sides: Sides,
    pub active_side: Side,
    pub quantity: u32,
}

impl CartLineItem {
    /// Freeze a configuration into a line item. Returns `None` when no
    /// catalog product has been chosen.
    pub fn from_configuration(config: &GarmentConfiguration) -> Option<Self> {
        let product_id = config.product_id.clone()?;
        Some(Self {
            product_id,
            apparel_type: config.apparel_type,
            base_color: config.base_color,
            size: config.size.clone(),
            category: config.category,
            sides: config.sides.clone(),
            active_side: config.active_side,
            quantity: 1,
        })
    }

    /// Reopen a saved line item for further editing.
    pub fn into_configuration(self) -> GarmentConfiguration {
        GarmentConfiguration {
            apparel_type: self.apparel_type,
            base_color: self.base_color,
            sides: self.sides,
            active_side: self.active_side,
            size: self.size,
            category: self.category,
            product_id: Some(self.product_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_a_product() {
        let config = GarmentConfiguration::default();
        assert!(CartLineItem::from_configuration(&config).is_none());
    }

    #[test]
    fn test_payload_shape() {
        let mut config = GarmentConfiguration {
            product_id: Some("7".to_string()),
            base_color: BaseColor::Navy,
            size: "L".to_string(),
            ..Default::default()
        };
        config.sides.back.text = "TEAM".to_string();

        let item = CartLineItem::from_configuration(&config).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], "7");
        assert_eq!(json["apparelType"], "t-shirt");
        assert_eq!(json["baseColor"], "navy");
        assert_eq!(json["activeSide"], "front");
        assert_eq!(json["sides"]["back"]["text"], "TEAM");
        assert_eq!(json["quantity"], 1);

        assert_eq!(item.into_configuration(), config);
    }
}

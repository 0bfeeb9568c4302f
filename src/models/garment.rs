// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Garment configuration: apparel type, base color and both design sides.

use super::catalog::Product;
use super::design::{Side, Sides};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported apparel templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApparelType {
    #[serde(rename = "t-shirt")]
    TShirt,
    #[serde(rename = "hoodie")]
    Hoodie,
}

impl ApparelType {
    pub const ALL: [ApparelType; 2] = [ApparelType::TShirt, ApparelType::Hoodie];

    pub fn name(self) -> &'static str {
        match self {
            ApparelType::TShirt => "t-shirt",
            ApparelType::Hoodie => "hoodie",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ApparelType::TShirt => "T-Shirts",
            ApparelType::Hoodie => "Hoodies",
        }
    }
}

impl fmt::Display for ApparelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ApparelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApparelType::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown apparel type: {s}"))
    }
}

/// Shopper category a product is listed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Men,
    Women,
    Kids,
    Unisex,
}

impl Category {
    /// Categories offered in the designer's selector.
    pub const SELECTABLE: [Category; 3] = [Category::Men, Category::Women, Category::Kids];

    pub fn name(self) -> &'static str {
        match self {
            Category::Men => "men",
            Category::Women => "women",
            Category::Kids => "kids",
            Category::Unisex => "unisex",
        }
    }
}

/// How strongly a base color replaces the template's own color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCategory {
    White,
    Black,
    Dark,
    Light,
    Bright,
    Standard,
}

impl ColorCategory {
    /// Weight of the target color when tinting. White and black are not
    /// tinted and have no blend factor.
    pub fn blend_factor(self) -> Option<f64> {
        match self {
            ColorCategory::Dark => Some(0.75),
            ColorCategory::Light => Some(0.55),
            ColorCategory::Bright => Some(0.70),
            ColorCategory::Standard => Some(0.65),
            ColorCategory::White | ColorCategory::Black => None,
        }
    }
}

macro_rules! base_colors {
    ($($variant:ident => $name:literal, $rgb:expr, $category:ident;)+) => {
        /// Named garment colors.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum BaseColor {
            $($variant,)+
        }

        impl BaseColor {
            pub const ALL: &'static [BaseColor] = &[$(BaseColor::$variant,)+];

            pub fn name(self) -> &'static str {
                match self {
                    $(BaseColor::$variant => $name,)+
                }
            }

            pub fn rgb(self) -> [u8; 3] {
                match self {
                    $(BaseColor::$variant => $rgb,)+
                }
            }

            pub fn category(self) -> ColorCategory {
                match self {
                    $(BaseColor::$variant => ColorCategory::$category,)+
                }
            }
        }
    };
}

base_colors! {
    White => "white", [0xFF, 0xFF, 0xFF], White;
    Black => "black", [0x00, 0x00, 0x00], Black;
    Navy => "navy", [0x0F, 0x17, 0x24], Dark;
    Gray => "gray", [0x80, 0x80, 0x80], Light;
    Red => "red", [0xFF, 0x00, 0x00], Standard;
    Blue => "blue", [0x00, 0x00, 0xFF], Standard;
    Green => "green", [0x00, 0x80, 0x00], Standard;
    Yellow => "yellow", [0xFF, 0xD7, 0x00], Bright;
    Orange => "orange", [0xFF, 0xA5, 0x00], Bright;
    Pink => "pink", [0xFF, 0xC0, 0xCB], Bright;
    Purple => "purple", [0x80, 0x00, 0x80], Standard;
    Maroon => "maroon", [0x80, 0x00, 0x00], Dark;
    Olive => "olive", [0x80, 0x80, 0x00], Standard;
    Teal => "teal", [0x00, 0x80, 0x80], Standard;
    Cyan => "cyan", [0x00, 0xFF, 0xFF], Bright;
    Lime => "lime", [0x00, 0xFF, 0x00], Bright;
    Brown => "brown", [0xA5, 0x2A, 0x2A], Dark;
    Beige => "beige", [0xF5, 0xF5, 0xDC], Light;
    Coral => "coral", [0xFF, 0x7F, 0x50], Bright;
    Salmon => "salmon", [0xFA, 0x80, 0x72], Bright;
    Gold => "gold", [0xFF, 0xD7, 0x00], Bright;
    Silver => "silver", [0xC0, 0xC0, 0xC0], Light;
    Indigo => "indigo", [0x4B, 0x00, 0x82], Dark;
    Violet => "violet", [0x8A, 0x2B, 0xE2], Dark;
    Turquoise => "turquoise", [0x40, 0xE0, 0xD0], Bright;
    Khaki => "khaki", [0xF0, 0xE6, 0x8C], Light;
}

impl fmt::Display for BaseColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BaseColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaseColor::ALL
            .iter()
            .copied()
            .find(|color| color.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown color: {s}"))
    }
}

/// Everything the design surface edits for one garment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarmentConfiguration {
    pub apparel_type: ApparelType,
    pub base_color: BaseColor,
    pub sides: Sides,
    pub active_side: Side,
    pub size: String,
    pub category: Category,
    pub product_id: Option<String>,
}

impl Default for GarmentConfiguration {
    fn default() -> Self {
        Self {
            apparel_type: ApparelType::TShirt,
            base_color: BaseColor::White,
            sides: Sides::default(),
            active_side: Side::Front,
            size: "M".to_string(),
            category: Category::Men,
            product_id: None,
        }
    }
}

impl GarmentConfiguration {
    /// Start a fresh configuration seeded from a catalog product.
    pub fn seeded(product: &Product) -> Self {
        let mut config = Self {
            category: product.category,
            product_id: Some(product.id.clone()),
            ..Self::default()
        };
        if let Some(kind) = product.apparel_type() {
            config.apparel_type = kind;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_table() {
        assert_eq!(BaseColor::ALL.len(), 26);
        assert_eq!(BaseColor::Navy.rgb(), [15, 23, 36]);
        assert_eq!(BaseColor::Gold.rgb(), BaseColor::Yellow.rgb());
        assert_eq!("Violet".parse::<BaseColor>(), Ok(BaseColor::Violet));
    }

    #[test]
    fn test_blend_factors_by_category() {
        assert_eq!(BaseColor::Maroon.category().blend_factor(), Some(0.75));
        assert_eq!(BaseColor::Khaki.category().blend_factor(), Some(0.55));
        assert_eq!(BaseColor::Coral.category().blend_factor(), Some(0.70));
        assert_eq!(BaseColor::Teal.category().blend_factor(), Some(0.65));
        assert_eq!(BaseColor::White.category().blend_factor(), None);
        assert_eq!(BaseColor::Black.category().blend_factor(), None);
    }

    #[test]
    fn test_apparel_type_names() {
        assert_eq!("hoodie".parse::<ApparelType>(), Ok(ApparelType::Hoodie));
        assert_eq!(
            serde_json::to_string(&ApparelType::TShirt).unwrap(),
            "\"t-shirt\""
        );
    }
}

// Copyright (c) 2021 Tangram Robotics Inc. - All Rights Reserved
// Unauthorized copying of this file, via any medium is strictly prohibited
// Proprietary and confidential
// ----------------------------

//! The precious-metal catalog.
//!
//! Densities are in grams per cubic millimeter, matching jewelry-industry
//! reference values for cast alloys. The catalog is fixed at compile time;
//! meshes are expected to be modeled in millimeters so that
//! `weight = volume * density` comes out in grams.

use strum_macros::{AsRefStr, EnumIter, EnumString, EnumVariantNames};

/// Alloys supported for weight calculation.
///
/// The strum serialization (e.g. `18k-gold`) is the token used on the
/// command line and in config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr, EnumIter, EnumString, EnumVariantNames)]
pub enum Material {
    #[strum(serialize = "14k-gold")]
    Gold14K,
    #[strum(serialize = "18k-gold")]
    Gold18K,
    #[strum(serialize = "22k-gold")]
    Gold22K,
    #[strum(serialize = "24k-gold")]
    Gold24K,
    #[strum(serialize = "silver-925")]
    Silver925,
    #[strum(serialize = "platinum-950")]
    Platinum950,
    #[strum(serialize = "platinum-900")]
    Platinum900,
    #[strum(serialize = "palladium")]
    Palladium,
    #[strum(serialize = "white-gold-18k")]
    WhiteGold18K,
    #[strum(serialize = "rose-gold-18k")]
    RoseGold18K,
}

impl Material {
    /// Human-readable name, as shown in reports.
    pub fn display_name(&self) -> &'static str {
        match *self {
            Material::Gold14K => "14K Gold",
            Material::Gold18K => "18K Gold",
            Material::Gold22K => "22K Gold",
            Material::Gold24K => "24K Gold",
            Material::Silver925 => "Silver (925)",
            Material::Platinum950 => "Platinum (950)",
            Material::Platinum900 => "Platinum (900)",
            Material::Palladium => "Palladium",
            Material::WhiteGold18K => "White Gold (18K)",
            Material::RoseGold18K => "Rose Gold (18K)",
        }
    }

    /// Density in g/mm^3.
    pub fn density(&self) -> f64 {
        match *self {
            Material::Gold14K => 0.0131,
            Material::Gold18K => 0.0154,
            Material::Gold22K => 0.0174,
            Material::Gold24K => 0.0193,
            Material::Silver925 => 0.0104,
            Material::Platinum950 => 0.0214,
            Material::Platinum900 => 0.0204,
            Material::Palladium => 0.0120,
            Material::WhiteGold18K => 0.0147,
            Material::RoseGold18K => 0.0150,
        }
    }

    /// Purity / usage note, as shown in the `materials` listing.
    pub fn info(&self) -> &'static str {
        match *self {
            Material::Gold14K => "58.3% pure - Common for everyday jewelry",
            Material::Gold18K => "75.0% pure - Premium jewelry standard",
            Material::Gold22K => "91.7% pure - High-end, investment grade",
            Material::Gold24K => "99.9% pure - Pure gold, very soft",
            Material::Silver925 => "92.5% pure - Sterling silver standard",
            Material::Platinum950 => "95.0% pure - Luxury jewelry material",
            Material::Platinum900 => "90.0% pure - Alternative platinum alloy",
            Material::Palladium => "95.0% pure - Lighter platinum alternative",
            Material::WhiteGold18K => "75.0% pure - Gold with white metals",
            Material::RoseGold18K => "75.0% pure - Gold with copper",
        }
    }

    /// Display color (hex), used by the viewer and the `materials` listing.
    pub fn color(&self) -> &'static str {
        match *self {
            Material::Gold14K => "#DAA520",
            Material::Gold18K => "#FFD700",
            Material::Gold22K => "#FFA500",
            Material::Gold24K => "#FFD700",
            Material::Silver925 => "#C0C0C0",
            Material::Platinum950 => "#E5E4E2",
            Material::Platinum900 => "#E5E4E2",
            Material::Palladium => "#CED0DD",
            Material::WhiteGold18K => "#F5F5F5",
            Material::RoseGold18K => "#B76E79",
        }
    }

    /// Weight in grams of a volume (mm^3) of this material.
    pub fn weight_grams(&self, volume_mm3: f64) -> f64 {
        volume_mm3 * self.density()
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::Gold18K
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::{IntoEnumIterator, VariantNames};

    use super::*;

    #[test]
    fn test_cli_token_roundtrip() {
        for material in Material::iter() {
            assert_eq!(material, Material::from_str(material.as_ref()).unwrap());
        }
    }

    #[test]
    fn test_unknown_token_is_err() {
        Material::from_str("unobtainium").unwrap_err();
    }

    #[test]
    fn test_variants_cover_catalog() {
        assert_eq!(Material::VARIANTS.len(), Material::iter().count());
        assert!(Material::VARIANTS.contains(&"18k-gold"));
    }

    #[test]
    fn test_weight_18k_gold() {
        // 1000 mm^3 of 18K gold weighs 15.4 g.
        let grams = Material::Gold18K.weight_grams(1000.0);
        assert!((grams - 15.4).abs() < 1e-9);
    }

    #[test]
    fn test_densities_are_plausible() {
        for material in Material::iter() {
            let d = material.density();
            assert!(d > 0.009 && d < 0.023, "{} density {}", material.display_name(), d);
        }
    }
}

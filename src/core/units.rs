// Copyright (c) 2021 Tangram Robotics Inc. - All Rights Reserved
// Unauthorized copying of this file, via any medium is strictly prohibited
// Proprietary and confidential
// ----------------------------

//! Weight unit systems and conversions.

use strum_macros::{AsRefStr, EnumString, EnumVariantNames};

/// 1 troy ounce = 31.1035 grams.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;
/// 1 pennyweight (dwt) = 1.55517 grams.
pub const GRAMS_PER_PENNYWEIGHT: f64 = 1.55517;

/// Which weight columns to show in reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr, EnumString, EnumVariantNames)]
pub enum UnitSystem {
    /// Grams only.
    #[strum(serialize = "metric")]
    Metric,
    /// Troy ounces and pennyweight.
    #[strum(serialize = "troy")]
    Troy,
    /// All of the above.
    #[strum(serialize = "both")]
    Both,
}

impl Default for UnitSystem {
    fn default() -> Self {
        UnitSystem::Both
    }
}

impl UnitSystem {
    pub fn shows_metric(&self) -> bool {
        matches!(*self, UnitSystem::Metric | UnitSystem::Both)
    }

    pub fn shows_troy(&self) -> bool {
        matches!(*self, UnitSystem::Troy | UnitSystem::Both)
    }
}

pub fn troy_ounces(grams: f64) -> f64 {
    grams / GRAMS_PER_TROY_OUNCE
}

pub fn pennyweight(grams: f64) -> f64 {
    grams / GRAMS_PER_PENNYWEIGHT
}

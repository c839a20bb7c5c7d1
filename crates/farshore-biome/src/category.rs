//! The closed set of biome categories a region can carry, plus the
//! grouping predicates that placement logic keys on.

use serde::{Deserialize, Serialize};

/// Climate category assigned to every region of the world plane.
///
/// The set is closed: placement rules match on categories directly, so a
/// binding to a category that does not exist cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BiomeCategory {
    Ocean,
    Lake,
    Lakeshore,
    Coast,
    Beach,
    Marsh,
    Ice,
    Snow,
    Tundra,
    Bare,
    Scorched,
    Taiga,
    Shrubland,
    Grassland,
    TemperateDesert,
    SubtropicalDesert,
    TemperateDeciduousForest,
    TemperateRainForest,
    TropicalSeasonalForest,
    TropicalRainForest,
}

impl BiomeCategory {
    /// Every category, in declaration order.
    pub const ALL: [BiomeCategory; 20] = [
        BiomeCategory::Ocean,
        BiomeCategory::Lake,
        BiomeCategory::Lakeshore,
        BiomeCategory::Coast,
        BiomeCategory::Beach,
        BiomeCategory::Marsh,
        BiomeCategory::Ice,
        BiomeCategory::Snow,
        BiomeCategory::Tundra,
        BiomeCategory::Bare,
        BiomeCategory::Scorched,
        BiomeCategory::Taiga,
        BiomeCategory::Shrubland,
        BiomeCategory::Grassland,
        BiomeCategory::TemperateDesert,
        BiomeCategory::SubtropicalDesert,
        BiomeCategory::TemperateDeciduousForest,
        BiomeCategory::TemperateRainForest,
        BiomeCategory::TropicalSeasonalForest,
        BiomeCategory::TropicalRainForest,
    ];

    /// True for the four forest categories.
    ///
    /// Forest-like regions count as a match when they sit in the
    /// two-hop neighborhood of a candidate, not just at its center.
    pub fn is_forest_like(self) -> bool {
        matches!(
            self,
            BiomeCategory::TemperateDeciduousForest
                | BiomeCategory::TemperateRainForest
                | BiomeCategory::TropicalSeasonalForest
                | BiomeCategory::TropicalRainForest
        )
    }

    /// True for the four arid categories treated as desert by placement.
    pub fn is_desert_like(self) -> bool {
        matches!(
            self,
            BiomeCategory::Bare
                | BiomeCategory::Scorched
                | BiomeCategory::TemperateDesert
                | BiomeCategory::SubtropicalDesert
        )
    }

    /// True for open water that disqualifies a candidate neighborhood.
    pub fn is_ocean_like(self) -> bool {
        matches!(self, BiomeCategory::Ocean)
    }

    /// Human-readable name used in logs and notifications.
    pub fn display_name(self) -> &'static str {
        match self {
            BiomeCategory::Ocean => "Ocean",
            BiomeCategory::Lake => "Lake",
            BiomeCategory::Lakeshore => "Lakeshore",
            BiomeCategory::Coast => "Coast",
            BiomeCategory::Beach => "Beach",
            BiomeCategory::Marsh => "Marsh",
            BiomeCategory::Ice => "Ice",
            BiomeCategory::Snow => "Snow",
            BiomeCategory::Tundra => "Tundra",
            BiomeCategory::Bare => "Bare",
            BiomeCategory::Scorched => "Scorched",
            BiomeCategory::Taiga => "Taiga",
            BiomeCategory::Shrubland => "Shrubland",
            BiomeCategory::Grassland => "Grassland",
            BiomeCategory::TemperateDesert => "Temperate desert",
            BiomeCategory::SubtropicalDesert => "Subtropical desert",
            BiomeCategory::TemperateDeciduousForest => "Temperate deciduous forest",
            BiomeCategory::TemperateRainForest => "Temperate rain forest",
            BiomeCategory::TropicalSeasonalForest => "Tropical seasonal forest",
            BiomeCategory::TropicalRainForest => "Tropical rain forest",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

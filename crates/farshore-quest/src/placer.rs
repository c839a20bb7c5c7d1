//! Collaborator interfaces the quest core calls out to. The engine
//! hosting the core supplies the implementations; tests use small
//! recording fakes.

use glam::{DVec2, IVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PlayerId, ProgressState, StructureId};

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Cardinal facing on the horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    North,
    East,
    South,
    West,
}

impl Facing {
    /// Unit direction of this facing on the (x, z) plane, with north
    /// pointing toward negative z.
    pub fn unit(self) -> DVec2 {
        match self {
            Facing::North => DVec2::new(0.0, -1.0),
            Facing::East => DVec2::new(1.0, 0.0),
            Facing::South => DVec2::new(0.0, 1.0),
            Facing::West => DVec2::new(-1.0, 0.0),
        }
    }
}

/// Every template is rotated to this facing before translation, so all
/// placed structures share one orientation.
pub const CANONICAL_FACING: Facing = Facing::North;

/// Orientation-then-translation transform handed to the placer. The
/// core never rasterizes templates; it only decides where the anchor is
/// and which way the front points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementTransform {
    /// Cell the rotated template is translated to.
    pub anchor: IVec3,
    /// Facing the template front is rotated toward.
    pub facing: Facing,
}

impl PlacementTransform {
    /// Transform at `anchor` with the canonical facing.
    pub fn at(anchor: IVec3) -> Self {
        Self {
            anchor,
            facing: CANONICAL_FACING,
        }
    }
}

/// Reasons the placement collaborator can refuse an instantiation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// No template is registered under the requested id.
    #[error("no structure template registered under id {0}")]
    TemplateNotFound(StructureId),
}

/// Instantiates structure templates into the world.
pub trait StructurePlacer {
    /// Rotates the named template to the transform's facing, translates
    /// it to the anchor cell, and writes it into the world.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::TemplateNotFound`] when the id is
    /// unknown; the world must be left untouched in that case.
    fn place(
        &mut self,
        template: &StructureId,
        transform: PlacementTransform,
    ) -> Result<(), PlacementError>;
}

// ---------------------------------------------------------------------------
// Progress persistence
// ---------------------------------------------------------------------------

/// Loads and saves per-player progress records.
///
/// The record format is the host's concern; the core only requires that
/// a save followed by a load observes the saved value.
pub trait ProgressStore {
    /// The player's current record, or a fresh default for players
    /// never seen before.
    fn load(&self, player: PlayerId) -> ProgressState;

    /// Persists the record. Must be visible to the next `load` before
    /// the current event handler returns.
    fn save(&mut self, player: PlayerId, state: &ProgressState);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_units_are_axis_aligned() {
        for facing in [Facing::North, Facing::East, Facing::South, Facing::West] {
            let unit = facing.unit();
            assert_eq!(unit.length_squared(), 1.0);
            assert!(
                unit.x == 0.0 || unit.y == 0.0,
                "cardinal facings stay on one axis"
            );
        }
    }

    #[test]
    fn test_transform_at_uses_canonical_facing() {
        let transform = PlacementTransform::at(IVec3::new(1, 2, 3));
        assert_eq!(transform.facing, CANONICAL_FACING);
        assert_eq!(transform.anchor, IVec3::new(1, 2, 3));
    }
}

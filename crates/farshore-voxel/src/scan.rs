//! Column ground scan: resolves the standable surface height near a
//! probe point.

use glam::IVec3;
use thiserror::Error;

use crate::{VoxelTagRegistry, VoxelView};

/// The column walk ran off the view's height band without finding a
/// surface transition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "ground scan exhausted column ({x}, {z}) from probe {probe_y} within band {min_height}..={max_height}"
)]
pub struct GroundScanError {
    pub x: i32,
    pub z: i32,
    pub probe_y: i32,
    pub min_height: i32,
    pub max_height: i32,
}

/// Resolves the ground surface in the column `(x, z)` starting from
/// `probe_y`.
///
/// Foliage (leaves, trunks, cacti) is treated like air, so canopy never
/// reads as ground. Two cases:
///
/// - probe in open air: walk downward and return the height of the
///   first surface cell;
/// - probe inside ground: walk upward through the solid run and return
///   the height of the first open cell above it.
///
/// # Errors
///
/// Returns [`GroundScanError`] when the walk leaves the view's height
/// band, which means the column has no surface transition in range.
pub fn surface_height<V>(
    view: &V,
    tags: &VoxelTagRegistry,
    x: i32,
    z: i32,
    probe_y: i32,
) -> Result<i32, GroundScanError>
where
    V: VoxelView + ?Sized,
{
    let surface_at = |y: i32| tags.is_surface(view.tag_at(IVec3::new(x, y, z)));
    let exhausted = || GroundScanError {
        x,
        z,
        probe_y,
        min_height: view.min_height(),
        max_height: view.max_height(),
    };

    if surface_at(probe_y) {
        let mut y = probe_y;
        while y <= view.max_height() {
            if !surface_at(y) {
                return Ok(y);
            }
            y += 1;
        }
        Err(exhausted())
    } else {
        let mut y = probe_y;
        while y >= view.min_height() {
            if surface_at(y) {
                return Ok(y);
            }
            y -= 1;
        }
        Err(exhausted())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

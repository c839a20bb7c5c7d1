//! Read access to voxel data, abstracted so placement logic can run
//! against any world backend.

use glam::IVec3;

use crate::VoxelTag;

/// Read-only view of a voxel world.
///
/// Implementations report a vertical band; scans never step outside
/// `min_height()..=max_height()`, which keeps column walks bounded even
/// over procedurally infinite terrain.
pub trait VoxelView {
    /// Material tag at a world cell. Cells that were never written
    /// read as air.
    fn tag_at(&self, pos: IVec3) -> VoxelTag;

    /// Lowest cell height a scan may visit, inclusive.
    fn min_height(&self) -> i32;

    /// Highest cell height a scan may visit, inclusive.
    fn max_height(&self) -> i32;
}

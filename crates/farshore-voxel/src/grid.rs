//! Sparse in-memory voxel volume used by the demo world and tests.

use glam::IVec3;
use rustc_hash::FxHashMap;

use crate::{VoxelTag, VoxelView};

/// Hash-backed voxel volume with a fixed vertical band.
///
/// Cells default to air; writing air removes the entry so the map only
/// holds occupied cells.
pub struct GridVolume {
    cells: FxHashMap<IVec3, VoxelTag>,
    min_height: i32,
    max_height: i32,
}

impl GridVolume {
    /// Creates an empty volume spanning the inclusive height band.
    ///
    /// # Panics
    ///
    /// Panics if `min_height > max_height`.
    pub fn new(min_height: i32, max_height: i32) -> Self {
        assert!(
            min_height <= max_height,
            "height band is inverted: {min_height} > {max_height}"
        );
        Self {
            cells: FxHashMap::default(),
            min_height,
            max_height,
        }
    }

    /// Writes one cell.
    pub fn set(&mut self, pos: IVec3, tag: VoxelTag) {
        if tag == VoxelTag::AIR {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, tag);
        }
    }

    /// Fills the inclusive box `[min, max]` with one tag.
    pub fn fill_box(&mut self, min: IVec3, max: IVec3, tag: VoxelTag) {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    self.set(IVec3::new(x, y, z), tag);
                }
            }
        }
    }

    /// Number of non-air cells.
    pub fn occupied(&self) -> usize {
        self.cells.len()
    }
}

impl VoxelView for GridVolume {
    fn tag_at(&self, pos: IVec3) -> VoxelTag {
        self.cells.get(&pos).copied().unwrap_or(VoxelTag::AIR)
    }

    fn min_height(&self) -> i32 {
        self.min_height
    }

    fn max_height(&self) -> i32 {
        self.max_height
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Voxel materials and world access for structure placement: the tag
//! registry, read-only world views, and the column ground scan.

mod grid;
mod registry;
mod scan;
mod view;

pub use grid::GridVolume;
pub use registry::{TagRegistryError, VoxelTag, VoxelTagDef, VoxelTagRegistry};
pub use scan::{GroundScanError, surface_height};
pub use view::VoxelView;

//! Declarative cell tables for the portal frame: the ground ring and
//! the key in its two orientations.
//!
//! All offsets are relative to the anchor cell the agent strikes.

use glam::IVec3;

/// The two ways the key can stand on the ring. The frame is vertical;
/// the orientation names the horizontal axis the key arms extend along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    XAligned,
    ZAligned,
}

/// The eight horizontally-adjacent cells around the anchor, at the
/// anchor's own height. Every one must carry the ring material.
pub const RING_OFFSETS: [IVec3; 8] = [
    IVec3::new(-1, 0, -1),
    IVec3::new(0, 0, -1),
    IVec3::new(1, 0, -1),
    IVec3::new(-1, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 1),
    IVec3::new(0, 0, 1),
    IVec3::new(1, 0, 1),
];

/// The single cell whose material decides the orientation: key
/// material here commits to [`Orientation::XAligned`], anything else
/// commits to [`Orientation::ZAligned`]. No other orientation is ever
/// attempted.
pub const ORIENTATION_PROBE: IVec3 = IVec3::new(1, 1, 0);

/// Key cells of the X-aligned orientation, the probe included.
pub const X_ALIGNED_KEY_OFFSETS: [IVec3; 7] = [
    IVec3::new(1, 1, 0),
    IVec3::new(-1, 1, 0),
    IVec3::new(1, 2, 0),
    IVec3::new(-1, 2, 0),
    IVec3::new(-1, 3, 0),
    IVec3::new(0, 3, 0),
    IVec3::new(1, 3, 0),
];

/// Key cells of the Z-aligned orientation, mirrored onto the z axis.
pub const Z_ALIGNED_KEY_OFFSETS: [IVec3; 7] = [
    IVec3::new(0, 1, 1),
    IVec3::new(0, 1, -1),
    IVec3::new(0, 2, 1),
    IVec3::new(0, 2, -1),
    IVec3::new(0, 3, -1),
    IVec3::new(0, 3, 0),
    IVec3::new(0, 3, 1),
];

impl Orientation {
    /// The key cells this orientation requires.
    pub fn key_offsets(self) -> &'static [IVec3; 7] {
        match self {
            Orientation::XAligned => &X_ALIGNED_KEY_OFFSETS,
            Orientation::ZAligned => &Z_ALIGNED_KEY_OFFSETS,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_surrounds_the_anchor() {
        for offset in RING_OFFSETS {
            assert_eq!(offset.y, 0, "ring cells sit at the anchor height");
            assert_ne!(offset, IVec3::ZERO, "the anchor itself is not part of the ring");
            assert!(offset.x.abs() <= 1 && offset.z.abs() <= 1);
        }
    }

    #[test]
    fn test_orientations_mirror_each_other() {
        for (x, z) in X_ALIGNED_KEY_OFFSETS.iter().zip(Z_ALIGNED_KEY_OFFSETS) {
            assert_eq!(x.y, z.y, "mirrored cells share a height");
            assert_eq!(x.x.abs(), z.z.abs(), "x arms map onto z arms");
            assert_eq!(x.z, 0, "x-aligned cells stay in the z=0 plane");
            assert_eq!(z.x, 0, "z-aligned cells stay in the x=0 plane");
        }
    }

    #[test]
    fn test_probe_belongs_to_the_x_pattern() {
        assert!(X_ALIGNED_KEY_OFFSETS.contains(&ORIENTATION_PROBE));
        assert!(!Z_ALIGNED_KEY_OFFSETS.contains(&ORIENTATION_PROBE));
    }
}

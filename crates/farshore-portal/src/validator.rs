//! Pattern evaluation for a struck portal anchor.

use glam::{DVec3, IVec3};

use farshore_voxel::VoxelTag;

use crate::{ORIENTATION_PROBE, Orientation, RING_OFFSETS};

/// Materials the frame must be assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyMaterials {
    /// Material of the eight ground ring cells.
    pub ring: VoxelTag,
    /// Material of the upright key cells.
    pub key: VoxelTag,
}

/// Why an evaluation rejected. There is no partial credit: the first
/// wrong cell ends the evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A ring cell held something other than the ring material.
    RingMismatch { offset: IVec3, found: VoxelTag },
    /// A key cell of the committed orientation held something other
    /// than the key material.
    KeyMismatch {
        orientation: Orientation,
        offset: IVec3,
        found: VoxelTag,
    },
    /// The striking agent is standing in one of the two cells directly
    /// above the anchor. Rejected without any event so the agent can
    /// step out and strike again.
    AgentInsideFrame { cell: IVec3 },
}

/// Outcome of evaluating one anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Accepted { orientation: Orientation },
    Rejected(Rejection),
}

/// Evaluates the frame pattern around `anchor`.
///
/// `lookup` resolves a cell relative to the anchor. The evaluation is
/// pure and idempotent: identical inputs produce identical outcomes.
///
/// Order of checks: the ground ring first, then the orientation probe
/// commits to X-aligned or Z-aligned, then that orientation's key
/// cells, and finally the agent clearance above the anchor.
pub fn validate(
    anchor: IVec3,
    lookup: &dyn Fn(IVec3) -> VoxelTag,
    materials: AssemblyMaterials,
    agent_position: DVec3,
) -> Validation {
    for offset in RING_OFFSETS {
        let found = lookup(offset);
        if found != materials.ring {
            return Validation::Rejected(Rejection::RingMismatch { offset, found });
        }
    }

    let orientation = if lookup(ORIENTATION_PROBE) == materials.key {
        Orientation::XAligned
    } else {
        Orientation::ZAligned
    };

    for &offset in orientation.key_offsets() {
        let found = lookup(offset);
        if found != materials.key {
            return Validation::Rejected(Rejection::KeyMismatch {
                orientation,
                offset,
                found,
            });
        }
    }

    let agent_cell = agent_position.round().as_ivec3();
    for dy in 1..=2 {
        let cell = anchor + IVec3::new(0, dy, 0);
        if agent_cell == cell {
            return Validation::Rejected(Rejection::AgentInsideFrame { cell });
        }
    }

    Validation::Accepted { orientation }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{X_ALIGNED_KEY_OFFSETS, Z_ALIGNED_KEY_OFFSETS};
    use farshore_voxel::{GridVolume, VoxelView};

    const RING: VoxelTag = VoxelTag(1);
    const KEY: VoxelTag = VoxelTag(2);
    const STONE: VoxelTag = VoxelTag(3);

    const MATERIALS: AssemblyMaterials = AssemblyMaterials {
        ring: RING,
        key: KEY,
    };

    /// Agent position far from the frame so clearance never interferes.
    fn bystander() -> DVec3 {
        DVec3::new(50.0, 0.0, 50.0)
    }

    fn build_frame(anchor: IVec3, orientation: Orientation) -> GridVolume {
        let mut volume = GridVolume::new(-8, 16);
        for offset in RING_OFFSETS {
            volume.set(anchor + offset, RING);
        }
        for &offset in orientation.key_offsets() {
            volume.set(anchor + offset, KEY);
        }
        volume
    }

    fn evaluate(volume: &GridVolume, anchor: IVec3, agent: DVec3) -> Validation {
        validate(anchor, &|offset| volume.tag_at(anchor + offset), MATERIALS, agent)
    }

    #[test]
    fn test_x_aligned_frame_accepted() {
        let anchor = IVec3::new(10, 2, -3);
        let volume = build_frame(anchor, Orientation::XAligned);
        assert_eq!(
            evaluate(&volume, anchor, bystander()),
            Validation::Accepted {
                orientation: Orientation::XAligned
            }
        );
    }

    #[test]
    fn test_z_aligned_frame_accepted() {
        let anchor = IVec3::new(0, 0, 0);
        let volume = build_frame(anchor, Orientation::ZAligned);
        assert_eq!(
            evaluate(&volume, anchor, bystander()),
            Validation::Accepted {
                orientation: Orientation::ZAligned
            }
        );
    }

    #[test]
    fn test_every_ring_cell_is_load_bearing() {
        let anchor = IVec3::new(0, 0, 0);
        for corrupted in RING_OFFSETS {
            let mut volume = build_frame(anchor, Orientation::XAligned);
            volume.set(anchor + corrupted, STONE);
            let outcome = evaluate(&volume, anchor, bystander());
            assert_eq!(
                outcome,
                Validation::Rejected(Rejection::RingMismatch {
                    offset: corrupted,
                    found: STONE
                }),
                "ring cell {corrupted:?} should have failed the evaluation"
            );
        }
    }

    #[test]
    fn test_every_x_key_cell_is_load_bearing() {
        let anchor = IVec3::new(0, 0, 0);
        // Skip the probe cell: clearing it flips the orientation
        // instead of failing the X pattern, which the exclusivity test
        // below covers.
        for corrupted in X_ALIGNED_KEY_OFFSETS {
            if corrupted == ORIENTATION_PROBE {
                continue;
            }
            let mut volume = build_frame(anchor, Orientation::XAligned);
            volume.set(anchor + corrupted, VoxelTag::AIR);
            let outcome = evaluate(&volume, anchor, bystander());
            assert_eq!(
                outcome,
                Validation::Rejected(Rejection::KeyMismatch {
                    orientation: Orientation::XAligned,
                    offset: corrupted,
                    found: VoxelTag::AIR
                }),
                "key cell {corrupted:?} should have failed the evaluation"
            );
        }
    }

    #[test]
    fn test_every_z_key_cell_is_load_bearing() {
        let anchor = IVec3::new(0, 0, 0);
        for corrupted in Z_ALIGNED_KEY_OFFSETS {
            let mut volume = build_frame(anchor, Orientation::ZAligned);
            volume.set(anchor + corrupted, VoxelTag::AIR);
            let outcome = evaluate(&volume, anchor, bystander());
            assert_eq!(
                outcome,
                Validation::Rejected(Rejection::KeyMismatch {
                    orientation: Orientation::ZAligned,
                    offset: corrupted,
                    found: VoxelTag::AIR
                }),
                "key cell {corrupted:?} should have failed the evaluation"
            );
        }
    }

    #[test]
    fn test_probe_commit_is_exclusive() {
        // A perfect Z frame plus a stray key block on the probe cell:
        // the evaluation must commit to X and then reject, never fall
        // back to the Z pattern it would have matched.
        let anchor = IVec3::new(0, 0, 0);
        let mut volume = build_frame(anchor, Orientation::ZAligned);
        volume.set(anchor + ORIENTATION_PROBE, KEY);

        let outcome = evaluate(&volume, anchor, bystander());
        match outcome {
            Validation::Rejected(Rejection::KeyMismatch { orientation, .. }) => {
                assert_eq!(orientation, Orientation::XAligned);
            }
            other => panic!("expected an X-aligned key mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_agent_inside_frame_rejects() {
        let anchor = IVec3::new(4, 1, 4);
        let volume = build_frame(anchor, Orientation::XAligned);

        for dy in 1..=2 {
            let standing = DVec3::new(4.0, (1 + dy) as f64, 4.0);
            assert_eq!(
                evaluate(&volume, anchor, standing),
                Validation::Rejected(Rejection::AgentInsideFrame {
                    cell: anchor + IVec3::new(0, dy, 0)
                })
            );
        }
    }

    #[test]
    fn test_agent_position_is_rounded_not_truncated() {
        let anchor = IVec3::new(0, 0, 0);
        let volume = build_frame(anchor, Orientation::XAligned);

        // (0.4, 1.4, -0.2) rounds to (0, 1, 0): inside the frame.
        let inside = DVec3::new(0.4, 1.4, -0.2);
        assert!(matches!(
            evaluate(&volume, anchor, inside),
            Validation::Rejected(Rejection::AgentInsideFrame { .. })
        ));

        // (0.6, 1.4, 0.0) rounds to (1, 1, 0): one cell aside.
        let aside = DVec3::new(0.6, 1.4, 0.0);
        assert!(matches!(
            evaluate(&volume, anchor, aside),
            Validation::Accepted { .. }
        ));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let anchor = IVec3::new(2, 3, 2);
        let volume = build_frame(anchor, Orientation::ZAligned);
        let first = evaluate(&volume, anchor, bystander());
        let second = evaluate(&volume, anchor, bystander());
        assert_eq!(first, second);
    }
}

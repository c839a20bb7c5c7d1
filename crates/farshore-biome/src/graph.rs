//! Region adjacency graph over the world plane.
//!
//! The plane is partitioned into convex cells, one per seed point; each
//! cell becomes a [`Region`] carrying a [`BiomeCategory`], and cells that
//! share an edge become graph neighbors. Spawn search and structure
//! placement both read the world through this graph.

use glam::DVec2;
use thiserror::Error;

use crate::BiomeCategory;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Dense identifier of a region within its graph.
///
/// Identifiers are indexes: a graph of `n` regions uses exactly
/// `0..n`, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u32);

/// One convex cell of the partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Identifier, equal to this region's index in the graph.
    pub id: RegionId,
    /// Seed point of the cell. Every plane point closer to this center
    /// than to any other center belongs to this region.
    pub center: DVec2,
    /// Climate category assigned to the whole cell.
    pub biome: BiomeCategory,
    /// Edge-sharing regions, ascending by id. Symmetric and irreflexive.
    pub neighbors: Vec<RegionId>,
}

/// Errors detected while validating a region list into a graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("region at index {index} carries id {} instead of {index}", found.0)]
    IdMismatch { index: usize, found: RegionId },
    #[error("region {} lists unknown neighbor {}", region.0, neighbor.0)]
    UnknownNeighbor { region: RegionId, neighbor: RegionId },
    #[error("region {} lists itself as a neighbor", region.0)]
    SelfNeighbor { region: RegionId },
    #[error("region {} lists {} but not the reverse", region.0, neighbor.0)]
    AsymmetricNeighbor { region: RegionId, neighbor: RegionId },
}

/// Validated partition of the plane into biome-tagged regions.
pub struct BiomeGraph {
    regions: Vec<Region>,
    /// Upper bound on how far any point of a cell can sit from its
    /// center. Window queries inflate their bounds by this much so that
    /// a cell overlapping a window is found even when its center falls
    /// outside. Zero for hand-built graphs whose callers query by center.
    cell_reach: f64,
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

impl BiomeGraph {
    /// Builds a graph from regions, checking the adjacency invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] if ids are not dense indexes, a neighbor
    /// id is out of range, a region neighbors itself, or an edge is
    /// listed in only one direction.
    pub fn from_regions(regions: Vec<Region>) -> Result<Self, GraphError> {
        for (index, region) in regions.iter().enumerate() {
            if region.id.0 as usize != index {
                return Err(GraphError::IdMismatch {
                    index,
                    found: region.id,
                });
            }
        }
        for region in &regions {
            for &neighbor in &region.neighbors {
                if neighbor == region.id {
                    return Err(GraphError::SelfNeighbor { region: region.id });
                }
                let Some(other) = regions.get(neighbor.0 as usize) else {
                    return Err(GraphError::UnknownNeighbor {
                        region: region.id,
                        neighbor,
                    });
                };
                if !other.neighbors.contains(&region.id) {
                    return Err(GraphError::AsymmetricNeighbor {
                        region: region.id,
                        neighbor,
                    });
                }
            }
        }
        Ok(Self {
            regions,
            cell_reach: 0.0,
        })
    }

    /// Sets the cell reach used to inflate window queries.
    ///
    /// Generators that know their cell geometry call this; hand-built
    /// graphs can leave the default of zero.
    pub fn with_cell_reach(mut self, reach: f64) -> Self {
        self.cell_reach = reach;
        self
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True when the graph has no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Looks up a region by id.
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0 as usize)
    }

    /// All regions, ascending by id.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// Neighbors of `id`, ascending by id. Empty when `id` is unknown.
    pub fn neighbors(&self, id: RegionId) -> impl Iterator<Item = &Region> + '_ {
        let ids: &[RegionId] = match self.region(id) {
            Some(region) => &region.neighbors,
            None => &[],
        };
        ids.iter().filter_map(|n| self.region(*n))
    }

    /// The region whose cell contains `point`, which is the region with
    /// the nearest center. Ties resolve to the lowest id. `None` only
    /// for an empty graph.
    pub fn region_at(&self, point: DVec2) -> Option<&Region> {
        let mut best: Option<(&Region, f64)> = None;
        for region in &self.regions {
            let dist = region.center.distance_squared(point);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((region, dist)),
            }
        }
        best.map(|(region, _)| region)
    }

    /// Regions whose cell can intersect the axis-aligned square window
    /// of the given half-width around `center`, ascending by id.
    ///
    /// Membership is tested against the window inflated by the cell
    /// reach, so the result can over-approximate but never misses a
    /// cell that truly overlaps.
    pub fn regions_in_window(
        &self,
        center: DVec2,
        half_width: f64,
    ) -> impl Iterator<Item = &Region> + '_ {
        let bound = half_width + self.cell_reach;
        self.regions.iter().filter(move |region| {
            (region.center.x - center.x).abs() <= bound
                && (region.center.y - center.y).abs() <= bound
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

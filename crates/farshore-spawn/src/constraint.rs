//! Constraints a candidate region must satisfy before it can anchor a
//! spawn or a structure.

use std::collections::VecDeque;

use hashbrown::HashSet;

use farshore_biome::{BiomeCategory, BiomeGraph, Region, RegionId};

/// Predicate over candidate regions.
///
/// Constraints see the whole graph so they can inspect a candidate's
/// surroundings, not just the candidate itself.
pub trait SiteConstraint {
    fn accepts(&self, graph: &BiomeGraph, region: &Region) -> bool;
}

impl<F> SiteConstraint for F
where
    F: Fn(&BiomeGraph, &Region) -> bool,
{
    fn accepts(&self, graph: &BiomeGraph, region: &Region) -> bool {
        self(graph, region)
    }
}

/// Accepts regions carrying exactly one category.
pub struct DirectMatch(pub BiomeCategory);

impl SiteConstraint for DirectMatch {
    fn accepts(&self, _graph: &BiomeGraph, region: &Region) -> bool {
        region.biome == self.0
    }
}

/// Accepts regions that make a good starting area.
///
/// The region itself must not be ocean, lake or beach, and the
/// neighborhood within two hops (the region included) must contain at
/// least one forest-like cell, at least one desert-like cell, and no
/// ocean at all. The walk rejects the moment it sees ocean but explores
/// both hops fully before it can accept.
pub struct NeighborhoodMatch;

/// Categories that disqualify the candidate cell itself.
const EXCLUDED_AT_CENTER: [BiomeCategory; 3] = [
    BiomeCategory::Ocean,
    BiomeCategory::Lake,
    BiomeCategory::Beach,
];

impl SiteConstraint for NeighborhoodMatch {
    fn accepts(&self, graph: &BiomeGraph, region: &Region) -> bool {
        if EXCLUDED_AT_CENTER.contains(&region.biome) {
            return false;
        }

        let mut visited: HashSet<RegionId> = HashSet::new();
        let mut queue: VecDeque<(RegionId, u8)> = VecDeque::new();
        visited.insert(region.id);
        queue.push_back((region.id, 0));

        let mut saw_forest = false;
        let mut saw_desert = false;

        while let Some((id, depth)) = queue.pop_front() {
            let Some(cell) = graph.region(id) else {
                continue;
            };
            if cell.biome.is_ocean_like() {
                return false;
            }
            saw_forest |= cell.biome.is_forest_like();
            saw_desert |= cell.biome.is_desert_like();

            if depth < 2 {
                for &neighbor in &cell.neighbors {
                    if visited.insert(neighbor) {
                        queue.push_back((neighbor, depth + 1));
                    }
                }
            }
        }

        saw_forest && saw_desert
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Nearest-region site search over a square query window.

use glam::DVec2;

use farshore_biome::BiomeGraph;

use crate::SiteConstraint;

/// Finds the satisfying region nearest to `origin` and returns its
/// center.
///
/// Candidates are the regions whose cell can intersect the square
/// window of half-width `max_radius` around `origin`, visited in
/// ascending id order. Among those accepted by `constraint`, the one
/// with the smallest Euclidean distance to `origin` wins; distance ties
/// resolve to the lowest id. A candidate sitting exactly on `origin`
/// wins outright.
///
/// Returns `None` when nothing in the window satisfies the constraint.
/// That is a normal outcome, not an error; callers fall back to a
/// default anchor (see [`find_site_or`]).
pub fn find_site<C>(
    graph: &BiomeGraph,
    origin: DVec2,
    constraint: &C,
    max_radius: f64,
) -> Option<DVec2>
where
    C: SiteConstraint + ?Sized,
{
    let mut best: Option<(DVec2, f64)> = None;
    for region in graph.regions_in_window(origin, max_radius) {
        if !constraint.accepts(graph, region) {
            continue;
        }
        let dist = region.center.distance_squared(origin);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((region.center, dist)),
        }
    }
    best.map(|(center, _)| center)
}

/// [`find_site`] with a caller-supplied fallback anchor for the
/// no-match case.
pub fn find_site_or<C>(
    graph: &BiomeGraph,
    origin: DVec2,
    constraint: &C,
    max_radius: f64,
    fallback: DVec2,
) -> DVec2
where
    C: SiteConstraint + ?Sized,
{
    find_site(graph, origin, constraint, max_radius).unwrap_or(fallback)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

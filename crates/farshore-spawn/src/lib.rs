//! Spawn site search: nearest-region queries over the biome graph with
//! pluggable acceptance constraints.

mod constraint;
mod search;

pub use constraint::{DirectMatch, NeighborhoodMatch, SiteConstraint};
pub use search::{find_site, find_site_or};

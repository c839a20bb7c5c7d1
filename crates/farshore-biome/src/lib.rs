//! Biome-partitioned world plane: the category set, the region adjacency
//! graph, and the procedural partition generator.

mod category;
mod graph;
mod partition;

pub use category::BiomeCategory;
pub use graph::{BiomeGraph, GraphError, Region, RegionId};
pub use partition::{FbmParams, PartitionConfig, PartitionError, generate_partition};

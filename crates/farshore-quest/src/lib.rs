//! Campaign quest core: per-player progress tracking, progress-gated
//! structure dispatch on biome crossings, and first-spawn setup.

mod dispatch;
mod placer;
mod progress;
mod setup;
mod store;

pub use dispatch::{
    BIOME_SEARCH_RADIUS, BiomeEnterEvent, DispatchOutcome, HUT_EXCLUSION_DISTANCE,
    LOOK_AHEAD_DISTANCE, StructureDispatcher, WorldModel,
};
pub use placer::{
    CANONICAL_FACING, Facing, PlacementError, PlacementTransform, ProgressStore, StructurePlacer,
};
pub use progress::{PlayerId, ProgressState, QuestPhase, StructureId};
pub use setup::{
    AREA_SEARCH_RADIUS, HUT_SPAWN_OFFSET, HUT_TEMPLATE, PYRAMID_TEMPLATE, STONE_CIRCLE_TEMPLATE,
    SetupError, SpawnPlacement, SpawnSetup, TEMPLE_TEMPLATE, WELL_TEMPLATE, standard_bindings,
};
pub use store::MemoryStore;

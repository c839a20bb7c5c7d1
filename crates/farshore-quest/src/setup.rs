//! First-spawn setup: picks a starting area, plants the castaway hut,
//! and installs the standard biome-to-structure slot table.

use std::collections::BTreeMap;

use glam::{DVec2, IVec3};
use thiserror::Error;

use farshore_biome::BiomeCategory;
use farshore_spawn::{NeighborhoodMatch, find_site_or};
use farshore_voxel::{GroundScanError, surface_height};

use crate::{
    PlacementError, PlacementTransform, PlayerId, ProgressStore, StructureId, StructurePlacer,
    WorldModel,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Half-width of the world-scale search for a starting area.
pub const AREA_SEARCH_RADIUS: f64 = 7000.0;

/// Hut offset from the spawn point along both horizontal axes.
pub const HUT_SPAWN_OFFSET: i32 = 15;

/// Template ids the standard campaign places.
pub const HUT_TEMPLATE: &str = "castaway_hut";
pub const WELL_TEMPLATE: &str = "old_well";
pub const TEMPLE_TEMPLATE: &str = "ember_temple";
pub const STONE_CIRCLE_TEMPLATE: &str = "standing_stones";
pub const PYRAMID_TEMPLATE: &str = "sun_pyramid";

/// The standard slot table: which biome crossing yields which
/// structure. Several biomes alias the same structure; placing it once
/// consumes every alias.
pub fn standard_bindings() -> BTreeMap<BiomeCategory, Option<StructureId>> {
    let entries: [(&str, &[BiomeCategory]); 4] = [
        (
            WELL_TEMPLATE,
            &[
                BiomeCategory::Beach,
                BiomeCategory::Coast,
                BiomeCategory::Lakeshore,
            ],
        ),
        (
            TEMPLE_TEMPLATE,
            &[
                BiomeCategory::TemperateDeciduousForest,
                BiomeCategory::TemperateRainForest,
                BiomeCategory::TropicalSeasonalForest,
                BiomeCategory::TropicalRainForest,
            ],
        ),
        (
            STONE_CIRCLE_TEMPLATE,
            &[
                BiomeCategory::Marsh,
                BiomeCategory::Shrubland,
                BiomeCategory::Grassland,
            ],
        ),
        (
            PYRAMID_TEMPLATE,
            &[
                BiomeCategory::Bare,
                BiomeCategory::Scorched,
                BiomeCategory::TemperateDesert,
                BiomeCategory::SubtropicalDesert,
            ],
        ),
    ];

    let mut bindings = BTreeMap::new();
    for (template, biomes) in entries {
        for biome in biomes {
            bindings.insert(*biome, Some(StructureId::new(template)));
        }
    }
    bindings
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Failures that abort first-spawn setup. Unlike dispatch, setup cannot
/// shrug off a missing hut template: there is no campaign without the
/// hut.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error(transparent)]
    Ground(#[from] GroundScanError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Where a player ended up after setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnPlacement {
    /// Open cell the player should stand in.
    pub spawn: IVec3,
    /// Anchor cell of the hut.
    pub hut: IVec3,
}

/// Runs the once-per-player world introduction.
#[derive(Debug, Clone)]
pub struct SpawnSetup {
    /// Half-width of the starting-area search window.
    pub area_search_radius: f64,
    /// Horizontal offset between spawn and hut.
    pub hut_offset: i32,
}

impl Default for SpawnSetup {
    fn default() -> Self {
        Self {
            area_search_radius: AREA_SEARCH_RADIUS,
            hut_offset: HUT_SPAWN_OFFSET,
        }
    }
}

impl SpawnSetup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a player up in the world.
    ///
    /// On the first call for a player this searches the graph for a
    /// starting area (forest and desert in reach, no ocean), snaps the
    /// spawn there, plants the hut offset diagonally from it, installs
    /// the standard slot table, and persists the record. Later calls
    /// recognize the recorded hut and only re-resolve standing room at
    /// the requested point.
    ///
    /// # Errors
    ///
    /// Fails when a ground scan exhausts its column or the hut template
    /// is missing from the placer.
    pub fn first_spawn(
        &self,
        world: &WorldModel<'_>,
        store: &mut dyn ProgressStore,
        placer: &mut dyn StructurePlacer,
        player: PlayerId,
        requested: DVec2,
    ) -> Result<SpawnPlacement, SetupError> {
        let mut state = store.load(player);
        if let Some(hut) = state.hut_anchor() {
            let spawn = standing_cell(world, requested)?;
            return Ok(SpawnPlacement { spawn, hut });
        }

        let site = find_site_or(
            world.graph,
            requested,
            &NeighborhoodMatch,
            self.area_search_radius,
            requested,
        );
        let spawn = standing_cell(world, site)?;
        let hut = standing_cell(
            world,
            DVec2::new(
                (spawn.x - self.hut_offset) as f64,
                (spawn.z - self.hut_offset) as f64,
            ),
        )?;

        placer.place(&StructureId::new(HUT_TEMPLATE), PlacementTransform::at(hut))?;

        state.bindings = standard_bindings();
        state.record_hut(hut);
        store.save(player, &state);

        tracing::info!(
            "First spawn for player {} at ({}, {}, {}), hut at ({}, {}, {})",
            player.0,
            spawn.x,
            spawn.y,
            spawn.z,
            hut.x,
            hut.y,
            hut.z
        );
        Ok(SpawnPlacement { spawn, hut })
    }
}

/// The open cell directly above the ground surface at a plane point,
/// resolved by scanning down from the top of the view's band.
fn standing_cell(world: &WorldModel<'_>, point: DVec2) -> Result<IVec3, GroundScanError> {
    let x = point.x.floor() as i32;
    let z = point.y.floor() as i32;
    let ground = surface_height(world.view, world.tags, x, z, world.view.max_height())?;
    Ok(IVec3::new(x, ground + 1, z))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

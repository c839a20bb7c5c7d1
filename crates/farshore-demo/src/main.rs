//! Demo binary that runs the castaway campaign end to end.
//!
//! Generates a biome partition, spawns a castaway with their hut, walks
//! them across every bound biome to collect the campaign structures,
//! then assembles and ignites the portal frame.
//!
//! Configuration is loaded from `farshore.ron` and can be overridden via
//! CLI flags. Run with `cargo run -p farshore-demo -- --seed 42` to try
//! another world.

mod config;
mod world;

use std::collections::BTreeMap;

use clap::Parser;
use glam::{DVec2, DVec3, IVec3};
use tracing::{error, info, warn};

use farshore_biome::{
    BiomeCategory, BiomeGraph, PartitionConfig, PartitionError, generate_partition,
};
use farshore_portal::{
    ActivationAttempt, AgentId, AssemblyMaterials, Orientation, PortalActivator,
};
use farshore_quest::{
    AREA_SEARCH_RADIUS, BiomeEnterEvent, MemoryStore, PlayerId, ProgressStore, SetupError,
    SpawnPlacement, SpawnSetup, StructureDispatcher, WorldModel, standard_bindings,
};
use farshore_spawn::{DirectMatch, NeighborhoodMatch, find_site};
use farshore_voxel::{
    GroundScanError, TagRegistryError, VoxelTag, VoxelTagRegistry, VoxelView, surface_height,
};

use config::{CliArgs, DemoConfig};
use world::{
    BuildLog, ChatLog, DemoMaterials, DemoTerrain, GROUND_HEIGHT, build_portal_frame, plant_palm,
    register_demo_materials,
};

/// Failures that abort the scripted scenario.
#[derive(Debug, thiserror::Error)]
enum ScenarioError {
    #[error(transparent)]
    Partition(#[from] PartitionError),
    #[error(transparent)]
    Materials(#[from] TagRegistryError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Ground(#[from] GroundScanError),
}

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .expect("Failed to resolve config directory")
            .join("farshore")
    });

    // Load or create config, then apply CLI overrides
    let mut config = DemoConfig::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        DemoConfig::default()
    });
    config.apply_cli_overrides(&args);

    farshore_log::init_logging(Some(config.debug.log_level.as_str()));

    if let Err(err) = run_scenario(&config) {
        error!("Scenario aborted: {err}");
        std::process::exit(1);
    }
}

fn run_scenario(config: &DemoConfig) -> Result<(), ScenarioError> {
    let graph = generate_partition(&PartitionConfig {
        seed: config.world.seed,
        cells_per_axis: config.world.cells_per_axis,
        cell_spacing: config.world.cell_spacing,
        ..PartitionConfig::default()
    })?;
    survey_partition(&graph);

    let mut registry = VoxelTagRegistry::new();
    let materials = register_demo_materials(
        &mut registry,
        &config.scenario.portal_ring,
        &config.scenario.portal_key,
    )?;

    let mut terrain = DemoTerrain::new(materials.sand);
    let mut store = MemoryStore::new();
    let mut placer = BuildLog::with_standard_templates();
    let player = PlayerId(config.scenario.player_id);

    // The castaway washes ashore near the middle of the map.
    let map_center = config.world.cell_spacing * f64::from(config.world.cells_per_axis) / 2.0;
    let requested = DVec2::splat(map_center);
    demonstrate_site_search(&graph, requested);

    let placement = SpawnSetup::new().first_spawn(
        &WorldModel {
            graph: &graph,
            view: &terrain,
            tags: &registry,
        },
        &mut store,
        &mut placer,
        player,
        requested,
    )?;

    // Scenery by the hut, and proof the ground scan sees through it.
    let (palm_x, palm_z) = (placement.spawn.x + 2, placement.spawn.z - 2);
    plant_palm(&mut terrain, palm_x, palm_z, &materials);
    let under_palm = surface_height(&terrain, &registry, palm_x, palm_z, terrain.max_height())?;
    info!("Palm at ({palm_x}, {palm_z}) shades ground level {under_palm}");

    let campaign = Campaign {
        dispatcher: StructureDispatcher::new(),
        graph: &graph,
        terrain: &terrain,
        registry: &registry,
        player,
    };
    campaign.walk(&mut store, &mut placer)?;

    ignite_the_portal(config, &mut terrain, &materials, placement, player);

    let record = store.load(player);
    info!(
        "Campaign record closed in phase {:?} after {} placements",
        record.phase(),
        placer.placed.len()
    );
    Ok(())
}

/// Logs the partition composition.
fn survey_partition(graph: &BiomeGraph) {
    let mut counts: BTreeMap<BiomeCategory, usize> = BTreeMap::new();
    for region in graph.regions() {
        *counts.entry(region.biome).or_default() += 1;
    }
    info!(
        "Partition holds {} regions across {} biome categories",
        graph.len(),
        counts.len()
    );
    for (biome, count) in counts {
        info!("  {:<28} {count}", biome.display_name());
    }
}

/// Runs the two search constraints straight against the graph.
fn demonstrate_site_search(graph: &BiomeGraph, origin: DVec2) {
    match find_site(graph, origin, &NeighborhoodMatch, AREA_SEARCH_RADIUS) {
        Some(site) => info!(
            "Nearest settleable area from map center: ({:.0}, {:.0})",
            site.x, site.y
        ),
        None => warn!("No settleable area within reach of the map center"),
    }
    match find_site(
        graph,
        origin,
        &DirectMatch(BiomeCategory::Beach),
        AREA_SEARCH_RADIUS,
    ) {
        Some(site) => info!("Nearest beach: ({:.0}, {:.0})", site.x, site.y),
        None => warn!("No beach within reach of the map center"),
    }
}

/// The biome walk: one crossing per bound category.
struct Campaign<'a> {
    dispatcher: StructureDispatcher,
    graph: &'a BiomeGraph,
    terrain: &'a DemoTerrain,
    registry: &'a VoxelTagRegistry,
    player: PlayerId,
}

impl Campaign<'_> {
    fn world(&self) -> WorldModel<'_> {
        WorldModel {
            graph: self.graph,
            view: self.terrain,
            tags: self.registry,
        }
    }

    /// Crosses into every bound biome category and logs what each
    /// crossing yields. A forest goes first to show the milestone gate
    /// holding non-well structures back.
    fn walk(&self, store: &mut MemoryStore, placer: &mut BuildLog) -> Result<(), ScenarioError> {
        let forests = [
            BiomeCategory::TemperateDeciduousForest,
            BiomeCategory::TemperateRainForest,
            BiomeCategory::TropicalSeasonalForest,
            BiomeCategory::TropicalRainForest,
        ];
        if let Some(biome) = forests
            .into_iter()
            .find(|b| self.graph.regions().any(|r| r.biome == *b))
        {
            self.cross_into(store, placer, biome)?;
        }

        for biome in standard_bindings().keys() {
            self.cross_into(store, placer, *biome)?;
        }
        Ok(())
    }

    /// Fires a biome-enter event at the center of the first region of
    /// the category, as if the player had walked in.
    fn cross_into(
        &self,
        store: &mut MemoryStore,
        placer: &mut BuildLog,
        biome: BiomeCategory,
    ) -> Result<(), ScenarioError> {
        let Some(region) = self.graph.regions().find(|r| r.biome == biome) else {
            warn!(
                "This world grew no {}; skipping the crossing",
                biome.display_name()
            );
            return Ok(());
        };

        let ground = surface_height(
            self.terrain,
            self.registry,
            region.center.x.floor() as i32,
            region.center.y.floor() as i32,
            self.terrain.max_height(),
        )?;
        let event = BiomeEnterEvent {
            player: self.player,
            biome,
            position: DVec3::new(region.center.x, f64::from(ground + 1), region.center.y),
            view_dir: DVec2::X,
        };

        let outcome = self
            .dispatcher
            .on_biome_enter(&self.world(), store, placer, &event)?;
        info!("Crossing into {}: {:?}", biome.display_name(), outcome);
        Ok(())
    }
}

/// Builds the frame by the spawn and strikes it three times: with an
/// empty hand, with the igniter over an incomplete frame, then for real.
fn ignite_the_portal(
    config: &DemoConfig,
    terrain: &mut DemoTerrain,
    materials: &DemoMaterials,
    placement: SpawnPlacement,
    player: PlayerId,
) {
    let assembly = AssemblyMaterials {
        ring: materials.ring,
        key: materials.key,
    };
    let activator = PortalActivator::new(assembly, config.scenario.igniter.clone());
    let mut chat = ChatLog::default();

    // Frame on the sand a few steps east of the spawn, capstone missing.
    let anchor = IVec3::new(placement.spawn.x + 6, GROUND_HEIGHT, placement.spawn.z);
    build_portal_frame(terrain, anchor, assembly, Orientation::XAligned);
    let capstone = anchor + IVec3::new(0, 3, 0);
    terrain.set(capstone, VoxelTag::AIR);

    let mut attempt = ActivationAttempt {
        agent: AgentId(player.0),
        anchor,
        held_item: None,
        position: DVec3::new(
            f64::from(placement.spawn.x),
            f64::from(placement.spawn.y),
            f64::from(placement.spawn.z),
        ),
    };
    info!(
        "Empty-handed strike: {:?}",
        activator.on_strike(terrain, &mut chat, &attempt)
    );

    attempt.held_item = Some(config.scenario.igniter.clone());
    info!(
        "Strike without the capstone: {:?}",
        activator.on_strike(terrain, &mut chat, &attempt)
    );

    terrain.set(capstone, materials.key);
    info!(
        "Strike on the finished frame: {:?}",
        activator.on_strike(terrain, &mut chat, &attempt)
    );
    info!("Chat received {} notification(s)", chat.delivered.len());
}

//! Progress-gated structure dispatch.
//!
//! Entering a region of a new biome category may drop one of the
//! campaign structures nearby. The well gates everything else: until it
//! has been placed once, no other structure is allowed out of its slot.
//! All state mutation is staged and committed only after the placer
//! accepts, so an aborted dispatch leaves the record untouched.

use glam::{DVec2, DVec3, IVec3};

use farshore_biome::{BiomeCategory, BiomeGraph};
use farshore_spawn::{DirectMatch, find_site_or};
use farshore_voxel::{GroundScanError, VoxelTagRegistry, VoxelView, surface_height};

use crate::{
    PlacementError, PlacementTransform, PlayerId, ProgressState, ProgressStore, StructureId,
    StructurePlacer,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Half-width of the site search window around the probe point when a
/// biome crossing fires.
pub const BIOME_SEARCH_RADIUS: f64 = 400.0;

/// Minimum distance between a placement anchor and the starting hut.
pub const HUT_EXCLUSION_DISTANCE: f64 = 30.0;

/// How far ahead of the player the probe point sits, in world units
/// along the view direction.
pub const LOOK_AHEAD_DISTANCE: f64 = 3.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Read-only world access bundled for dispatch calls.
pub struct WorldModel<'a> {
    pub graph: &'a BiomeGraph,
    pub view: &'a dyn VoxelView,
    pub tags: &'a VoxelTagRegistry,
}

/// A player crossing into a region of a new biome category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeEnterEvent {
    pub player: PlayerId,
    /// Category of the region being entered.
    pub biome: BiomeCategory,
    /// Player position when the crossing fired.
    pub position: DVec3,
    /// Horizontal view direction; need not be normalized. Zero means
    /// the probe sits at the player.
    pub view_dir: DVec2,
}

/// What a biome-enter event resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The biome carries no binding, or its slot was already consumed.
    NoBinding,
    /// A non-well structure came up before the well milestone.
    Suppressed { structure: StructureId },
    /// The anchor fell inside the hut exclusion zone and the biome was
    /// not forest-like.
    ExclusionZone { structure: StructureId, distance: f64 },
    /// The placer knows no template under the bound id. Reported and
    /// dropped without touching the record.
    TemplateMissing { structure: StructureId },
    /// Structure written to the world; slots consumed and, for the
    /// well, the milestone committed.
    Placed {
        structure: StructureId,
        anchor: IVec3,
        /// Whether this placement flipped `well_found`.
        milestone: bool,
    },
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Decides whether a biome crossing yields a structure, and where.
#[derive(Debug, Clone)]
pub struct StructureDispatcher {
    /// Half-width of the site search window.
    pub search_radius: f64,
    /// Minimum distance a placement must keep from the hut.
    pub hut_exclusion: f64,
    /// Probe-point offset ahead of the player.
    pub look_ahead: f64,
}

impl Default for StructureDispatcher {
    fn default() -> Self {
        Self {
            search_radius: BIOME_SEARCH_RADIUS,
            hut_exclusion: HUT_EXCLUSION_DISTANCE,
            look_ahead: LOOK_AHEAD_DISTANCE,
        }
    }
}

impl StructureDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a biome crossing end to end: loads the player's record,
    /// runs [`StructureDispatcher::dispatch`], and persists the record
    /// if the dispatch placed anything. The save lands before this
    /// returns, so an immediately-following event observes the updated
    /// gating state.
    ///
    /// # Errors
    ///
    /// Propagates [`GroundScanError`] when the anchor column has no
    /// resolvable surface inside the view's height band.
    pub fn on_biome_enter(
        &self,
        world: &WorldModel<'_>,
        store: &mut dyn ProgressStore,
        placer: &mut dyn StructurePlacer,
        event: &BiomeEnterEvent,
    ) -> Result<DispatchOutcome, GroundScanError> {
        let mut state = store.load(event.player);
        let outcome = self.dispatch(
            world,
            &mut state,
            placer,
            event.biome,
            event.position,
            event.view_dir,
        )?;
        if matches!(outcome, DispatchOutcome::Placed { .. }) {
            store.save(event.player, &state);
        }
        Ok(outcome)
    }

    /// The dispatch decision for one crossing, mutating `state` only on
    /// success.
    ///
    /// # Errors
    ///
    /// Propagates [`GroundScanError`] from the anchor ground scan.
    pub fn dispatch(
        &self,
        world: &WorldModel<'_>,
        state: &mut ProgressState,
        placer: &mut dyn StructurePlacer,
        biome: BiomeCategory,
        position: DVec3,
        view_dir: DVec2,
    ) -> Result<DispatchOutcome, GroundScanError> {
        let Some(structure) = state.binding_for(biome).cloned() else {
            return Ok(DispatchOutcome::NoBinding);
        };

        // The milestone transition is staged here and committed only
        // after the placer accepts.
        let milestone = structure.is_well() && !state.well_found;
        if !state.well_found && !structure.is_well() {
            tracing::debug!("Suppressing {structure} until the well is found");
            return Ok(DispatchOutcome::Suppressed { structure });
        }

        let anchor = self.resolve_anchor(world, biome, position, view_dir)?;

        if let Some(hut) = state.hut_anchor() {
            let flat_anchor = DVec3::new(anchor.x as f64, 0.0, anchor.z as f64);
            let distance = flat_anchor.distance(hut.as_dvec3());
            if distance < self.hut_exclusion && !biome.is_forest_like() {
                tracing::debug!(
                    "Rejecting {structure}: anchor {distance:.1} units from the hut"
                );
                return Ok(DispatchOutcome::ExclusionZone {
                    structure,
                    distance,
                });
            }
        }

        if let Err(PlacementError::TemplateNotFound(_)) =
            placer.place(&structure, PlacementTransform::at(anchor))
        {
            tracing::warn!("No template registered for {structure}, dropping dispatch");
            return Ok(DispatchOutcome::TemplateMissing { structure });
        }

        if milestone {
            state.well_found = true;
        }
        state.clear_structure(&structure);
        tracing::info!(
            "Placed {structure} at ({}, {}, {}) for {} crossing",
            anchor.x,
            anchor.y,
            anchor.z,
            biome.display_name()
        );
        Ok(DispatchOutcome::Placed {
            structure,
            anchor,
            milestone,
        })
    }

    /// Resolves the placement anchor: the nearest matching region
    /// center (falling back to the probe point when none matches),
    /// height-adjusted by the column ground scan from the player's
    /// height.
    fn resolve_anchor(
        &self,
        world: &WorldModel<'_>,
        biome: BiomeCategory,
        position: DVec3,
        view_dir: DVec2,
    ) -> Result<IVec3, GroundScanError> {
        let feet = DVec2::new(position.x, position.z);
        let probe = feet + view_dir.normalize_or_zero() * self.look_ahead;
        let site = find_site_or(world.graph, probe, &DirectMatch(biome), self.search_radius, probe);

        let x = site.x.floor() as i32;
        let z = site.y.floor() as i32;
        let y = surface_height(world.view, world.tags, x, z, position.y.floor() as i32)?;
        Ok(IVec3::new(x, y, z))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use farshore_biome::{Region, RegionId};
    use farshore_voxel::{GridVolume, VoxelTagDef};

    use crate::MemoryStore;

    struct RecordingPlacer {
        placed: Vec<(StructureId, PlacementTransform)>,
        missing: HashSet<String>,
    }

    impl RecordingPlacer {
        fn new() -> Self {
            Self {
                placed: Vec::new(),
                missing: HashSet::new(),
            }
        }

        fn without_template(template: &str) -> Self {
            let mut placer = Self::new();
            placer.missing.insert(template.to_string());
            placer
        }
    }

    impl StructurePlacer for RecordingPlacer {
        fn place(
            &mut self,
            template: &StructureId,
            transform: PlacementTransform,
        ) -> Result<(), PlacementError> {
            if self.missing.contains(&template.0) {
                return Err(PlacementError::TemplateNotFound(template.clone()));
            }
            self.placed.push((template.clone(), transform));
            Ok(())
        }
    }

    struct Fixture {
        graph: BiomeGraph,
        volume: GridVolume,
        tags: VoxelTagRegistry,
    }

    impl Fixture {
        /// One region per entry, centers spread along x, stone floor at
        /// height zero under everything.
        fn new(biomes: &[(f64, BiomeCategory)]) -> Self {
            let regions = biomes
                .iter()
                .enumerate()
                .map(|(id, (x, biome))| Region {
                    id: RegionId(id as u32),
                    center: DVec2::new(*x, 0.0),
                    biome: *biome,
                    neighbors: Vec::new(),
                })
                .collect();
            let graph = BiomeGraph::from_regions(regions).unwrap();

            let mut tags = VoxelTagRegistry::new();
            let stone = tags
                .register(VoxelTagDef {
                    name: "stone".to_string(),
                    solid: true,
                    foliage: false,
                })
                .unwrap();
            let mut volume = GridVolume::new(-16, 64);
            volume.fill_box(IVec3::new(-60, 0, -60), IVec3::new(60, 0, 60), stone);

            Self {
                graph,
                volume,
                tags,
            }
        }

        fn world(&self) -> WorldModel<'_> {
            WorldModel {
                graph: &self.graph,
                view: &self.volume,
                tags: &self.tags,
            }
        }
    }

    fn well() -> StructureId {
        StructureId::new("old_well")
    }

    fn temple() -> StructureId {
        StructureId::new("ember_temple")
    }

    fn stones() -> StructureId {
        StructureId::new("standing_stones")
    }

    /// Standing at the origin on the stone floor, looking east.
    fn at_origin() -> (DVec3, DVec2) {
        (DVec3::new(0.0, 1.0, 0.0), DVec2::new(1.0, 0.0))
    }

    #[test]
    fn test_well_dispatch_commits_milestone_and_consumes_slot() {
        let fixture = Fixture::new(&[(20.0, BiomeCategory::Beach)]);
        let mut state = ProgressState::new();
        state.bind(BiomeCategory::Beach, well());
        state.record_hut(IVec3::new(100, 0, 100));
        let mut placer = RecordingPlacer::new();
        let (position, view) = at_origin();

        let outcome = StructureDispatcher::new()
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Beach, position, view)
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Placed {
                structure: well(),
                anchor: IVec3::new(20, 0, 0),
                milestone: true,
            }
        );
        assert!(state.well_found);
        assert_eq!(state.binding_for(BiomeCategory::Beach), None);
        assert_eq!(placer.placed.len(), 1);
        assert_eq!(placer.placed[0].1, PlacementTransform::at(IVec3::new(20, 0, 0)));
    }

    #[test]
    fn test_exclusion_zone_aborts_without_any_mutation() {
        let fixture = Fixture::new(&[(20.0, BiomeCategory::Beach)]);
        let mut state = ProgressState::new();
        state.bind(BiomeCategory::Beach, well());
        // Hut 5 units from the anchor at (20, 0).
        state.record_hut(IVec3::new(25, 0, 0));
        let mut placer = RecordingPlacer::new();
        let (position, view) = at_origin();

        let outcome = StructureDispatcher::new()
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Beach, position, view)
            .unwrap();

        match outcome {
            DispatchOutcome::ExclusionZone { structure, distance } => {
                assert_eq!(structure, well());
                assert!((distance - 5.0).abs() < 1e-9);
            }
            other => panic!("expected exclusion abort, got {other:?}"),
        }
        assert!(!state.well_found, "aborted dispatch must not fire the milestone");
        assert_eq!(state.binding_for(BiomeCategory::Beach), Some(&well()));
        assert!(placer.placed.is_empty());
    }

    #[test]
    fn test_exclusion_abort_leaves_the_well_dispatchable_elsewhere() {
        let fixture = Fixture::new(&[(20.0, BiomeCategory::Beach), (-30.0, BiomeCategory::Coast)]);
        let mut state = ProgressState::new();
        state.bind(BiomeCategory::Beach, well());
        state.bind(BiomeCategory::Coast, well());
        // 5 units from the Beach anchor, 55 from the Coast anchor.
        state.record_hut(IVec3::new(25, 0, 0));
        let mut placer = RecordingPlacer::new();
        let (position, view) = at_origin();
        let dispatcher = StructureDispatcher::new();

        let first = dispatcher
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Beach, position, view)
            .unwrap();
        assert!(
            matches!(first, DispatchOutcome::ExclusionZone { .. }),
            "beach anchor sits inside the hut radius, got {first:?}"
        );
        assert!(!state.well_found);
        assert_eq!(state.binding_for(BiomeCategory::Coast), Some(&well()));

        let second = dispatcher
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Coast, position, view)
            .unwrap();
        assert_eq!(
            second,
            DispatchOutcome::Placed {
                structure: well(),
                anchor: IVec3::new(-30, 0, 0),
                milestone: true,
            }
        );
        assert!(state.well_found);
        assert_eq!(state.binding_for(BiomeCategory::Beach), None, "every well alias is consumed");
        assert_eq!(placer.placed.len(), 1);
    }

    #[test]
    fn test_forest_biome_overrides_the_exclusion_zone() {
        let fixture = Fixture::new(&[(20.0, BiomeCategory::TropicalRainForest)]);
        let mut state = ProgressState::new();
        state.well_found = true;
        state.bind(BiomeCategory::TropicalRainForest, temple());
        state.record_hut(IVec3::new(25, 0, 0));
        let mut placer = RecordingPlacer::new();
        let (position, view) = at_origin();

        let outcome = StructureDispatcher::new()
            .dispatch(
                &fixture.world(),
                &mut state,
                &mut placer,
                BiomeCategory::TropicalRainForest,
                position,
                view,
            )
            .unwrap();

        assert!(
            matches!(outcome, DispatchOutcome::Placed { .. }),
            "forest placements ignore the hut radius, got {outcome:?}"
        );
    }

    #[test]
    fn test_non_well_structures_suppressed_before_milestone() {
        let fixture = Fixture::new(&[(20.0, BiomeCategory::Marsh)]);
        let mut state = ProgressState::new();
        state.bind(BiomeCategory::Marsh, stones());
        let mut placer = RecordingPlacer::new();
        let (position, view) = at_origin();

        let outcome = StructureDispatcher::new()
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Marsh, position, view)
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Suppressed { structure: stones() });
        assert_eq!(
            state.binding_for(BiomeCategory::Marsh),
            Some(&stones()),
            "suppression keeps the slot for later"
        );
        assert!(placer.placed.is_empty());
    }

    #[test]
    fn test_unbound_biome_is_a_noop() {
        let fixture = Fixture::new(&[(20.0, BiomeCategory::Snow)]);
        let mut state = ProgressState::new();
        let mut placer = RecordingPlacer::new();
        let (position, view) = at_origin();

        let outcome = StructureDispatcher::new()
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Snow, position, view)
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::NoBinding);
    }

    #[test]
    fn test_consumed_slot_is_a_noop() {
        let fixture = Fixture::new(&[(20.0, BiomeCategory::Beach)]);
        let mut state = ProgressState::new();
        state.bind(BiomeCategory::Beach, well());
        state.clear_structure(&well());
        let mut placer = RecordingPlacer::new();
        let (position, view) = at_origin();

        let outcome = StructureDispatcher::new()
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Beach, position, view)
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::NoBinding);
        assert!(placer.placed.is_empty());
    }

    #[test]
    fn test_placement_clears_every_alias_of_the_structure() {
        let fixture = Fixture::new(&[(20.0, BiomeCategory::Beach)]);
        let mut state = ProgressState::new();
        state.bind(BiomeCategory::Beach, well());
        state.bind(BiomeCategory::Coast, well());
        state.bind(BiomeCategory::Lakeshore, well());
        state.bind(BiomeCategory::Marsh, stones());
        let mut placer = RecordingPlacer::new();
        let (position, view) = at_origin();

        StructureDispatcher::new()
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Beach, position, view)
            .unwrap();

        assert_eq!(state.binding_for(BiomeCategory::Beach), None);
        assert_eq!(state.binding_for(BiomeCategory::Coast), None);
        assert_eq!(state.binding_for(BiomeCategory::Lakeshore), None);
        assert_eq!(state.binding_for(BiomeCategory::Marsh), Some(&stones()));
    }

    #[test]
    fn test_missing_template_reported_and_record_untouched() {
        let fixture = Fixture::new(&[(20.0, BiomeCategory::Beach)]);
        let mut state = ProgressState::new();
        state.bind(BiomeCategory::Beach, well());
        let snapshot = state.clone();
        let mut placer = RecordingPlacer::without_template("old_well");
        let (position, view) = at_origin();

        let outcome = StructureDispatcher::new()
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Beach, position, view)
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::TemplateMissing { structure: well() });
        assert_eq!(state, snapshot, "failed lookups must not mutate the record");
    }

    #[test]
    fn test_probe_point_is_the_fallback_anchor() {
        // Only grassland regions exist, so a Beach crossing finds no
        // matching center and anchors at the look-ahead probe instead.
        let fixture = Fixture::new(&[(20.0, BiomeCategory::Grassland)]);
        let mut state = ProgressState::new();
        state.bind(BiomeCategory::Beach, well());
        let mut placer = RecordingPlacer::new();
        let (position, view) = at_origin();

        let outcome = StructureDispatcher::new()
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Beach, position, view)
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Placed {
                structure: well(),
                anchor: IVec3::new(3, 0, 0),
                milestone: true,
            },
            "probe sits three units along the view direction"
        );
    }

    #[test]
    fn test_unbounded_column_propagates_scan_error() {
        let mut fixture = Fixture::new(&[(20.0, BiomeCategory::Beach)]);
        // Strip the world so the anchor column holds nothing but air.
        fixture.volume = GridVolume::new(-16, 64);
        let mut state = ProgressState::new();
        state.bind(BiomeCategory::Beach, well());
        let mut placer = RecordingPlacer::new();
        let (position, view) = at_origin();

        let err = StructureDispatcher::new()
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Beach, position, view)
            .unwrap_err();

        assert_eq!(err.x, 20);
        assert_eq!(err.z, 0);
        assert!(!state.well_found);
    }

    #[test]
    fn test_milestone_unlocks_the_remaining_slots() {
        let fixture = Fixture::new(&[(20.0, BiomeCategory::Beach), (-30.0, BiomeCategory::Marsh)]);
        let mut state = ProgressState::new();
        state.bind(BiomeCategory::Beach, well());
        state.bind(BiomeCategory::Marsh, stones());
        let mut placer = RecordingPlacer::new();
        let (position, view) = at_origin();
        let dispatcher = StructureDispatcher::new();

        let first = dispatcher
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Marsh, position, view)
            .unwrap();
        assert!(matches!(first, DispatchOutcome::Suppressed { .. }));

        dispatcher
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Beach, position, view)
            .unwrap();

        let third = dispatcher
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Marsh, position, view)
            .unwrap();
        assert_eq!(
            third,
            DispatchOutcome::Placed {
                structure: stones(),
                anchor: IVec3::new(-30, 0, 0),
                milestone: false,
            }
        );
    }

    #[test]
    fn test_repeat_crossing_is_one_shot() {
        let fixture = Fixture::new(&[(20.0, BiomeCategory::Beach)]);
        let mut state = ProgressState::new();
        state.bind(BiomeCategory::Beach, well());
        let mut placer = RecordingPlacer::new();
        let (position, view) = at_origin();
        let dispatcher = StructureDispatcher::new();

        let first = dispatcher
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Beach, position, view)
            .unwrap();
        let second = dispatcher
            .dispatch(&fixture.world(), &mut state, &mut placer, BiomeCategory::Beach, position, view)
            .unwrap();

        assert!(matches!(first, DispatchOutcome::Placed { .. }));
        assert_eq!(second, DispatchOutcome::NoBinding);
        assert_eq!(placer.placed.len(), 1, "one crossing, one structure, forever");
    }

    #[test]
    fn test_on_biome_enter_persists_only_placements() {
        let fixture = Fixture::new(&[(20.0, BiomeCategory::Beach), (-30.0, BiomeCategory::Marsh)]);
        let mut store = MemoryStore::new();
        let mut seeded = ProgressState::new();
        seeded.bind(BiomeCategory::Beach, well());
        seeded.bind(BiomeCategory::Marsh, stones());
        store.save(PlayerId(7), &seeded);
        let mut placer = RecordingPlacer::new();
        let dispatcher = StructureDispatcher::new();
        let (position, view) = at_origin();

        let suppressed = dispatcher
            .on_biome_enter(
                &fixture.world(),
                &mut store,
                &mut placer,
                &BiomeEnterEvent {
                    player: PlayerId(7),
                    biome: BiomeCategory::Marsh,
                    position,
                    view_dir: view,
                },
            )
            .unwrap();
        assert!(matches!(suppressed, DispatchOutcome::Suppressed { .. }));
        assert_eq!(
            store.get(PlayerId(7)),
            Some(&seeded),
            "suppressed events leave the stored record as-is"
        );

        dispatcher
            .on_biome_enter(
                &fixture.world(),
                &mut store,
                &mut placer,
                &BiomeEnterEvent {
                    player: PlayerId(7),
                    biome: BiomeCategory::Beach,
                    position,
                    view_dir: view,
                },
            )
            .unwrap();
        let stored = store.get(PlayerId(7)).unwrap();
        assert!(stored.well_found, "placement persists before the handler returns");
        assert_eq!(stored.binding_for(BiomeCategory::Beach), None);
    }
}

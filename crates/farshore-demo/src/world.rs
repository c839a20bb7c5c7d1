//! In-memory demo world: flat island terrain, the demo material set,
//! and the collaborator implementations the scenario wires the core to.

use glam::IVec3;
use rustc_hash::FxHashMap;
use tracing::info;

use farshore_portal::{AgentId, AgentNotifier, AssemblyMaterials, Orientation, RING_OFFSETS};
use farshore_quest::{
    HUT_TEMPLATE, PYRAMID_TEMPLATE, PlacementError, PlacementTransform, STONE_CIRCLE_TEMPLATE,
    StructureId, StructurePlacer, TEMPLE_TEMPLATE, WELL_TEMPLATE,
};
use farshore_voxel::{TagRegistryError, VoxelTag, VoxelTagDef, VoxelTagRegistry, VoxelView};

/// Ground level of the demo island. Everything at or below is solid.
pub const GROUND_HEIGHT: i32 = 0;

// ---------------------------------------------------------------------------
// Materials
// ---------------------------------------------------------------------------

/// Tags of the materials the demo registers.
pub struct DemoMaterials {
    pub sand: VoxelTag,
    pub palm_trunk: VoxelTag,
    pub palm_leaves: VoxelTag,
    pub ring: VoxelTag,
    pub key: VoxelTag,
}

/// Registers the demo material set. Ring and key names come from the
/// config so the portal recipe can be reskinned without a rebuild.
pub fn register_demo_materials(
    registry: &mut VoxelTagRegistry,
    ring_name: &str,
    key_name: &str,
) -> Result<DemoMaterials, TagRegistryError> {
    let sand = registry.register(VoxelTagDef {
        name: "sand".to_string(),
        solid: true,
        foliage: false,
    })?;
    let palm_trunk = registry.register(VoxelTagDef {
        name: "palm_trunk".to_string(),
        solid: true,
        foliage: true,
    })?;
    let palm_leaves = registry.register(VoxelTagDef {
        name: "palm_leaves".to_string(),
        solid: true,
        foliage: true,
    })?;
    let ring = registry.register(VoxelTagDef {
        name: ring_name.to_string(),
        solid: true,
        foliage: false,
    })?;
    let key = registry.register(VoxelTagDef {
        name: key_name.to_string(),
        solid: true,
        foliage: false,
    })?;
    Ok(DemoMaterials {
        sand,
        palm_trunk,
        palm_leaves,
        ring,
        key,
    })
}

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// Flat island terrain with sparse overrides for anything built on it.
///
/// The plane at and below [`GROUND_HEIGHT`] is solid everywhere, so the
/// ground scan works at arbitrary coordinates without chunk storage.
pub struct DemoTerrain {
    ground: VoxelTag,
    built: FxHashMap<IVec3, VoxelTag>,
}

impl DemoTerrain {
    pub fn new(ground: VoxelTag) -> Self {
        Self {
            ground,
            built: FxHashMap::default(),
        }
    }

    /// Writes one cell on top of the base terrain.
    pub fn set(&mut self, pos: IVec3, tag: VoxelTag) {
        self.built.insert(pos, tag);
    }
}

impl VoxelView for DemoTerrain {
    fn tag_at(&self, pos: IVec3) -> VoxelTag {
        if let Some(tag) = self.built.get(&pos) {
            return *tag;
        }
        if pos.y <= GROUND_HEIGHT {
            self.ground
        } else {
            VoxelTag::AIR
        }
    }

    fn min_height(&self) -> i32 {
        -64
    }

    fn max_height(&self) -> i32 {
        128
    }
}

/// Plants a three-cell palm trunk with a leaf cap. Scenery the ground
/// scan must see through.
pub fn plant_palm(terrain: &mut DemoTerrain, x: i32, z: i32, materials: &DemoMaterials) {
    for y in 1..=3 {
        terrain.set(IVec3::new(x, y, z), materials.palm_trunk);
    }
    terrain.set(IVec3::new(x, 4, z), materials.palm_leaves);
}

/// Writes a complete portal frame into the terrain.
pub fn build_portal_frame(
    terrain: &mut DemoTerrain,
    anchor: IVec3,
    materials: AssemblyMaterials,
    orientation: Orientation,
) {
    for offset in RING_OFFSETS {
        terrain.set(anchor + offset, materials.ring);
    }
    for &offset in orientation.key_offsets() {
        terrain.set(anchor + offset, materials.key);
    }
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Placer that journals placements instead of editing world storage.
pub struct BuildLog {
    templates: Vec<&'static str>,
    pub placed: Vec<(StructureId, PlacementTransform)>,
}

impl BuildLog {
    /// A placer that knows the five standard campaign templates.
    pub fn with_standard_templates() -> Self {
        Self {
            templates: vec![
                HUT_TEMPLATE,
                WELL_TEMPLATE,
                TEMPLE_TEMPLATE,
                STONE_CIRCLE_TEMPLATE,
                PYRAMID_TEMPLATE,
            ],
            placed: Vec::new(),
        }
    }
}

impl StructurePlacer for BuildLog {
    fn place(
        &mut self,
        template: &StructureId,
        transform: PlacementTransform,
    ) -> Result<(), PlacementError> {
        if !self.templates.contains(&template.0.as_str()) {
            return Err(PlacementError::TemplateNotFound(template.clone()));
        }
        info!(
            "Built {} at ({}, {}, {})",
            template, transform.anchor.x, transform.anchor.y, transform.anchor.z
        );
        self.placed.push((template.clone(), transform));
        Ok(())
    }
}

/// Notifier that prints to the log in place of a chat channel.
#[derive(Default)]
pub struct ChatLog {
    pub delivered: Vec<(AgentId, String)>,
}

impl AgentNotifier for ChatLog {
    fn notify(&mut self, agent: AgentId, message: &str) {
        info!("[agent {}] {message}", agent.0);
        self.delivered.push((agent, message.to_owned()));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

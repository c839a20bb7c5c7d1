//! Per-player quest progress: the biome-to-structure slot table and the
//! well milestone.

use std::collections::BTreeMap;
use std::fmt;

use glam::IVec3;
use serde::{Deserialize, Serialize};

use farshore_biome::BiomeCategory;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Stable identifier of a player record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

/// Identifier of a structure template known to the placement
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(pub String);

impl StructureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Whether this template is the well, the structure whose placement
    /// unlocks the rest of the campaign. The check is textual so
    /// namespaced ids ("ruins:old_well") still qualify.
    pub fn is_well(&self) -> bool {
        self.0.contains("well")
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Progress state
// ---------------------------------------------------------------------------

/// Coarse campaign phase derived from a [`ProgressState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestPhase {
    /// No bindings seeded yet.
    NotStarted,
    /// Bindings are seeded but the well is still missing.
    WellPending,
    /// The well milestone fired; every remaining binding is eligible.
    WellFound,
}

/// Everything the quest core tracks per player.
///
/// Owned exclusively by the player's record: each event handler loads
/// it, mutates it, and stores it back before the next event runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Slot table from biome category to the structure it will yield.
    /// Consumed slots keep their key with an empty value, so a repeat
    /// visit reads as unbound.
    #[serde(default)]
    pub bindings: BTreeMap<BiomeCategory, Option<StructureId>>,
    /// Well milestone flag. Monotonic: never reset once true.
    #[serde(default)]
    pub well_found: bool,
    /// Anchor of the starting hut, recorded once at first spawn with
    /// the height component zeroed so exclusion checks are horizontal.
    #[serde(default)]
    pub hut_position: Option<[i32; 3]>,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live structure bound to `biome`, if the slot exists and has
    /// not been consumed. Unknown categories read the same as consumed
    /// slots.
    pub fn binding_for(&self, biome: BiomeCategory) -> Option<&StructureId> {
        self.bindings.get(&biome).and_then(|slot| slot.as_ref())
    }

    /// Binds a structure to a biome slot, replacing any previous value.
    pub fn bind(&mut self, biome: BiomeCategory, structure: StructureId) {
        self.bindings.insert(biome, Some(structure));
    }

    /// Consumes every slot currently holding `structure`, leaving the
    /// keys in place. A structure bound under several biomes disappears
    /// from all of them the moment it is placed once.
    pub fn clear_structure(&mut self, structure: &StructureId) {
        for slot in self.bindings.values_mut() {
            if slot.as_ref() == Some(structure) {
                *slot = None;
            }
        }
    }

    /// Records the hut anchor with its height zeroed. Later writes are
    /// ignored; the hut is placed exactly once.
    pub fn record_hut(&mut self, anchor: IVec3) {
        if self.hut_position.is_none() {
            self.hut_position = Some([anchor.x, 0, anchor.z]);
        }
    }

    /// The recorded hut anchor, if first spawn already ran.
    pub fn hut_anchor(&self) -> Option<IVec3> {
        self.hut_position.map(IVec3::from_array)
    }

    /// Derives the campaign phase for logs and save summaries.
    pub fn phase(&self) -> QuestPhase {
        if self.well_found {
            QuestPhase::WellFound
        } else if self.bindings.is_empty() {
            QuestPhase::NotStarted
        } else {
            QuestPhase::WellPending
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

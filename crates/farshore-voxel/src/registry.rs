//! Material tag registry: maps compact [`VoxelTag`] values to the
//! classification the placement logic reads.
//!
//! The registry is built once at world setup. Air is always tag 0 so
//! that unset cells represent empty space.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact material identifier stored in every voxel cell (2 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoxelTag(pub u16);

impl VoxelTag {
    /// The empty cell, pre-registered as tag 0.
    pub const AIR: VoxelTag = VoxelTag(0);
}

/// Full descriptor for a material tag.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoxelTagDef {
    /// Human-readable name (e.g. "stone", "sand", "trunk").
    pub name: String,
    /// Whether entities collide with this material.
    pub solid: bool,
    /// Whether the material is plant growth. Foliage never counts as a
    /// standable surface even when solid, so ground scans pass through
    /// leaves, trunks and cacti.
    pub foliage: bool,
}

/// Errors that can occur during tag registration.
#[derive(Debug, Error)]
pub enum TagRegistryError {
    /// A tag with the same name has already been registered.
    #[error("duplicate material tag name: {0}")]
    DuplicateName(String),
    /// All 65 535 user-defined slots have been consumed.
    #[error("material tag registry is full (max 65536 tags)")]
    RegistryFull,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps [`VoxelTag`] → [`VoxelTagDef`] with O(1) lookup by index and
/// O(1) reverse lookup by name.
pub struct VoxelTagRegistry {
    /// Dense array where `index == VoxelTag.0`.
    tags: Vec<VoxelTagDef>,
    /// Reverse lookup: name → tag.
    name_to_tag: HashMap<String, VoxelTag>,
}

impl VoxelTagRegistry {
    /// Creates a new registry with air pre-registered as tag 0.
    pub fn new() -> Self {
        let air = VoxelTagDef {
            name: "air".to_string(),
            solid: false,
            foliage: false,
        };

        let mut name_to_tag = HashMap::new();
        name_to_tag.insert("air".to_string(), VoxelTag::AIR);

        Self {
            tags: vec![air],
            name_to_tag,
        }
    }

    /// Registers a new material tag and returns its assigned value.
    ///
    /// Tags are assigned sequentially starting from 1 (0 is air).
    ///
    /// # Errors
    ///
    /// Returns [`TagRegistryError::DuplicateName`] if a tag with the same
    /// name already exists, or [`TagRegistryError::RegistryFull`] if all
    /// 65 536 slots are consumed.
    pub fn register(&mut self, def: VoxelTagDef) -> Result<VoxelTag, TagRegistryError> {
        if self.name_to_tag.contains_key(&def.name) {
            return Err(TagRegistryError::DuplicateName(def.name));
        }
        if self.tags.len() > u16::MAX as usize {
            return Err(TagRegistryError::RegistryFull);
        }

        let tag = VoxelTag(self.tags.len() as u16);
        self.name_to_tag.insert(def.name.clone(), tag);
        self.tags.push(def);
        Ok(tag)
    }

    /// Returns the definition for a given tag.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is out of range, which indicates a programming
    /// error since tags are only produced by the registry itself.
    pub fn get(&self, tag: VoxelTag) -> &VoxelTagDef {
        &self.tags[tag.0 as usize]
    }

    /// Returns the tag for a named material, or `None` if not found.
    pub fn lookup_by_name(&self, name: &str) -> Option<VoxelTag> {
        self.name_to_tag.get(name).copied()
    }

    /// Returns the total number of registered tags (including air).
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns `true` if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.tags.len() <= 1
    }

    /// Returns `true` if the given tag is air (tag 0).
    pub fn is_air(&self, tag: VoxelTag) -> bool {
        tag.0 == 0
    }

    /// Returns `true` if a ground scan can stand on this material:
    /// solid and not foliage.
    ///
    /// Unknown tags read as non-surface, like air.
    pub fn is_surface(&self, tag: VoxelTag) -> bool {
        match self.tags.get(tag.0 as usize) {
            Some(def) => def.solid && !def.foliage,
            None => false,
        }
    }
}

impl Default for VoxelTagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

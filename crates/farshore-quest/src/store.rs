//! In-memory progress store used by the demo host and tests.

use rustc_hash::FxHashMap;

use crate::{PlayerId, ProgressState, ProgressStore};

/// Hash-backed [`ProgressStore`]. Players never seen load as a fresh
/// default record.
#[derive(Default)]
pub struct MemoryStore {
    records: FxHashMap<PlayerId, ProgressState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored record, without the default-on-miss behavior of
    /// [`ProgressStore::load`].
    pub fn get(&self, player: PlayerId) -> Option<&ProgressState> {
        self.records.get(&player)
    }

    /// Number of players with a stored record.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self, player: PlayerId) -> ProgressState {
        self.records.get(&player).cloned().unwrap_or_default()
    }

    fn save(&mut self, player: PlayerId, state: &ProgressState) {
        self.records.insert(player, state.clone());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use farshore_biome::BiomeCategory;
    use crate::StructureId;

    #[test]
    fn test_unknown_player_loads_default() {
        let store = MemoryStore::new();
        assert_eq!(store.load(PlayerId(9)), ProgressState::new());
        assert!(store.get(PlayerId(9)).is_none(), "load does not create records");
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let mut store = MemoryStore::new();
        let mut state = ProgressState::new();
        state.bind(BiomeCategory::Beach, StructureId::new("old_well"));
        state.well_found = true;

        store.save(PlayerId(1), &state);
        assert_eq!(store.load(PlayerId(1)), state);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_records_are_per_player() {
        let mut store = MemoryStore::new();
        let mut state = ProgressState::new();
        state.well_found = true;
        store.save(PlayerId(1), &state);

        assert!(!store.load(PlayerId(2)).well_found);
    }
}

//! In-memory reference implementation of the storage traits.

use std::collections::HashMap;

use chrono::Utc;

use crate::error::{RecorderError, Result};
use crate::models::{MatchTime, NewPhase, NewStat, Phase, Stat, StatUpdate, Zone};

use super::{KeyValueStore, PhaseStore, PositionStore, StatStore};

/// Id-keyed tables backing tests and the CLI replay tool.
#[derive(Debug, Default)]
pub struct MemoryStore {
    next_phase_id: i64,
    next_stat_id: i64,
    phases: HashMap<i64, Phase>,
    stats: HashMap<i64, Stat>,
    positions: HashMap<(i64, i64), (Zone, Option<u8>)>,
    kv: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Durable position row for a player, if one was ever written.
    pub fn position(&self, game_id: i64, player_id: i64) -> Option<(Zone, Option<u8>)> {
        self.positions.get(&(game_id, player_id)).copied()
    }
}

impl PhaseStore for MemoryStore {
    fn create_phase(&mut self, new: NewPhase) -> Result<Phase> {
        self.next_phase_id += 1;
        let phase = Phase {
            id: self.next_phase_id,
            game_id: new.game_id,
            kind: new.kind,
            player_id: new.player_id,
            start_time: new.start_time,
            end_time: None,
        };
        self.phases.insert(phase.id, phase.clone());
        Ok(phase)
    }

    fn close_phase(&mut self, id: i64, end_time: MatchTime) -> Result<Phase> {
        let phase =
            self.phases.get_mut(&id).ok_or_else(|| RecorderError::not_found("phase", id))?;
        phase.end_time = Some(end_time);
        Ok(phase.clone())
    }

    fn open_phase(&self, game_id: i64) -> Result<Option<Phase>> {
        Ok(self.phases.values().find(|p| p.game_id == game_id && p.is_open()).cloned())
    }

    fn phases_for_game(&self, game_id: i64) -> Result<Vec<Phase>> {
        let mut phases: Vec<_> =
            self.phases.values().filter(|p| p.game_id == game_id).cloned().collect();
        phases.sort_by_key(|p| p.id);
        Ok(phases)
    }
}

impl StatStore for MemoryStore {
    fn create_stat(&mut self, new: NewStat) -> Result<Stat> {
        self.next_stat_id += 1;
        let stat = Stat {
            id: self.next_stat_id,
            game_id: new.game_id,
            player_id: new.player_id,
            action_id: new.action_id,
            success: new.success,
            phase_id: new.phase_id,
            description: new.description,
            time: new.time,
            created_at: Utc::now(),
        };
        self.stats.insert(stat.id, stat.clone());
        Ok(stat)
    }

    fn update_stat(&mut self, id: i64, update: StatUpdate) -> Result<Stat> {
        let stat = self.stats.get_mut(&id).ok_or_else(|| RecorderError::not_found("stat", id))?;
        stat.action_id = update.action_id;
        stat.success = update.success;
        stat.description = update.description;
        Ok(stat.clone())
    }

    fn delete_stat(&mut self, id: i64) -> Result<()> {
        self.stats.remove(&id).ok_or_else(|| RecorderError::not_found("stat", id))?;
        Ok(())
    }

    fn stats_for_game(&self, game_id: i64) -> Result<Vec<Stat>> {
        let mut stats: Vec<_> =
            self.stats.values().filter(|s| s.game_id == game_id).cloned().collect();
        stats.sort_by_key(|s| s.id);
        Ok(stats)
    }
}

impl PositionStore for MemoryStore {
    fn set_player_position(
        &mut self,
        game_id: i64,
        player_id: i64,
        zone: Zone,
        slot_index: Option<u8>,
    ) -> Result<()> {
        self.positions.insert((game_id, player_id), (zone, slot_index));
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.kv.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.kv.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.kv.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PhaseKind;

    #[test]
    fn test_phase_ids_are_assigned_sequentially() {
        let mut store = MemoryStore::new();
        let new = |kind| NewPhase {
            game_id: 1,
            kind,
            player_id: None,
            start_time: MatchTime::from_seconds(0),
        };

        let a = store.create_phase(new(PhaseKind::Attack)).unwrap();
        let b = store.create_phase(new(PhaseKind::Defense)).unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[test]
    fn test_close_unknown_phase_is_not_found() {
        let mut store = MemoryStore::new();
        let err = store.close_phase(42, MatchTime::from_seconds(10)).unwrap_err();
        assert!(matches!(err, RecorderError::NotFound { entity: "phase", id: 42 }));
    }

    #[test]
    fn test_kv_roundtrip() {
        let mut store = MemoryStore::new();
        store.put("session:1", "{}").unwrap();
        assert_eq!(store.get("session:1").unwrap().as_deref(), Some("{}"));
        store.remove("session:1").unwrap();
        assert_eq!(store.get("session:1").unwrap(), None);
    }
}

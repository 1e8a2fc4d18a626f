//! Live field layout: which zone and slot each player occupies.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{RecorderError, Result};
use crate::models::{Player, Zone};
use crate::storage::PositionStore;

/// Persistence behaviour of the roster.
///
/// During setup every placement is written through to durable storage;
/// once the game is live, placements are held locally and batched so
/// fast-paced drag sequences do not flood the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RosterMode {
    Setup,
    Live,
}

/// Tracks each player's current zone and slot within a game.
///
/// Local state is authoritative for the UI; durable write failures are
/// surfaced as warnings, never as lost placements.
#[derive(Debug)]
pub struct Roster {
    game_id: i64,
    players: HashMap<i64, Player>,
    mode: RosterMode,
    /// Player ids with placements not yet written through (live mode).
    dirty: BTreeSet<i64>,
}

impl Roster {
    pub fn new(game_id: i64) -> Self {
        Roster { game_id, players: HashMap::new(), mode: RosterMode::Setup, dirty: BTreeSet::new() }
    }

    pub fn mode(&self) -> RosterMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RosterMode) {
        self.mode = mode;
    }

    /// Register a player with the live roster view. New players start
    /// wherever their record says they are (normally the bench).
    pub fn add_player(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    pub fn player(&self, player_id: i64) -> Option<&Player> {
        self.players.get(&player_id)
    }

    /// Players currently in a zone, slot index ascending, unslotted
    /// players last (ties broken by player id for stable output).
    pub fn players_in_zone(&self, zone: Zone) -> impl Iterator<Item = &Player> {
        let mut players: Vec<_> = self.players.values().filter(|p| p.zone == zone).collect();
        players.sort_by_key(|p| (p.slot_index.is_none(), p.slot_index, p.id));
        players.into_iter()
    }

    /// Set a player's zone and slot. Bench placements clear the slot.
    ///
    /// If another player already occupies `(zone, slot)` the store does
    /// not auto-evict; last write wins and the UI is expected to
    /// prevent double-assignment proactively.
    pub fn place_player(
        &mut self,
        store: &mut dyn PositionStore,
        player_id: i64,
        zone: Zone,
        slot_index: Option<u8>,
    ) -> Result<()> {
        let player = self
            .players
            .get_mut(&player_id)
            .ok_or_else(|| RecorderError::not_found("player", player_id))?;

        player.zone = zone;
        player.slot_index = if zone == Zone::Bench { None } else { slot_index };

        self.persist(store, player_id);
        Ok(())
    }

    /// Exchange zone and slot between two players; both updates become
    /// visible together or the call fails before touching either.
    pub fn swap_players(&mut self, store: &mut dyn PositionStore, a: i64, b: i64) -> Result<()> {
        if !self.players.contains_key(&a) {
            return Err(RecorderError::not_found("player", a));
        }
        if !self.players.contains_key(&b) {
            return Err(RecorderError::not_found("player", b));
        }

        let (zone_a, slot_a) = {
            let pa = &self.players[&a];
            (pa.zone, pa.slot_index)
        };
        let (zone_b, slot_b) = {
            let pb = &self.players[&b];
            (pb.zone, pb.slot_index)
        };

        if let Some(pa) = self.players.get_mut(&a) {
            pa.zone = zone_b;
            pa.slot_index = slot_b;
        }
        if let Some(pb) = self.players.get_mut(&b) {
            pb.zone = zone_a;
            pb.slot_index = slot_a;
        }

        self.persist(store, a);
        self.persist(store, b);
        Ok(())
    }

    /// Write all batched live-mode placements through to storage.
    ///
    /// Failed writes stay in the dirty set for the next commit. Returns
    /// the number of placements flushed.
    pub fn commit_positions(&mut self, store: &mut dyn PositionStore) -> usize {
        let pending: Vec<_> = self.dirty.iter().copied().collect();
        let mut flushed = 0;

        for player_id in pending {
            if self.write_through(store, player_id) {
                self.dirty.remove(&player_id);
                flushed += 1;
            }
        }

        flushed
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    fn persist(&mut self, store: &mut dyn PositionStore, player_id: i64) {
        match self.mode {
            RosterMode::Setup => {
                self.write_through(store, player_id);
            }
            RosterMode::Live => {
                self.dirty.insert(player_id);
            }
        }
    }

    /// Non-fatal durable write; local state stays authoritative.
    fn write_through(&mut self, store: &mut dyn PositionStore, player_id: i64) -> bool {
        let player = match self.players.get(&player_id) {
            Some(player) => player,
            None => return false,
        };

        match store.set_player_position(self.game_id, player_id, player.zone, player.slot_index) {
            Ok(()) => true,
            Err(e) => {
                log::warn!(
                    "game {}: position write for player {} failed: {}",
                    self.game_id,
                    player_id,
                    e
                );
                if self.mode == RosterMode::Live {
                    self.dirty.insert(player_id);
                }
                false
            }
        }
    }
}

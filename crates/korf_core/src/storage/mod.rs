//! Durable-storage collaborator traits.
//!
//! The recorder core never talks to a database directly; it goes
//! through these narrow traits so the surrounding application can plug
//! in its own persistence. `MemoryStore` implements all of them for
//! tests and the CLI replay tool.

pub mod memory;

pub use memory::MemoryStore;

use crate::error::Result;
use crate::models::{MatchTime, NewPhase, NewStat, Phase, Stat, StatUpdate, Zone};

/// Durable phase storage. Implementations assign phase ids.
pub trait PhaseStore {
    fn create_phase(&mut self, new: NewPhase) -> Result<Phase>;

    /// Set `end_time` on a phase. Fails with `NotFound` for unknown ids.
    fn close_phase(&mut self, id: i64, end_time: MatchTime) -> Result<Phase>;

    /// The phase with `end_time == None` for the game, if any.
    fn open_phase(&self, game_id: i64) -> Result<Option<Phase>>;

    fn phases_for_game(&self, game_id: i64) -> Result<Vec<Phase>>;
}

/// Durable stat storage. Implementations assign stat ids and the
/// `created_at` timestamp.
pub trait StatStore {
    fn create_stat(&mut self, new: NewStat) -> Result<Stat>;

    fn update_stat(&mut self, id: i64, update: StatUpdate) -> Result<Stat>;

    fn delete_stat(&mut self, id: i64) -> Result<()>;

    /// All stats for a game in id order; feeds log rehydration on
    /// session reload.
    fn stats_for_game(&self, game_id: i64) -> Result<Vec<Stat>>;
}

/// Durable player-position storage, used by the roster in write-through
/// (setup) mode and when committing batched live placements.
pub trait PositionStore {
    fn set_player_position(
        &mut self,
        game_id: i64,
        player_id: i64,
        zone: Zone,
        slot_index: Option<u8>,
    ) -> Result<()>;
}

/// Small string key-value store for crash/reload recovery snapshots.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn put(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Everything a live game session needs from persistence.
pub trait SessionStore: PhaseStore + StatStore + PositionStore + KeyValueStore {}

impl<T: PhaseStore + StatStore + PositionStore + KeyValueStore> SessionStore for T {}

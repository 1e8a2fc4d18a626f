//! # korf_core - Live Korfball Match Recording Engine
//!
//! This library maintains live match state (clock, period, score,
//! player field positions, attack/defense phase) and turns a stream of
//! discrete recorded events into aggregate player and team statistics.
//!
//! ## Features
//! - Single-open-phase tracking with close-before-open sequencing
//! - Optimistic event log with compensating score adjustments
//! - Pure, re-invocable statistics aggregation
//! - Crash/reload recovery snapshots through a key-value store

pub mod catalog;
pub mod clock;
pub mod error;
pub mod models;
pub mod phase;
pub mod recorder;
pub mod roster;
pub mod session;
pub mod stats;
pub mod storage;

// Re-export the session surface consumed by presentation layers.
pub use catalog::ActionCatalog;
pub use clock::MatchClock;
pub use error::{RecorderError, Result};
pub use models::{
    Action, ActionKind, EntryStatus, Game, GameStatus, Gender, LoggedStat, MatchTime, NewPhase,
    NewStat, Phase, PhaseKind, Player, Stat, StatUpdate, Zone,
};
pub use phase::PhaseTracker;
pub use recorder::{EventRecorder, RecordRequest, Scoreboard};
pub use roster::{Roster, RosterMode};
pub use session::{EventInput, GameSession, SessionEvent, SessionSnapshot};
pub use stats::{aggregate, AttackLine, DefenseLine, PlayerReport, StatsReport, TeamReport};
pub use storage::{
    KeyValueStore, MemoryStore, PhaseStore, PositionStore, SessionStore, StatStore,
};

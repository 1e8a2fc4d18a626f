//! Data model shared by the recorder components.
//!
//! - `action` - catalog entries and the closed `ActionKind` taxonomy
//! - `phase` - attack/defense phase spans
//! - `player` - roster players and field zones
//! - `stat` - recorded events and the optimistic entry wrapper
//! - `time` - match-clock timestamps (`MM:SS`)

pub mod action;
pub mod phase;
pub mod player;
pub mod stat;
pub mod time;

pub use action::{Action, ActionKind};
pub use phase::{NewPhase, Phase, PhaseKind};
pub use player::{Game, GameStatus, Gender, Player, Zone};
pub use stat::{EntryStatus, LoggedStat, NewStat, Stat, StatUpdate};
pub use time::MatchTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time::MatchTime;

/// One recorded occurrence (shot, goal, foul, substitution, ...) tied
/// to a phase, an action code and at most one player.
///
/// The log is append-only; edits mutate `action_id`/`success`/
/// `description` in place, deletes remove the row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stat {
    pub id: i64,
    pub game_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<i64>,
    pub action_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub phase_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Match-clock time supplied by the caller; the canonical in-match
    /// ordering key (live network latency must not reorder fast taps).
    pub time: MatchTime,
    pub created_at: DateTime<Utc>,
}

/// Stat creation payload; the durable store assigns id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStat {
    pub game_id: i64,
    pub player_id: Option<i64>,
    pub action_id: i64,
    pub success: Option<bool>,
    pub phase_id: i64,
    pub description: Option<String>,
    pub time: MatchTime,
}

/// Replacement values for the three editable fields of a stat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatUpdate {
    pub action_id: i64,
    pub success: Option<bool>,
    pub description: Option<String>,
}

/// Delivery state of an optimistically appended log entry.
///
/// Official score and report derivation only consider `Confirmed`
/// entries; `Pending` entries exist for immediate local display and
/// `Failed` ones are kept so the UI can surface the rejection instead
/// of silently dropping the tap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Pending,
    Confirmed,
    Failed,
}

/// A stat together with its optimistic delivery state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggedStat {
    pub stat: Stat,
    pub status: EntryStatus,
}

impl LoggedStat {
    pub fn is_confirmed(&self) -> bool {
        self.status == EntryStatus::Confirmed
    }
}

use serde::{Deserialize, Serialize};

use super::time::MatchTime;

/// Which team activity a phase covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Attack,
    Defense,
}

impl PhaseKind {
    pub fn opposite(self) -> Self {
        match self {
            PhaseKind::Attack => PhaseKind::Defense,
            PhaseKind::Defense => PhaseKind::Attack,
        }
    }
}

/// A contiguous span of time during which the team is attacking or
/// defending. At most one phase per game is open (`end_time == None`)
/// at any time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Phase {
    pub id: i64,
    pub game_id: i64,
    pub kind: PhaseKind,
    /// Optional key player for the phase (e.g. defended attacker).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<i64>,
    pub start_time: MatchTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<MatchTime>,
}

impl Phase {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Phase creation payload; the durable store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPhase {
    pub game_id: i64,
    pub kind: PhaseKind,
    pub player_id: Option<i64>,
    pub start_time: MatchTime,
}

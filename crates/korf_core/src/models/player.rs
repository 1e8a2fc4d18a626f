use serde::{Deserialize, Serialize};

/// A player's current on-field designation during a live game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Attack,
    Defense,
    Bench,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
}

/// Roster player as seen by the live recorder.
///
/// `zone` and `slot_index` are mutated by the roster store on every
/// placement or swap. `slot_index` is cleared whenever the player sits
/// on the bench.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub gender: Gender,
    pub team_id: i64,
    pub zone: Zone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_index: Option<u8>,
}

impl Player {
    /// New player starting on the bench.
    pub fn new(id: i64, name: impl Into<String>, gender: Gender, team_id: i64) -> Self {
        Player { id, name: name.into(), gender, team_id, zone: Zone::Bench, slot_index: None }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Complete,
}

/// Game record owned by the surrounding CRUD layer; the recorder only
/// references it for identity and the matchup header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    pub id: i64,
    pub team_a_id: i64,
    pub team_b_id: i64,
    pub date: String,
    pub location: String,
    pub status: GameStatus,
    pub score_team_a: u32,
    pub score_team_b: u32,
}

use serde::{Deserialize, Serialize};

/// One catalog entry defining a kind of recordable occurrence.
///
/// Immutable reference data seeded once; never created by end users
/// through the recorder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Action {
    pub id: i64,
    /// Short unique code as shown on the recording UI (e.g. `LC`, `GS`).
    pub code: String,
    pub kind: ActionKind,
    pub description: String,
}

/// Closed taxonomy of recordable actions.
///
/// Action codes are resolved into this enum exactly once, when the
/// catalog is built; all special-case recording logic matches on the
/// variant, so adding a new code is a compile-time-checked change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Goal,
    Assist,
    /// Short-range shot (code `LC`).
    ShotShort,
    /// Mid-range shot (code `LM`).
    ShotMid,
    /// Long-range shot (code `LL`).
    ShotLong,
    /// Shot from a free pass (code `L`).
    FreePass,
    /// Penalty shot (code `Pe`).
    Penalty,
    ReboundWon,
    ReboundLost,
    BadPass,
    Turnover,
    Defense,
    /// Goal conceded by the defended attacker (code `GS`).
    GoalSuffered,
    Substitution,
    /// Attack/defense switch marker (code `PS`).
    PositionSwitch,
    Other,
}

impl ActionKind {
    pub fn code(self) -> &'static str {
        match self {
            ActionKind::Goal => "G",
            ActionKind::Assist => "A",
            ActionKind::ShotShort => "LC",
            ActionKind::ShotMid => "LM",
            ActionKind::ShotLong => "LL",
            ActionKind::FreePass => "L",
            ActionKind::Penalty => "Pe",
            ActionKind::ReboundWon => "RG",
            ActionKind::ReboundLost => "RP",
            ActionKind::BadPass => "MP",
            ActionKind::Turnover => "P",
            ActionKind::Defense => "D",
            ActionKind::GoalSuffered => "GS",
            ActionKind::Substitution => "S",
            ActionKind::PositionSwitch => "PS",
            ActionKind::Other => "O",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let kind = match code {
            "G" => ActionKind::Goal,
            "A" => ActionKind::Assist,
            "LC" => ActionKind::ShotShort,
            "LM" => ActionKind::ShotMid,
            "LL" => ActionKind::ShotLong,
            "L" => ActionKind::FreePass,
            "Pe" => ActionKind::Penalty,
            "RG" => ActionKind::ReboundWon,
            "RP" => ActionKind::ReboundLost,
            "MP" => ActionKind::BadPass,
            "P" => ActionKind::Turnover,
            "D" => ActionKind::Defense,
            "GS" => ActionKind::GoalSuffered,
            "S" => ActionKind::Substitution,
            "PS" => ActionKind::PositionSwitch,
            "O" => ActionKind::Other,
            _ => return None,
        };
        Some(kind)
    }

    /// Shot-type codes: a successful one spawns a synthetic goal event.
    pub fn is_shot(self) -> bool {
        matches!(
            self,
            ActionKind::ShotShort
                | ActionKind::ShotMid
                | ActionKind::ShotLong
                | ActionKind::FreePass
                | ActionKind::Penalty
        )
    }

    /// Possession-loss codes counted as turnovers by the aggregator.
    pub fn is_turnover(self) -> bool {
        matches!(self, ActionKind::BadPass | ActionKind::Turnover | ActionKind::Defense)
    }
}

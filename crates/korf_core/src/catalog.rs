//! Static reference list of recordable action codes.

use once_cell::sync::Lazy;

use crate::error::{RecorderError, Result};
use crate::models::{Action, ActionKind};

/// Seed rows for the standard korfball catalog, in id order.
const SEED: [(i64, ActionKind, &str); 16] = [
    (1, ActionKind::Goal, "Goal scored"),
    (2, ActionKind::Assist, "Assist on a goal"),
    (3, ActionKind::ShotShort, "Short-range shot"),
    (4, ActionKind::ShotMid, "Mid-range shot"),
    (5, ActionKind::ShotLong, "Long-range shot"),
    (6, ActionKind::FreePass, "Shot from a free pass"),
    (7, ActionKind::Penalty, "Penalty shot"),
    (8, ActionKind::ReboundWon, "Rebound won"),
    (9, ActionKind::ReboundLost, "Rebound lost"),
    (10, ActionKind::BadPass, "Bad pass"),
    (11, ActionKind::Turnover, "Possession lost"),
    (12, ActionKind::Defense, "Defensive action on a shot"),
    (13, ActionKind::GoalSuffered, "Goal conceded"),
    (14, ActionKind::Substitution, "Player substitution"),
    (15, ActionKind::PositionSwitch, "Attack/defense switch"),
    (16, ActionKind::Other, "Other event"),
];

static STANDARD: Lazy<ActionCatalog> = Lazy::new(|| {
    let actions = SEED
        .iter()
        .map(|&(id, kind, description)| Action {
            id,
            code: kind.code().to_string(),
            kind,
            description: description.to_string(),
        })
        .collect();

    ActionCatalog::new(actions).expect("standard catalog seed is valid")
});

/// Immutable lookup table of actions, sorted by id.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCatalog {
    actions: Vec<Action>,
}

impl ActionCatalog {
    /// Build a catalog from seeded rows; ids and codes must be unique.
    pub fn new(mut actions: Vec<Action>) -> Result<Self> {
        actions.sort_by_key(|a| a.id);

        for pair in actions.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(RecorderError::Validation(format!(
                    "duplicate action id {}",
                    pair[0].id
                )));
            }
        }
        for (i, action) in actions.iter().enumerate() {
            if actions[..i].iter().any(|other| other.code == action.code) {
                return Err(RecorderError::Validation(format!(
                    "duplicate action code {:?}",
                    action.code
                )));
            }
        }

        Ok(ActionCatalog { actions })
    }

    /// The seeded standard korfball catalog.
    pub fn standard() -> Self {
        STANDARD.clone()
    }

    pub fn by_id(&self, id: i64) -> Option<&Action> {
        self.actions.binary_search_by_key(&id, |a| a.id).ok().map(|idx| &self.actions[idx])
    }

    pub fn by_code(&self, code: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.code == code)
    }

    pub fn by_kind(&self, kind: ActionKind) -> Option<&Action> {
        self.actions.iter().find(|a| a.kind == kind)
    }

    /// Resolve an action id or fail with a validation error.
    pub fn resolve(&self, id: i64) -> Result<&Action> {
        self.by_id(id)
            .ok_or_else(|| RecorderError::Validation(format!("unknown action id {}", id)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_lookups() {
        let catalog = ActionCatalog::standard();
        assert_eq!(catalog.len(), 16);

        let goal = catalog.by_code("G").unwrap();
        assert_eq!(goal.id, 1);
        assert_eq!(goal.kind, ActionKind::Goal);
        assert_eq!(catalog.by_id(13).unwrap().code, "GS");
        assert_eq!(catalog.by_kind(ActionKind::Penalty).unwrap().code, "Pe");
        assert!(catalog.by_code("XX").is_none());
    }

    #[test]
    fn test_resolve_unknown_id_is_validation_error() {
        let catalog = ActionCatalog::standard();
        let err = catalog.resolve(999).unwrap_err();
        assert!(matches!(err, RecorderError::Validation(_)));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let dup = vec![
            Action {
                id: 1,
                code: "G".to_string(),
                kind: ActionKind::Goal,
                description: String::new(),
            },
            Action {
                id: 2,
                code: "G".to_string(),
                kind: ActionKind::Assist,
                description: String::new(),
            },
        ];
        assert!(ActionCatalog::new(dup).is_err());
    }
}

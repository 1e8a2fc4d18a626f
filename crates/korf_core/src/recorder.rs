//! The single write path for statistical events.
//!
//! Keeps the optimistic event log and the scoreboard consistent with
//! goal-type events. Score mutations are always derived from the
//! old-vs-new state of the affected log entry, never from a separately
//! tracked running total that could drift on edit/delete.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::ActionCatalog;
use crate::error::{RecorderError, Result};
use crate::models::{
    ActionKind, EntryStatus, LoggedStat, MatchTime, NewStat, Phase, Stat, StatUpdate,
};
use crate::storage::StatStore;

/// Recording team's score next to the opponent's.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scoreboard {
    pub own: u32,
    pub opponent: u32,
}

/// Caller input for one recorded event. `time` is the caller's
/// match-clock reading, the canonical in-match ordering key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRequest {
    pub player_id: Option<i64>,
    pub action_id: i64,
    pub success: Option<bool>,
    pub description: Option<String>,
    pub time: MatchTime,
}

/// What one `record` call produced: the persisted stat plus the
/// synthetic goal event, when a successful shot spawned one.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub created: Vec<Stat>,
}

#[derive(Debug)]
pub struct EventRecorder {
    game_id: i64,
    log: Vec<LoggedStat>,
    scoreboard: Scoreboard,
    /// Negative placeholder ids for optimistic entries awaiting the
    /// server-assigned id.
    next_local_id: i64,
}

impl EventRecorder {
    pub fn new(game_id: i64) -> Self {
        EventRecorder { game_id, log: Vec::new(), scoreboard: Scoreboard::default(), next_local_id: 0 }
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    /// Full optimistic log in append order, pending and failed entries
    /// included.
    pub fn log(&self) -> &[LoggedStat] {
        &self.log
    }

    /// Confirmed stats only; the input to official score and report
    /// derivation.
    pub fn confirmed_stats(&self) -> impl Iterator<Item = &Stat> {
        self.log.iter().filter(|e| e.is_confirmed()).map(|e| &e.stat)
    }

    /// Restore the scoreboard from a recovery snapshot. The log stays
    /// authoritative whenever it is available.
    pub fn restore_score(&mut self, score: Scoreboard) {
        self.scoreboard = score;
    }

    /// Rebuild the log from durable rows on session reload. Every row
    /// enters as `Confirmed` and the scoreboard is re-derived from the
    /// rows, so edits and deletes keep working after a reload.
    pub fn hydrate(&mut self, catalog: &ActionCatalog, stats: Vec<Stat>) {
        let mut scoreboard = Scoreboard::default();
        for stat in &stats {
            if let Some(action) = catalog.by_id(stat.action_id) {
                scoreboard.own += own_points(action.kind, stat.success);
                scoreboard.opponent += opponent_points(action.kind, stat.success);
            }
        }

        self.scoreboard = scoreboard;
        self.log = stats
            .into_iter()
            .map(|stat| LoggedStat { stat, status: EntryStatus::Confirmed })
            .collect();
    }

    /// Record an event during the given open phase.
    ///
    /// Special semantics by action kind:
    /// - `GoalSuffered` logs with `success = true` and gives the
    ///   opponent a point;
    /// - `Defense` with `success = false` also gives the opponent a
    ///   point (a conceded goal on a failed stop);
    /// - any shot kind with `success = true` appends a second,
    ///   synthetic goal event for the same player/phase/time, and that
    ///   goal event is what increments the own score.
    ///
    /// Substitution and position-switch orchestration live in the
    /// session, which owns the roster and the phase tracker.
    pub fn record(
        &mut self,
        store: &mut dyn StatStore,
        catalog: &ActionCatalog,
        phase: &Phase,
        request: RecordRequest,
    ) -> Result<RecordOutcome> {
        let action = catalog.resolve(request.action_id)?;
        let kind = action.kind;

        let success = match kind {
            ActionKind::GoalSuffered => Some(true),
            _ => request.success,
        };

        let new = NewStat {
            game_id: self.game_id,
            player_id: request.player_id,
            action_id: request.action_id,
            success,
            phase_id: phase.id,
            description: request.description,
            time: request.time,
        };

        let stat = self.append(store, new, kind)?;
        let mut created = vec![stat.clone()];

        if kind.is_shot() && success == Some(true) {
            let goal = catalog.by_kind(ActionKind::Goal).ok_or_else(|| {
                RecorderError::Validation("catalog has no goal action".to_string())
            })?;
            let synthetic = NewStat {
                game_id: self.game_id,
                player_id: request.player_id,
                action_id: goal.id,
                success: Some(true),
                phase_id: phase.id,
                description: None,
                time: request.time,
            };
            created.push(self.append(store, synthetic, ActionKind::Goal)?);
        }

        Ok(RecordOutcome { created })
    }

    /// Mutate the editable fields of a confirmed stat, adjusting both
    /// score counters when the change flips what the old and new
    /// entries were worth.
    pub fn update(
        &mut self,
        store: &mut dyn StatStore,
        catalog: &ActionCatalog,
        stat_id: i64,
        update: StatUpdate,
    ) -> Result<Stat> {
        let idx = self.confirmed_index(stat_id)?;

        let old_kind = catalog.resolve(self.log[idx].stat.action_id)?.kind;
        let old_success = self.log[idx].stat.success;
        let new_kind = catalog.resolve(update.action_id)?.kind;

        let persisted = store.update_stat(stat_id, update)?;

        self.add_points(old_kind, old_success, -1);
        self.add_points(new_kind, persisted.success, 1);
        log::debug!("game {}: stat {} updated, score {:?}", self.game_id, stat_id, self.scoreboard);

        self.log[idx].stat = persisted.clone();
        Ok(persisted)
    }

    /// Delete a confirmed stat; a successful goal entry gives the point
    /// back, floored at zero.
    pub fn remove(
        &mut self,
        store: &mut dyn StatStore,
        catalog: &ActionCatalog,
        stat_id: i64,
    ) -> Result<Stat> {
        let idx = self.confirmed_index(stat_id)?;
        let kind = catalog.resolve(self.log[idx].stat.action_id)?.kind;

        store.delete_stat(stat_id)?;

        let removed = self.log.remove(idx);
        self.add_points(kind, removed.stat.success, -1);
        log::debug!("game {}: stat {} removed, score {:?}", self.game_id, stat_id, self.scoreboard);
        Ok(removed.stat)
    }

    fn confirmed_index(&self, stat_id: i64) -> Result<usize> {
        self.log
            .iter()
            .position(|e| e.is_confirmed() && e.stat.id == stat_id)
            .ok_or_else(|| RecorderError::not_found("stat", stat_id))
    }

    /// Optimistic append: a pending placeholder entry becomes confirmed
    /// with the server-assigned row, or is marked failed and the error
    /// surfaces to the caller.
    fn append(&mut self, store: &mut dyn StatStore, new: NewStat, kind: ActionKind) -> Result<Stat> {
        self.next_local_id -= 1;
        let placeholder = Stat {
            id: self.next_local_id,
            game_id: new.game_id,
            player_id: new.player_id,
            action_id: new.action_id,
            success: new.success,
            phase_id: new.phase_id,
            description: new.description.clone(),
            time: new.time,
            created_at: Utc::now(),
        };
        self.log.push(LoggedStat { stat: placeholder, status: EntryStatus::Pending });
        let idx = self.log.len() - 1;

        match store.create_stat(new) {
            Ok(persisted) => {
                self.log[idx].stat = persisted.clone();
                self.log[idx].status = EntryStatus::Confirmed;
                self.add_points(kind, persisted.success, 1);
                Ok(persisted)
            }
            Err(e) => {
                self.log[idx].status = EntryStatus::Failed;
                log::warn!("game {}: stat write failed: {}", self.game_id, e);
                Err(e)
            }
        }
    }

    /// Apply (or revert, with `sign = -1`) what a log entry is worth on
    /// the scoreboard. Both counters floor at zero.
    fn add_points(&mut self, kind: ActionKind, success: Option<bool>, sign: i32) {
        let own = own_points(kind, success);
        let opponent = opponent_points(kind, success);

        if sign >= 0 {
            self.scoreboard.own += own;
            self.scoreboard.opponent += opponent;
        } else {
            self.scoreboard.own = self.scoreboard.own.saturating_sub(own);
            self.scoreboard.opponent = self.scoreboard.opponent.saturating_sub(opponent);
        }
    }
}

fn own_points(kind: ActionKind, success: Option<bool>) -> u32 {
    (kind == ActionKind::Goal && success == Some(true)) as u32
}

fn opponent_points(kind: ActionKind, success: Option<bool>) -> u32 {
    match kind {
        ActionKind::GoalSuffered => 1,
        ActionKind::Defense if success == Some(false) => 1,
        _ => 0,
    }
}

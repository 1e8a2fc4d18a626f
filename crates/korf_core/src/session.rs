//! The cohesive "game session" surface consumed by the presentation
//! layer.
//!
//! One `GameSession` per live game: it owns the action catalog, match
//! clock, phase tracker, roster and event recorder, plus the storage
//! backend. Every mutating operation returns the ordered list of
//! notifications it produced so callers can react without subscribing
//! to anything.

use serde::{Deserialize, Serialize};

use crate::catalog::ActionCatalog;
use crate::clock::MatchClock;
use crate::error::{RecorderError, Result};
use crate::models::{MatchTime, Phase, PhaseKind, Player, StatUpdate, Zone};
use crate::phase::PhaseTracker;
use crate::recorder::{EventRecorder, RecordRequest, Scoreboard};
use crate::roster::{Roster, RosterMode};
use crate::stats::{aggregate, StatsReport};
use crate::storage::SessionStore;

/// Notification emitted by a mutating session operation, in emission
/// order.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    PhaseClosed { phase_id: i64, end_time: MatchTime },
    PhaseOpened { phase_id: i64, kind: PhaseKind },
    StatRecorded { stat_id: i64, action_id: i64, player_id: Option<i64> },
    StatUpdated { stat_id: i64 },
    StatRemoved { stat_id: i64 },
    ScoreChanged { own: u32, opponent: u32 },
    PlayerPlaced { player_id: i64, zone: Zone, slot_index: Option<u8> },
    PlayersSwapped { player_a: i64, player_b: i64 },
    PeriodAdvanced { period: u8 },
    ClockStarted,
    ClockPaused,
    ClockReset,
}

/// Caller input for `record_event`. When `time` is absent the current
/// clock reading is stamped on the event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventInput {
    pub player_id: Option<i64>,
    pub action_id: i64,
    pub success: Option<bool>,
    pub description: Option<String>,
    pub time: Option<MatchTime>,
    /// Substitution partner; required for substitution events.
    pub swap_with: Option<i64>,
}

/// Crash/reload recovery payload mirrored to the key-value store after
/// every clock or score change. Recovery aid only; the event log stays
/// authoritative for score reconstruction when available.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub elapsed_seconds: u32,
    pub period: u8,
    pub score: Scoreboard,
}

pub struct GameSession<S: SessionStore> {
    game_id: i64,
    catalog: ActionCatalog,
    clock: MatchClock,
    phases: PhaseTracker,
    roster: Roster,
    recorder: EventRecorder,
    store: S,
}

impl<S: SessionStore> GameSession<S> {
    pub fn new(game_id: i64, catalog: ActionCatalog, store: S) -> Self {
        GameSession {
            game_id,
            catalog,
            clock: MatchClock::new(),
            phases: PhaseTracker::new(game_id),
            roster: Roster::new(game_id),
            recorder: EventRecorder::new(game_id),
            store,
        }
    }

    // ========================
    // Read surface
    // ========================

    pub fn game_id(&self) -> i64 {
        self.game_id
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn open_phase(&self) -> Option<&Phase> {
        self.phases.open_phase()
    }

    pub fn phases(&self) -> &[Phase] {
        self.phases.phases()
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.recorder.scoreboard()
    }

    pub fn recorder(&self) -> &EventRecorder {
        &self.recorder
    }

    /// Current aggregate report, derived on demand from confirmed
    /// entries only.
    pub fn report(&self) -> StatsReport {
        let stats: Vec<_> = self.recorder.confirmed_stats().collect();
        aggregate(&self.catalog, stats, self.phases.phases())
    }

    // ========================
    // Roster operations
    // ========================

    pub fn add_player(&mut self, player: Player) {
        self.roster.add_player(player);
    }

    /// Switch between setup (write-through) and live (batched) roster
    /// persistence.
    pub fn set_roster_mode(&mut self, mode: RosterMode) {
        self.roster.set_mode(mode);
    }

    /// Flush batched live-mode placements; returns how many were
    /// written.
    pub fn commit_positions(&mut self) -> usize {
        self.roster.commit_positions(&mut self.store)
    }

    pub fn place_player(
        &mut self,
        player_id: i64,
        zone: Zone,
        slot_index: Option<u8>,
    ) -> Result<Vec<SessionEvent>> {
        self.roster.place_player(&mut self.store, player_id, zone, slot_index)?;
        let placed = self.roster.player(player_id).map(|p| p.slot_index).unwrap_or(None);
        Ok(vec![SessionEvent::PlayerPlaced { player_id, zone, slot_index: placed }])
    }

    pub fn swap_players(&mut self, player_a: i64, player_b: i64) -> Result<Vec<SessionEvent>> {
        self.roster.swap_players(&mut self.store, player_a, player_b)?;
        Ok(vec![SessionEvent::PlayersSwapped { player_a, player_b }])
    }

    // ========================
    // Phase operations
    // ========================

    pub fn start_phase(
        &mut self,
        kind: PhaseKind,
        player_id: Option<i64>,
    ) -> Result<Vec<SessionEvent>> {
        let at = self.clock.time();
        let previous_open = self.phases.open_phase().map(|p| p.id);
        let opened = self.phases.start_phase(&mut self.store, kind, player_id, at)?;

        let mut events = Vec::new();
        if let Some(phase_id) = previous_open {
            events.push(SessionEvent::PhaseClosed { phase_id, end_time: at });
        }
        events.push(SessionEvent::PhaseOpened { phase_id: opened.id, kind });
        Ok(events)
    }

    /// End a specific phase; ending an already-closed phase produces no
    /// notifications and no error.
    pub fn end_phase(&mut self, phase_id: i64) -> Result<Vec<SessionEvent>> {
        let at = self.clock.time();
        let was_open = self
            .phases
            .phases()
            .iter()
            .find(|p| p.id == phase_id)
            .map(|p| p.is_open())
            .unwrap_or(false);

        let phase = self.phases.end_phase(&mut self.store, phase_id, at)?;
        if !was_open {
            return Ok(Vec::new());
        }
        Ok(vec![SessionEvent::PhaseClosed {
            phase_id: phase.id,
            end_time: phase.end_time.unwrap_or(at),
        }])
    }

    /// End the open phase, if any. Absorbed into a no-op when the game
    /// has no open phase.
    pub fn end_open_phase(&mut self) -> Result<Vec<SessionEvent>> {
        match self.phases.open_phase().map(|p| p.id) {
            Some(phase_id) => self.end_phase(phase_id),
            None => Ok(Vec::new()),
        }
    }

    /// End the open phase and open one of the opposite kind.
    pub fn switch_phase(&mut self) -> Result<Vec<SessionEvent>> {
        let at = self.clock.time();
        let previous = self
            .phases
            .open_phase()
            .map(|p| p.id)
            .ok_or(RecorderError::NoActivePhase { game_id: self.game_id })?;

        let opened = self.phases.switch_phase(&mut self.store, at)?;
        Ok(vec![
            SessionEvent::PhaseClosed { phase_id: previous, end_time: at },
            SessionEvent::PhaseOpened { phase_id: opened.id, kind: opened.kind },
        ])
    }

    // ========================
    // Event recording
    // ========================

    /// Record one event, routing the orchestration action kinds:
    /// substitutions run the roster swap flow and log a summary stat,
    /// position switches flip the phase instead of logging a shot-type
    /// event. Everything else goes straight to the recorder.
    pub fn record_event(&mut self, input: EventInput) -> Result<Vec<SessionEvent>> {
        use crate::models::ActionKind;

        let kind = self.catalog.resolve(input.action_id)?.kind;
        match kind {
            ActionKind::PositionSwitch => self.switch_phase(),
            ActionKind::Substitution => self.record_substitution(input),
            _ => self.record_plain(input),
        }
    }

    fn record_plain(&mut self, input: EventInput) -> Result<Vec<SessionEvent>> {
        let phase = self
            .phases
            .open_phase()
            .cloned()
            .ok_or(RecorderError::NoActivePhase { game_id: self.game_id })?;

        let time = input.time.unwrap_or_else(|| self.clock.time());
        let request = RecordRequest {
            player_id: input.player_id,
            action_id: input.action_id,
            success: input.success,
            description: input.description,
            time,
        };

        let before = self.recorder.scoreboard();
        let outcome = self.recorder.record(&mut self.store, &self.catalog, &phase, request)?;

        let mut events: Vec<_> = outcome
            .created
            .iter()
            .map(|stat| SessionEvent::StatRecorded {
                stat_id: stat.id,
                action_id: stat.action_id,
                player_id: stat.player_id,
            })
            .collect();
        self.push_score_change(before, &mut events);
        Ok(events)
    }

    fn record_substitution(&mut self, input: EventInput) -> Result<Vec<SessionEvent>> {
        let player_in = input
            .player_id
            .ok_or_else(|| RecorderError::Validation("substitution requires a player".into()))?;
        let player_out = input.swap_with.ok_or_else(|| {
            RecorderError::Validation("substitution requires a partner to swap with".into())
        })?;

        // The summary stat needs an open phase, so check before moving
        // anyone.
        if self.phases.open_phase().is_none() {
            return Err(RecorderError::NoActivePhase { game_id: self.game_id });
        }

        let mut events = self.swap_players(player_in, player_out)?;
        let description = input
            .description
            .unwrap_or_else(|| format!("Substitution: {} in for {}", player_in, player_out));

        let mut recorded = self.record_plain(EventInput {
            player_id: Some(player_in),
            action_id: input.action_id,
            success: input.success,
            description: Some(description),
            time: input.time,
            swap_with: None,
        })?;
        events.append(&mut recorded);
        Ok(events)
    }

    pub fn update_event(&mut self, stat_id: i64, update: StatUpdate) -> Result<Vec<SessionEvent>> {
        let before = self.recorder.scoreboard();
        self.recorder.update(&mut self.store, &self.catalog, stat_id, update)?;

        let mut events = vec![SessionEvent::StatUpdated { stat_id }];
        self.push_score_change(before, &mut events);
        Ok(events)
    }

    pub fn remove_event(&mut self, stat_id: i64) -> Result<Vec<SessionEvent>> {
        let before = self.recorder.scoreboard();
        self.recorder.remove(&mut self.store, &self.catalog, stat_id)?;

        let mut events = vec![SessionEvent::StatRemoved { stat_id }];
        self.push_score_change(before, &mut events);
        Ok(events)
    }

    // ========================
    // Clock operations
    // ========================

    /// Advance the clock by one second (no-op while paused) and mirror
    /// the recovery snapshot.
    pub fn tick(&mut self) -> MatchTime {
        if self.clock.tick() {
            self.persist_snapshot();
        }
        self.clock.time()
    }

    pub fn toggle_clock(&mut self) -> Vec<SessionEvent> {
        let running = self.clock.toggle();
        self.persist_snapshot();
        if running {
            vec![SessionEvent::ClockStarted]
        } else {
            vec![SessionEvent::ClockPaused]
        }
    }

    pub fn reset_clock(&mut self) -> Vec<SessionEvent> {
        self.clock.reset();
        self.persist_snapshot();
        vec![SessionEvent::ClockReset]
    }

    /// Increment the period counter and log a period-change marker via
    /// the recorder. With no open phase the marker is skipped; the
    /// period still advances.
    pub fn advance_period(&mut self) -> Result<Vec<SessionEvent>> {
        use crate::models::ActionKind;

        let period = self.clock.advance_period();
        let mut events = vec![SessionEvent::PeriodAdvanced { period }];

        if self.phases.open_phase().is_some() {
            let other_id = self
                .catalog
                .by_kind(ActionKind::Other)
                .map(|a| a.id)
                .ok_or_else(|| {
                    RecorderError::Validation("catalog has no 'other' action".to_string())
                })?;
            let mut recorded = self.record_plain(EventInput {
                player_id: None,
                action_id: other_id,
                success: None,
                description: Some(format!("Start of period {}", period)),
                time: None,
                swap_with: None,
            })?;
            events.append(&mut recorded);
        } else {
            log::debug!("game {}: period {} advanced between phases", self.game_id, period);
        }

        self.persist_snapshot();
        Ok(events)
    }

    // ========================
    // Snapshot persistence
    // ========================

    /// Write the recovery snapshot to the key-value store.
    pub fn save(&mut self) -> Result<()> {
        let snapshot = SessionSnapshot {
            elapsed_seconds: self.clock.elapsed_seconds(),
            period: self.clock.period(),
            score: self.recorder.scoreboard(),
        };
        let payload = serde_json::to_string(&snapshot)?;
        self.store.put(&snapshot_key(self.game_id), &payload)
    }

    /// Rehydrate the phase mirror, the stat log, the clock and the
    /// score from durable state. Returns whether a snapshot was found.
    ///
    /// When the store holds stat rows the score is re-derived from
    /// them; the snapshot score is only used for stores with no
    /// surviving log.
    pub fn load(&mut self) -> Result<bool> {
        self.phases.hydrate(&self.store)?;

        let stats = self.store.stats_for_game(self.game_id)?;
        let have_log = !stats.is_empty();
        self.recorder.hydrate(&self.catalog, stats);

        let payload = match self.store.get(&snapshot_key(self.game_id))? {
            Some(payload) => payload,
            None => return Ok(false),
        };

        let snapshot: SessionSnapshot = serde_json::from_str(&payload)?;
        self.clock.restore(snapshot.elapsed_seconds, snapshot.period);
        if !have_log {
            self.recorder.restore_score(snapshot.score);
        }
        log::info!(
            "game {}: session restored at {} (period {})",
            self.game_id,
            self.clock.time(),
            snapshot.period
        );
        Ok(true)
    }

    fn push_score_change(&mut self, before: Scoreboard, events: &mut Vec<SessionEvent>) {
        let after = self.recorder.scoreboard();
        if after != before {
            events.push(SessionEvent::ScoreChanged { own: after.own, opponent: after.opponent });
            self.persist_snapshot();
        }
    }

    /// Snapshot write failures are a warning, not an error: the mirror
    /// is a recovery aid, local state stays authoritative.
    fn persist_snapshot(&mut self) {
        if let Err(e) = self.save() {
            log::warn!("game {}: snapshot write failed: {}", self.game_id, e);
        }
    }
}

fn snapshot_key(game_id: i64) -> String {
    format!("session:{}", game_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::storage::MemoryStore;

    fn session() -> GameSession<MemoryStore> {
        let mut session = GameSession::new(1, ActionCatalog::standard(), MemoryStore::new());
        for id in [5, 7, 9] {
            session.add_player(Player::new(id, format!("Player {}", id), Gender::Male, 1));
        }
        session
    }

    fn action_id(session: &GameSession<MemoryStore>, code: &str) -> i64 {
        session.catalog().by_code(code).unwrap().id
    }

    #[test]
    fn test_record_without_phase_fails_and_logs_nothing() {
        let mut session = session();
        let input = EventInput { action_id: action_id(&session, "LC"), ..Default::default() };

        let err = session.record_event(input).unwrap_err();
        assert!(matches!(err, RecorderError::NoActivePhase { game_id: 1 }));
        assert!(session.recorder().log().is_empty());
    }

    #[test]
    fn test_position_switch_flips_phase_without_logging() {
        let mut session = session();
        session.start_phase(PhaseKind::Attack, None).unwrap();

        let events = session
            .record_event(EventInput {
                action_id: action_id(&session, "PS"),
                ..Default::default()
            })
            .unwrap();

        assert!(matches!(events[1], SessionEvent::PhaseOpened { kind: PhaseKind::Defense, .. }));
        assert_eq!(session.recorder().log().len(), 0);
        assert_eq!(session.open_phase().unwrap().kind, PhaseKind::Defense);
    }

    #[test]
    fn test_substitution_swaps_and_logs_summary() {
        let mut session = session();
        session.place_player(5, Zone::Attack, Some(0)).unwrap();
        session.start_phase(PhaseKind::Attack, None).unwrap();

        let events = session
            .record_event(EventInput {
                action_id: action_id(&session, "S"),
                player_id: Some(9),
                swap_with: Some(5),
                ..Default::default()
            })
            .unwrap();

        assert!(matches!(events[0], SessionEvent::PlayersSwapped { player_a: 9, player_b: 5 }));
        assert!(matches!(events[1], SessionEvent::StatRecorded { .. }));
        assert_eq!(session.roster().player(9).unwrap().zone, Zone::Attack);
        assert_eq!(session.roster().player(5).unwrap().zone, Zone::Bench);

        let log = session.recorder().log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].stat.description.as_deref(), Some("Substitution: 9 in for 5"));
    }

    #[test]
    fn test_successful_shot_emits_score_change() {
        let mut session = session();
        session.start_phase(PhaseKind::Attack, None).unwrap();

        let events = session
            .record_event(EventInput {
                action_id: action_id(&session, "LC"),
                player_id: Some(5),
                success: Some(true),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(events.len(), 3, "shot + synthetic goal + score change");
        assert!(matches!(events[2], SessionEvent::ScoreChanged { own: 1, opponent: 0 }));
        assert_eq!(session.scoreboard().own, 1);
    }

    #[test]
    fn test_advance_period_logs_marker_during_phase() {
        let mut session = session();
        session.start_phase(PhaseKind::Attack, None).unwrap();

        let events = session.advance_period().unwrap();
        assert!(matches!(events[0], SessionEvent::PeriodAdvanced { period: 2 }));
        assert!(matches!(events[1], SessionEvent::StatRecorded { .. }));

        let log = session.recorder().log();
        assert_eq!(log[0].stat.action_id, action_id(&session, "O"));
        assert_eq!(log[0].stat.description.as_deref(), Some("Start of period 2"));
    }

    #[test]
    fn test_advance_period_between_phases_skips_marker() {
        let mut session = session();
        let events = session.advance_period().unwrap();
        assert_eq!(events.len(), 1);
        assert!(session.recorder().log().is_empty());
        assert_eq!(session.clock().period(), 2);
    }

    #[test]
    fn test_snapshot_roundtrip_restores_clock_and_score() {
        let mut session = session();
        session.start_phase(PhaseKind::Attack, None).unwrap();
        session.toggle_clock();
        for _ in 0..95 {
            session.tick();
        }
        session
            .record_event(EventInput {
                action_id: action_id(&session, "Pe"),
                player_id: Some(5),
                success: Some(true),
                ..Default::default()
            })
            .unwrap();

        // Simulate a reload into a fresh session over the same store.
        let store = session.store;
        let mut resumed = GameSession::new(1, ActionCatalog::standard(), store);
        assert!(resumed.load().unwrap());

        assert_eq!(resumed.clock().elapsed_seconds(), 95);
        assert_eq!(resumed.scoreboard(), Scoreboard { own: 1, opponent: 0 });
        assert_eq!(resumed.open_phase().unwrap().kind, PhaseKind::Attack);
        assert!(!resumed.clock().is_running(), "clock resumes paused");
    }

    #[test]
    fn test_reload_rehydrates_log_and_keeps_edits_working() {
        let mut session = session();
        session.start_phase(PhaseKind::Attack, None).unwrap();
        session
            .record_event(EventInput {
                action_id: action_id(&session, "G"),
                player_id: Some(5),
                success: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(session.scoreboard().own, 1);

        let store = session.store;
        let mut resumed = GameSession::new(1, ActionCatalog::standard(), store);
        assert!(resumed.load().unwrap());

        assert_eq!(resumed.scoreboard(), Scoreboard { own: 1, opponent: 0 });
        let report = resumed.report();
        assert_eq!(report.players[&5].attack.goals, 1, "report agrees with the scoreboard");

        // Edits and deletes keep working on rehydrated entries.
        let stat_id = resumed.recorder().log()[0].stat.id;
        resumed.remove_event(stat_id).unwrap();
        assert_eq!(resumed.scoreboard().own, 0);
        assert!(resumed.report().players.is_empty());
    }

    #[test]
    fn test_load_without_snapshot_returns_false() {
        let mut session = session();
        assert!(!session.load().unwrap());
    }
}

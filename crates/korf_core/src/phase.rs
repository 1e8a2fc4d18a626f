//! Phase tracking: at most one open attack/defense phase per game.

use crate::error::{RecorderError, Result};
use crate::models::{MatchTime, NewPhase, Phase, PhaseKind};
use crate::storage::PhaseStore;

/// State machine over {no phase, attack open, defense open}.
///
/// The tracker keeps a local mirror of every phase created for the
/// game; the durable store assigns ids. Closing the previous phase and
/// opening the next one happen as a unit: if the create fails after the
/// close, the game is left with no open phase (fail safe, not fail
/// open).
#[derive(Debug)]
pub struct PhaseTracker {
    game_id: i64,
    phases: Vec<Phase>,
}

impl PhaseTracker {
    pub fn new(game_id: i64) -> Self {
        PhaseTracker { game_id, phases: Vec::new() }
    }

    /// Rebuild the local mirror from durable storage (resume after a
    /// reload).
    pub fn hydrate(&mut self, store: &dyn PhaseStore) -> Result<()> {
        self.phases = store.phases_for_game(self.game_id)?;
        Ok(())
    }

    pub fn game_id(&self) -> i64 {
        self.game_id
    }

    /// The currently open phase, if any.
    pub fn open_phase(&self) -> Option<&Phase> {
        self.phases.iter().find(|p| p.is_open())
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Closed + open phases of one kind; feeds team efficiency metrics.
    pub fn count(&self, kind: PhaseKind) -> usize {
        self.phases.iter().filter(|p| p.kind == kind).count()
    }

    /// Close any open phase, then open a new one of the given kind.
    pub fn start_phase(
        &mut self,
        store: &mut dyn PhaseStore,
        kind: PhaseKind,
        player_id: Option<i64>,
        at: MatchTime,
    ) -> Result<Phase> {
        if let Some(open) = self.open_phase() {
            let id = open.id;
            let closed = store.close_phase(id, at)?;
            self.replace(closed);
        }

        let new = NewPhase { game_id: self.game_id, kind, player_id, start_time: at };
        let phase = match store.create_phase(new) {
            Ok(phase) => phase,
            Err(e) => {
                // The previous phase is already closed; stay in "no phase".
                log::warn!("game {}: phase create failed after close: {}", self.game_id, e);
                return Err(e);
            }
        };

        log::debug!("game {}: {:?} phase {} opened at {}", self.game_id, kind, phase.id, at);
        self.phases.push(phase.clone());
        Ok(phase)
    }

    /// Set `end_time` on a specific phase.
    ///
    /// Ending an already-closed phase is idempotent and returns its
    /// current state; only unknown ids are an error.
    pub fn end_phase(
        &mut self,
        store: &mut dyn PhaseStore,
        phase_id: i64,
        at: MatchTime,
    ) -> Result<Phase> {
        let phase = self
            .phases
            .iter()
            .find(|p| p.id == phase_id)
            .ok_or_else(|| RecorderError::not_found("phase", phase_id))?;

        if !phase.is_open() {
            log::debug!("game {}: phase {} already closed", self.game_id, phase_id);
            return Ok(phase.clone());
        }

        let closed = store.close_phase(phase_id, at)?;
        self.replace(closed.clone());
        log::debug!("game {}: phase {} closed at {}", self.game_id, phase_id, at);
        Ok(closed)
    }

    /// End the open phase and start one of the opposite kind.
    pub fn switch_phase(&mut self, store: &mut dyn PhaseStore, at: MatchTime) -> Result<Phase> {
        let open = self
            .open_phase()
            .ok_or(RecorderError::NoActivePhase { game_id: self.game_id })?;
        let next = open.kind.opposite();
        self.start_phase(store, next, None, at)
    }

    fn replace(&mut self, phase: Phase) {
        if let Some(slot) = self.phases.iter_mut().find(|p| p.id == phase.id) {
            *slot = phase;
        }
    }
}

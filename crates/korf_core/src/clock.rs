//! Elapsed-time counter with pause/resume and a period counter.

use serde::{Deserialize, Serialize};

use crate::models::MatchTime;

/// Purely local 1-second match clock.
///
/// `tick` is expected on a fixed 1-second cadence while running; the
/// clock itself never blocks and has no cross-process ordering
/// requirement. Snapshots for crash/reload recovery are taken by the
/// session, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchClock {
    elapsed_seconds: u32,
    running: bool,
    period: u8,
}

impl Default for MatchClock {
    fn default() -> Self {
        MatchClock { elapsed_seconds: 0, running: false, period: 1 }
    }
}

impl MatchClock {
    pub fn new() -> Self {
        MatchClock::default()
    }

    /// Advance by one second. No-op while paused; returns whether the
    /// clock moved.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.elapsed_seconds += 1;
        }
        self.running
    }

    /// Flip running/paused; returns the new running state.
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Zero elapsed time and stop. The period counter is kept.
    pub fn reset(&mut self) {
        self.elapsed_seconds = 0;
        self.running = false;
    }

    pub fn advance_period(&mut self) -> u8 {
        self.period = self.period.saturating_add(1);
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn period(&self) -> u8 {
        self.period
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Current match-clock time stamped onto recorded events.
    pub fn time(&self) -> MatchTime {
        MatchTime::from_seconds(self.elapsed_seconds)
    }

    /// Restore counters from a recovery snapshot.
    pub fn restore(&mut self, elapsed_seconds: u32, period: u8) {
        self.elapsed_seconds = elapsed_seconds;
        self.period = period.max(1);
        self.running = false;
    }
}

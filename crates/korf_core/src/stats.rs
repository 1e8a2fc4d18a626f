//! Pure derivation of per-player and team efficiency metrics.
//!
//! Re-invocable at any time: identical (catalog, stats, phases) input
//! produces identical output regardless of call order. All percentages
//! are rounded integers in `[0, 100]`; division by zero yields the
//! documented default rather than an error or NaN.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::ActionCatalog;
use crate::models::{ActionKind, Phase, PhaseKind, Stat};

/// Attack-side counters and efficiencies for one player.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttackLine {
    pub shots: u32,
    pub goals: u32,
    /// `round(goals / shots * 100)`, 0 when no shots.
    pub shooting_pct: u8,
    pub rebounds_won: u32,
    pub rebounds_lost: u32,
    /// `round(won / (won + lost) * 100)`, 0 when no rebounds.
    pub rebound_pct: u8,
    pub turnovers: u32,
}

/// Defense-side counters and efficiencies for one player.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DefenseLine {
    /// Shots faced: defensive stops plus conceded goals.
    pub shots_allowed: u32,
    pub goals_allowed: u32,
    /// `round(100 - goals_allowed / shots_allowed * 100)`; 100 when no
    /// shots were faced (perfect defense by convention).
    pub defensive_pct: u8,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerReport {
    pub player_id: i64,
    pub attack: AttackLine,
    pub defense: DefenseLine,
}

/// Team totals plus phase-based efficiencies.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamReport {
    pub attack: AttackLine,
    pub defense: DefenseLine,
    pub attack_phases: u32,
    pub defense_phases: u32,
    /// `round(goals / attack_phases * 100)`, 0 when no attack phases.
    pub offensive_pct: u8,
    /// `round(100 - goals_allowed / defense_phases * 100)`, 100 when no
    /// defense phases.
    pub team_defensive_pct: u8,
}

/// Aggregate report for one game, keyed deterministically by player id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsReport {
    pub players: BTreeMap<i64, PlayerReport>,
    pub team: TeamReport,
}

/// Derive the full report from the confirmed event log.
///
/// Stats whose action id is not in the catalog are skipped; stats with
/// no player still count toward the team totals.
pub fn aggregate<'a, I>(catalog: &ActionCatalog, stats: I, phases: &[Phase]) -> StatsReport
where
    I: IntoIterator<Item = &'a Stat>,
{
    let mut players: BTreeMap<i64, PlayerReport> = BTreeMap::new();
    let mut team_attack = AttackLine::default();
    let mut team_defense = DefenseLine::default();

    for stat in stats {
        let kind = match catalog.by_id(stat.action_id) {
            Some(action) => action.kind,
            None => {
                log::debug!("skipping stat {} with unknown action {}", stat.id, stat.action_id);
                continue;
            }
        };

        tally(&mut team_attack, &mut team_defense, kind, stat.success);

        if let Some(player_id) = stat.player_id {
            let entry = players
                .entry(player_id)
                .or_insert_with(|| PlayerReport { player_id, ..Default::default() });
            tally(&mut entry.attack, &mut entry.defense, kind, stat.success);
        }
    }

    for report in players.values_mut() {
        finish_lines(&mut report.attack, &mut report.defense);
    }
    finish_lines(&mut team_attack, &mut team_defense);

    let attack_phases = phases.iter().filter(|p| p.kind == PhaseKind::Attack).count() as u32;
    let defense_phases = phases.iter().filter(|p| p.kind == PhaseKind::Defense).count() as u32;

    let team = TeamReport {
        offensive_pct: ratio_pct(team_attack.goals, attack_phases, 0),
        team_defensive_pct: inverse_pct(team_defense.goals_allowed, defense_phases),
        attack: team_attack,
        defense: team_defense,
        attack_phases,
        defense_phases,
    };

    StatsReport { players, team }
}

fn tally(attack: &mut AttackLine, defense: &mut DefenseLine, kind: ActionKind, success: Option<bool>) {
    if kind.is_shot() {
        attack.shots += 1;
    }
    if kind.is_turnover() {
        attack.turnovers += 1;
    }
    match kind {
        ActionKind::Goal if success == Some(true) => attack.goals += 1,
        ActionKind::ReboundWon => attack.rebounds_won += 1,
        ActionKind::ReboundLost => attack.rebounds_lost += 1,
        ActionKind::Defense => defense.shots_allowed += 1,
        ActionKind::GoalSuffered => {
            defense.shots_allowed += 1;
            defense.goals_allowed += 1;
        }
        _ => {}
    }
}

fn finish_lines(attack: &mut AttackLine, defense: &mut DefenseLine) {
    attack.shooting_pct = ratio_pct(attack.goals, attack.shots, 0);
    attack.rebound_pct =
        ratio_pct(attack.rebounds_won, attack.rebounds_won + attack.rebounds_lost, 0);
    defense.defensive_pct = inverse_pct(defense.goals_allowed, defense.shots_allowed);
}

/// `round(num / den * 100)` clamped to `[0, 100]`; `default` when the
/// denominator is zero.
fn ratio_pct(num: u32, den: u32, default: u8) -> u8 {
    if den == 0 {
        return default;
    }
    let pct = (num as f64 / den as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// `round(100 - num / den * 100)` clamped to `[0, 100]`; 100 when the
/// denominator is zero (nothing faced, perfect by convention).
fn inverse_pct(num: u32, den: u32) -> u8 {
    if den == 0 {
        return 100;
    }
    let pct = (100.0 - num as f64 / den as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

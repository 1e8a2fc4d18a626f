//! Property-based invariants over random operation sequences.

use chrono::Utc;
use proptest::prelude::*;

use korf_core::{
    aggregate, ActionCatalog, ActionKind, MatchTime, MemoryStore, PhaseKind, PhaseStore,
    PhaseTracker, Stat,
};

#[derive(Debug, Clone)]
enum PhaseOp {
    Start(PhaseKind),
    EndOpen,
    Switch,
}

fn arb_phase_op() -> impl Strategy<Value = PhaseOp> {
    prop_oneof![
        Just(PhaseOp::Start(PhaseKind::Attack)),
        Just(PhaseOp::Start(PhaseKind::Defense)),
        Just(PhaseOp::EndOpen),
        Just(PhaseOp::Switch),
    ]
}

fn arb_kind() -> impl Strategy<Value = ActionKind> {
    prop_oneof![
        Just(ActionKind::Goal),
        Just(ActionKind::Assist),
        Just(ActionKind::ShotShort),
        Just(ActionKind::ShotMid),
        Just(ActionKind::ShotLong),
        Just(ActionKind::FreePass),
        Just(ActionKind::Penalty),
        Just(ActionKind::ReboundWon),
        Just(ActionKind::ReboundLost),
        Just(ActionKind::BadPass),
        Just(ActionKind::Turnover),
        Just(ActionKind::Defense),
        Just(ActionKind::GoalSuffered),
        Just(ActionKind::Other),
    ]
}

fn arb_stat_row() -> impl Strategy<Value = (Option<i64>, ActionKind, Option<bool>)> {
    (prop::option::of(1i64..6), arb_kind(), prop::option::of(any::<bool>()))
}

fn build_stats(rows: &[(Option<i64>, ActionKind, Option<bool>)], catalog: &ActionCatalog) -> Vec<Stat> {
    rows.iter()
        .enumerate()
        .map(|(i, &(player_id, kind, success))| Stat {
            id: i as i64 + 1,
            game_id: 1,
            player_id,
            action_id: catalog.by_kind(kind).unwrap().id,
            success,
            phase_id: 1,
            description: None,
            time: MatchTime::from_seconds(i as u32),
            created_at: Utc::now(),
        })
        .collect()
}

proptest! {
    /// At most one phase per game is ever open, no matter the sequence
    /// of start/end/switch calls, and the durable store agrees with the
    /// tracker's local mirror.
    #[test]
    fn at_most_one_open_phase(ops in prop::collection::vec(arb_phase_op(), 1..40)) {
        let mut store = MemoryStore::new();
        let mut tracker = PhaseTracker::new(1);

        for (i, op) in ops.iter().enumerate() {
            let at = MatchTime::from_seconds(i as u32 * 10);
            match op {
                PhaseOp::Start(kind) => {
                    tracker.start_phase(&mut store, *kind, None, at).unwrap();
                }
                PhaseOp::EndOpen => {
                    if let Some(id) = tracker.open_phase().map(|p| p.id) {
                        tracker.end_phase(&mut store, id, at).unwrap();
                    }
                }
                PhaseOp::Switch => {
                    if tracker.open_phase().is_some() {
                        tracker.switch_phase(&mut store, at).unwrap();
                    }
                }
            }

            let open = tracker.phases().iter().filter(|p| p.is_open()).count();
            prop_assert!(open <= 1, "found {} open phases", open);
            prop_assert_eq!(
                store.open_phase(1).unwrap().map(|p| p.id),
                tracker.open_phase().map(|p| p.id)
            );
        }
    }

    /// Every efficiency percentage stays an integer in [0, 100] for any
    /// input log, including degenerate ones.
    #[test]
    fn efficiencies_stay_in_bounds(rows in prop::collection::vec(arb_stat_row(), 0..60)) {
        let catalog = ActionCatalog::standard();
        let stats = build_stats(&rows, &catalog);
        let report = aggregate(&catalog, &stats, &[]);

        for line in report.players.values() {
            prop_assert!(line.attack.shooting_pct <= 100);
            prop_assert!(line.attack.rebound_pct <= 100);
            prop_assert!(line.defense.defensive_pct <= 100);
        }
        prop_assert!(report.team.attack.shooting_pct <= 100);
        prop_assert!(report.team.offensive_pct <= 100);
        prop_assert!(report.team.team_defensive_pct <= 100);
    }

    /// The aggregator is a pure function of its input: same log, same
    /// serialized report, and row order does not matter.
    #[test]
    fn aggregation_is_pure(rows in prop::collection::vec(arb_stat_row(), 0..40)) {
        let catalog = ActionCatalog::standard();
        let stats = build_stats(&rows, &catalog);

        let first = aggregate(&catalog, &stats, &[]);
        let second = aggregate(&catalog, &stats, &[]);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        let mut reversed = stats.clone();
        reversed.reverse();
        prop_assert_eq!(first, aggregate(&catalog, &reversed, &[]));
    }
}

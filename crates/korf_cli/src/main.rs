//! Match Recorder CLI
//!
//! Replays a JSON script of session commands against an in-memory
//! store and prints the resulting aggregate report. Useful for
//! inspecting recorded matches and for sanity-checking scoring rules
//! without a frontend.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use korf_core::{
    ActionCatalog, EventInput, Game, GameSession, Gender, MatchTime, MemoryStore, PhaseKind,
    Player, RosterMode, SessionEvent, StatsReport, Zone,
};

#[derive(Parser)]
#[command(name = "korf_cli")]
#[command(about = "Replay korfball match scripts and print reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a match script and print the aggregate report
    Replay {
        /// Input script JSON file path
        #[arg(long)]
        script: PathBuf,

        /// Print the report as JSON instead of a table
        #[arg(long, default_value = "false")]
        json: bool,

        /// Print every session notification while replaying
        #[arg(long, default_value = "false")]
        verbose: bool,
    },

    /// Print the standard action catalog
    Actions,
}

/// On-disk replay script.
#[derive(Debug, Deserialize)]
struct Script {
    game_id: i64,
    #[serde(default)]
    game: Option<Game>,
    #[serde(default)]
    players: Vec<PlayerSpec>,
    commands: Vec<Command>,
}

#[derive(Debug, Deserialize)]
struct PlayerSpec {
    id: i64,
    name: String,
    gender: Gender,
    team_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum Command {
    StartPhase {
        kind: PhaseKind,
        #[serde(default)]
        player_id: Option<i64>,
    },
    EndPhase,
    SwitchPhase,
    Record {
        /// Action code from the catalog (e.g. "LC", "GS")
        action: String,
        #[serde(default)]
        player_id: Option<i64>,
        #[serde(default)]
        success: Option<bool>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        time: Option<MatchTime>,
        #[serde(default)]
        swap_with: Option<i64>,
    },
    Place {
        player_id: i64,
        zone: Zone,
        #[serde(default)]
        slot_index: Option<u8>,
    },
    Swap {
        player_a: i64,
        player_b: i64,
    },
    GoLive,
    CommitPositions,
    Tick {
        seconds: u32,
    },
    ToggleClock,
    ResetClock,
    AdvancePeriod,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { script, json, verbose } => replay(&script, json, verbose),
        Commands::Actions => {
            print_actions(&ActionCatalog::standard());
            Ok(())
        }
    }
}

fn replay(path: &PathBuf, json: bool, verbose: bool) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {:?}", path))?;
    let script: Script = serde_json::from_str(&raw).context("failed to parse script")?;

    if let Some(game) = &script.game {
        println!(
            "Game {}: team {} vs team {} at {} ({}, {:?})",
            game.id, game.team_a_id, game.team_b_id, game.location, game.date, game.status
        );
    }

    let mut session =
        GameSession::new(script.game_id, ActionCatalog::standard(), MemoryStore::new());
    for spec in &script.players {
        session.add_player(Player::new(spec.id, spec.name.clone(), spec.gender, spec.team_id));
    }

    for (index, command) in script.commands.into_iter().enumerate() {
        let events = run_command(&mut session, command)
            .with_context(|| format!("command {} failed", index + 1))?;
        if verbose {
            for event in events {
                println!("  [{}] {}", session.clock().time(), describe(&event));
            }
        }
    }

    let score = session.scoreboard();
    println!(
        "Final: {} - {} after {} (period {})",
        score.own,
        score.opponent,
        session.clock().time(),
        session.clock().period()
    );

    let report = session.report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&session, &report);
    }
    Ok(())
}

fn run_command(
    session: &mut GameSession<MemoryStore>,
    command: Command,
) -> Result<Vec<SessionEvent>> {
    let events = match command {
        Command::StartPhase { kind, player_id } => session.start_phase(kind, player_id)?,
        Command::EndPhase => session.end_open_phase()?,
        Command::SwitchPhase => session.switch_phase()?,
        Command::Record { action, player_id, success, description, time, swap_with } => {
            let action_id = match session.catalog().by_code(&action) {
                Some(entry) => entry.id,
                None => bail!("unknown action code {:?}", action),
            };
            session.record_event(EventInput {
                player_id,
                action_id,
                success,
                description,
                time,
                swap_with,
            })?
        }
        Command::Place { player_id, zone, slot_index } => {
            session.place_player(player_id, zone, slot_index)?
        }
        Command::Swap { player_a, player_b } => session.swap_players(player_a, player_b)?,
        Command::GoLive => {
            session.set_roster_mode(RosterMode::Live);
            Vec::new()
        }
        Command::CommitPositions => {
            let flushed = session.commit_positions();
            println!("  committed {} positions", flushed);
            Vec::new()
        }
        Command::Tick { seconds } => {
            for _ in 0..seconds {
                session.tick();
            }
            Vec::new()
        }
        Command::ToggleClock => session.toggle_clock(),
        Command::ResetClock => session.reset_clock(),
        Command::AdvancePeriod => session.advance_period()?,
    };
    Ok(events)
}

fn describe(event: &SessionEvent) -> String {
    match event {
        SessionEvent::PhaseOpened { phase_id, kind } => {
            format!("phase {} opened ({:?})", phase_id, kind)
        }
        SessionEvent::PhaseClosed { phase_id, end_time } => {
            format!("phase {} closed at {}", phase_id, end_time)
        }
        SessionEvent::StatRecorded { stat_id, action_id, player_id } => match player_id {
            Some(player) => format!("stat {} (action {}) for player {}", stat_id, action_id, player),
            None => format!("stat {} (action {})", stat_id, action_id),
        },
        SessionEvent::StatUpdated { stat_id } => format!("stat {} updated", stat_id),
        SessionEvent::StatRemoved { stat_id } => format!("stat {} removed", stat_id),
        SessionEvent::ScoreChanged { own, opponent } => format!("score {} - {}", own, opponent),
        SessionEvent::PlayerPlaced { player_id, zone, slot_index } => match slot_index {
            Some(slot) => format!("player {} to {:?} slot {}", player_id, zone, slot),
            None => format!("player {} to {:?}", player_id, zone),
        },
        SessionEvent::PlayersSwapped { player_a, player_b } => {
            format!("players {} and {} swapped", player_a, player_b)
        }
        SessionEvent::PeriodAdvanced { period } => format!("period {}", period),
        SessionEvent::ClockStarted => "clock started".to_string(),
        SessionEvent::ClockPaused => "clock paused".to_string(),
        SessionEvent::ClockReset => "clock reset".to_string(),
    }
}

fn print_actions(catalog: &ActionCatalog) {
    println!("{:<4} {:<4} {:<16} DESCRIPTION", "ID", "CODE", "KIND");
    for action in catalog.iter() {
        println!(
            "{:<4} {:<4} {:<16} {}",
            action.id,
            action.code,
            format!("{:?}", action.kind),
            action.description
        );
    }
}

fn print_report(session: &GameSession<MemoryStore>, report: &StatsReport) {
    println!();
    println!(
        "{:<20} {:>5} {:>5} {:>5} {:>4} {:>4} {:>5} {:>4} {:>6} {:>6} {:>5}",
        "PLAYER", "SHOTS", "GOALS", "SH%", "RW", "RL", "RB%", "TO", "SH.ALL", "GL.ALL", "DEF%"
    );
    for line in report.players.values() {
        let name = session
            .roster()
            .player(line.player_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("#{}", line.player_id));
        println!(
            "{:<20} {:>5} {:>5} {:>4}% {:>4} {:>4} {:>4}% {:>4} {:>6} {:>6} {:>4}%",
            name,
            line.attack.shots,
            line.attack.goals,
            line.attack.shooting_pct,
            line.attack.rebounds_won,
            line.attack.rebounds_lost,
            line.attack.rebound_pct,
            line.attack.turnovers,
            line.defense.shots_allowed,
            line.defense.goals_allowed,
            line.defense.defensive_pct
        );
    }

    let team = &report.team;
    println!();
    println!(
        "Team: {} goals in {} attack phases ({}% offensive), {} allowed in {} defense phases ({}% defensive)",
        team.attack.goals,
        team.attack_phases,
        team.offensive_pct,
        team.defense.goals_allowed,
        team.defense_phases,
        team.team_defensive_pct
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_replay_script_roundtrip() {
        let script = serde_json::json!({
            "game_id": 1,
            "players": [
                { "id": 5, "name": "Anna", "gender": "female", "team_id": 1 },
                { "id": 6, "name": "Joan", "gender": "male", "team_id": 1 }
            ],
            "commands": [
                { "cmd": "place", "player_id": 5, "zone": "attack", "slot_index": 0 },
                { "cmd": "start_phase", "kind": "attack" },
                { "cmd": "toggle_clock" },
                { "cmd": "tick", "seconds": 30 },
                { "cmd": "record", "action": "LC", "player_id": 5, "success": true },
                { "cmd": "switch_phase" },
                { "cmd": "record", "action": "GS", "player_id": 6 }
            ]
        });

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", script).unwrap();

        replay(&file.path().to_path_buf(), true, true).unwrap();
    }

    #[test]
    fn test_replay_rejects_unknown_action_code() {
        let script = serde_json::json!({
            "game_id": 1,
            "commands": [
                { "cmd": "start_phase", "kind": "attack" },
                { "cmd": "record", "action": "NOPE" }
            ]
        });

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", script).unwrap();

        assert!(replay(&file.path().to_path_buf(), false, false).is_err());
    }
}

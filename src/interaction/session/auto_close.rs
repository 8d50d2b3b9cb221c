//! Headless round control: after each finished session, linger on the score
//! screen for `GameConfig.app.auto_close` seconds (RON key `autoClose`), then
//! either play again or print the round summary and exit the app.

use bevy::prelude::*;
use serde::Serialize;

use crate::app::state::InputKind;
use crate::core::config::GameConfig;
use crate::core::events::{PlayerCommand, SessionEvent};
use crate::core::system::system_order::SessionSet;
use crate::gameplay::spawn::SpawnScheduler;
use crate::gameplay::state::SessionStateMachine;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub round: u32,
    pub score: u32,
    pub input: Option<InputKind>,
}

#[derive(Resource, Debug)]
pub struct RoundLog {
    pub rounds: u32,
    pub json: bool,
    pub played: Vec<RoundSummary>,
    linger: Option<Timer>,
}

impl RoundLog {
    pub fn new(rounds: u32, json: bool) -> Self {
        Self {
            rounds: rounds.max(1),
            json,
            played: Vec::new(),
            linger: None,
        }
    }

    pub fn total_score(&self) -> u32 {
        self.played.iter().map(|r| r.score).sum()
    }
}

pub struct AutoClosePlugin {
    pub rounds: u32,
    pub json: bool,
}

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(RoundLog::new(self.rounds, self.json))
            .add_systems(
                Update,
                (record_rounds, advance_rounds)
                    .chain()
                    .after(SessionSet::Effects),
            );
    }
}

fn record_rounds(
    mut events: EventReader<SessionEvent>,
    machine: Res<SessionStateMachine>,
    cfg: Res<GameConfig>,
    mut log: ResMut<RoundLog>,
) {
    for ev in events.read() {
        let SessionEvent::SessionFinished { score } = ev else {
            continue;
        };
        let round = log.played.len() as u32 + 1;
        info!(target: "rounds", "Round {round} finished: {score} clouds cheered up");
        log.played.push(RoundSummary {
            round,
            score: *score,
            input: machine.input_kind(),
        });
        let secs = cfg.app.auto_close.max(0.0);
        log.linger = Some(Timer::from_seconds(secs, TimerMode::Once));
    }
}

fn advance_rounds(
    time: Res<Time>,
    scheduler: Res<SpawnScheduler>,
    mut log: ResMut<RoundLog>,
    mut commands: EventWriter<PlayerCommand>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(timer) = log.linger.as_mut() else {
        return;
    };
    if !timer.tick(time.delta()).finished() {
        return;
    }
    log.linger = None;
    if (log.played.len() as u32) < log.rounds {
        commands.write(PlayerCommand::PlayAgain);
        return;
    }
    print_summary(&log, &scheduler);
    info!(target: "rounds", "All {} rounds played, exiting", log.rounds);
    exit.write(AppExit::Success);
}

fn print_summary(log: &RoundLog, scheduler: &SpawnScheduler) {
    if log.json {
        match serde_json::to_string_pretty(&log.played) {
            Ok(txt) => println!("{txt}"),
            Err(e) => warn!(target: "rounds", "summary serialization failed: {e}"),
        }
        return;
    }
    for r in &log.played {
        let input = r.input.map(|k| format!("{k:?}")).unwrap_or_else(|| "-".into());
        println!("Round {:>2}: score={:<3} input={input}", r.round, r.score);
    }
    println!(
        "Total score={} bursts={} spawn_failures={}",
        log.total_score(),
        scheduler.bursts_completed(),
        scheduler.spawn_failures()
    );
}

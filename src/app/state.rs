use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Screen / stage of one game session.
/// Start -> InputSelection -> Countdown -> ActivePlay -> Finished (-> Start via reset)
///
/// Mirrored into Bevy's `State<Phase>` so UI shells can hook `OnEnter` / `OnExit`.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen; waits for assets and the Play button.
    #[default]
    Start,
    /// Lobby: the player picks how to fire the beam.
    InputSelection,
    Countdown,
    ActivePlay,
    /// Score screen.
    Finished,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::InputSelection => "input_selection",
            Self::Countdown => "countdown",
            Self::ActivePlay => "active_play",
            Self::Finished => "finished",
        }
    }
}

/// How the player fires the beam.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum InputKind {
    /// Heart gesture made with both hands.
    Hands,
    /// Game controller or pointer.
    Alternative,
}

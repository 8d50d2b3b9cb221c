use bevy::prelude::*;
use serde::Serialize;

use crate::app::state::InputKind;
use crate::core::components::TargetId;

/// Side effects emitted by the session. Routed to the external collaborators and
/// re-broadcast as a Bevy event for UI shells.
#[derive(Event, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SessionEvent {
    /// Countdown advanced; carries the new value (for narration).
    CountdownAnnounced(i32),
    /// Countdown consumed; the immersive scene should open.
    CountdownEnded,
    SessionFinished { score: u32 },
    /// Spoken summary after a spawn burst completes.
    OverviewAnnouncement(String),
    TargetsReleased,
    AnimationsPaused,
    AnimationsResumed,
    HitSound { variant: u32 },
    /// Player left for the main menu; the immersive scene should be dismissed.
    ImmersiveDismissed,
    /// Tick crossed a spawn threshold.
    BurstRequested,
    TargetScored { id: TargetId, score: u32 },
}

/// Mutating entry points available to a UI shell.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Start,
    ChooseInput(InputKind),
    PlayAgain,
    QuitToMenu,
    Pause,
    Resume,
    Finish,
    SetMuted(bool),
}

/// Emitted by the input recognizer when the beam lands on a cloud.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetHit(pub TargetId);

/// Scene collaborator finished loading its assets.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct AssetsReady;

//! Central system ordering labels to make the per-frame session sequence explicit.
//! Stages:
//! 1. Commands (player commands + target hits reach the state machine)
//! 2. Tick (fixed-period timer advances counters)
//! 3. Spawn (burst pacing, spawn results fed back)
//! 4. Effects (side effects routed to collaborators and UI events)
//!
//! Chained so every mutation of the session happens in one place per frame.
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum SessionSet {
    Commands,
    Tick,
    Spawn,
    Effects,
}

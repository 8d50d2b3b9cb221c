// This file is part of Happy Beam.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::debug::DebugPlugin;
use crate::gameplay::plugin::SessionPlugin;

/// Everything the game needs besides the scene collaborators and a player.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((SessionPlugin, DebugPlugin));
    }
}

//! Debug module: feature gated session stats logging.
//! Built only when compiled with `--features debug`.

#[cfg(feature = "debug")]
mod logging;

use bevy::prelude::*;

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    #[cfg(feature = "debug")]
    fn build(&self, app: &mut App) {
        use crate::core::system::system_order::SessionSet;
        use logging::{session_stats_log_system, DebugState};

        app.init_resource::<DebugState>().add_systems(
            Update,
            session_stats_log_system.after(SessionSet::Effects),
        );
    }

    #[cfg(not(feature = "debug"))]
    fn build(&self, _app: &mut App) {}
}

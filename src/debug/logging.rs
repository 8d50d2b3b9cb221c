use bevy::prelude::*;

use crate::gameplay::spawn::SpawnScheduler;
use crate::gameplay::state::SessionStateMachine;

#[derive(Resource, Debug)]
pub struct DebugState {
    pub time_accum: f32,
    pub log_interval: f32,
    pub frame_counter: u64,
}

impl Default for DebugState {
    fn default() -> Self {
        Self {
            time_accum: 0.0,
            log_interval: 5.0,
            frame_counter: 0,
        }
    }
}

pub fn session_stats_log_system(
    time: Res<Time>,
    mut state: ResMut<DebugState>,
    machine: Res<SessionStateMachine>,
    scheduler: Res<SpawnScheduler>,
) {
    state.frame_counter += 1;
    state.time_accum += time.delta_secs();
    if state.time_accum < state.log_interval {
        return;
    }
    state.time_accum = 0.0;
    let s = machine.state();
    info!(
        "SESSION frame={} t={:.1}s phase={} countdown={} time_left={} score={} clouds={}/{} burst_in_flight={} bursts={} spawn_failures={} epoch={}",
        state.frame_counter,
        time.elapsed_secs(),
        s.phase.as_str(),
        s.count_down,
        s.time_left,
        s.score,
        s.targets.satisfied_count(),
        s.targets.len(),
        scheduler.in_flight(),
        scheduler.bursts_completed(),
        scheduler.spawn_failures(),
        s.epoch
    );
}

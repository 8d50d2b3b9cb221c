//! Stand-in player for headless runs: walks the menus and plays the role of the
//! gesture recognizer by firing `TargetHit` at random grumpy clouds.

use bevy::prelude::*;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::app::state::{InputKind, Phase};
use crate::core::components::TargetId;
use crate::core::config::GameConfig;
use crate::core::events::{PlayerCommand, TargetHit};
use crate::core::system::system_order::SessionSet;
use crate::gameplay::state::SessionStateMachine;

#[derive(Resource, Debug, Clone)]
pub struct Autopilot {
    pub input: InputKind,
    /// Probability that an aim attempt lands on a cloud.
    pub hit_chance: f64,
    pub aim_period_secs: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            input: InputKind::Hands,
            hit_chance: 0.6,
            aim_period_secs: 0.5,
        }
    }
}

#[derive(Resource)]
struct AimState {
    timer: Timer,
    rng: StdRng,
}

pub struct AutopilotPlugin(pub Autopilot);

impl Plugin for AutopilotPlugin {
    fn build(&self, app: &mut App) {
        let mut pilot = self.0.clone();
        pilot.hit_chance = pilot.hit_chance.clamp(0.0, 1.0);
        let seed = app
            .world()
            .get_resource::<GameConfig>()
            .and_then(|cfg| cfg.app.rng_seed);
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        app.insert_resource(AimState {
            timer: Timer::from_seconds(pilot.aim_period_secs.max(0.01), TimerMode::Repeating),
            rng,
        })
        .insert_resource(pilot)
        .add_systems(
            Update,
            (drive_menus, aim_beam).before(SessionSet::Commands),
        );
    }
}

fn drive_menus(
    machine: Res<SessionStateMachine>,
    pilot: Res<Autopilot>,
    mut commands: EventWriter<PlayerCommand>,
) {
    match machine.phase() {
        Phase::Start if machine.is_ready() => {
            commands.write(PlayerCommand::Start);
        }
        Phase::InputSelection => {
            commands.write(PlayerCommand::ChooseInput(pilot.input));
        }
        _ => {}
    }
}

fn aim_beam(
    time: Res<Time>,
    machine: Res<SessionStateMachine>,
    pilot: Res<Autopilot>,
    mut aim: ResMut<AimState>,
    mut hits: EventWriter<TargetHit>,
) {
    if machine.phase() != Phase::ActivePlay || machine.is_paused() {
        return;
    }
    if !aim.timer.tick(time.delta()).just_finished() {
        return;
    }
    let grumpy: Vec<TargetId> = machine.targets().grumpy_ids().collect();
    let aim = &mut *aim;
    if grumpy.is_empty() || !aim.rng.gen_bool(pilot.hit_chance) {
        return;
    }
    if let Some(&id) = grumpy.choose(&mut aim.rng) {
        hits.write(TargetHit(id));
    }
}

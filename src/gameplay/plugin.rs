use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use crate::app::state::Phase;
use crate::core::config::GameConfig;
use crate::core::events::{AssetsReady, PlayerCommand, SessionEvent, TargetHit};
use crate::core::system::system_order::SessionSet;
use crate::gameplay::spawn::{BurstEvent, SpawnScheduler};
use crate::gameplay::state::SessionStateMachine;
use crate::interaction::collaborators::Collaborators;

/// Fixed-period tick driver for [`SessionStateMachine::on_tick`].
#[derive(Resource, Deref, DerefMut)]
pub struct SessionTicker(pub Timer);

/// Owns the session state machine and spawn scheduler, drives them from frame
/// time and routes their side effects. Uses [`GameConfig`] if inserted before the
/// plugin and headless [`Collaborators`] unless a set was inserted.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<StatesPlugin>() {
            app.add_plugins(StatesPlugin);
        }
        let cfg = app
            .world()
            .get_resource::<GameConfig>()
            .cloned()
            .unwrap_or_default();
        if !app.world().contains_resource::<Collaborators>() {
            app.insert_resource(Collaborators::headless(cfg.session.target_capacity));
        }
        app.insert_resource(SessionStateMachine::new(&cfg))
            .insert_resource(SpawnScheduler::new(&cfg.spawn))
            .insert_resource(SessionTicker(Timer::new(
                cfg.session.tick_period(),
                TimerMode::Repeating,
            )))
            .insert_resource(cfg)
            .add_event::<SessionEvent>()
            .add_event::<PlayerCommand>()
            .add_event::<TargetHit>()
            .add_event::<AssetsReady>()
            .init_state::<Phase>()
            .configure_sets(
                Update,
                (
                    SessionSet::Commands,
                    SessionSet::Tick,
                    SessionSet::Spawn,
                    SessionSet::Effects,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    (mark_assets_ready, apply_player_commands, apply_target_hits)
                        .chain()
                        .in_set(SessionSet::Commands),
                    tick_session.in_set(SessionSet::Tick),
                    drive_spawn_bursts.in_set(SessionSet::Spawn),
                    (dispatch_effects, sync_phase_state)
                        .chain()
                        .in_set(SessionSet::Effects),
                ),
            );
    }
}

fn mark_assets_ready(
    mut reader: EventReader<AssetsReady>,
    mut machine: ResMut<SessionStateMachine>,
) {
    for _ in reader.read() {
        machine.mark_ready();
    }
}

fn apply_player_commands(
    mut reader: EventReader<PlayerCommand>,
    mut machine: ResMut<SessionStateMachine>,
    mut ticker: ResMut<SessionTicker>,
) {
    for cmd in reader.read() {
        let before = machine.phase();
        let result = match *cmd {
            PlayerCommand::Start => machine.start(),
            PlayerCommand::ChooseInput(kind) => machine.choose_input(kind),
            PlayerCommand::PlayAgain => machine.play_again(),
            PlayerCommand::QuitToMenu => {
                machine.quit_to_menu();
                Ok(())
            }
            PlayerCommand::Pause => machine.pause(),
            PlayerCommand::Resume => machine.resume(),
            PlayerCommand::Finish => machine.finish(),
            PlayerCommand::SetMuted(muted) => {
                machine.set_muted(muted);
                Ok(())
            }
        };
        if let Err(e) = result {
            warn!(target: "session", "Ignored {cmd:?}: {e}");
        }
        // Give the first countdown step a full period.
        if before != Phase::Countdown && machine.phase() == Phase::Countdown {
            ticker.reset();
        }
    }
}

fn apply_target_hits(mut reader: EventReader<TargetHit>, mut machine: ResMut<SessionStateMachine>) {
    for TargetHit(id) in reader.read() {
        if let Err(e) = machine.record_hit(*id) {
            warn!(target: "session", "Ignored hit on {id}: {e}");
        }
    }
}

fn tick_session(
    time: Res<Time>,
    mut ticker: ResMut<SessionTicker>,
    mut machine: ResMut<SessionStateMachine>,
    mut scheduler: ResMut<SpawnScheduler>,
) {
    ticker.tick(time.delta());
    for _ in 0..ticker.times_finished_this_tick() {
        machine.on_tick(&mut scheduler);
    }
}

fn drive_spawn_bursts(
    time: Res<Time>,
    mut scheduler: ResMut<SpawnScheduler>,
    mut machine: ResMut<SessionStateMachine>,
    mut collaborators: ResMut<Collaborators>,
) {
    if let Some(epoch) = scheduler.active_epoch() {
        if machine.is_stale(epoch) {
            if let Some(report) = scheduler.cancel() {
                debug!(
                    target: "spawn",
                    "Abandoned burst from epoch {epoch} after {} of its requests",
                    report.requested
                );
            }
            return;
        }
    }
    if machine.is_paused() {
        return;
    }
    let room = machine.targets().room();
    let events = scheduler.advance(time.delta(), collaborators.pool.as_mut(), room);
    for ev in events {
        match ev {
            BurstEvent::Spawned { id, epoch } => {
                machine.register_spawn(id, epoch);
            }
            BurstEvent::Failed { error, epoch } => {
                warn!(target: "spawn", "{error} (epoch {epoch}); continuing burst");
            }
            BurstEvent::Completed(report) => machine.burst_completed(&report),
        }
    }
}

fn dispatch_effects(
    mut machine: ResMut<SessionStateMachine>,
    mut collaborators: ResMut<Collaborators>,
    mut writer: EventWriter<SessionEvent>,
) {
    for ev in machine.drain_effects() {
        collaborators.dispatch(&ev);
        writer.write(ev);
    }
}

fn sync_phase_state(
    machine: Res<SessionStateMachine>,
    state: Res<State<Phase>>,
    mut next: ResMut<NextState<Phase>>,
) {
    if *state.get() != machine.phase() {
        next.set(machine.phase());
    }
}

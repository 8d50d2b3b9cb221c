use std::sync::{Arc, Mutex};
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use happy_beam::*;

#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }
    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
    fn count(&self, entry: &str) -> usize {
        self.entries().iter().filter(|e| *e == entry).count()
    }
}

struct RecordingPool {
    journal: Journal,
    next: u32,
}

impl TargetPool for RecordingPool {
    fn spawn_target(&mut self) -> Result<TargetId, SpawnError> {
        self.journal.push("spawn");
        self.next += 1;
        Ok(TargetId(self.next))
    }
    fn release_all_targets(&mut self) {
        self.journal.push("release");
    }
    fn pause_animations(&mut self) {
        self.journal.push("pause");
    }
    fn resume_animations(&mut self) {
        self.journal.push("resume");
    }
}

struct RecordingHost(Journal);

impl ImmersiveHost for RecordingHost {
    fn open(&mut self) {
        self.0.push("open");
    }
    fn teardown(&mut self) {
        self.0.push("teardown");
    }
    fn dismiss(&mut self) {
        self.0.push("dismiss");
    }
}

struct RecordingNarrator(Journal);

impl Narrator for RecordingNarrator {
    fn announce(&mut self, text: &str) {
        self.0.push(format!("say:{text}"));
    }
}

/// 200ms frames keep each frame under the virtual clock's max delta; the session
/// ticks every fifth frame.
fn test_app(game_duration: i32) -> (App, Journal) {
    let journal = Journal::default();
    let mut cfg = GameConfig::default();
    cfg.session.game_duration = game_duration;
    cfg.app.rng_seed = Some(42);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(200)))
        .insert_resource(cfg)
        .insert_resource(Collaborators::new(
            RecordingPool {
                journal: journal.clone(),
                next: 0,
            },
            RecordingHost(journal.clone()),
            RecordingNarrator(journal.clone()),
        ))
        .add_plugins(GamePlugin);
    app.world_mut().send_event(AssetsReady);
    app.update();
    (app, journal)
}

fn machine(app: &App) -> &SessionStateMachine {
    app.world().resource::<SessionStateMachine>()
}

fn run_until(app: &mut App, max_frames: usize, pred: impl Fn(&App) -> bool) -> bool {
    for _ in 0..max_frames {
        if pred(app) {
            return true;
        }
        app.update();
    }
    pred(app)
}

fn enter_active_play(app: &mut App) {
    app.world_mut().send_event(PlayerCommand::Start);
    app.world_mut()
        .send_event(PlayerCommand::ChooseInput(InputKind::Hands));
    app.update();
    assert_eq!(machine(app).phase(), Phase::Countdown);
    assert!(run_until(app, 40, |a| machine(a).phase() == Phase::ActivePlay));
}

#[test]
fn invalid_commands_keep_current_phase() {
    let (mut app, _journal) = test_app(35);
    app.world_mut()
        .send_event(PlayerCommand::ChooseInput(InputKind::Alternative));
    app.world_mut().send_event(PlayerCommand::Pause);
    app.update();
    assert_eq!(machine(&app).phase(), Phase::Start);
    assert_eq!(machine(&app).input_kind(), None);
}

#[test]
fn countdown_opens_immersive_space() {
    let (mut app, journal) = test_app(35);
    enter_active_play(&mut app);
    app.update();
    let m = machine(&app);
    assert_eq!(m.count_down(), -1);
    assert_eq!(journal.count("say:2"), 1);
    assert_eq!(journal.count("say:1"), 1);
    assert_eq!(journal.count("say:0"), 1);
    assert_eq!(journal.count("open"), 1);
    assert_eq!(journal.count("resume"), 1);
    assert_eq!(
        *app.world().resource::<State<Phase>>().get(),
        Phase::ActivePlay
    );
}

#[test]
fn full_round_spawns_scores_and_finishes() {
    let (mut app, journal) = test_app(12);
    enter_active_play(&mut app);
    let mut frames = 0;
    while machine(&app).phase() == Phase::ActivePlay && frames < 120 {
        let grumpy: Vec<TargetId> = machine(&app).targets().grumpy_ids().collect();
        for id in grumpy {
            app.world_mut().send_event(TargetHit(id));
        }
        app.update();
        frames += 1;
    }
    let m = machine(&app);
    assert_eq!(m.phase(), Phase::Finished);
    assert_eq!(m.time_left(), -1);
    assert!(m.targets().is_empty());
    // Bursts at 11, 10 and 5 seconds left.
    assert_eq!(journal.count("spawn"), 9);
    assert!(m.score() >= 1 && m.score() <= 9, "score {}", m.score());
    assert_eq!(journal.count("teardown"), 1);
    assert!(journal.count("release") >= 1);
    assert!(journal
        .entries()
        .iter()
        .any(|e| e.starts_with("say:") && e.contains("seconds left")));

    app.update();
    assert_eq!(
        *app.world().resource::<State<Phase>>().get(),
        Phase::Finished
    );
}

#[test]
fn quitting_mid_burst_drops_its_completion() {
    let (mut app, journal) = test_app(35);
    enter_active_play(&mut app);
    assert!(run_until(&mut app, 20, |a| a
        .world()
        .resource::<SpawnScheduler>()
        .in_flight()));
    app.world_mut().send_event(PlayerCommand::QuitToMenu);
    app.update();
    assert_eq!(machine(&app).phase(), Phase::Start);
    assert!(!app.world().resource::<SpawnScheduler>().in_flight());
    let spawned_at_quit = journal.count("spawn");
    for _ in 0..10 {
        app.update();
    }
    assert_eq!(journal.count("spawn"), spawned_at_quit);
    assert_eq!(journal.count("dismiss"), 1);
    assert!(!journal.entries().iter().any(|e| e.contains("seconds left")));
    assert!(machine(&app).targets().is_empty());
}

#[test]
fn pause_holds_the_clock() {
    let (mut app, journal) = test_app(35);
    enter_active_play(&mut app);
    app.world_mut().send_event(PlayerCommand::Pause);
    app.update();
    let frozen = machine(&app).time_left();
    for _ in 0..15 {
        app.update();
    }
    assert_eq!(machine(&app).time_left(), frozen);
    assert_eq!(journal.count("pause"), 1);
    app.world_mut().send_event(PlayerCommand::Resume);
    assert!(run_until(&mut app, 10, |a| machine(a).time_left() < frozen));
}

#[test]
fn play_again_restarts_countdown() {
    let (mut app, _journal) = test_app(35);
    enter_active_play(&mut app);
    app.world_mut().send_event(PlayerCommand::Finish);
    app.update();
    assert_eq!(machine(&app).phase(), Phase::Finished);
    app.world_mut().send_event(PlayerCommand::PlayAgain);
    app.update();
    let m = machine(&app);
    assert_eq!(m.phase(), Phase::Countdown);
    assert_eq!(m.score(), 0);
    assert_eq!(m.input_kind(), Some(InputKind::Hands));
}

//! Game session state machine: one owned record with an explicit phase plus the
//! countdown / play-time counters. Counters use -1 as "consumed" and never go lower.

use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::app::state::{InputKind, Phase};
use crate::core::components::{SatisfyOutcome, TargetId, TargetSet};
use crate::core::config::{GameConfig, SessionConfig};
use crate::core::errors::SessionError;
use crate::core::events::SessionEvent;
use crate::gameplay::spawn::{BurstReport, SpawnScheduler};

/// Sentinel for a counter that has been consumed.
pub const CONSUMED: i32 = -1;

/// Observable session record. Only [`SessionStateMachine`] mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    pub count_down: i32,
    pub time_left: i32,
    pub score: u32,
    pub input_kind: Option<InputKind>,
    pub targets: TargetSet,
    pub paused: bool,
    /// Scene assets loaded; `start` is blocked until then.
    pub ready: bool,
    pub muted: bool,
    /// Bumped on every reset so late burst results can be recognised.
    pub epoch: u64,
}

impl SessionState {
    fn fresh(cfg: &SessionConfig) -> Self {
        Self {
            phase: Phase::Start,
            count_down: cfg.countdown_start,
            time_left: cfg.game_duration,
            score: 0,
            input_kind: None,
            targets: TargetSet::with_capacity(cfg.target_capacity),
            paused: false,
            ready: false,
            muted: false,
            epoch: 0,
        }
    }
}

#[derive(Resource, Debug)]
pub struct SessionStateMachine {
    state: SessionState,
    settings: SessionConfig,
    hit_sound_variants: u32,
    last_input_kind: Option<InputKind>,
    effects: Vec<SessionEvent>,
    rng: StdRng,
}

impl SessionStateMachine {
    pub fn new(cfg: &GameConfig) -> Self {
        let rng = match cfg.app.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut state = SessionState::fresh(&cfg.session);
        state.muted = cfg.audio.muted;
        Self {
            state,
            settings: cfg.session.clone(),
            hit_sound_variants: cfg.audio.hit_sound_variants,
            last_input_kind: None,
            effects: Vec::new(),
            rng,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }
    pub fn phase(&self) -> Phase {
        self.state.phase
    }
    pub fn count_down(&self) -> i32 {
        self.state.count_down
    }
    pub fn time_left(&self) -> i32 {
        self.state.time_left
    }
    pub fn score(&self) -> u32 {
        self.state.score
    }
    pub fn input_kind(&self) -> Option<InputKind> {
        self.state.input_kind
    }
    pub fn targets(&self) -> &TargetSet {
        &self.state.targets
    }
    pub fn is_paused(&self) -> bool {
        self.state.paused
    }
    pub fn is_ready(&self) -> bool {
        self.state.ready
    }
    pub fn is_muted(&self) -> bool {
        self.state.muted
    }
    pub fn epoch(&self) -> u64 {
        self.state.epoch
    }
    pub fn settings(&self) -> &SessionConfig {
        &self.settings
    }

    /// Takes the side effects accumulated since the last call, in emission order.
    pub fn drain_effects(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.effects)
    }

    fn emit(&mut self, ev: SessionEvent) {
        self.effects.push(ev);
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            phase: self.state.phase,
        }
    }

    pub fn mark_ready(&mut self) {
        if !self.state.ready {
            info!(target: "session", "Assets ready; start enabled");
        }
        self.state.ready = true;
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state.phase != Phase::Start {
            return Err(self.invalid("start"));
        }
        if !self.state.ready {
            return Err(SessionError::NotReady);
        }
        self.state.phase = Phase::InputSelection;
        self.state.time_left = self.settings.game_duration;
        info!(target: "session", "Session started (epoch {})", self.state.epoch);
        Ok(())
    }

    pub fn choose_input(&mut self, kind: InputKind) -> Result<(), SessionError> {
        if self.state.phase != Phase::InputSelection {
            return Err(self.invalid("choose input"));
        }
        self.state.input_kind = Some(kind);
        self.last_input_kind = Some(kind);
        self.state.phase = Phase::Countdown;
        self.state.count_down = self.settings.countdown_start;
        info!(target: "session", "Input {:?} chosen; countdown from {}", kind, self.state.count_down);
        if self.state.count_down <= 0 {
            self.enter_active_play();
        }
        Ok(())
    }

    /// Advances the session by one fixed period. Requests a spawn burst from
    /// `scheduler` when play time crosses a spawn threshold.
    pub fn on_tick(&mut self, scheduler: &mut SpawnScheduler) {
        match self.state.phase {
            Phase::Countdown => self.tick_countdown(),
            Phase::ActivePlay if !self.state.paused => self.tick_active(scheduler),
            _ => {}
        }
    }

    fn tick_countdown(&mut self) {
        if self.state.count_down > 0 {
            self.state.count_down -= 1;
            self.emit(SessionEvent::CountdownAnnounced(self.state.count_down));
        }
        if self.state.count_down <= 0 {
            self.enter_active_play();
        }
    }

    fn enter_active_play(&mut self) {
        self.state.count_down = CONSUMED;
        self.state.phase = Phase::ActivePlay;
        info!(target: "session", "Countdown ended; {}s of play", self.state.time_left);
        self.emit(SessionEvent::CountdownEnded);
        self.emit(SessionEvent::AnimationsResumed);
    }

    fn tick_active(&mut self, scheduler: &mut SpawnScheduler) {
        if self.state.time_left > 0 {
            self.state.time_left -= 1;
            let t = self.state.time_left;
            if self.is_spawn_threshold(t) {
                match scheduler.trigger_burst(self.state.epoch) {
                    Ok(()) => self.emit(SessionEvent::BurstRequested),
                    Err(e) => warn!(target: "spawn", "Burst at t={t} skipped: {e}"),
                }
            }
        }
        if self.state.time_left <= 0 {
            info!(target: "session", "Time up");
            self.enter_finished();
        }
    }

    fn is_spawn_threshold(&self, t: i32) -> bool {
        let s = &self.settings;
        let on_cadence = s.spawn_interval > 0 && t % s.spawn_interval == 0;
        (on_cadence || t == s.game_duration - 1) && t > s.spawn_min_time_left
    }

    fn enter_finished(&mut self) {
        self.state.phase = Phase::Finished;
        self.state.time_left = CONSUMED;
        self.state.count_down = CONSUMED;
        self.state.paused = false;
        self.state.targets.clear();
        self.emit(SessionEvent::TargetsReleased);
        self.emit(SessionEvent::SessionFinished {
            score: self.state.score,
        });
        info!(target: "session", "Session finished with score {}", self.state.score);
    }

    /// Ends the session early (all clouds cheered, forced end).
    pub fn finish(&mut self) -> Result<(), SessionError> {
        if self.state.phase == Phase::Finished {
            return Err(self.invalid("finish"));
        }
        self.enter_finished();
        Ok(())
    }

    /// Back to the title screen from any phase. Readiness and mute survive.
    pub fn reset(&mut self) {
        let ready = self.state.ready;
        let muted = self.state.muted;
        let epoch = self.state.epoch + 1;
        self.state = SessionState::fresh(&self.settings);
        self.state.ready = ready;
        self.state.muted = muted;
        self.state.epoch = epoch;
        self.emit(SessionEvent::TargetsReleased);
        debug!(target: "session", "Session reset (epoch {epoch})");
    }

    /// Score screen "Play Again": fresh session, skipping the lobby when an input
    /// kind was already chosen.
    pub fn play_again(&mut self) -> Result<(), SessionError> {
        if self.state.phase != Phase::Finished {
            return Err(self.invalid("play again"));
        }
        let previous = self.last_input_kind;
        self.reset();
        self.start()?;
        if let Some(kind) = previous {
            self.choose_input(kind)?;
        }
        Ok(())
    }

    pub fn quit_to_menu(&mut self) {
        self.emit(SessionEvent::ImmersiveDismissed);
        self.reset();
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        if self.state.phase != Phase::ActivePlay || self.state.paused {
            return Err(self.invalid("pause"));
        }
        self.state.paused = true;
        self.emit(SessionEvent::AnimationsPaused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), SessionError> {
        if self.state.phase != Phase::ActivePlay || !self.state.paused {
            return Err(self.invalid("resume"));
        }
        self.state.paused = false;
        self.emit(SessionEvent::AnimationsResumed);
        Ok(())
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.state.muted = muted;
    }

    /// Beam landed on `id`. Scores once per target; repeated hits are no-ops.
    pub fn record_hit(&mut self, id: TargetId) -> Result<(), SessionError> {
        if self.state.phase != Phase::ActivePlay {
            return Err(self.invalid("record a hit"));
        }
        match self.state.targets.satisfy(id) {
            SatisfyOutcome::Newly => {
                self.state.score += 1;
                self.emit(SessionEvent::TargetScored {
                    id,
                    score: self.state.score,
                });
                if !self.state.muted && self.hit_sound_variants > 0 {
                    let variant = self.rng.gen_range(1..=self.hit_sound_variants);
                    self.emit(SessionEvent::HitSound { variant });
                }
                Ok(())
            }
            SatisfyOutcome::Already => Ok(()),
            SatisfyOutcome::Unknown => Err(SessionError::UnknownTarget(id)),
        }
    }

    /// True when results from a burst started in `epoch` must be dropped.
    pub fn is_stale(&self, epoch: u64) -> bool {
        epoch != self.state.epoch || self.state.phase != Phase::ActivePlay
    }

    /// Tracks a cloud the pool placed for a burst. Returns false when the result is
    /// stale or the target set is full.
    pub fn register_spawn(&mut self, id: TargetId, epoch: u64) -> bool {
        if self.is_stale(epoch) {
            debug!(target: "spawn", "Dropping stale spawn {id} from epoch {epoch}");
            return false;
        }
        if !self.state.targets.register(id) {
            warn!(
                target: "spawn",
                "Target set full ({}); {id} not tracked",
                self.state.targets.capacity()
            );
            return false;
        }
        true
    }

    /// Burst finished pacing. Announces the spawn overview unless the session moved on.
    pub fn burst_completed(&mut self, report: &BurstReport) {
        if self.is_stale(report.epoch) {
            debug!(target: "spawn", "Ignoring stale burst completion from epoch {}", report.epoch);
            return;
        }
        let text = self.overview();
        self.emit(SessionEvent::OverviewAnnouncement(text));
    }

    /// Narration summary of the clouds currently in play.
    pub fn overview(&self) -> String {
        let targets = &self.state.targets;
        let happy = targets.satisfied_count();
        let grumpy = targets.len() - happy;
        format!(
            "{grumpy} grumpy {} and {happy} happy {}. {} seconds left.",
            if grumpy == 1 { "cloud" } else { "clouds" },
            if happy == 1 { "cloud" } else { "clouds" },
            self.state.time_left.max(0)
        )
    }
}

//! Narrow interfaces to the systems the session core does not implement: the
//! scene / target pool, the immersive-space host and the narration sink.

use bevy::prelude::*;

use crate::core::components::TargetId;
use crate::core::errors::SpawnError;
use crate::core::events::SessionEvent;
use crate::interaction::headless::{HeadlessTargetPool, LogImmersiveHost, LogNarrator};

/// Scene collaborator owning the rendered clouds.
pub trait TargetPool: Send + Sync {
    fn spawn_target(&mut self) -> Result<TargetId, SpawnError>;
    fn release_all_targets(&mut self);
    fn pause_animations(&mut self);
    fn resume_animations(&mut self);
}

/// Host of the immersive space the game is rendered in.
pub trait ImmersiveHost: Send + Sync {
    /// Countdown ended; begin rendering the play space.
    fn open(&mut self);
    /// Session finished; the space may be torn down.
    fn teardown(&mut self);
    /// Player quit to the main menu.
    fn dismiss(&mut self);
}

/// Accessibility / narration output (text only).
pub trait Narrator: Send + Sync {
    fn announce(&mut self, text: &str);
}

/// Boxed collaborators the session plugin routes side effects to.
#[derive(Resource)]
pub struct Collaborators {
    pub pool: Box<dyn TargetPool>,
    pub host: Box<dyn ImmersiveHost>,
    pub narrator: Box<dyn Narrator>,
}

impl Collaborators {
    pub fn new(
        pool: impl TargetPool + 'static,
        host: impl ImmersiveHost + 'static,
        narrator: impl Narrator + 'static,
    ) -> Self {
        Self {
            pool: Box::new(pool),
            host: Box::new(host),
            narrator: Box::new(narrator),
        }
    }

    /// Log-only collaborators with an in-memory pool of `capacity` clouds.
    pub fn headless(capacity: usize) -> Self {
        Self::new(
            HeadlessTargetPool::new(capacity),
            LogImmersiveHost::default(),
            LogNarrator,
        )
    }

    pub fn dispatch(&mut self, ev: &SessionEvent) {
        match ev {
            SessionEvent::CountdownAnnounced(n) => self.narrator.announce(&n.to_string()),
            SessionEvent::CountdownEnded => self.host.open(),
            SessionEvent::SessionFinished { .. } => self.host.teardown(),
            SessionEvent::OverviewAnnouncement(text) => self.narrator.announce(text),
            SessionEvent::TargetsReleased => self.pool.release_all_targets(),
            SessionEvent::AnimationsPaused => self.pool.pause_animations(),
            SessionEvent::AnimationsResumed => self.pool.resume_animations(),
            SessionEvent::ImmersiveDismissed => self.host.dismiss(),
            // Audio and score display belong to the UI shell.
            SessionEvent::HitSound { .. }
            | SessionEvent::BurstRequested
            | SessionEvent::TargetScored { .. } => {}
        }
    }
}

use bevy::prelude::*;

use crate::core::components::TargetId;
use crate::core::errors::SpawnError;
use crate::interaction::collaborators::{ImmersiveHost, Narrator, TargetPool};

/// In-memory cloud pool: hands out sequential ids until `capacity` clouds are live.
#[derive(Debug, Clone)]
pub struct HeadlessTargetPool {
    next_id: u32,
    live: usize,
    capacity: usize,
    animating: bool,
}

impl HeadlessTargetPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            next_id: 0,
            live: 0,
            capacity,
            animating: true,
        }
    }

    pub fn live(&self) -> usize {
        self.live
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }
}

impl TargetPool for HeadlessTargetPool {
    fn spawn_target(&mut self) -> Result<TargetId, SpawnError> {
        if self.live >= self.capacity {
            return Err(SpawnError::PoolExhausted);
        }
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.live += 1;
        debug!(target: "scene", "Spawned {id}");
        Ok(id)
    }

    fn release_all_targets(&mut self) {
        if self.live > 0 {
            debug!(target: "scene", "Released {} clouds", self.live);
        }
        self.live = 0;
    }

    fn pause_animations(&mut self) {
        self.animating = false;
        debug!(target: "scene", "Cloud animations paused");
    }

    fn resume_animations(&mut self) {
        self.animating = true;
        debug!(target: "scene", "Cloud animations resumed");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogImmersiveHost {
    open: bool,
}

impl ImmersiveHost for LogImmersiveHost {
    fn open(&mut self) {
        self.open = true;
        info!(target: "scene", "Immersive space opened");
    }

    fn teardown(&mut self) {
        info!(target: "scene", "Immersive space ready for teardown");
    }

    fn dismiss(&mut self) {
        if self.open {
            info!(target: "scene", "Immersive space dismissed");
        }
        self.open = false;
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNarrator;

impl Narrator for LogNarrator {
    fn announce(&mut self, text: &str) {
        info!(target: "narration", "{text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_exhausts_and_recovers_after_release() {
        let mut pool = HeadlessTargetPool::new(2);
        assert_eq!(pool.spawn_target(), Ok(TargetId(0)));
        assert_eq!(pool.spawn_target(), Ok(TargetId(1)));
        assert_eq!(pool.spawn_target(), Err(SpawnError::PoolExhausted));
        pool.release_all_targets();
        assert_eq!(pool.live(), 0);
        // Ids keep increasing so stale references never alias new clouds.
        assert_eq!(pool.spawn_target(), Ok(TargetId(2)));
    }

    #[test]
    fn pause_and_resume_toggle_animation() {
        let mut pool = HeadlessTargetPool::new(1);
        assert!(pool.is_animating());
        pool.pause_animations();
        assert!(!pool.is_animating());
        pool.resume_animations();
        assert!(pool.is_animating());
    }
}

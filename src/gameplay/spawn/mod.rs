//! Paced spawn bursts. A burst is advanced cooperatively from frame time, so the
//! tick driver is never blocked while the pacing delays run.

use bevy::prelude::*;
use std::time::Duration;

use crate::core::components::TargetId;
use crate::core::config::SpawnConfig;
use crate::core::errors::{SessionError, SpawnError};
use crate::interaction::collaborators::TargetPool;

/// Result of driving a burst forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BurstEvent {
    Spawned { id: TargetId, epoch: u64 },
    Failed { error: SessionError, epoch: u64 },
    /// Last request issued and the trailing pacing delay elapsed.
    Completed(BurstReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstReport {
    /// Session epoch the burst was started in.
    pub epoch: u64,
    pub requested: u32,
    pub spawned: u32,
    pub failed: u32,
}

#[derive(Debug, Clone)]
struct Burst {
    epoch: u64,
    elapsed: Duration,
    issued: u32,
    spawned: u32,
    failed: u32,
}

impl Burst {
    fn report(&self) -> BurstReport {
        BurstReport {
            epoch: self.epoch,
            requested: self.issued,
            spawned: self.spawned,
            failed: self.failed,
        }
    }
}

/// At most one burst in flight; a second trigger is rejected, never interleaved.
#[derive(Resource, Debug)]
pub struct SpawnScheduler {
    burst_size: u32,
    pacing: Duration,
    active: Option<Burst>,
    bursts_completed: u64,
    spawn_failures: u64,
}

impl SpawnScheduler {
    pub fn new(cfg: &SpawnConfig) -> Self {
        Self {
            burst_size: cfg.burst_size,
            pacing: cfg.pacing(),
            active: None,
            bursts_completed: 0,
            spawn_failures: 0,
        }
    }

    pub fn trigger_burst(&mut self, epoch: u64) -> Result<(), SessionError> {
        if self.active.is_some() {
            return Err(SessionError::BurstInProgress);
        }
        debug!(target: "spawn", "Burst of {} queued (epoch {epoch})", self.burst_size);
        self.active = Some(Burst {
            epoch,
            elapsed: Duration::ZERO,
            issued: 0,
            spawned: 0,
            failed: 0,
        });
        Ok(())
    }

    pub fn in_flight(&self) -> bool {
        self.active.is_some()
    }

    /// Epoch of the burst in flight, if any.
    pub fn active_epoch(&self) -> Option<u64> {
        self.active.as_ref().map(|b| b.epoch)
    }

    pub fn bursts_completed(&self) -> u64 {
        self.bursts_completed
    }

    pub fn spawn_failures(&self) -> u64 {
        self.spawn_failures
    }

    /// Moves the burst in flight forward by `dt`, issuing every request that has
    /// come due. Request `i` is due `i * pacing` after the burst began; the burst
    /// completes one pacing delay after its last request. `room` is how many more
    /// clouds the session can track; requests beyond it fail without reaching
    /// the pool.
    pub fn advance(
        &mut self,
        dt: Duration,
        pool: &mut dyn TargetPool,
        mut room: usize,
    ) -> Vec<BurstEvent> {
        let mut out = Vec::new();
        let Some(burst) = self.active.as_mut() else {
            return out;
        };
        burst.elapsed += dt;
        while burst.issued < self.burst_size && burst.elapsed >= self.pacing * burst.issued {
            burst.issued += 1;
            let placed = if room == 0 {
                Err(SpawnError::PoolExhausted)
            } else {
                pool.spawn_target()
            };
            match placed {
                Ok(id) => {
                    room -= 1;
                    burst.spawned += 1;
                    out.push(BurstEvent::Spawned {
                        id,
                        epoch: burst.epoch,
                    });
                }
                Err(error) => {
                    burst.failed += 1;
                    self.spawn_failures += 1;
                    debug!(
                        target: "spawn",
                        "Request {}/{} failed",
                        burst.issued, self.burst_size
                    );
                    out.push(BurstEvent::Failed {
                        error: SessionError::SpawnFailure(error),
                        epoch: burst.epoch,
                    });
                }
            }
        }
        if burst.issued >= self.burst_size && burst.elapsed >= self.pacing * self.burst_size {
            let report = burst.report();
            self.active = None;
            self.bursts_completed += 1;
            debug!(
                target: "spawn",
                "Burst done: {} spawned, {} failed",
                report.spawned, report.failed
            );
            out.push(BurstEvent::Completed(report));
        }
        out
    }

    /// Drops the unissued remainder of the burst in flight. Requests already sent
    /// to the pool are not recalled.
    pub fn cancel(&mut self) -> Option<BurstReport> {
        self.active.take().map(|b| b.report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pool that fails on the listed (1-based) request numbers.
    struct ScriptedPool {
        calls: u32,
        fail_on: Vec<u32>,
    }

    impl TargetPool for ScriptedPool {
        fn spawn_target(&mut self) -> Result<TargetId, SpawnError> {
            self.calls += 1;
            if self.fail_on.contains(&self.calls) {
                Err(SpawnError::Placement("blocked".into()))
            } else {
                Ok(TargetId(self.calls))
            }
        }
        fn release_all_targets(&mut self) {}
        fn pause_animations(&mut self) {}
        fn resume_animations(&mut self) {}
    }

    const ROOM: usize = 30;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn requests_are_paced() {
        let mut s = SpawnScheduler::new(&SpawnConfig::default());
        let mut pool = ScriptedPool { calls: 0, fail_on: vec![] };
        s.trigger_burst(0).unwrap();
        assert_eq!(s.advance(Duration::ZERO, &mut pool, ROOM).len(), 1);
        assert!(s.advance(ms(299), &mut pool, ROOM).is_empty());
        assert_eq!(
            s.advance(ms(1), &mut pool, ROOM),
            vec![BurstEvent::Spawned { id: TargetId(2), epoch: 0 }]
        );
        assert_eq!(s.advance(ms(300), &mut pool, ROOM).len(), 1);
        assert_eq!(pool.calls, 3);
        assert!(s.in_flight(), "trailing delay still running");
        let done = s.advance(ms(300), &mut pool, ROOM);
        assert_eq!(
            done,
            vec![BurstEvent::Completed(BurstReport {
                epoch: 0,
                requested: 3,
                spawned: 3,
                failed: 0
            })]
        );
        assert!(!s.in_flight());
        assert_eq!(s.bursts_completed(), 1);
    }

    #[test]
    fn second_trigger_rejected_until_complete() {
        let mut s = SpawnScheduler::new(&SpawnConfig::default());
        let mut pool = ScriptedPool { calls: 0, fail_on: vec![] };
        s.trigger_burst(1).unwrap();
        s.advance(ms(400), &mut pool, ROOM);
        assert_eq!(s.trigger_burst(1), Err(SessionError::BurstInProgress));
        s.advance(ms(600), &mut pool, ROOM);
        assert!(s.trigger_burst(1).is_ok());
    }

    #[test]
    fn failure_does_not_abort_burst() {
        let mut s = SpawnScheduler::new(&SpawnConfig::default());
        let mut pool = ScriptedPool { calls: 0, fail_on: vec![2] };
        s.trigger_burst(3).unwrap();
        let events = s.advance(ms(900), &mut pool, ROOM);
        assert_eq!(pool.calls, 3);
        assert_eq!(
            events[1],
            BurstEvent::Failed {
                error: SessionError::SpawnFailure(SpawnError::Placement("blocked".into())),
                epoch: 3
            }
        );
        assert_eq!(events[2], BurstEvent::Spawned { id: TargetId(3), epoch: 3 });
        assert_eq!(
            events[3],
            BurstEvent::Completed(BurstReport {
                epoch: 3,
                requested: 3,
                spawned: 2,
                failed: 1
            })
        );
        assert_eq!(s.spawn_failures(), 1);
    }

    #[test]
    fn cancel_drops_remaining_requests() {
        let mut s = SpawnScheduler::new(&SpawnConfig::default());
        let mut pool = ScriptedPool { calls: 0, fail_on: vec![] };
        s.trigger_burst(0).unwrap();
        s.advance(Duration::ZERO, &mut pool, ROOM);
        let report = s.cancel().unwrap();
        assert_eq!(report.requested, 1);
        assert!(s.advance(ms(1000), &mut pool, ROOM).is_empty());
        assert_eq!(pool.calls, 1);
    }

    #[test]
    fn full_target_set_keeps_requests_off_the_pool() {
        let mut s = SpawnScheduler::new(&SpawnConfig::default());
        let mut pool = ScriptedPool { calls: 0, fail_on: vec![] };
        s.trigger_burst(2).unwrap();
        let events = s.advance(ms(900), &mut pool, 1);
        assert_eq!(pool.calls, 1);
        assert_eq!(events[0], BurstEvent::Spawned { id: TargetId(1), epoch: 2 });
        let exhausted = BurstEvent::Failed {
            error: SessionError::SpawnFailure(SpawnError::PoolExhausted),
            epoch: 2,
        };
        assert_eq!(events[1], exhausted);
        assert_eq!(events[2], exhausted);
        assert_eq!(
            events[3],
            BurstEvent::Completed(BurstReport {
                epoch: 2,
                requested: 3,
                spawned: 1,
                failed: 2
            })
        );
    }
}

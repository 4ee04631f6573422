//! # ShutdownCoordinator: bounded, two-phase coordinated shutdown.
//!
//! The coordinator is the terminal action of process lifetime. It guarantees
//! the process can exit within a bounded time even if a runtime unit never
//! responds, by escalating from a graceful phase to a forced phase.
//!
//! ## Phase machine
//! ```text
//! Idle ──► Graceful ──► Done                    (all units closed in time)
//!             │
//!             └──► TimedOut ──► Forced ──► Done (deadline escalation)
//! ```
//! No backward transitions; one coordinator executes this sequence once.
//!
//! ## Algorithm
//! ```text
//! 1. snapshot = directory.list_units()             (stable copy)
//! 2. per unit: spawn task
//!      lookup ─► request_close(op_timeout) ─► unregister
//!      (every task failure is published, then discarded)
//! 3. wait all tasks, bounded by op_timeout + jitter
//! 4. on timeout: detach stragglers, re-snapshot the directory,
//!      per remaining unit: spawn task
//!        lookup ─► force_close() ─► unregister    (no grace)
//!      wait again, bounded by op_timeout, fully best-effort
//! 5. unconditionally: components stop + destroy, reverse declared order,
//!      every failure swallowed (runs during process exit)
//! ```
//!
//! ## Rules
//! - One unit's misbehavior must never block or fail the others.
//! - The overall wait is strictly bounded; stragglers are **abandoned**
//!   (detached), not leaked as join obligations.
//! - Nothing in this module panics or returns an error: the coordinator has
//!   no caller to report to at process exit. The [`ShutdownReport`] is the
//!   only output.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering as AtomicOrdering};
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::components::ComponentResolver;
use crate::config::Config;
use crate::events::{Bus, Event, EventKind};
use crate::units::{Directory, UnitId};

/// Largest jitter ever added to the graceful barrier wait.
const JITTER_CAP: Duration = Duration::from_secs(1);

const PHASE_IDLE: u8 = 0;
const PHASE_GRACEFUL: u8 = 1;
const PHASE_FORCED: u8 = 2;
const PHASE_DONE: u8 = 3;

/// Observable phase of the coordinator's one-shot sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownPhase {
    /// Not yet run.
    Idle,
    /// Graceful per-unit close tasks in flight.
    Graceful,
    /// Deadline exceeded; forced close tasks in flight.
    Forced,
    /// Sequence finished (including component teardown).
    Done,
}

/// Outcome of one coordinated shutdown run.
///
/// Purely informational; shutdown never fails.
#[derive(Debug, Default)]
pub struct ShutdownReport {
    /// Units that closed gracefully within the bounded wait.
    pub graceful: Vec<UnitId>,
    /// Units force-closed during escalation.
    pub forced: Vec<UnitId>,
    /// Units still registered when the coordinator gave up on them.
    pub stuck: Vec<UnitId>,
    /// True if the graceful barrier wait timed out and the forced phase ran.
    pub escalated: bool,
    /// Total wall-clock time of the run.
    pub elapsed: Duration,
}

/// Runs the one-shot, two-phase coordinated shutdown.
///
/// Registered once per boot attempt as the process-exit action (via
/// [`ShutdownHook`](crate::core::ShutdownHook)); can also be driven directly
/// by embedders that own process lifetime themselves.
pub struct ShutdownCoordinator {
    cfg: Config,
    directory: Arc<Directory>,
    resolver: Arc<ComponentResolver>,
    bus: Bus,
    phase: AtomicU8,
}

impl ShutdownCoordinator {
    /// Creates a coordinator over the orchestrator's directory and resolver.
    pub fn new(
        cfg: Config,
        directory: Arc<Directory>,
        resolver: Arc<ComponentResolver>,
        bus: Bus,
    ) -> Self {
        Self {
            cfg,
            directory,
            resolver,
            bus,
            phase: AtomicU8::new(PHASE_IDLE),
        }
    }

    /// Current phase of the sequence.
    pub fn phase(&self) -> ShutdownPhase {
        match self.phase.load(AtomicOrdering::SeqCst) {
            PHASE_IDLE => ShutdownPhase::Idle,
            PHASE_GRACEFUL => ShutdownPhase::Graceful,
            PHASE_FORCED => ShutdownPhase::Forced,
            _ => ShutdownPhase::Done,
        }
    }

    /// Executes the shutdown sequence exactly once.
    ///
    /// A second call (from any task) observes the phase guard and returns an
    /// empty report without re-executing.
    pub async fn run(&self) -> ShutdownReport {
        if self
            .phase
            .compare_exchange(
                PHASE_IDLE,
                PHASE_GRACEFUL,
                AtomicOrdering::SeqCst,
                AtomicOrdering::SeqCst,
            )
            .is_err()
        {
            return ShutdownReport::default();
        }

        let started = Instant::now();
        let op_timeout = self.cfg.operation_timeout();
        self.bus.publish(Event::new(EventKind::ShutdownRequested));

        let snapshot = self.directory.list_units().await;
        let mut set = JoinSet::new();
        for id in snapshot.iter().cloned() {
            let directory = Arc::clone(&self.directory);
            let bus = self.bus.clone();
            set.spawn(async move {
                Self::graceful_close(directory, bus, id, op_timeout).await;
            });
        }

        let barrier = op_timeout + Self::jitter(op_timeout);
        let drained =
            tokio::time::timeout(barrier, async { while set.join_next().await.is_some() {} }).await;

        let after_graceful = self.directory.list_units().await;
        let graceful: Vec<UnitId> = snapshot
            .iter()
            .filter(|id| !after_graceful.contains(id))
            .cloned()
            .collect();

        let mut forced = Vec::new();
        let mut stuck = after_graceful.clone();
        let escalated = drained.is_err();

        if escalated {
            self.phase.store(PHASE_FORCED, AtomicOrdering::SeqCst);
            self.bus
                .publish(Event::new(EventKind::GraceExceeded).with_timeout(barrier));
            set.detach_all();

            let mut forced_set = JoinSet::new();
            for id in after_graceful.iter().cloned() {
                let directory = Arc::clone(&self.directory);
                let bus = self.bus.clone();
                forced_set.spawn(async move {
                    Self::forced_close(directory, bus, id).await;
                });
            }
            let _ = tokio::time::timeout(op_timeout, async {
                while forced_set.join_next().await.is_some() {}
            })
            .await;
            forced_set.detach_all();

            let after_forced = self.directory.list_units().await;
            forced = after_graceful
                .iter()
                .filter(|id| !after_forced.contains(id))
                .cloned()
                .collect();
            stuck = after_forced;
        } else if stuck.is_empty() {
            self.bus.publish(Event::new(EventKind::AllClosedWithin));
        }

        // Final step runs during process exit and has no caller to report to:
        // component teardown swallows every failure inside the fan-out.
        self.resolver.stop_all(&self.cfg, true).await;
        self.resolver.close_all(&self.cfg, true).await;

        self.phase.store(PHASE_DONE, AtomicOrdering::SeqCst);
        self.bus.publish(Event::new(EventKind::ShutdownComplete));

        ShutdownReport {
            graceful,
            forced,
            stuck,
            escalated,
            elapsed: started.elapsed(),
        }
    }

    /// One graceful per-unit task: lookup → close → unregister.
    ///
    /// A failed close leaves the unit registered so the forced phase still
    /// sees it. Every failure is published, then discarded.
    async fn graceful_close(directory: Arc<Directory>, bus: Bus, id: UnitId, timeout: Duration) {
        let Some(unit) = directory.lookup(&id).await else {
            return;
        };
        match unit.request_close(Some(timeout)).await {
            Ok(()) => {
                bus.publish(Event::new(EventKind::UnitClosed).with_unit(id.as_str()));
                directory.unregister(&id).await;
                bus.publish(Event::new(EventKind::UnitUnregistered).with_unit(id.as_str()));
            }
            Err(e) => {
                bus.publish(
                    Event::new(EventKind::UnitCloseFailed)
                        .with_unit(id.as_str())
                        .with_reason(e.to_string()),
                );
            }
        }
    }

    /// One forced per-unit task: lookup → force_close → unregister. No grace.
    async fn forced_close(directory: Arc<Directory>, bus: Bus, id: UnitId) {
        let Some(unit) = directory.lookup(&id).await else {
            return;
        };
        match unit.force_close().await {
            Ok(()) => {
                bus.publish(Event::new(EventKind::UnitForceClosed).with_unit(id.as_str()));
                directory.unregister(&id).await;
                bus.publish(Event::new(EventKind::UnitUnregistered).with_unit(id.as_str()));
            }
            Err(e) => {
                bus.publish(
                    Event::new(EventKind::UnitCloseFailed)
                        .with_unit(id.as_str())
                        .with_reason(e.to_string()),
                );
            }
        }
    }

    /// Uniform random jitter in `[0, min(timeout / 10, 1s)]`.
    ///
    /// Spreads the barrier deadline when many processes shut down together,
    /// so their retries and force phases don't synchronize.
    fn jitter(timeout: Duration) -> Duration {
        let cap = (timeout / 10).min(JITTER_CAP);
        let ms = cap.as_millis() as u64;
        if ms == 0 {
            return Duration::ZERO;
        }
        let mut rng = rand::rng();
        Duration::from_millis(rng.random_range(0..=ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::builtin_factories;
    use crate::error::UnitError;
    use crate::units::{ManagedUnit, UnitRef};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    /// Test double whose close behavior is scripted per scenario.
    struct ScriptedUnit {
        id: UnitId,
        block_close: bool,
        fail_close: bool,
        closes: AtomicUsize,
        forces: AtomicUsize,
    }

    impl ScriptedUnit {
        fn new(id: &str) -> Arc<Self> {
            Arc::new(Self {
                id: UnitId::from(id),
                block_close: false,
                fail_close: false,
                closes: AtomicUsize::new(0),
                forces: AtomicUsize::new(0),
            })
        }

        fn blocking(id: &str) -> Arc<Self> {
            Arc::new(Self {
                id: UnitId::from(id),
                block_close: true,
                fail_close: false,
                closes: AtomicUsize::new(0),
                forces: AtomicUsize::new(0),
            })
        }

        fn failing(id: &str) -> Arc<Self> {
            Arc::new(Self {
                id: UnitId::from(id),
                block_close: false,
                fail_close: true,
                closes: AtomicUsize::new(0),
                forces: AtomicUsize::new(0),
            })
        }

        fn close_calls(&self) -> usize {
            self.closes.load(AtomicOrdering::SeqCst)
        }

        fn force_calls(&self) -> usize {
            self.forces.load(AtomicOrdering::SeqCst)
        }
    }

    #[async_trait]
    impl ManagedUnit for ScriptedUnit {
        fn id(&self) -> &UnitId {
            &self.id
        }

        async fn request_start(&self, _timeout: Duration) -> Result<(), UnitError> {
            Ok(())
        }

        async fn request_close(&self, _timeout: Option<Duration>) -> Result<(), UnitError> {
            self.closes.fetch_add(1, AtomicOrdering::SeqCst);
            if self.block_close {
                // Misbehaving unit: the graceful request never returns.
                std::future::pending::<()>().await;
            }
            if self.fail_close {
                return Err(UnitError::Rejected {
                    reason: "refusing to close".into(),
                });
            }
            Ok(())
        }

        async fn force_close(&self) -> Result<(), UnitError> {
            self.forces.fetch_add(1, AtomicOrdering::SeqCst);
            Ok(())
        }
    }

    fn cfg(timeout_ms: &str) -> Config {
        let mut map = HashMap::new();
        map.insert("operation.timeout.ms".to_string(), timeout_ms.to_string());
        Config::from_map(map)
    }

    async fn coordinator(cfg: Config, units: Vec<UnitRef>) -> (ShutdownCoordinator, Arc<Directory>) {
        let bus = Bus::new(256);
        let directory = Arc::new(Directory::new());
        for unit in units {
            directory.register(unit).await;
        }
        let resolver = Arc::new(ComponentResolver::new(bus.clone(), builtin_factories()));
        (
            ShutdownCoordinator::new(cfg, Arc::clone(&directory), resolver, bus),
            directory,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_units_close_gracefully() {
        let a = ScriptedUnit::new("a");
        let b = ScriptedUnit::new("b");
        let (coord, directory) = coordinator(cfg("200"), vec![a.clone(), b.clone()]).await;

        let report = coord.run().await;

        assert!(!report.escalated);
        assert_eq!(report.graceful.len(), 2);
        assert!(report.forced.is_empty());
        assert!(report.stuck.is_empty());
        assert!(directory.is_empty().await);
        assert_eq!(a.close_calls(), 1);
        assert_eq!(a.force_calls(), 0);
        assert_eq!(coord.phase(), ShutdownPhase::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_unit_triggers_escalation_and_force_close() {
        let a = ScriptedUnit::new("a");
        let b = ScriptedUnit::blocking("b");
        let c = ScriptedUnit::new("c");
        let (coord, directory) =
            coordinator(cfg("200"), vec![a.clone(), b.clone(), c.clone()]).await;

        let started = Instant::now();
        let report = coord.run().await;
        let elapsed = started.elapsed();

        // A and C drained gracefully; B exceeded the barrier and was forced.
        assert!(report.escalated);
        assert_eq!(report.graceful, vec![UnitId::from("a"), UnitId::from("c")]);
        assert_eq!(report.forced, vec![UnitId::from("b")]);
        assert!(report.stuck.is_empty());
        assert!(directory.is_empty().await);

        assert_eq!(b.close_calls(), 1);
        assert_eq!(b.force_calls(), 1);
        assert_eq!(a.force_calls(), 0);
        assert_eq!(c.force_calls(), 0);

        // Bounded latency: one barrier (200ms + jitter ≤ 20ms) plus at most
        // one forced-phase wait (200ms).
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed <= Duration::from_millis(450));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_graceful_close_leaves_unit_for_report() {
        let a = ScriptedUnit::failing("a");
        let (coord, directory) = coordinator(cfg("200"), vec![a.clone()]).await;

        let report = coord.run().await;

        // The close failed fast, so the barrier never timed out: no
        // escalation, and the unit is reported stuck (still registered).
        assert!(!report.escalated);
        assert!(report.graceful.is_empty());
        assert_eq!(report.stuck, vec![UnitId::from("a")]);
        assert!(directory.is_registered(&UnitId::from("a")).await);
        assert_eq!(a.close_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_is_one_shot() {
        let a = ScriptedUnit::new("a");
        let (coord, _directory) = coordinator(cfg("200"), vec![a.clone()]).await;

        let first = coord.run().await;
        assert_eq!(first.graceful.len(), 1);

        let second = coord.run().await;
        assert!(second.graceful.is_empty());
        assert!(!second.escalated);
        assert_eq!(a.close_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_directory_completes_immediately() {
        let (coord, _directory) = coordinator(cfg("200"), vec![]).await;
        let report = coord.run().await;
        assert!(!report.escalated);
        assert!(report.graceful.is_empty());
        assert!(report.stuck.is_empty());
    }

    #[test]
    fn test_jitter_bounds() {
        for _ in 0..100 {
            let j = ShutdownCoordinator::jitter(Duration::from_millis(200));
            assert!(j <= Duration::from_millis(20));
        }
        // Cap applies for huge timeouts.
        for _ in 0..100 {
            let j = ShutdownCoordinator::jitter(Duration::from_secs(120));
            assert!(j <= Duration::from_secs(1));
        }
        assert_eq!(
            ShutdownCoordinator::jitter(Duration::from_millis(5)),
            Duration::ZERO
        );
    }
}

//! # Lifecycle events emitted by the orchestrator, resolver, and coordinator.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Unit lifecycle**: registration, start, close, force-close, removal
//! - **Component lifecycle**: init/start/stop/destroy outcomes
//! - **Shutdown flow**: request, phase completion, deadline escalation
//! - **Subscriber health**: panics and queue overflow in the fan-out layer
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! unit or component concerned, failure reasons, and the bounding timeout.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Unit lifecycle ===
    /// A unit became addressable in the directory.
    ///
    /// Sets: `unit`, `at`, `seq`
    UnitRegistered,

    /// `request_start` is about to be issued for a unit.
    ///
    /// Sets: `unit`, `timeout_ms`, `at`, `seq`
    UnitStarting,

    /// A unit acknowledged `request_start`.
    ///
    /// Sets: `unit`, `at`, `seq`
    UnitStarted,

    /// A unit failed `request_start`; boot is aborting.
    ///
    /// Sets: `unit`, `reason`, `at`, `seq`
    UnitStartFailed,

    /// A unit completed a graceful close.
    ///
    /// Sets: `unit`, `at`, `seq`
    UnitClosed,

    /// A graceful close attempt failed; the unit stays registered so the
    /// forced phase can still reach it.
    ///
    /// Sets: `unit`, `reason`, `at`, `seq`
    UnitCloseFailed,

    /// A unit was closed unconditionally during the forced phase.
    ///
    /// Sets: `unit`, `at`, `seq`
    UnitForceClosed,

    /// A unit was removed from the directory.
    ///
    /// Sets: `unit`, `at`, `seq`
    UnitUnregistered,

    // === Component lifecycle ===
    /// A management component finished `init`.
    ///
    /// Sets: `component`, `at`, `seq`
    ComponentInitialized,

    /// A management component finished `start`.
    ///
    /// Sets: `component`, `at`, `seq`
    ComponentStarted,

    /// A management component finished `stop`.
    ///
    /// Sets: `component`, `at`, `seq`
    ComponentStopped,

    /// A management component finished `destroy`.
    ///
    /// Sets: `component`, `at`, `seq`
    ComponentDestroyed,

    /// A management-component lifecycle call failed. The fan-out continues
    /// with the next component.
    ///
    /// Sets: `component`, `reason`, `at`, `seq`
    ComponentFailed,

    /// Periodic liveness beat from the built-in heartbeat component.
    ///
    /// Sets: `component`, `at`, `seq`
    Heartbeat,

    // === Shutdown flow ===
    /// Coordinated shutdown has begun (exit signal observed or run invoked).
    ///
    /// Sets: `at`, `seq`
    ShutdownRequested,

    /// Every unit closed gracefully within the bounded wait.
    ///
    /// Sets: `at`, `seq`
    AllClosedWithin,

    /// The graceful barrier wait timed out; escalating to forced shutdown.
    ///
    /// Sets: `timeout_ms` (the exceeded bound), `at`, `seq`
    GraceExceeded,

    /// The coordinator finished its one-shot sequence (both phases plus
    /// component teardown).
    ///
    /// Sets: `at`, `seq`
    ShutdownComplete,

    // === Subscriber health ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `component` (subscriber name), `reason`, `at`, `seq`
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `component` (subscriber name), `reason`, `at`, `seq`
    SubscriberOverflow,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Identifier of the unit concerned, if applicable.
    pub unit: Option<Arc<str>>,
    /// Name of the management component (or subscriber) concerned.
    pub component: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Bounding timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            unit: None,
            component: None,
            reason: None,
            timeout_ms: None,
        }
    }

    /// Attaches a unit identifier.
    #[inline]
    pub fn with_unit(mut self, unit: impl Into<Arc<str>>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Attaches a component (or subscriber) name.
    #[inline]
    pub fn with_component(mut self, component: impl Into<Arc<str>>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a bounding timeout (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_component(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_component(subscriber)
            .with_reason(info)
    }
}

//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [unit-starting] unit=adapter-1 timeout_ms=60000
//! [unit-started] unit=adapter-1
//! [unit-start-failed] unit=adapter-1 err="connection refused"
//! [component-started] component=heartbeat
//! [shutdown-requested]
//! [grace-exceeded] timeout_ms=200
//! [unit-force-closed] unit=adapter-1
//! [shutdown-complete]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::subscribe::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
#[derive(Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::UnitRegistered => println!("[unit-registered] unit={:?}", e.unit),
            EventKind::UnitStarting => {
                println!(
                    "[unit-starting] unit={:?} timeout_ms={:?}",
                    e.unit, e.timeout_ms
                );
            }
            EventKind::UnitStarted => println!("[unit-started] unit={:?}", e.unit),
            EventKind::UnitStartFailed => {
                println!("[unit-start-failed] unit={:?} err={:?}", e.unit, e.reason);
            }
            EventKind::UnitClosed => println!("[unit-closed] unit={:?}", e.unit),
            EventKind::UnitCloseFailed => {
                println!("[unit-close-failed] unit={:?} err={:?}", e.unit, e.reason);
            }
            EventKind::UnitForceClosed => println!("[unit-force-closed] unit={:?}", e.unit),
            EventKind::UnitUnregistered => println!("[unit-unregistered] unit={:?}", e.unit),
            EventKind::ComponentInitialized => {
                println!("[component-initialized] component={:?}", e.component);
            }
            EventKind::ComponentStarted => {
                println!("[component-started] component={:?}", e.component);
            }
            EventKind::ComponentStopped => {
                println!("[component-stopped] component={:?}", e.component);
            }
            EventKind::ComponentDestroyed => {
                println!("[component-destroyed] component={:?}", e.component);
            }
            EventKind::ComponentFailed => {
                println!(
                    "[component-failed] component={:?} err={:?}",
                    e.component, e.reason
                );
            }
            EventKind::Heartbeat => println!("[heartbeat] component={:?}", e.component),
            EventKind::ShutdownRequested => println!("[shutdown-requested]"),
            EventKind::AllClosedWithin => println!("[all-closed-within-timeout]"),
            EventKind::GraceExceeded => {
                println!("[grace-exceeded] timeout_ms={:?}", e.timeout_ms);
            }
            EventKind::ShutdownComplete => println!("[shutdown-complete]"),
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={:?} info={:?}",
                    e.component, e.reason
                );
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={:?} reason={:?}",
                    e.component, e.reason
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

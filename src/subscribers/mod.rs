//! # Event subscribers for the bootvisor runtime.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out used to deliver lifecycle events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Orchestrator ── publish(Event) ──► Bus ──► subscriber_listener
//!                                                  │
//!                                                  ▼
//!                                           SubscriberSet::emit
//!                                        ┌────────┼────────┐
//!                                        ▼        ▼        ▼
//!                                    LogWriter  Metrics  Custom ...
//! ```
//!
//! ## Implementing custom subscribers
//! ```rust
//! use bootvisor::{Subscribe, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::UnitStartFailed {
//!             // increment failure counter
//!         }
//!     }
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;

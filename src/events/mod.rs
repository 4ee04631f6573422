//! Lifecycle events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by the orchestrator, the
//! component resolver, the shutdown coordinator, and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Orchestrator`, `ComponentResolver` fan-out,
//!   `ShutdownCoordinator` and its per-unit tasks, `SubscriberSet` workers
//!   (overflow/panic).
//! - **Consumers**: the orchestrator's subscriber listener (fans out to
//!   `SubscriberSet`).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};

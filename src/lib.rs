//! # bootvisor
//!
//! **Bootvisor** is a lifecycle-orchestration library for Rust.
//!
//! It boots a configured set of independently-managed runtime units
//! ("adapters") together with pluggable auxiliary management components, and
//! later tears them all down within a bounded time window, escalating to an
//! unconditional forced shutdown if graceful shutdown does not complete in
//! time. The crate is designed as a building block for long-running daemons
//! whose supervisors (systemd, Kubernetes, a watchdog) are themselves waiting
//! on the process to exit.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   Config ("components", "operation.timeout.ms", ...)
//!      │
//!      ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Orchestrator                                                     │
//! │  - Bus (broadcast lifecycle events)                               │
//! │  - Directory (addressable runtime units, UnitId → proxy)          │
//! │  - ComponentResolver (per-config cache of management components)  │
//! │  - SubscriberSet (fans out events to user subscribers)            │
//! └──────┬──────────────────────┬─────────────────────────┬───────────┘
//!        ▼                      ▼                         ▼
//! ┌──────────────┐      ┌───────────────┐         ┌───────────────┐
//! │ ManagedUnit  │      │ ManagedUnit   │   ...   │  Component    │
//! │ (via bus:    │      │ (in-process   │         │  init/start/  │
//! │  remote stub)│      │  object)      │         │  stop/destroy │
//! └──────────────┘      └───────────────┘         └───────────────┘
//!
//! Shutdown path (one-shot, two-phase):
//!   signal ─► ShutdownCoordinator::run()
//!     1. snapshot directory
//!     2. per unit: spawn task  lookup ─► request_close(t) ─► unregister
//!     3. wait all, bounded by t + jitter
//!     4. on timeout: per survivor  lookup ─► force_close() ─► unregister
//!        wait again, bounded by t, fully best-effort
//!     5. components stop + destroy (reverse declared order, swallow-all)
//! ```
//!
//! ### Lifecycle
//! ```text
//! create_unit() ─► init(unit?) ─► start() ─► [process runs] ─► shutdown
//!
//! start():
//!   ├─► components start (declared order, failures published, not fatal)
//!   └─► for each registered unit:
//!         request_start(op_timeout)
//!           ├─ Ok  ─► next unit
//!           └─ Err ─► request_close(op_timeout) on that unit (best effort)
//!                     unregister it
//!                     abort start() with BootError::StartupFailed
//! ```
//!
//! ## Features
//! | Area              | Description                                                         | Key types / traits                        |
//! |-------------------|---------------------------------------------------------------------|-------------------------------------------|
//! | **Orchestration** | Boot/teardown ordering across units and components.                 | [`Orchestrator`], [`OrchestratorBuilder`] |
//! | **Shutdown**      | Bounded two-phase coordinated shutdown with forced escalation.      | [`ShutdownCoordinator`], [`ShutdownHook`] |
//! | **Units**         | Management-bus verb set and the live directory.                     | [`ManagedUnit`], [`Directory`], [`UnitId`]|
//! | **Components**    | Pluggable auxiliary services with cached, ordered resolution.       | [`Component`], [`ComponentResolver`]      |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, custom subscribers).  | [`Subscribe`]                             |
//! | **Checks**        | Static config validation without starting units.                    | [`checks::ConfigCheck`]                   |
//! | **Errors**        | Typed errors for boot, bus calls, and component lifecycles.         | [`BootError`], [`UnitError`]              |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//! - `cli`: builds the thin `bootvisor` binary (config-check / management-only
//!   harness).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use async_trait::async_trait;
//! use bootvisor::{ManagedUnit, Orchestrator, UnitError, UnitId};
//!
//! struct Adapter {
//!     id: UnitId,
//! }
//!
//! #[async_trait]
//! impl ManagedUnit for Adapter {
//!     fn id(&self) -> &UnitId { &self.id }
//!
//!     async fn request_start(&self, _timeout: Duration) -> Result<(), UnitError> {
//!         Ok(())
//!     }
//!
//!     async fn request_close(&self, _timeout: Option<Duration>) -> Result<(), UnitError> {
//!         Ok(())
//!     }
//!
//!     async fn force_close(&self) -> Result<(), UnitError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orch = Orchestrator::builder(bootvisor::Config::default()).build();
//!
//!     let unit = Arc::new(Adapter { id: UnitId::from("adapter-1") });
//!     orch.init(Some(unit)).await?;
//!     orch.start().await?;
//!
//!     // ... process runs; on a termination signal:
//!     // orch.run_until_shutdown().await;
//!     let report = orch.shutdown_coordinator().run().await;
//!     assert!(!report.escalated);
//!     Ok(())
//! }
//! ```

pub mod checks;
pub mod components;
pub mod config;
mod core;
mod error;
pub mod events;
pub mod subscribers;
pub mod units;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{
    Orchestrator, OrchestratorBuilder, ShutdownCoordinator, ShutdownHook, ShutdownPhase,
    ShutdownReport,
};
pub use error::{BootError, ComponentError, UnitError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use units::{ConfigManager, ConfigSync, Directory, ManagedUnit, UnitId, UnitRef};
pub use components::{Component, ComponentFactory, ComponentRecord, ComponentResolver};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

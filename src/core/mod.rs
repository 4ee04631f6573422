//! Runtime core: lifecycle orchestration and coordinated shutdown.
//!
//! This module contains the embedded implementation of the bootvisor runtime.
//! The public API from this module is the [`Orchestrator`] (with its builder),
//! the [`ShutdownCoordinator`] it hands to the process-exit action, and the
//! [`ShutdownHook`] wrapper around that action.
//!
//! Internal modules:
//! - [`orchestrator`]: create/init/start/stop/close ordering with fail-fast
//!   startup;
//! - [`builder`]: wires bus, directory, resolver, and subscribers;
//! - [`shutdown`]: one-shot two-phase coordinated shutdown with a bounded
//!   barrier wait and forced escalation;
//! - [`hook`]: process-exit action, replace-on-reinstall, removable;
//! - [`signals`]: cross-platform termination-signal handling.

mod builder;
mod hook;
mod orchestrator;
mod shutdown;
mod signals;

pub use builder::OrchestratorBuilder;
pub use hook::ShutdownHook;
pub use orchestrator::Orchestrator;
pub use shutdown::{ShutdownCoordinator, ShutdownPhase, ShutdownReport};

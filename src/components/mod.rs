//! # Management components: abstraction, resolution, lifecycle fan-out.
//!
//! This module provides the auxiliary-component side of the runtime:
//! - [`Component`] - trait for pluggable management services
//! - [`ComponentState`] - the strictly ordered lifecycle
//! - [`ComponentRecord`] - metadata + live instance pairing
//! - [`ComponentResolver`] / [`ComponentFactory`] - name resolution with a
//!   per-configuration cache and ordered fan-out
//! - [`Heartbeat`] - built-in liveness component
//!
//! ## Quick wiring
//! ```text
//! Orchestrator::init ──► resolver.init_all(cfg)      (declared order)
//! Orchestrator::start ─► resolver.start_all(cfg)     (declared order)
//! Orchestrator::stop ──► resolver.stop_all(cfg, rev) (reverse order)
//! Coordinator teardown ► resolver.stop_all + close_all (reverse, swallowed)
//! ```

mod component;
mod heartbeat;
mod record;
mod resolver;

pub use component::{Component, ComponentRef, ComponentState};
pub use heartbeat::Heartbeat;
pub use record::ComponentRecord;
pub use resolver::{BuildFn, ComponentFactory, ComponentResolver};

use std::sync::Arc;

/// Factory table for the components shipped with this crate.
///
/// Embedders extend this with their own factories before handing the table to
/// the orchestrator builder.
pub fn builtin_factories() -> Vec<ComponentFactory> {
    vec![ComponentFactory::new(
        "heartbeat",
        "bootvisor::components::Heartbeat",
        |bus| Arc::new(Heartbeat::new(bus)),
    )]
}

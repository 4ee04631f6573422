//! # Management-component abstraction.
//!
//! This module defines the [`Component`] trait (async lifecycle, best-effort)
//! and [`ComponentState`], the strictly ordered lifecycle a component moves
//! through. The common handle type is [`ComponentRef`], an
//! `Arc<dyn Component>` suitable for sharing across the runtime.
//!
//! Management components are auxiliary services (monitoring, administration,
//! heartbeats) that boot alongside runtime units but are never required for
//! them: every lifecycle failure is caught at the fan-out layer.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::ComponentError;

/// Shared handle to a management component.
pub type ComponentRef = Arc<dyn Component>;

/// Lifecycle states of a management component.
///
/// Transitions are strictly ordered: init precedes start precedes stop
/// precedes destroy. The resolver skips out-of-order fan-out calls instead of
/// erroring, so repeated `init_all`/`stop_all` sweeps stay idempotent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentState {
    /// Created, not yet initialized.
    Uninitialized,
    /// `init` completed.
    Initialized,
    /// `start` completed.
    Started,
    /// `stop` completed.
    Stopped,
    /// `destroy` completed; terminal.
    Destroyed,
}

/// # Pluggable auxiliary service with its own lifecycle.
///
/// A `Component` has a stable [`name`](Component::name) and four async
/// lifecycle methods driven by the
/// [`ComponentResolver`](crate::components::ComponentResolver) in declared
/// order (reverse order for stop/destroy).
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use bootvisor::{Component, ComponentError, Config};
///
/// struct Audit;
///
/// #[async_trait]
/// impl Component for Audit {
///     fn name(&self) -> &str { "audit" }
///
///     async fn init(&self, _cfg: &Config) -> Result<(), ComponentError> { Ok(()) }
///     async fn start(&self) -> Result<(), ComponentError> { Ok(()) }
///     async fn stop(&self) -> Result<(), ComponentError> { Ok(()) }
///     async fn destroy(&self) -> Result<(), ComponentError> { Ok(()) }
/// }
/// ```
#[async_trait]
pub trait Component: Send + Sync + 'static {
    /// Returns a stable, human-readable component name.
    fn name(&self) -> &str;

    /// Prepares the component from configuration. Called once per instance.
    async fn init(&self, cfg: &Config) -> Result<(), ComponentError>;

    /// Activates the component.
    async fn start(&self) -> Result<(), ComponentError>;

    /// Deactivates the component; it may be destroyed afterwards.
    async fn stop(&self) -> Result<(), ComponentError>;

    /// Releases all resources. Terminal.
    async fn destroy(&self) -> Result<(), ComponentError>;
}

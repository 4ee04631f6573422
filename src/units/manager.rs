//! # External collaborators for unit creation.
//!
//! The orchestrator does not know how to build a runtime unit from
//! configuration; that is the job of an external config manager, consumed
//! through the narrow traits below.
//!
//! ## Contract
//! - [`ConfigManager::create_unit`] builds (or refreshes) a unit from the
//!   bootstrap configuration. The returned proxy is **not yet registered**;
//!   the orchestrator registers it during `init`.
//! - [`ConfigSync::pull_latest`] refreshes the local configuration from an
//!   upstream source before creation. Its failure aborts unit creation
//!   (propagated, not swallowed).

use async_trait::async_trait;

use crate::config::Config;
use crate::error::BootError;
use crate::units::unit::UnitRef;

/// Builds runtime units from configuration.
#[async_trait]
pub trait ConfigManager: Send + Sync + 'static {
    /// Builds or refreshes a unit from `cfg`.
    async fn create_unit(&self, cfg: &Config) -> Result<UnitRef, BootError>;
}

/// Optional "pull latest configuration" collaborator, invoked before unit
/// creation when present.
#[async_trait]
pub trait ConfigSync: Send + Sync + 'static {
    /// Refreshes local configuration from upstream.
    async fn pull_latest(&self, cfg: &Config) -> Result<(), BootError>;
}

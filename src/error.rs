//! Error types used by the bootvisor runtime.
//!
//! This module defines the error surface of the orchestration core:
//!
//! - [`BootError`] — fatal errors raised while resolving configuration or
//!   booting runtime units. These abort the boot sequence (fail fast).
//! - [`UnitError`] — failures of individual management-bus calls against a
//!   runtime unit.
//! - [`ComponentError`] — failures of a management-component lifecycle call.
//!   These are always caught at the fan-out layer and never propagate.
//!
//! [`BootError`] and [`UnitError`] provide helper methods (`as_label`,
//! `as_message`) for logging/metrics.

use std::time::Duration;
use thiserror::Error;

use crate::units::UnitId;

/// # Errors raised while booting the runtime.
///
/// These are fail-fast errors: any of them aborts the boot sequence and
/// propagates to the process entry point (unless start-quietly mode is
/// configured, in which case the entry point logs and continues degraded).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BootError {
    /// A configured name or value could not be resolved; boot cannot proceed.
    #[error("configuration error: {reason}")]
    Configuration {
        /// What failed to resolve and why.
        reason: String,
    },

    /// The external "pull latest configuration" collaborator failed;
    /// unit creation is aborted.
    #[error("configuration sync failed: {reason}")]
    SyncFailed {
        /// The underlying failure message.
        reason: String,
    },

    /// A runtime unit failed `request_start`.
    ///
    /// The orchestrator has already issued a best-effort close for this unit
    /// and removed it from the directory before raising this error.
    #[error("unit '{unit}' failed to start")]
    StartupFailed {
        /// The unit that failed to start.
        unit: UnitId,
        /// The management-bus failure that caused the abort.
        #[source]
        source: UnitError,
    },
}

impl BootError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BootError::Configuration { .. } => "boot_configuration",
            BootError::SyncFailed { .. } => "boot_sync_failed",
            BootError::StartupFailed { .. } => "boot_startup_failed",
        }
    }

    /// Returns a human-readable message including the cause, if any.
    pub fn as_message(&self) -> String {
        match self {
            BootError::Configuration { reason } => format!("configuration: {reason}"),
            BootError::SyncFailed { reason } => format!("config sync: {reason}"),
            BootError::StartupFailed { unit, source } => {
                format!("unit '{unit}' failed to start: {source}")
            }
        }
    }
}

/// # Errors produced by management-bus calls against a runtime unit.
///
/// Every call into a unit is a blocking, timeout-bounded remote-style
/// invocation; these variants classify how such a call can fail.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum UnitError {
    /// The call did not complete within its operation timeout.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout that was exceeded.
        timeout: Duration,
    },

    /// The management bus could not deliver the call.
    #[error("management bus failure: {reason}")]
    Bus {
        /// The underlying transport/lookup failure.
        reason: String,
    },

    /// The unit received the call and refused it.
    #[error("request rejected: {reason}")]
    Rejected {
        /// The unit's refusal message.
        reason: String,
    },
}

impl UnitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            UnitError::Timeout { .. } => "unit_timeout",
            UnitError::Bus { .. } => "unit_bus_failure",
            UnitError::Rejected { .. } => "unit_rejected",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            UnitError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            UnitError::Bus { reason } => format!("bus: {reason}"),
            UnitError::Rejected { reason } => format!("rejected: {reason}"),
        }
    }
}

/// Failure of a single management-component lifecycle call.
///
/// Auxiliary components are best-effort: the resolver's fan-out catches every
/// `ComponentError`, publishes it to the event bus, and continues the loop.
#[derive(Error, Debug)]
#[error("component failure: {0}")]
pub struct ComponentError(pub String);

impl ComponentError {
    /// Convenience constructor from anything displayable.
    pub fn new(reason: impl std::fmt::Display) -> Self {
        Self(reason.to_string())
    }
}

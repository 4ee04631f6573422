//! # Runtime-unit abstraction and the management-bus verb set.
//!
//! This module defines [`UnitId`] (the opaque, addressable identifier of a
//! runtime unit) and the [`ManagedUnit`] trait, the explicit interface through
//! which the orchestration core drives a unit.
//!
//! A unit is never held as a direct in-process reference by the orchestration
//! logic; it is looked up in the [`Directory`](crate::units::Directory) per
//! call and driven through the verbs below. Implementations may be in-process
//! objects or remote-call stubs — the orchestration core is agnostic, provided
//! timeout semantics are preserved.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::UnitError;

/// Opaque, addressable identifier of a runtime unit.
///
/// Cheap to clone and hash; the only thing orchestration code ever stores
/// about a unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(Arc<str>);

impl UnitId {
    /// Creates an identifier from any string-like value.
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(Arc::from(id.into().as_ref()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

/// Shared handle to a unit proxy.
pub type UnitRef = Arc<dyn ManagedUnit>;

/// # The management-bus capability set of a runtime unit.
///
/// Every method is a blocking, remote-style invocation and must be treated as
/// blocking I/O — never call it on a latency-sensitive path. Where a timeout
/// is passed, the implementation is responsible for honoring it; the
/// orchestration core bounds its *overall* waits separately.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use async_trait::async_trait;
/// use bootvisor::{ManagedUnit, UnitError, UnitId};
///
/// struct Echo {
///     id: UnitId,
/// }
///
/// #[async_trait]
/// impl ManagedUnit for Echo {
///     fn id(&self) -> &UnitId { &self.id }
///
///     async fn request_start(&self, _timeout: Duration) -> Result<(), UnitError> {
///         Ok(())
///     }
///
///     async fn request_close(&self, _timeout: Option<Duration>) -> Result<(), UnitError> {
///         Ok(())
///     }
///
///     async fn force_close(&self) -> Result<(), UnitError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ManagedUnit: Send + Sync + 'static {
    /// Returns the stable identifier this unit is addressed by.
    fn id(&self) -> &UnitId;

    /// Starts the unit, waiting at most `timeout` for acknowledgement.
    async fn request_start(&self, timeout: Duration) -> Result<(), UnitError>;

    /// Gracefully closes the unit, letting it drain in-flight work.
    ///
    /// `Some(timeout)` bounds the grace period; `None` waits for the unit's
    /// own notion of completion.
    async fn request_close(&self, timeout: Option<Duration>) -> Result<(), UnitError>;

    /// Unconditionally terminates the unit. No grace period.
    async fn force_close(&self) -> Result<(), UnitError>;
}

impl fmt::Debug for dyn ManagedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedUnit").field("id", self.id()).finish()
    }
}

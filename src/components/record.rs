//! # Component record: metadata plus live instance.
//!
//! [`ComponentRecord`] pairs a resolved component's metadata (name, class
//! identifier, optional isolation context, current state) with the live
//! instance, so callers can report on components without being handed the
//! instance itself.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::components::component::{ComponentRef, ComponentState};

/// Lifecycle operations the resolver fans out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LifecycleOp {
    Init,
    Start,
    Stop,
    Destroy,
}

/// Metadata and live instance of one resolved management component.
///
/// The record owns the authoritative [`ComponentState`]; the state only
/// advances when the corresponding lifecycle call succeeds, so a failed call
/// leaves the component where it was.
pub struct ComponentRecord {
    name: Arc<str>,
    class_id: Arc<str>,
    context: Option<Arc<str>>,
    state: Mutex<ComponentState>,
    instance: ComponentRef,
}

impl fmt::Debug for ComponentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRecord")
            .field("name", &self.name)
            .field("class_id", &self.class_id)
            .field("context", &self.context)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl ComponentRecord {
    pub(crate) fn new(
        name: &str,
        class_id: &str,
        context: Option<&str>,
        instance: ComponentRef,
    ) -> Self {
        Self {
            name: Arc::from(name),
            class_id: Arc::from(class_id),
            context: context.map(Arc::from),
            state: Mutex::new(ComponentState::Uninitialized),
            instance,
        }
    }

    /// The configured name this component was resolved under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fully-qualified class identifier of the implementation.
    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    /// The non-default loading/isolation context, if the factory declared one.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ComponentState {
        *self.state.lock().expect("component state lock poisoned")
    }

    pub(crate) fn instance(&self) -> &ComponentRef {
        &self.instance
    }

    /// Returns true if `op` is in order from the current state.
    ///
    /// Destroy is additionally allowed from `Initialized` so components that
    /// were never started can still be torn down.
    pub(crate) fn accepts(&self, op: LifecycleOp) -> bool {
        let state = self.state();
        matches!(
            (state, op),
            (ComponentState::Uninitialized, LifecycleOp::Init)
                | (ComponentState::Initialized, LifecycleOp::Start)
                | (ComponentState::Started, LifecycleOp::Stop)
                | (ComponentState::Stopped, LifecycleOp::Destroy)
                | (ComponentState::Initialized, LifecycleOp::Destroy)
        )
    }

    /// Advances the state after a successful lifecycle call.
    pub(crate) fn commit(&self, op: LifecycleOp) {
        let next = match op {
            LifecycleOp::Init => ComponentState::Initialized,
            LifecycleOp::Start => ComponentState::Started,
            LifecycleOp::Stop => ComponentState::Stopped,
            LifecycleOp::Destroy => ComponentState::Destroyed,
        };
        *self.state.lock().expect("component state lock poisoned") = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ComponentError;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Noop;

    #[async_trait]
    impl crate::components::Component for Noop {
        fn name(&self) -> &str {
            "noop"
        }
        async fn init(&self, _cfg: &Config) -> Result<(), ComponentError> {
            Ok(())
        }
        async fn start(&self) -> Result<(), ComponentError> {
            Ok(())
        }
        async fn stop(&self) -> Result<(), ComponentError> {
            Ok(())
        }
        async fn destroy(&self) -> Result<(), ComponentError> {
            Ok(())
        }
    }

    fn record() -> ComponentRecord {
        ComponentRecord::new("noop", "bootvisor::Noop", None, Arc::new(Noop))
    }

    #[test]
    fn test_ordered_transitions() {
        let rec = record();
        assert!(rec.accepts(LifecycleOp::Init));
        assert!(!rec.accepts(LifecycleOp::Start));

        rec.commit(LifecycleOp::Init);
        assert!(rec.accepts(LifecycleOp::Start));
        assert!(!rec.accepts(LifecycleOp::Init));
        assert!(!rec.accepts(LifecycleOp::Stop));

        rec.commit(LifecycleOp::Start);
        assert!(rec.accepts(LifecycleOp::Stop));

        rec.commit(LifecycleOp::Stop);
        assert!(rec.accepts(LifecycleOp::Destroy));

        rec.commit(LifecycleOp::Destroy);
        assert_eq!(rec.state(), ComponentState::Destroyed);
        assert!(!rec.accepts(LifecycleOp::Init));
    }

    #[test]
    fn test_destroy_allowed_from_initialized() {
        let rec = record();
        rec.commit(LifecycleOp::Init);
        assert!(rec.accepts(LifecycleOp::Destroy));
    }
}

//! Builder for constructing an [`Orchestrator`] with optional collaborators.

use std::sync::Arc;

use crate::components::{builtin_factories, ComponentFactory, ComponentResolver};
use crate::config::Config;
use crate::core::orchestrator::Orchestrator;
use crate::events::Bus;
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::units::{ConfigManager, ConfigSync, Directory};

/// Builder for constructing an Orchestrator with optional collaborators.
pub struct OrchestratorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    factories: Vec<ComponentFactory>,
    manager: Option<Arc<dyn ConfigManager>>,
    sync: Option<Arc<dyn ConfigSync>>,
}

impl OrchestratorBuilder {
    /// Creates a new builder with the given configuration.
    ///
    /// Starts from the built-in component factory table; add embedder
    /// factories with [`OrchestratorBuilder::with_factories`].
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            factories: builtin_factories(),
            manager: None,
            sync: None,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive lifecycle events (unit start/close, component
    /// transitions, shutdown phases) through dedicated workers with bounded
    /// queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Registers additional component factories (appended after the built-in
    /// table, so embedder short names must not collide with built-ins).
    pub fn with_factories(mut self, factories: Vec<ComponentFactory>) -> Self {
        self.factories.extend(factories);
        self
    }

    /// Wires the external config manager that builds runtime units.
    pub fn with_config_manager(mut self, manager: Arc<dyn ConfigManager>) -> Self {
        self.manager = Some(manager);
        self
    }

    /// Wires the optional "pull latest configuration" collaborator.
    pub fn with_config_sync(mut self, sync: Arc<dyn ConfigSync>) -> Self {
        self.sync = Some(sync);
        self
    }

    /// Builds and returns the Orchestrator instance.
    ///
    /// This consumes the builder and initializes all runtime pieces:
    /// - Event bus for broadcasting
    /// - Directory of addressable units
    /// - Component resolver over the factory table
    /// - Subscriber workers and the bus→subscriber listener
    pub fn build(self) -> Arc<Orchestrator> {
        let bus = Bus::new(self.cfg.bus_capacity());
        let directory = Arc::new(Directory::new());
        let resolver = Arc::new(ComponentResolver::new(bus.clone(), self.factories));
        let subs = Arc::new(SubscriberSet::new(self.subscribers));

        // Bridge bus → subscriber fan-out (fire-and-forget).
        let mut rx = bus.subscribe();
        let set = Arc::clone(&subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev);
            }
        });

        Arc::new(Orchestrator::new_internal(
            self.cfg,
            bus,
            directory,
            resolver,
            subs,
            self.manager,
            self.sync,
        ))
    }
}

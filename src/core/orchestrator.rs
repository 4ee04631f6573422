//! # Orchestrator: drives unit and component lifecycles in well-defined order.
//!
//! The [`Orchestrator`] owns the event bus, a [`SubscriberSet`], the unit
//! [`Directory`], and the [`ComponentResolver`]. It boots runtime units
//! together with the configured management components and tears both down.
//!
//! ## Lifecycle ordering
//! ```text
//! Boot:
//!   create_unit()  pull latest config (optional) ─► ConfigManager::create_unit
//!   init(unit?)    register unit (if any) ─► components init   (declared order)
//!   start()        components start (declared order, best-effort)
//!                  ─► request_start on every registered unit   (fail fast)
//!
//! Teardown:
//!   stop()         units request_close ─► components stop      (reverse order)
//!   close()        units request_close + unregister ─► components destroy (reverse)
//! ```
//!
//! ## Failure semantics
//! - Startup failures abort the boot sequence (fail fast). A unit that fails
//!   `request_start` is closed and unregistered **before** the failure
//!   propagates, so no partially-started unit remains reachable; the other
//!   units keep running.
//! - Management-component start failures are published, never fatal.
//! - `stop()`/`close()` catch and publish every failure so teardown completes
//!   unconditionally.

use std::sync::{Arc, Mutex};

use crate::components::ComponentResolver;
use crate::config::Config;
use crate::core::hook::ShutdownHook;
use crate::core::shutdown::ShutdownCoordinator;
use crate::error::BootError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::SubscriberSet;
use crate::units::{ConfigManager, ConfigSync, Directory, UnitId, UnitRef};

/// Coordinates runtime-unit and management-component lifecycles.
///
/// Built via [`Orchestrator::builder`]. All state is explicit and owned here;
/// there is no process-wide singleton, so several orchestrators (and hence
/// configurations) can coexist in one process.
pub struct Orchestrator {
    /// Bootstrap configuration.
    pub cfg: Config,
    /// Event bus shared with components and shutdown tasks.
    pub bus: Bus,
    directory: Arc<Directory>,
    resolver: Arc<ComponentResolver>,
    subs: Arc<SubscriberSet>,
    manager: Option<Arc<dyn ConfigManager>>,
    sync: Option<Arc<dyn ConfigSync>>,
    hook: Mutex<Option<ShutdownHook>>,
}

impl Orchestrator {
    /// Starts building an orchestrator for the given configuration.
    pub fn builder(cfg: Config) -> super::builder::OrchestratorBuilder {
        super::builder::OrchestratorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        directory: Arc<Directory>,
        resolver: Arc<ComponentResolver>,
        subs: Arc<SubscriberSet>,
        manager: Option<Arc<dyn ConfigManager>>,
        sync: Option<Arc<dyn ConfigSync>>,
    ) -> Self {
        Self {
            cfg,
            bus,
            directory,
            resolver,
            subs,
            manager,
            sync,
            hook: Mutex::new(None),
        }
    }

    /// The live set of addressable units.
    pub fn directory(&self) -> &Arc<Directory> {
        &self.directory
    }

    /// The component resolver owned by this boot context.
    pub fn resolver(&self) -> &Arc<ComponentResolver> {
        &self.resolver
    }

    /// Builds a runtime unit from configuration via the external config
    /// manager.
    ///
    /// When a [`ConfigSync`] collaborator is wired, its `pull_latest` runs
    /// first and its failure aborts creation. The returned unit is not yet
    /// registered; pass it to [`Orchestrator::init`].
    pub async fn create_unit(&self) -> Result<UnitRef, BootError> {
        let manager = self
            .manager
            .as_ref()
            .ok_or_else(|| BootError::Configuration {
                reason: "no config manager wired; cannot create a runtime unit".into(),
            })?;

        if let Some(sync) = &self.sync {
            sync.pull_latest(&self.cfg).await?;
        }
        manager.create_unit(&self.cfg).await
    }

    /// Initializes the boot context.
    ///
    /// With a unit, registers it in the directory (making it addressable
    /// through the management bus). Always resolves — or reuses — the
    /// management-component list and inits each component in declared order.
    ///
    /// `None` signals a management-only boot: no runtime unit, only auxiliary
    /// components, used when the unit could not be created but monitoring and
    /// administration should still come up.
    pub async fn init(&self, unit: Option<UnitRef>) -> Result<(), BootError> {
        if let Some(unit) = unit {
            let id = unit.id().clone();
            if !self.directory.register(unit).await {
                return Err(BootError::Configuration {
                    reason: format!("unit '{id}' is already registered"),
                });
            }
            self.bus
                .publish(Event::new(EventKind::UnitRegistered).with_unit(id.as_str()));
        }
        self.resolver.init_all(&self.cfg, false).await
    }

    /// Starts management components, then every registered runtime unit.
    ///
    /// Component start failures are published and skipped. A unit start
    /// failure aborts the whole call: the failing unit gets one bounded
    /// best-effort close, is unregistered, and the error propagates.
    pub async fn start(&self) -> Result<(), BootError> {
        self.resolver.start_all(&self.cfg, false).await?;

        let timeout = self.cfg.operation_timeout();
        for id in self.directory.list_units().await {
            let Some(unit) = self.directory.lookup(&id).await else {
                continue;
            };
            self.bus.publish(
                Event::new(EventKind::UnitStarting)
                    .with_unit(id.as_str())
                    .with_timeout(timeout),
            );

            match unit.request_start(timeout).await {
                Ok(()) => {
                    self.bus
                        .publish(Event::new(EventKind::UnitStarted).with_unit(id.as_str()));
                }
                Err(e) => {
                    self.bus.publish(
                        Event::new(EventKind::UnitStartFailed)
                            .with_unit(id.as_str())
                            .with_reason(e.to_string()),
                    );

                    // The half-started unit must not stay reachable: one
                    // bounded close, then removal, then the failure aborts
                    // the whole start sequence.
                    if let Err(close_err) = unit.request_close(Some(timeout)).await {
                        self.bus.publish(
                            Event::new(EventKind::UnitCloseFailed)
                                .with_unit(id.as_str())
                                .with_reason(close_err.to_string()),
                        );
                    }
                    self.directory.unregister(&id).await;
                    self.bus
                        .publish(Event::new(EventKind::UnitUnregistered).with_unit(id.as_str()));

                    return Err(BootError::StartupFailed {
                        unit: id,
                        source: e,
                    });
                }
            }
        }
        Ok(())
    }

    /// Stops all runtime units, then management components in reverse
    /// declared order. Never propagates: every failure is published.
    pub async fn stop(&self) {
        for id in self.directory.list_units().await {
            let Some(unit) = self.directory.lookup(&id).await else {
                continue;
            };
            match unit.request_close(None).await {
                Ok(()) => {
                    self.bus
                        .publish(Event::new(EventKind::UnitClosed).with_unit(id.as_str()));
                }
                Err(e) => {
                    self.bus.publish(
                        Event::new(EventKind::UnitCloseFailed)
                            .with_unit(id.as_str())
                            .with_reason(e.to_string()),
                    );
                }
            }
        }
        self.resolver.stop_all(&self.cfg, true).await;
    }

    /// Closes and unregisters all runtime units, then destroys management
    /// components in reverse declared order. Never propagates.
    pub async fn close(&self) {
        let timeout = self.cfg.operation_timeout();
        for id in self.directory.list_units().await {
            if let Some(unit) = self.directory.lookup(&id).await {
                match unit.request_close(Some(timeout)).await {
                    Ok(()) => {
                        self.bus
                            .publish(Event::new(EventKind::UnitClosed).with_unit(id.as_str()));
                    }
                    Err(e) => {
                        self.bus.publish(
                            Event::new(EventKind::UnitCloseFailed)
                                .with_unit(id.as_str())
                                .with_reason(e.to_string()),
                        );
                    }
                }
            }
            if self.directory.unregister(&id).await.is_some() {
                self.bus
                    .publish(Event::new(EventKind::UnitUnregistered).with_unit(id.as_str()));
            }
        }
        self.resolver.close_all(&self.cfg, true).await;
    }

    /// Blocks until a termination signal arrives, then runs the coordinated
    /// shutdown and returns its report.
    ///
    /// Convenience driver for binaries that own their process lifetime; the
    /// equivalent for embedders is [`Orchestrator::install_shutdown_hook`].
    pub async fn run_until_shutdown(&self) -> crate::core::ShutdownReport {
        let coordinator = self.shutdown_coordinator();
        let _ = crate::core::signals::wait_for_shutdown_signal().await;
        coordinator.run().await
    }

    /// Builds a shutdown coordinator over this orchestrator's directory,
    /// resolver, and configuration.
    pub fn shutdown_coordinator(&self) -> ShutdownCoordinator {
        ShutdownCoordinator::new(
            self.cfg.clone(),
            Arc::clone(&self.directory),
            Arc::clone(&self.resolver),
            self.bus.clone(),
        )
    }

    /// Registers the coordinated shutdown as the process-exit action.
    ///
    /// One action per orchestrator instance: installing again replaces (and
    /// disarms) the previous one. See [`Orchestrator::remove_shutdown_hook`].
    pub fn install_shutdown_hook(&self) {
        let coordinator = Arc::new(self.shutdown_coordinator());
        let hook = ShutdownHook::install(coordinator);
        let mut slot = self.hook.lock().expect("shutdown hook lock poisoned");
        if let Some(old) = slot.replace(hook) {
            old.remove();
        }
    }

    /// Disarms the installed process-exit action, if any.
    pub fn remove_shutdown_hook(&self) {
        let mut slot = self.hook.lock().expect("shutdown hook lock poisoned");
        if let Some(hook) = slot.take() {
            hook.remove();
        }
    }

    /// Number of subscribers receiving lifecycle events.
    pub fn subscriber_count(&self) -> usize {
        self.subs.len()
    }
}

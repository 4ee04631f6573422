//! # Component resolver: name resolution, per-config cache, lifecycle fan-out.
//!
//! The resolver turns a configured colon-separated component list into an
//! ordered list of [`ComponentRecord`]s and drives lifecycle calls across it.
//!
//! ## Architecture
//! ```text
//! Config("components" = "x:y:z")
//!         │ resolve()
//!         ▼
//!   [factory table] ── short name? ── class identifier? ── neither → fatal
//!         │
//!         ▼
//!   Arc<Vec<ComponentRecord>>  ── cached per Config::identity()
//!         │
//!         ├─► init_all / start_all        (declared order)
//!         └─► stop_all / close_all        (reverse order)
//! ```
//!
//! ## Rules
//! - A component instance is created **at most once** per configuration
//!   identity; repeated `resolve` returns the identity-equal cached list.
//! - The cache insert is double-checked under the write lock, so racing
//!   resolvers cannot instantiate twice.
//! - Fan-out is best-effort: every per-component failure is published to the
//!   bus and the loop continues.
//! - Out-of-order lifecycle calls (e.g. `start` before `init`) are skipped.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::components::component::ComponentRef;
use crate::components::record::{ComponentRecord, LifecycleOp};
use crate::config::Config;
use crate::error::BootError;
use crate::events::{Bus, Event, EventKind};

/// Component constructor. Receives the event bus so components can publish.
pub type BuildFn = Box<dyn Fn(Bus) -> ComponentRef + Send + Sync>;

/// Registration entry mapping a short name and a fully-qualified class
/// identifier to a constructor.
///
/// A factory may declare a non-default loading/isolation `context`; it is
/// used at instantiation time and remembered in the resulting record.
pub struct ComponentFactory {
    /// Short name components are usually configured by.
    pub short_name: &'static str,
    /// Fully-qualified class identifier (also resolvable directly).
    pub class_id: &'static str,
    /// Optional non-default loading/isolation context label.
    pub context: Option<&'static str>,
    /// Constructor invoked once per configuration identity.
    pub build: BuildFn,
}

impl ComponentFactory {
    /// Convenience constructor for a context-free factory.
    pub fn new(
        short_name: &'static str,
        class_id: &'static str,
        build: impl Fn(Bus) -> ComponentRef + Send + Sync + 'static,
    ) -> Self {
        Self {
            short_name,
            class_id,
            context: None,
            build: Box::new(build),
        }
    }

    /// Declares a non-default loading/isolation context for this factory.
    pub fn with_context(mut self, context: &'static str) -> Self {
        self.context = Some(context);
        self
    }
}

/// Resolves configured component lists and drives lifecycle fan-out.
///
/// Owned by the orchestrator (one per boot context); there is no process-wide
/// singleton, so tests can run several configurations side by side.
pub struct ComponentResolver {
    factories: Vec<ComponentFactory>,
    bus: Bus,
    cache: RwLock<HashMap<u64, Arc<Vec<ComponentRecord>>>>,
}

impl ComponentResolver {
    /// Creates a resolver over the given factory table.
    pub fn new(bus: Bus, factories: Vec<ComponentFactory>) -> Self {
        Self {
            factories,
            bus,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns true if `name` resolves to a registered factory, by short name
    /// or class identifier. Never instantiates.
    pub fn can_resolve(&self, name: &str) -> bool {
        self.find_factory(name).is_some()
    }

    /// Resolves the configured component list into an ordered record list.
    ///
    /// Resolution order matches declaration order. Each name is tried as a
    /// short name first, then as a fully-qualified class identifier; if
    /// neither matches, this is a fatal configuration error.
    ///
    /// The result is cached per configuration identity: a second call with
    /// the same identity returns the identical `Arc` without re-instantiation.
    pub async fn resolve(&self, cfg: &Config) -> Result<Arc<Vec<ComponentRecord>>, BootError> {
        if let Some(list) = self.cache.read().await.get(&cfg.identity()) {
            return Ok(Arc::clone(list));
        }

        let mut cache = self.cache.write().await;
        // Re-check under the write lock: another resolver may have won.
        if let Some(list) = cache.get(&cfg.identity()) {
            return Ok(Arc::clone(list));
        }

        let mut records = Vec::new();
        for name in cfg.component_list() {
            let factory =
                self.find_factory(&name)
                    .ok_or_else(|| BootError::Configuration {
                        reason: format!("unknown management component '{name}'"),
                    })?;
            let instance = (factory.build)(self.bus.clone());
            records.push(ComponentRecord::new(
                &name,
                factory.class_id,
                factory.context,
                instance,
            ));
        }

        let list = Arc::new(records);
        cache.insert(cfg.identity(), Arc::clone(&list));
        Ok(list)
    }

    /// Returns the cached record list for `cfg`, if it was resolved already.
    pub async fn resolved(&self, cfg: &Config) -> Option<Arc<Vec<ComponentRecord>>> {
        self.cache.read().await.get(&cfg.identity()).cloned()
    }

    /// Initializes every resolved component, walking declaration order
    /// (reverse when `reverse` is set). Resolution failure is fatal;
    /// per-component init failures are not.
    pub async fn init_all(&self, cfg: &Config, reverse: bool) -> Result<(), BootError> {
        let list = self.resolve(cfg).await?;
        self.fan_out(&list, LifecycleOp::Init, cfg, reverse).await;
        Ok(())
    }

    /// Starts every resolved component. Same ordering and failure rules as
    /// [`ComponentResolver::init_all`].
    pub async fn start_all(&self, cfg: &Config, reverse: bool) -> Result<(), BootError> {
        let list = self.resolve(cfg).await?;
        self.fan_out(&list, LifecycleOp::Start, cfg, reverse).await;
        Ok(())
    }

    /// Stops every cached component. Infallible by design: if nothing was
    /// resolved for `cfg` there is nothing to stop, and per-component
    /// failures are published and swallowed.
    pub async fn stop_all(&self, cfg: &Config, reverse: bool) {
        if let Some(list) = self.resolved(cfg).await {
            self.fan_out(&list, LifecycleOp::Stop, cfg, reverse).await;
        }
    }

    /// Destroys every cached component. Same rules as
    /// [`ComponentResolver::stop_all`].
    pub async fn close_all(&self, cfg: &Config, reverse: bool) {
        if let Some(list) = self.resolved(cfg).await {
            self.fan_out(&list, LifecycleOp::Destroy, cfg, reverse).await;
        }
    }

    fn find_factory(&self, name: &str) -> Option<&ComponentFactory> {
        self.factories
            .iter()
            .find(|f| f.short_name == name)
            .or_else(|| self.factories.iter().find(|f| f.class_id == name))
    }

    /// Walks the list applying `op` to each record, best-effort.
    async fn fan_out(
        &self,
        list: &Arc<Vec<ComponentRecord>>,
        op: LifecycleOp,
        cfg: &Config,
        reverse: bool,
    ) {
        let indices: Vec<usize> = if reverse {
            (0..list.len()).rev().collect()
        } else {
            (0..list.len()).collect()
        };
        for i in indices {
            self.apply(&list[i], op, cfg).await;
        }
    }

    /// Applies one lifecycle call, publishing the outcome. Out-of-order calls
    /// are skipped; failures leave the component state unchanged.
    async fn apply(&self, rec: &ComponentRecord, op: LifecycleOp, cfg: &Config) {
        if !rec.accepts(op) {
            return;
        }

        let result = match op {
            LifecycleOp::Init => rec.instance().init(cfg).await,
            LifecycleOp::Start => rec.instance().start().await,
            LifecycleOp::Stop => rec.instance().stop().await,
            LifecycleOp::Destroy => rec.instance().destroy().await,
        };

        match result {
            Ok(()) => {
                rec.commit(op);
                let kind = match op {
                    LifecycleOp::Init => EventKind::ComponentInitialized,
                    LifecycleOp::Start => EventKind::ComponentStarted,
                    LifecycleOp::Stop => EventKind::ComponentStopped,
                    LifecycleOp::Destroy => EventKind::ComponentDestroyed,
                };
                self.bus.publish(Event::new(kind).with_component(rec.name()));
            }
            Err(e) => {
                self.bus.publish(
                    Event::new(EventKind::ComponentFailed)
                        .with_component(rec.name())
                        .with_reason(e.to_string()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;
    use crate::error::ComponentError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
    use std::sync::Mutex;

    /// Per-test call journal shared between probe components.
    type Journal = Arc<Mutex<Vec<String>>>;

    struct Probe {
        name: &'static str,
        fail_start: bool,
        journal: Journal,
    }

    impl Probe {
        fn log(&self, op: &str) {
            self.journal
                .lock()
                .unwrap()
                .push(format!("{}:{op}", self.name));
        }
    }

    #[async_trait]
    impl Component for Probe {
        fn name(&self) -> &str {
            self.name
        }
        async fn init(&self, _cfg: &Config) -> Result<(), ComponentError> {
            self.log("init");
            Ok(())
        }
        async fn start(&self) -> Result<(), ComponentError> {
            if self.fail_start {
                return Err(ComponentError::new("start refused"));
            }
            self.log("start");
            Ok(())
        }
        async fn stop(&self) -> Result<(), ComponentError> {
            self.log("stop");
            Ok(())
        }
        async fn destroy(&self) -> Result<(), ComponentError> {
            self.log("destroy");
            Ok(())
        }
    }

    struct Fixture {
        resolver: ComponentResolver,
        journal: Journal,
        builds: Arc<AtomicU64>,
    }

    fn fixture() -> Fixture {
        let journal: Journal = Arc::new(Mutex::new(Vec::new()));
        let builds = Arc::new(AtomicU64::new(0));

        let probe = |name: &'static str, fail_start: bool| {
            let journal = Arc::clone(&journal);
            let builds = Arc::clone(&builds);
            move |_bus: Bus| -> ComponentRef {
                builds.fetch_add(1, AtomicOrdering::SeqCst);
                Arc::new(Probe {
                    name,
                    fail_start,
                    journal: Arc::clone(&journal),
                })
            }
        };

        let factories = vec![
            ComponentFactory::new("x", "tests::X", probe("x", false)),
            ComponentFactory::new("y", "tests::Y", probe("y", false)).with_context("isolated"),
            ComponentFactory::new("z", "tests::Z", probe("z", false)),
            ComponentFactory::new("bad", "tests::Bad", probe("bad", true)),
        ];

        Fixture {
            resolver: ComponentResolver::new(Bus::new(64), factories),
            journal,
            builds,
        }
    }

    impl Fixture {
        fn journal(&self) -> Vec<String> {
            self.journal.lock().unwrap().clone()
        }

        fn clear(&self) {
            self.journal.lock().unwrap().clear();
        }
    }

    fn cfg(components: &str) -> Config {
        Config::from_map(
            [("components".to_string(), components.to_string())]
                .into_iter()
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_resolve_order_matches_declaration() {
        let f = fixture();
        let list = f.resolver.resolve(&cfg("x:y:z")).await.unwrap();
        let names: Vec<&str> = list.iter().map(|rec| rec.name()).collect();
        assert_eq!(names, vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn test_resolve_by_class_identifier() {
        let f = fixture();
        let list = f.resolver.resolve(&cfg("tests::Y")).await.unwrap();
        assert_eq!(list[0].class_id(), "tests::Y");
        assert_eq!(list[0].context(), Some("isolated"));
    }

    #[tokio::test]
    async fn test_unknown_name_is_fatal() {
        let f = fixture();
        let err = f.resolver.resolve(&cfg("x:nope")).await.unwrap_err();
        assert_eq!(err.as_label(), "boot_configuration");
    }

    #[tokio::test]
    async fn test_resolve_twice_same_identity_returns_cached_list() {
        let f = fixture();
        let c = cfg("x:y");
        let first = f.resolver.resolve(&c).await.unwrap();
        let second = f.resolver.resolve(&c).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(f.builds.load(AtomicOrdering::SeqCst), 2);

        // A clone shares the identity, so it reuses the cache too.
        let third = f.resolver.resolve(&c.clone()).await.unwrap();
        assert!(Arc::ptr_eq(&first, &third));
        assert_eq!(f.builds.load(AtomicOrdering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_distinct_identity_resolves_independently() {
        let f = fixture();
        let first = f.resolver.resolve(&cfg("x")).await.unwrap();
        let second = f.resolver.resolve(&cfg("x")).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(f.builds.load(AtomicOrdering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_init_order_and_reverse_destroy_order() {
        let f = fixture();
        let c = cfg("x:y:z");

        f.resolver.init_all(&c, false).await.unwrap();
        assert_eq!(f.journal(), vec!["x:init", "y:init", "z:init"]);

        f.clear();
        f.resolver.close_all(&c, true).await;
        assert_eq!(f.journal(), vec!["z:destroy", "y:destroy", "x:destroy"]);
    }

    #[tokio::test]
    async fn test_start_failure_does_not_stop_fan_out() {
        let f = fixture();
        let c = cfg("x:bad:z");

        f.resolver.init_all(&c, false).await.unwrap();
        f.clear();
        f.resolver.start_all(&c, false).await.unwrap();
        // "bad" refused start; x and z still started.
        assert_eq!(f.journal(), vec!["x:start", "z:start"]);
    }

    #[tokio::test]
    async fn test_stop_without_resolve_is_a_noop() {
        let f = fixture();
        // Never resolved for this config: nothing to stop, no panic.
        f.resolver.stop_all(&cfg("x"), true).await;
        assert!(f.journal().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_order_start_is_skipped() {
        let f = fixture();
        let c = cfg("x");
        // start before init: skipped entirely.
        f.resolver.start_all(&c, false).await.unwrap();
        assert!(f.journal().is_empty());
    }
}

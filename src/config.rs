//! # Bootstrap configuration.
//!
//! Provides [`Config`], the flat key/value bag handed to the orchestrator by
//! whatever loaded the bootstrap resource. The orchestration core never parses
//! configuration formats; it only reads well-known keys through the typed
//! accessors below.
//!
//! ## Identity semantics
//! Each `Config` minted by [`Config::from_map`] (or [`Config::default`]) gets a
//! process-unique identity. Clones share that identity. The component resolver
//! caches per **identity**, not per content: two configs with equal contents
//! but different identities resolve independently, while a clone reuses the
//! cached component list.
//!
//! ## Well-known keys
//! - `components` — colon-separated management-component list (empty = none)
//! - `operation.timeout.ms` — graceful operation timeout (`0`/missing = 60s)
//! - `config.manager` — identifier of the external config-manager impl
//! - `start.quietly` — `"true"` = boot failures are logged, not propagated
//! - `heartbeat.interval.ms` — heartbeat component interval (`0`/missing = 60s)

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Duration;

/// Key of the colon-separated management-component list.
pub const KEY_COMPONENTS: &str = "components";
/// Key of the operation timeout, in milliseconds.
pub const KEY_OPERATION_TIMEOUT_MS: &str = "operation.timeout.ms";
/// Key naming the external config-manager implementation.
pub const KEY_CONFIG_MANAGER: &str = "config.manager";
/// Key enabling start-quietly mode.
pub const KEY_START_QUIETLY: &str = "start.quietly";
/// Key of the heartbeat interval, in milliseconds.
pub const KEY_HEARTBEAT_INTERVAL_MS: &str = "heartbeat.interval.ms";
/// Key of the event-bus ring buffer capacity.
pub const KEY_BUS_CAPACITY: &str = "bus.capacity";

/// Fallback operation timeout when the key is missing or zero.
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(60);
/// Fallback heartbeat interval when the key is missing or zero.
const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

/// Process-wide identity counter for configs.
static CONFIG_IDENTITY: AtomicU64 = AtomicU64::new(0);

/// Flat key/value bootstrap configuration with identity-based equality
/// for caching purposes.
///
/// ## Field semantics
/// - missing keys fall back to documented defaults; accessors never panic
/// - `operation.timeout.ms = 0` → default timeout (sentinel, matches missing)
/// - the identity is minted once per [`Config::from_map`] call and shared by
///   clones
#[derive(Clone, Debug)]
pub struct Config {
    identity: u64,
    values: HashMap<String, String>,
}

impl Config {
    /// Wraps an already-parsed key/value map, minting a fresh identity.
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self {
            identity: CONFIG_IDENTITY.fetch_add(1, AtomicOrdering::Relaxed),
            values,
        }
    }

    /// Returns the process-unique identity of this configuration.
    ///
    /// Used as the component-resolver cache key. Clones share it.
    #[inline]
    pub fn identity(&self) -> u64 {
        self.identity
    }

    /// Returns the raw value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the configured management-component names in declared order.
    ///
    /// The list is colon-separated; empty segments are skipped, so
    /// `"x::y"` and `"x:y:"` both yield `["x", "y"]`.
    pub fn component_list(&self) -> Vec<String> {
        self.get(KEY_COMPONENTS)
            .map(|raw| {
                raw.split(':')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the graceful operation timeout.
    ///
    /// - missing or unparsable key → 60s default
    /// - `0` → 60s default (sentinel)
    pub fn operation_timeout(&self) -> Duration {
        self.millis_or(KEY_OPERATION_TIMEOUT_MS, DEFAULT_OPERATION_TIMEOUT)
    }

    /// Returns the identifier of the external config-manager implementation.
    pub fn config_manager(&self) -> Option<&str> {
        self.get(KEY_CONFIG_MANAGER)
    }

    /// Returns true if boot failures should be logged instead of propagated.
    pub fn start_quietly(&self) -> bool {
        self.get(KEY_START_QUIETLY)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Returns the heartbeat emit interval.
    ///
    /// Same sentinel handling as [`Config::operation_timeout`].
    pub fn heartbeat_interval(&self) -> Duration {
        self.millis_or(KEY_HEARTBEAT_INTERVAL_MS, DEFAULT_HEARTBEAT_INTERVAL)
    }

    /// Returns the event-bus ring buffer capacity.
    ///
    /// - missing, unparsable, or `0` → 1024
    pub fn bus_capacity(&self) -> usize {
        match self.get(KEY_BUS_CAPACITY).and_then(|v| v.parse::<usize>().ok()) {
            Some(0) | None => 1024,
            Some(n) => n,
        }
    }

    /// Parses `key` as a millisecond count, treating missing/unparsable/zero
    /// values as `fallback`.
    fn millis_or(&self, key: &str, fallback: Duration) -> Duration {
        match self.get(key).and_then(|v| v.parse::<u64>().ok()) {
            Some(0) | None => fallback,
            Some(ms) => Duration::from_millis(ms),
        }
    }
}

impl Default for Config {
    /// An empty configuration: no components, default timeouts, no manager.
    fn default() -> Self {
        Self::from_map(HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(pairs: &[(&str, &str)]) -> Config {
        Config::from_map(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_component_list_order_and_empty_segments() {
        let c = cfg(&[(KEY_COMPONENTS, "x::y:z:")]);
        assert_eq!(c.component_list(), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_component_list_missing_is_empty() {
        assert!(Config::default().component_list().is_empty());
    }

    #[test]
    fn test_operation_timeout_sentinels() {
        assert_eq!(
            Config::default().operation_timeout(),
            Duration::from_secs(60)
        );
        assert_eq!(
            cfg(&[(KEY_OPERATION_TIMEOUT_MS, "0")]).operation_timeout(),
            Duration::from_secs(60)
        );
        assert_eq!(
            cfg(&[(KEY_OPERATION_TIMEOUT_MS, "garbage")]).operation_timeout(),
            Duration::from_secs(60)
        );
        assert_eq!(
            cfg(&[(KEY_OPERATION_TIMEOUT_MS, "200")]).operation_timeout(),
            Duration::from_millis(200)
        );
    }

    #[test]
    fn test_identity_shared_by_clone_distinct_otherwise() {
        let a = cfg(&[(KEY_COMPONENTS, "x")]);
        let b = a.clone();
        let c = cfg(&[(KEY_COMPONENTS, "x")]);
        assert_eq!(a.identity(), b.identity());
        assert_ne!(a.identity(), c.identity());
    }

    #[test]
    fn test_start_quietly_parsing() {
        assert!(cfg(&[(KEY_START_QUIETLY, "TRUE")]).start_quietly());
        assert!(!cfg(&[(KEY_START_QUIETLY, "no")]).start_quietly());
        assert!(!Config::default().start_quietly());
    }
}

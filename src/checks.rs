//! # Static configuration checks (config-check mode).
//!
//! Runs a battery of checks against a bootstrap configuration **without
//! starting any unit**, printing one report block per check. Any fatal report
//! means the configuration cannot boot; the CLI maps that to a nonzero exit
//! status.
//!
//! ## Report format
//! ```text
//! [component-list] OK
//!   all 2 configured component names resolve
//! [operation-timeout] FAILED
//!   'operation.timeout.ms' is not a millisecond count: "soon"
//! ```

use crate::components::ComponentResolver;
use crate::config::{Config, KEY_CONFIG_MANAGER, KEY_OPERATION_TIMEOUT_MS};

/// Outcome of a single configuration check.
#[derive(Debug)]
pub struct CheckReport {
    /// Stable check name (snake/kebab case, printed in the block header).
    pub name: &'static str,
    /// True if this configuration cannot boot.
    pub fatal: bool,
    /// Detail lines for the report block.
    pub lines: Vec<String>,
}

impl CheckReport {
    /// A passing report with one detail line.
    pub fn ok(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            fatal: false,
            lines: vec![detail.into()],
        }
    }

    /// A fatal report with one detail line.
    pub fn failed(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            fatal: true,
            lines: vec![detail.into()],
        }
    }

    /// Renders the report block.
    pub fn render(&self) -> String {
        let status = if self.fatal { "FAILED" } else { "OK" };
        let mut out = format!("[{}] {status}\n", self.name);
        for line in &self.lines {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// One static configuration check.
pub trait ConfigCheck: Send + Sync {
    /// Stable check name.
    fn name(&self) -> &'static str;

    /// Runs the check. Must not start units or components.
    fn run(&self, cfg: &Config, resolver: &ComponentResolver) -> CheckReport;
}

/// Verifies every configured component name resolves to a factory.
pub struct ComponentListCheck;

impl ConfigCheck for ComponentListCheck {
    fn name(&self) -> &'static str {
        "component-list"
    }

    fn run(&self, cfg: &Config, resolver: &ComponentResolver) -> CheckReport {
        let names = cfg.component_list();
        let unknown: Vec<&String> = names
            .iter()
            .filter(|name| !resolver.can_resolve(name))
            .collect();

        if unknown.is_empty() {
            CheckReport::ok(
                self.name(),
                format!("all {} configured component names resolve", names.len()),
            )
        } else {
            let mut report = CheckReport {
                name: self.name(),
                fatal: true,
                lines: Vec::new(),
            };
            for name in unknown {
                report
                    .lines
                    .push(format!("unknown management component '{name}'"));
            }
            report
        }
    }
}

/// Verifies the operation timeout is a usable millisecond count.
pub struct OperationTimeoutCheck;

impl ConfigCheck for OperationTimeoutCheck {
    fn name(&self) -> &'static str {
        "operation-timeout"
    }

    fn run(&self, cfg: &Config, _resolver: &ComponentResolver) -> CheckReport {
        match cfg.get(KEY_OPERATION_TIMEOUT_MS) {
            None => CheckReport::ok(
                self.name(),
                format!(
                    "'{KEY_OPERATION_TIMEOUT_MS}' not set; default {:?} applies",
                    cfg.operation_timeout()
                ),
            ),
            Some(raw) => match raw.parse::<u64>() {
                Ok(_) => CheckReport::ok(
                    self.name(),
                    format!("operation timeout is {:?}", cfg.operation_timeout()),
                ),
                Err(_) => CheckReport::failed(
                    self.name(),
                    format!("'{KEY_OPERATION_TIMEOUT_MS}' is not a millisecond count: \"{raw}\""),
                ),
            },
        }
    }
}

/// Reports whether a config-manager identifier is present.
///
/// Missing is not fatal: a configuration without one can still boot
/// management-only.
pub struct ConfigManagerCheck;

impl ConfigCheck for ConfigManagerCheck {
    fn name(&self) -> &'static str {
        "config-manager"
    }

    fn run(&self, cfg: &Config, _resolver: &ComponentResolver) -> CheckReport {
        match cfg.config_manager() {
            Some(id) => CheckReport::ok(self.name(), format!("config manager '{id}'")),
            None => CheckReport::ok(
                self.name(),
                format!("'{KEY_CONFIG_MANAGER}' not set; only management-only boots are possible"),
            ),
        }
    }
}

/// The checks shipped with this crate, in report order.
pub fn default_checks() -> Vec<Box<dyn ConfigCheck>> {
    vec![
        Box::new(ComponentListCheck),
        Box::new(OperationTimeoutCheck),
        Box::new(ConfigManagerCheck),
    ]
}

/// Runs every check, collecting one report each. Never starts units.
pub fn run_checks(
    cfg: &Config,
    resolver: &ComponentResolver,
    checks: &[Box<dyn ConfigCheck>],
) -> Vec<CheckReport> {
    checks.iter().map(|c| c.run(cfg, resolver)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::builtin_factories;
    use crate::events::Bus;
    use std::collections::HashMap;

    fn cfg(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_map(map)
    }

    fn resolver() -> ComponentResolver {
        ComponentResolver::new(Bus::new(16), builtin_factories())
    }

    #[test]
    fn test_resolvable_component_list_passes() {
        let reports = run_checks(
            &cfg(&[("components", "heartbeat")]),
            &resolver(),
            &default_checks(),
        );
        assert!(reports.iter().all(|r| !r.fatal));
    }

    #[test]
    fn test_unknown_component_is_fatal() {
        let reports = run_checks(
            &cfg(&[("components", "heartbeat:nope")]),
            &resolver(),
            &default_checks(),
        );
        let list = reports.iter().find(|r| r.name == "component-list").unwrap();
        assert!(list.fatal);
        assert!(list.lines[0].contains("nope"));
    }

    #[test]
    fn test_unparsable_timeout_is_fatal() {
        let reports = run_checks(
            &cfg(&[("operation.timeout.ms", "soon")]),
            &resolver(),
            &default_checks(),
        );
        let timeout = reports
            .iter()
            .find(|r| r.name == "operation-timeout")
            .unwrap();
        assert!(timeout.fatal);
    }

    #[test]
    fn test_missing_manager_is_not_fatal() {
        let reports = run_checks(&cfg(&[]), &resolver(), &default_checks());
        let manager = reports.iter().find(|r| r.name == "config-manager").unwrap();
        assert!(!manager.fatal);
    }

    #[test]
    fn test_render_block_shape() {
        let block = CheckReport::failed("demo", "something broke").render();
        assert_eq!(block, "[demo] FAILED\n  something broke\n");
    }
}

//! Group assignment: fixed group, role groups and rule-driven groups.

use std::sync::LazyLock;

use indexmap::IndexMap;
use kubenodes_settings::InventoryConfig;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::errors::{InventoryError, RuleError};
use crate::inventory::InventorySink;
use crate::rules::RuleEvaluator;

/// Prefix of the groups created for node roles.
pub const ROLE_GROUP_PREFIX: &str = "node_role_";

static INVALID_GROUP_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("static regex"));

/// `node-role.kubernetes.io/control-plane` role `control-plane` becomes
/// group `node_role_control_plane`.
pub fn role_group_name(role: &str) -> String {
    format!("{ROLE_GROUP_PREFIX}{}", role.replace('-', "_"))
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize_group_name(name: &str) -> String {
    INVALID_GROUP_CHARS.replace_all(name, "_").into_owned()
}

/// Create the fixed group and set its static variables.
pub fn add_fixed_group<K: InventorySink + ?Sized>(
    sink: &mut K,
    group: &str,
    group_vars: &IndexMap<String, Value>,
) {
    if sink.add_group(group) {
        debug!(group, "created fixed group");
    }
    for (name, value) in group_vars {
        sink.set_group_variable(group, name, value.clone());
    }
}

/// Add `host` to one `node_role_*` group per role.
pub fn add_role_groups<K: InventorySink + ?Sized>(sink: &mut K, host: &str, roles: &[String]) {
    for role in roles {
        let group = role_group_name(role);
        let _ = sink.add_group(&group);
        sink.add_host(host, Some(&group));
    }
}

/// Applies composite variables, conditional groups and keyed groups to one
/// host at a time, honouring `strict`.
pub struct RuleApplier<'a, E: ?Sized> {
    evaluator: &'a E,
    config: &'a InventoryConfig,
}

impl<'a, E: RuleEvaluator + ?Sized> RuleApplier<'a, E> {
    pub fn new(evaluator: &'a E, config: &'a InventoryConfig) -> Self {
        Self { evaluator, config }
    }

    /// Evaluate every rule against the host's current variables.
    pub fn apply<K: InventorySink + ?Sized>(
        &self,
        sink: &mut K,
        host: &str,
    ) -> Result<(), InventoryError> {
        self.set_composite_vars(sink, host)?;
        self.add_to_conditional_groups(sink, host)?;
        self.add_to_keyed_groups(sink, host)
    }

    fn set_composite_vars<K: InventorySink + ?Sized>(
        &self,
        sink: &mut K,
        host: &str,
    ) -> Result<(), InventoryError> {
        if self.config.compose.is_empty() {
            return Ok(());
        }
        // All composites see the variables as they were before composing.
        let vars = sink.host_vars(host).cloned().unwrap_or_default();
        for (name, expression) in &self.config.compose {
            match self.evaluator.compose(expression, &vars) {
                Ok(value) => sink.set_host_variable(host, name, value),
                Err(e) => self.tolerate(host, &format!("compose.{name}"), e)?,
            }
        }
        Ok(())
    }

    fn add_to_conditional_groups<K: InventorySink + ?Sized>(
        &self,
        sink: &mut K,
        host: &str,
    ) -> Result<(), InventoryError> {
        if self.config.groups.is_empty() {
            return Ok(());
        }
        let vars = sink.host_vars(host).cloned().unwrap_or_default();
        for (group, expression) in &self.config.groups {
            let group = sanitize_group_name(group);
            match self.evaluator.evaluate_condition(expression, &vars) {
                Ok(true) => {
                    let _ = sink.add_group(&group);
                    sink.add_host(host, Some(&group));
                }
                Ok(false) => {}
                Err(e) => self.tolerate(host, &format!("groups.{group}"), e)?,
            }
        }
        Ok(())
    }

    fn add_to_keyed_groups<K: InventorySink + ?Sized>(
        &self,
        sink: &mut K,
        host: &str,
    ) -> Result<(), InventoryError> {
        if self.config.keyed_groups.is_empty() {
            return Ok(());
        }
        let vars = sink.host_vars(host).cloned().unwrap_or_default();
        for rule in &self.config.keyed_groups {
            let keyed =
                match self
                    .evaluator
                    .keyed_group_names(rule, &vars, self.config.leading_separator)
                {
                    Ok(keyed) => keyed,
                    Err(e) => {
                        let key = rule.key.as_deref().unwrap_or_default();
                        self.tolerate(host, &format!("keyed_groups[{key}]"), e)?;
                        continue;
                    }
                };
            for name in &keyed.names {
                let _ = sink.add_group(name);
                sink.add_host(host, Some(name));
                if let Some(parent) = &keyed.parent {
                    let _ = sink.add_group(parent);
                    sink.add_child(parent, name);
                }
            }
        }
        Ok(())
    }

    /// Keyed group values of an unsupported shape abort even when not strict.
    fn tolerate(&self, host: &str, rule: &str, error: RuleError) -> Result<(), InventoryError> {
        if self.config.strict || matches!(error, RuleError::InvalidKeyShape(_)) {
            return Err(InventoryError::Rule {
                host: host.to_string(),
                rule: rule.to_string(),
                source: error,
            });
        }
        debug!(host, rule, error = %error, "skipping rule");
        Ok(())
    }
}

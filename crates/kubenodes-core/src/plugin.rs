//! One inventory parse: fetch, extract, group, sink.

use kubenodes_settings::InventoryConfig;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::errors::InventoryError;
use crate::facts::{HostFacts, internal_ip};
use crate::groups::{RuleApplier, add_fixed_group, add_role_groups};
use crate::inventory::InventorySink;
use crate::rules::RuleEvaluator;
use crate::selector::build_label_selector;
use crate::source::NodeSource;

/// Host variable holding the connection address.
pub const ANSIBLE_HOST: &str = "ansible_host";

/// Counts reported after a successful parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseSummary {
    pub hosts: usize,
    pub groups: usize,
}

/// The node inventory plugin, wired to a node source and a rule evaluator.
pub struct InventoryPlugin<S, E> {
    source: S,
    evaluator: E,
}

impl<S: NodeSource, E: RuleEvaluator> InventoryPlugin<S, E> {
    pub fn new(source: S, evaluator: E) -> Self {
        Self { source, evaluator }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Populate `sink` from the current node list.
    ///
    /// Any node source error aborts the parse. Rule errors abort it only when
    /// `config.strict` is set.
    #[instrument(skip_all, fields(plugin = %config.plugin))]
    pub async fn parse<K: InventorySink + ?Sized>(
        &self,
        config: &InventoryConfig,
        sink: &mut K,
    ) -> Result<ParseSummary, InventoryError> {
        let group = config.fixed_group();
        if let Some(group) = group {
            add_fixed_group(sink, group, &config.group_vars);
        }

        let selector = build_label_selector(&config.node_selectors);
        debug!(selector = selector.as_deref().unwrap_or(""), "listing nodes");
        let nodes = self.source.list_nodes(selector.as_deref()).await?;

        let mut hosts = Vec::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            let name = node
                .metadata
                .name
                .as_deref()
                .ok_or(InventoryError::InvalidNode(index))?;
            sink.add_host(name, group);

            if let Some(address) = internal_ip(node) {
                sink.set_host_variable(name, ANSIBLE_HOST, Value::String(address.to_string()));
            }

            let facts = HostFacts::from_node(node);
            if config.group_by_role {
                add_role_groups(sink, name, &facts.node_roles);
            }
            hosts.push((name, facts));
        }

        let rules = config
            .has_rules()
            .then(|| RuleApplier::new(&self.evaluator, config));
        for (name, facts) in hosts {
            for (var, value) in facts.to_vars() {
                sink.set_host_variable(name, &var, value);
            }
            if let Some(rules) = &rules {
                rules.apply(sink, name)?;
            }
        }

        let summary = ParseSummary {
            hosts: sink.hosts().len(),
            groups: sink.groups().len(),
        };
        info!(hosts = summary.hosts, groups = summary.groups, "inventory parsed");
        Ok(summary)
    }
}

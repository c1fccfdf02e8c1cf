//! Builders for node fixtures used in tests.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Node, NodeAddress, NodeCondition, NodeStatus, NodeSystemInfo};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Fluent builder for a [`Node`] as returned by the API server.
#[derive(Clone, Debug, Default)]
pub struct NodeBuilder {
    name: Option<String>,
    labels: BTreeMap<String, String>,
    annotations: BTreeMap<String, String>,
    addresses: Vec<NodeAddress>,
    conditions: Vec<NodeCondition>,
    info: Option<NodeSystemInfo>,
}

impl NodeBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// A node whose metadata carries no name.
    pub fn unnamed() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn label(mut self, key: &str, value: &str) -> Self {
        let _ = self.labels.insert(key.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn role(self, role: &str) -> Self {
        self.label(&format!("node-role.kubernetes.io/{role}"), "")
    }

    #[must_use]
    pub fn annotation(mut self, key: &str, value: &str) -> Self {
        let _ = self.annotations.insert(key.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn address(mut self, kind: &str, address: &str) -> Self {
        self.addresses.push(NodeAddress {
            address: address.to_string(),
            type_: kind.to_string(),
        });
        self
    }

    #[must_use]
    pub fn condition(mut self, kind: &str, status: &str) -> Self {
        self.conditions.push(NodeCondition {
            type_: kind.to_string(),
            status: status.to_string(),
            ..NodeCondition::default()
        });
        self
    }

    #[must_use]
    pub fn ready(self, ready: bool) -> Self {
        self.condition("Ready", if ready { "True" } else { "False" })
    }

    #[must_use]
    pub fn architecture(mut self, arch: &str) -> Self {
        let info = self.info.get_or_insert_with(NodeSystemInfo::default);
        info.architecture = arch.to_string();
        info.operating_system = "linux".to_string();
        self
    }

    pub fn build(self) -> Node {
        let non_empty = |m: BTreeMap<String, String>| (!m.is_empty()).then_some(m);
        Node {
            metadata: ObjectMeta {
                name: self.name,
                labels: non_empty(self.labels),
                annotations: non_empty(self.annotations),
                ..ObjectMeta::default()
            },
            status: Some(NodeStatus {
                addresses: (!self.addresses.is_empty()).then_some(self.addresses),
                conditions: (!self.conditions.is_empty()).then_some(self.conditions),
                node_info: self.info,
                ..NodeStatus::default()
            }),
            ..Node::default()
        }
    }
}

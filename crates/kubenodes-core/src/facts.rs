//! Per-node host facts.
//!
//! [`HostFacts::from_node`] is pure: the record depends on nothing but the
//! node it was built from.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Node, NodeCondition, NodeSystemInfo};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::inventory::Vars;

/// Label prefix marking a node role, e.g. `node-role.kubernetes.io/worker`.
pub const ROLE_LABEL_PREFIX: &str = "node-role.kubernetes.io/";

/// Address type used as the host's connection address.
pub const INTERNAL_IP: &str = "InternalIP";

/// Facts derived from one node, exposed as host variables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HostFacts {
    pub node_roles: Vec<String>,
    pub node_labels: BTreeMap<String, String>,
    pub node_annotations: BTreeMap<String, String>,
    pub node_info: BTreeMap<String, String>,
    pub node_addresses: Vec<NodeAddressFact>,
    pub node_ready: bool,
}

/// One entry of `node_addresses`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddressFact {
    pub address: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl HostFacts {
    pub fn from_node(node: &Node) -> Self {
        let labels = node.metadata.labels.clone().unwrap_or_default();
        let status = node.status.as_ref();

        Self {
            node_roles: node_roles(&labels),
            node_labels: labels,
            node_annotations: node.metadata.annotations.clone().unwrap_or_default(),
            node_info: status
                .and_then(|s| s.node_info.as_ref())
                .map(node_info_map)
                .unwrap_or_default(),
            node_addresses: status
                .and_then(|s| s.addresses.as_ref())
                .map(|addrs| {
                    addrs
                        .iter()
                        .map(|a| NodeAddressFact {
                            address: a.address.clone(),
                            kind: a.type_.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            node_ready: status
                .and_then(|s| s.conditions.as_deref())
                .is_some_and(is_ready),
        }
    }

    /// Flatten the record into the host variable namespace.
    pub fn to_vars(&self) -> Vars {
        let mut vars = Vars::new();
        let _ = vars.insert("node_roles".into(), json!(self.node_roles));
        let _ = vars.insert("node_labels".into(), json!(self.node_labels));
        let _ = vars.insert("node_annotations".into(), json!(self.node_annotations));
        let _ = vars.insert("node_info".into(), json!(self.node_info));
        let _ = vars.insert("node_addresses".into(), json!(self.node_addresses));
        let _ = vars.insert("node_ready".into(), Value::Bool(self.node_ready));
        vars
    }
}

/// Role names taken from every `node-role.kubernetes.io/<role>` label, in
/// label order.
pub fn node_roles(labels: &BTreeMap<String, String>) -> Vec<String> {
    labels
        .keys()
        .filter(|key| key.starts_with(ROLE_LABEL_PREFIX))
        .filter_map(|key| key.split_once('/').map(|(_, role)| role.to_string()))
        .collect()
}

/// True iff the first `Ready` condition has status exactly `"True"`.
pub fn is_ready(conditions: &[NodeCondition]) -> bool {
    conditions
        .iter()
        .find(|c| c.type_ == "Ready")
        .is_some_and(|c| c.status == "True")
}

/// First `InternalIP` address of the node, if any.
pub fn internal_ip(node: &Node) -> Option<&str> {
    node.status
        .as_ref()?
        .addresses
        .as_ref()?
        .iter()
        .find(|a| a.type_ == INTERNAL_IP)
        .map(|a| a.address.as_str())
}

fn node_info_map(info: &NodeSystemInfo) -> BTreeMap<String, String> {
    [
        ("architecture", &info.architecture),
        ("boot_id", &info.boot_id),
        ("container_runtime_version", &info.container_runtime_version),
        ("kernel_version", &info.kernel_version),
        ("kube_proxy_version", &info.kube_proxy_version),
        ("kubelet_version", &info.kubelet_version),
        ("machine_id", &info.machine_id),
        ("operating_system", &info.operating_system),
        ("os_image", &info.os_image),
        ("system_uuid", &info.system_uuid),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.clone()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::NodeBuilder;

    #[test]
    fn ready_true() {
        let node = NodeBuilder::new("n1").condition("Ready", "True").build();
        assert!(HostFacts::from_node(&node).node_ready);
    }

    #[test]
    fn ready_requires_exact_true() {
        for status in ["False", "Unknown", "true", "TRUE", ""] {
            let node = NodeBuilder::new("n1").condition("Ready", status).build();
            assert!(!HostFacts::from_node(&node).node_ready, "status {status:?}");
        }
    }

    #[test]
    fn missing_ready_condition_is_not_ready() {
        let node = NodeBuilder::new("n1")
            .condition("MemoryPressure", "False")
            .condition("DiskPressure", "False")
            .build();
        assert!(!HostFacts::from_node(&node).node_ready);

        let bare = NodeBuilder::new("n2").build();
        assert!(!HostFacts::from_node(&bare).node_ready);
    }

    #[test]
    fn ready_condition_among_others() {
        let node = NodeBuilder::new("n1")
            .condition("MemoryPressure", "False")
            .condition("Ready", "True")
            .build();
        assert!(HostFacts::from_node(&node).node_ready);
    }

    #[test]
    fn roles_from_labels() {
        let node = NodeBuilder::new("n1")
            .label("node-role.kubernetes.io/control-plane", "")
            .label("node-role.kubernetes.io/worker", "true")
            .label("kubernetes.io/hostname", "n1")
            .build();
        let facts = HostFacts::from_node(&node);
        assert_eq!(facts.node_roles, vec!["control-plane", "worker"]);
    }

    #[test]
    fn no_role_labels_yield_empty_roles() {
        let node = NodeBuilder::new("n1").label("kubernetes.io/os", "linux").build();
        assert!(HostFacts::from_node(&node).node_roles.is_empty());
    }

    #[test]
    fn role_suffix_after_first_slash() {
        let mut labels = BTreeMap::new();
        let _ = labels.insert("node-role.kubernetes.io/gpu/a100".to_string(), String::new());
        assert_eq!(node_roles(&labels), vec!["gpu/a100"]);
    }

    #[test]
    fn prefix_without_slash_is_not_a_role() {
        let mut labels = BTreeMap::new();
        let _ = labels.insert("node-role.kubernetes.io".to_string(), "worker".to_string());
        assert!(node_roles(&labels).is_empty());
    }

    #[test]
    fn labels_annotations_and_info_copied() {
        let node = NodeBuilder::new("n1")
            .label("disktype", "ssd")
            .annotation("flannel.alpha.coreos.com/public-ip", "10.0.0.5")
            .architecture("arm64")
            .build();
        let facts = HostFacts::from_node(&node);
        assert_eq!(facts.node_labels["disktype"], "ssd");
        assert_eq!(
            facts.node_annotations["flannel.alpha.coreos.com/public-ip"],
            "10.0.0.5"
        );
        assert_eq!(facts.node_info["architecture"], "arm64");
        assert_eq!(facts.node_info.len(), 10);
    }

    #[test]
    fn missing_metadata_and_status_yield_empty_facts() {
        let node = Node::default();
        assert_eq!(HostFacts::from_node(&node), HostFacts::default());
        assert_eq!(internal_ip(&node), None);
    }

    #[test]
    fn internal_ip_selected() {
        let node = NodeBuilder::new("n1")
            .address("Hostname", "h1")
            .address("InternalIP", "10.0.0.5")
            .address("InternalIP", "10.0.0.6")
            .build();
        assert_eq!(internal_ip(&node), Some("10.0.0.5"));
    }

    #[test]
    fn internal_ip_absent() {
        let node = NodeBuilder::new("n1")
            .address("Hostname", "h1")
            .address("ExternalIP", "203.0.113.9")
            .build();
        assert_eq!(internal_ip(&node), None);
    }

    #[test]
    fn to_vars_shape() {
        let node = NodeBuilder::new("n1")
            .label("node-role.kubernetes.io/worker", "")
            .address("InternalIP", "10.0.0.5")
            .condition("Ready", "True")
            .build();
        let vars = HostFacts::from_node(&node).to_vars();
        assert_eq!(vars["node_roles"], json!(["worker"]));
        assert_eq!(vars["node_ready"], json!(true));
        assert_eq!(
            vars["node_addresses"],
            json!([{"address": "10.0.0.5", "type": "InternalIP"}])
        );
        assert!(vars["node_annotations"].as_object().unwrap().is_empty());
        assert_eq!(
            vars.keys().collect::<Vec<_>>(),
            vec![
                "node_roles",
                "node_labels",
                "node_annotations",
                "node_info",
                "node_addresses",
                "node_ready"
            ]
        );
    }
}

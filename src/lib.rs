//! # kubenodes
//!
//! Ansible dynamic inventory of Kubernetes nodes.
//!
//! The binary reads a `*kubernetes.yaml` inventory configuration, lists the
//! cluster's nodes once and prints the resulting inventory as JSON, following
//! the `--list` / `--host` dynamic inventory protocol.

#![deny(unsafe_code)]

pub mod cli;

use kubenodes_construct::JinjaEvaluator;
use kubenodes_core::{Inventory, InventoryError, InventoryPlugin, NodeSource};
use kubenodes_settings::InventoryConfig;

/// Build a complete inventory from `source` using the Jinja rule evaluator.
pub async fn build_inventory<S: NodeSource>(
    source: S,
    config: &InventoryConfig,
) -> Result<Inventory, InventoryError> {
    let plugin = InventoryPlugin::new(source, JinjaEvaluator::new());
    let mut inventory = Inventory::new();
    let _ = plugin.parse(config, &mut inventory).await?;
    Ok(inventory)
}

//! # kubenodes-core
//!
//! Turns the node list of a Kubernetes cluster into an Ansible inventory.
//!
//! One [`InventoryPlugin::parse`] call is a single pass:
//!
//! - **Fetch**: one list query through a [`NodeSource`], optionally filtered
//!   by a label selector built from `node_selectors`
//! - **Extract**: every node becomes a [`HostFacts`] record
//! - **Group**: the fixed group, `node_role_*` groups, and rule-driven
//!   groups evaluated by an injected [`RuleEvaluator`]
//! - **Sink**: hosts, groups and variables land in an [`InventorySink`]

#![deny(unsafe_code)]

pub mod errors;
pub mod facts;
pub mod groups;
pub mod inventory;
pub mod plugin;
pub mod rules;
pub mod selector;
pub mod source;
pub mod test_utils;

pub use errors::{InventoryError, RuleError, SourceError};
pub use facts::{HostFacts, NodeAddressFact, internal_ip};
pub use inventory::{Group, Inventory, InventorySink, Vars};
pub use plugin::{InventoryPlugin, ParseSummary};
pub use rules::{KeyedGroups, RuleEvaluator};
pub use selector::build_label_selector;
pub use source::{NodeSource, StaticNodeSource};

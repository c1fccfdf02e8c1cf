//! # kubenodes-settings
//!
//! Inventory configuration for the kubenodes plugin.
//!
//! A configuration file is a YAML document whose name ends in
//! `kubernetes.yaml` (or `kubernetes.yml`). It is read once per invocation,
//! then `KUBENODES_*` environment variables are applied on top:
//!
//! ```yaml
//! plugin: oddbit.kubernetes.kubenodes
//! group: k8s
//! group_vars:
//!   ansible_user: core
//! group_by_role: true
//! node_selectors:
//!   disktype: ssd
//! keyed_groups:
//!   - key: node_labels['kubernetes.io/arch']
//!     prefix: arch
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{apply_env_overrides, load_config, parse_bool, parse_config, verify_file};
pub use types::{InventoryConfig, KeyedGroup, PLUGIN_NAME, PLUGIN_SHORT_NAME};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let config = parse_config("plugin: kubenodes").unwrap();
        assert_eq!(config.plugin, PLUGIN_SHORT_NAME);
        let _ = KeyedGroup::default();
    }
}

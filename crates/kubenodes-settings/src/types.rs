//! Configuration types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fully qualified plugin identifier accepted in the `plugin` option.
pub const PLUGIN_NAME: &str = "oddbit.kubernetes.kubenodes";

/// Short plugin identifier, also accepted in the `plugin` option.
pub const PLUGIN_SHORT_NAME: &str = "kubenodes";

/// Options of one inventory configuration file, resolved once per invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Plugin discriminator; must name this plugin.
    pub plugin: String,
    /// Fixed group every host is added to.
    #[serde(default)]
    pub group: Option<String>,
    /// Static variables set on the fixed group.
    #[serde(default)]
    pub group_vars: IndexMap<String, Value>,
    /// Create a `node_role_<role>` group for every role label.
    #[serde(default)]
    pub group_by_role: bool,
    /// Required labels, turned into the label selector of the node query.
    #[serde(default)]
    pub node_selectors: IndexMap<String, Value>,
    /// Kubeconfig context to use instead of the current one.
    #[serde(default)]
    pub context: Option<String>,

    /// Composite variables: variable name to expression.
    #[serde(default)]
    pub compose: IndexMap<String, String>,
    /// Conditional groups: group name to boolean expression.
    #[serde(default)]
    pub groups: IndexMap<String, String>,
    /// Groups keyed on the value of an expression.
    #[serde(default)]
    pub keyed_groups: Vec<KeyedGroup>,
    /// Abort on rule evaluation errors instead of skipping them.
    #[serde(default)]
    pub strict: bool,
    /// Keep the separator in keyed group names when the prefix is empty.
    #[serde(default = "default_true")]
    pub leading_separator: bool,

    /// Options this plugin does not recognise.
    #[serde(flatten, skip_serializing)]
    pub unknown: IndexMap<String, Value>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            plugin: PLUGIN_NAME.to_string(),
            group: None,
            group_vars: IndexMap::new(),
            group_by_role: false,
            node_selectors: IndexMap::new(),
            context: None,
            compose: IndexMap::new(),
            groups: IndexMap::new(),
            keyed_groups: Vec::new(),
            strict: false,
            leading_separator: true,
            unknown: IndexMap::new(),
        }
    }
}

impl InventoryConfig {
    /// Whether `plugin` names this plugin.
    pub fn is_supported_plugin(&self) -> bool {
        self.plugin == PLUGIN_NAME || self.plugin == PLUGIN_SHORT_NAME
    }

    /// The fixed group, ignoring an empty name.
    pub fn fixed_group(&self) -> Option<&str> {
        self.group.as_deref().filter(|g| !g.is_empty())
    }

    /// Whether any rule-driven grouping is configured.
    pub fn has_rules(&self) -> bool {
        !self.compose.is_empty() || !self.groups.is_empty() || !self.keyed_groups.is_empty()
    }
}

/// One entry of `keyed_groups`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyedGroup {
    /// Expression whose value names the groups.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Replaces empty values; mutually exclusive with `trailing_separator`.
    #[serde(default)]
    pub default_value: Option<String>,
    /// When `false`, an empty mapping value yields the bare key as group name.
    #[serde(default)]
    pub trailing_separator: Option<bool>,
    /// Group every generated group is made a child of.
    #[serde(default)]
    pub parent_group: Option<String>,
}

impl Default for KeyedGroup {
    fn default() -> Self {
        Self {
            key: None,
            prefix: String::new(),
            separator: default_separator(),
            default_value: None,
            trailing_separator: None,
            parent_group: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_separator() -> String {
    "_".to_string()
}

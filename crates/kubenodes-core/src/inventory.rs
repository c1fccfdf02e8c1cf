//! Inventory sink: hosts, groups and their variables.
//!
//! [`InventorySink`] is the surface the parse writes into. [`Inventory`] is the
//! in-memory implementation, rendered as Ansible dynamic-inventory JSON.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Variables of one host or group.
pub type Vars = Map<String, Value>;

/// Implicit group containing every top-level group.
pub const ALL_GROUP: &str = "all";

/// Implicit group containing hosts that belong to no other group.
pub const UNGROUPED_GROUP: &str = "ungrouped";

/// Operations the parse performs on the target inventory.
pub trait InventorySink {
    /// Create `group` if missing. Returns `true` when it was created.
    fn add_group(&mut self, group: &str) -> bool;

    /// Add `host`, optionally into `group` (created if missing).
    fn add_host(&mut self, host: &str, group: Option<&str>);

    /// Make `child` a child group of `parent`, creating both if missing.
    fn add_child(&mut self, parent: &str, child: &str);

    /// Set a host variable, adding the host if missing.
    fn set_host_variable(&mut self, host: &str, name: &str, value: Value);

    /// Set a group variable, adding the group if missing.
    fn set_group_variable(&mut self, group: &str, name: &str, value: Value);

    fn host_vars(&self, host: &str) -> Option<&Vars>;

    fn has_group(&self, group: &str) -> bool;

    fn groups(&self) -> Vec<&str>;

    fn hosts(&self) -> Vec<&str>;
}

/// A named collection of hosts with its own variables.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Group {
    pub hosts: IndexSet<String>,
    pub vars: Vars,
    pub children: IndexSet<String>,
}

/// In-memory inventory built by one parse.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    hosts: IndexMap<String, Vars>,
    groups: IndexMap<String, Group>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Hosts that belong to no group.
    pub fn ungrouped_hosts(&self) -> Vec<&str> {
        self.hosts
            .keys()
            .filter(|host| !self.groups.values().any(|g| g.hosts.contains(*host)))
            .map(String::as_str)
            .collect()
    }

    /// Render the `--list` document of the Ansible dynamic inventory protocol.
    pub fn to_ansible_json(&self) -> Value {
        let mut out = Map::new();

        let nested: IndexSet<&str> = self
            .groups
            .values()
            .flat_map(|g| g.children.iter().map(String::as_str))
            .collect();
        let mut top_level: Vec<&str> = vec![UNGROUPED_GROUP];
        top_level.extend(
            self.groups
                .keys()
                .map(String::as_str)
                .filter(|name| !nested.contains(name)),
        );

        let _ = out.insert(ALL_GROUP.to_string(), json!({ "children": top_level }));
        let _ = out.insert(
            UNGROUPED_GROUP.to_string(),
            json!({ "hosts": self.ungrouped_hosts() }),
        );

        for (name, group) in &self.groups {
            let mut entry = Map::new();
            let _ = entry.insert("hosts".into(), json!(group.hosts));
            if !group.vars.is_empty() {
                let _ = entry.insert("vars".into(), Value::Object(group.vars.clone()));
            }
            if !group.children.is_empty() {
                let _ = entry.insert("children".into(), json!(group.children));
            }
            let _ = out.insert(name.clone(), Value::Object(entry));
        }

        let hostvars: Map<String, Value> = self
            .hosts
            .iter()
            .map(|(host, vars)| (host.clone(), Value::Object(vars.clone())))
            .collect();
        let _ = out.insert("_meta".into(), json!({ "hostvars": hostvars }));

        Value::Object(out)
    }

    /// Render the `--host` document: the variables of one host, or `{}`.
    pub fn host_json(&self, host: &str) -> Value {
        self.hosts
            .get(host)
            .map_or_else(|| json!({}), |vars| Value::Object(vars.clone()))
    }

    fn group_mut(&mut self, group: &str) -> &mut Group {
        self.groups.entry(group.to_string()).or_default()
    }
}

impl InventorySink for Inventory {
    fn add_group(&mut self, group: &str) -> bool {
        if self.groups.contains_key(group) {
            return false;
        }
        let _ = self.groups.insert(group.to_string(), Group::default());
        true
    }

    fn add_host(&mut self, host: &str, group: Option<&str>) {
        let _ = self.hosts.entry(host.to_string()).or_default();
        if let Some(group) = group {
            let _ = self.group_mut(group).hosts.insert(host.to_string());
        }
    }

    fn add_child(&mut self, parent: &str, child: &str) {
        let _ = self.group_mut(child);
        let _ = self.group_mut(parent).children.insert(child.to_string());
    }

    fn set_host_variable(&mut self, host: &str, name: &str, value: Value) {
        let _ = self
            .hosts
            .entry(host.to_string())
            .or_default()
            .insert(name.to_string(), value);
    }

    fn set_group_variable(&mut self, group: &str, name: &str, value: Value) {
        let _ = self.group_mut(group).vars.insert(name.to_string(), value);
    }

    fn host_vars(&self, host: &str) -> Option<&Vars> {
        self.hosts.get(host)
    }

    fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    fn groups(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    fn hosts(&self) -> Vec<&str> {
        self.hosts.keys().map(String::as_str).collect()
    }
}

//! Label selector for the node list query.

use indexmap::IndexMap;
use serde_json::Value;

use crate::rules::is_truthy;

/// Join `node_selectors` into a `key=value,...` label selector, in
/// configuration order.
///
/// Falsy values (`null`, `false`, `0`, `""`, empty lists and mappings) render
/// as `key=`. Returns `None`
/// when no selectors are configured.
pub fn build_label_selector(node_selectors: &IndexMap<String, Value>) -> Option<String> {
    if node_selectors.is_empty() {
        return None;
    }
    let terms: Vec<String> = node_selectors
        .iter()
        .map(|(key, value)| format!("{key}={}", selector_value(value)))
        .collect();
    Some(terms.join(","))
}

fn selector_value(value: &Value) -> String {
    if !is_truthy(value) {
        return String::new();
    }
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

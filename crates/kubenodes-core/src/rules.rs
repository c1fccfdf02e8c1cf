//! Rule evaluation seam for composite variables and constructed groups.
//!
//! The expression language lives behind [`RuleEvaluator`]; this module only
//! fixes how a keyed group's key value turns into group names.

use kubenodes_settings::KeyedGroup;
use serde_json::Value;

use crate::errors::RuleError;
use crate::groups::sanitize_group_name;
use crate::inventory::Vars;

/// Group names produced by one keyed group rule for one host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyedGroups {
    pub names: Vec<String>,
    pub parent: Option<String>,
}

/// Evaluates user-supplied expressions against a host's variables.
pub trait RuleEvaluator {
    /// Value of a composite variable expression.
    fn compose(&self, expression: &str, vars: &Vars) -> Result<Value, RuleError>;

    /// Truthiness of a conditional group expression.
    fn evaluate_condition(&self, expression: &str, vars: &Vars) -> Result<bool, RuleError> {
        self.compose(expression, vars).map(|v| is_truthy(&v))
    }

    /// Groups a keyed group rule places the host in.
    fn keyed_group_names(
        &self,
        rule: &KeyedGroup,
        vars: &Vars,
        leading_separator: bool,
    ) -> Result<KeyedGroups, RuleError> {
        let Some(expression) = rule.key.as_deref() else {
            return Err(RuleError::EmptyKey);
        };
        let key = self.compose(expression, vars)?;
        keyed_groups_from_value(rule, &key, leading_separator)
    }
}

/// Truthiness of a variable value: `null`, `false`, zero and empty
/// strings, lists and mappings are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Turn the evaluated key of a keyed group into group names.
///
/// A string yields one group, a list one group per element, a mapping one
/// group per `key<separator>value` pair. Names are `prefix<separator>value`;
/// the separator is dropped when the prefix is empty and `leading_separator`
/// is off.
pub fn keyed_groups_from_value(
    rule: &KeyedGroup,
    key: &Value,
    leading_separator: bool,
) -> Result<KeyedGroups, RuleError> {
    let default_value = rule.default_value.as_deref();
    let empty_with_default = key.as_str() == Some("") && default_value.is_some();
    if !is_truthy(key) && !empty_with_default {
        return Err(RuleError::EmptyKey);
    }

    let sep = rule.separator.as_str();
    let or_default = |s: String| match default_value {
        Some(d) if s.is_empty() => d.to_string(),
        _ => s,
    };

    let bare: Vec<String> = match key {
        Value::String(s) => vec![or_default(s.clone())],
        Value::Array(items) => items.iter().map(|i| or_default(scalar_name(i))).collect(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| {
                let v = scalar_name(v);
                match (v.is_empty(), default_value) {
                    (true, Some(d)) => format!("{k}{sep}{d}"),
                    (true, None) if rule.trailing_separator == Some(false) => k.clone(),
                    _ => format!("{k}{sep}{v}"),
                }
            })
            .collect(),
        Value::Number(n) => vec![n.to_string()],
        Value::Bool(_) => return Err(RuleError::InvalidKeyShape("boolean")),
        Value::Null => return Err(RuleError::EmptyKey),
    };

    let sep = if rule.prefix.is_empty() && !leading_separator {
        ""
    } else {
        sep
    };
    Ok(KeyedGroups {
        names: bare
            .iter()
            .map(|b| sanitize_group_name(&format!("{}{sep}{b}", rule.prefix)))
            .collect(),
        parent: rule
            .parent_group
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(sanitize_group_name),
    })
}

fn scalar_name(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

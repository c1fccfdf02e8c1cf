//! Inventory configuration loading.
//!
//! Loading flow:
//! 1. [`verify_file`] decides whether a path names a kubenodes inventory file
//! 2. The YAML document is parsed into [`InventoryConfig`]
//! 3. Environment variable overrides are applied (highest priority)
//! 4. The result is validated; unknown options are reported, not rejected

use std::path::Path;

use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::types::{InventoryConfig, PLUGIN_NAME};

/// File name suffixes identifying a node inventory configuration.
pub const FILE_SUFFIXES: [&str; 2] = ["kubernetes.yaml", "kubernetes.yml"];

/// Whether `path` is an existing file whose name identifies it as a node
/// inventory configuration.
pub fn verify_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| FILE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
}

/// Load, override and validate the configuration at `path`.
pub fn load_config(path: &Path) -> Result<InventoryConfig> {
    if !verify_file(path) {
        return Err(SettingsError::UnsupportedFile(path.to_path_buf()));
    }
    debug!(?path, "loading inventory config");
    let content = std::fs::read_to_string(path)?;
    let mut config = parse_config(&content)?;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse and validate a configuration document without consulting the
/// environment.
pub fn parse_config(content: &str) -> Result<InventoryConfig> {
    let config: InventoryConfig = serde_yaml::from_str(content)?;
    validate(&config)?;
    for key in config.unknown.keys() {
        warn!(option = %key, "ignoring unsupported inventory option");
    }
    Ok(config)
}

fn validate(config: &InventoryConfig) -> Result<()> {
    if !config.is_supported_plugin() {
        return Err(SettingsError::InvalidValue(format!(
            "plugin must be {PLUGIN_NAME}, got {:?}",
            config.plugin
        )));
    }
    for keyed in &config.keyed_groups {
        if keyed.default_value.is_some() && keyed.trailing_separator.is_some() {
            return Err(SettingsError::InvalidValue(format!(
                "keyed group {:?}: default_value and trailing_separator are mutually exclusive",
                keyed.key.as_deref().unwrap_or_default()
            )));
        }
    }
    Ok(())
}

/// Apply environment variable overrides to a loaded configuration.
///
/// - `KUBENODES_GROUP`: fixed group name
/// - `KUBENODES_GROUP_BY_ROLE`: boolean
/// - `KUBENODES_STRICT`: boolean
/// - `KUBENODES_CONTEXT`: kubeconfig context
///
/// Invalid values are ignored with a warning.
pub fn apply_env_overrides(config: &mut InventoryConfig) {
    if let Some(v) = read_env_string("KUBENODES_GROUP") {
        config.group = Some(v);
    }
    if let Some(v) = read_env_bool("KUBENODES_GROUP_BY_ROLE") {
        config.group_by_role = v;
    }
    if let Some(v) = read_env_bool("KUBENODES_STRICT") {
        config.strict = v;
    }
    if let Some(v) = read_env_string("KUBENODES_CONTEXT") {
        config.context = Some(v);
    }
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_bool(name: &str) -> Option<bool> {
    let val = std::env::var(name).ok()?;
    let result = parse_bool(&val);
    if result.is_none() {
        warn!(key = name, value = %val, "invalid boolean env var, ignoring");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    // ── parse_config ────────────────────────────────────────────────

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse_config("plugin: oddbit.kubernetes.kubenodes").unwrap();
        assert_eq!(config.plugin, PLUGIN_NAME);
        assert!(config.group.is_none());
        assert!(config.group_vars.is_empty());
        assert!(!config.group_by_role);
        assert!(config.node_selectors.is_empty());
        assert!(!config.strict);
        assert!(config.leading_separator);
        assert!(!config.has_rules());
    }

    #[test]
    fn full_config() {
        let config = parse_config(
            r#"
plugin: oddbit.kubernetes.kubenodes
group: k8s
group_vars:
  ansible_user: core
  ansible_port: 2222
group_by_role: true
node_selectors:
  disktype: ssd
  env: ""
compose:
  arch: node_info.architecture
groups:
  ready: node_ready
keyed_groups:
  - key: node_roles
    prefix: role
    parent_group: roles
strict: true
leading_separator: false
"#,
        )
        .unwrap();

        assert_eq!(config.fixed_group(), Some("k8s"));
        assert_eq!(config.group_vars["ansible_user"], json!("core"));
        assert_eq!(config.group_vars["ansible_port"], json!(2222));
        assert!(config.group_by_role);
        assert_eq!(
            config.node_selectors.keys().collect::<Vec<_>>(),
            vec!["disktype", "env"]
        );
        assert_eq!(config.compose["arch"], "node_info.architecture");
        assert_eq!(config.groups["ready"], "node_ready");
        assert_eq!(config.keyed_groups.len(), 1);
        assert_eq!(config.keyed_groups[0].prefix, "role");
        assert_eq!(config.keyed_groups[0].parent_group.as_deref(), Some("roles"));
        assert!(config.strict);
        assert!(!config.leading_separator);
        assert!(config.unknown.is_empty());
    }

    #[test]
    fn missing_plugin_is_an_error() {
        let result = parse_config("group: k8s");
        assert_matches!(result, Err(SettingsError::Yaml(_)));
    }

    #[test]
    fn wrong_plugin_is_rejected() {
        let result = parse_config("plugin: kubernetes.core.k8s");
        assert_matches!(result, Err(SettingsError::InvalidValue(msg)) if msg.contains("kubernetes.core.k8s"));
    }

    #[test]
    fn unknown_options_are_kept_aside() {
        let config = parse_config("plugin: kubenodes\ncache: true\ncache_timeout: 60").unwrap();
        assert_eq!(config.unknown.len(), 2);
        assert_eq!(config.unknown["cache"], json!(true));
    }

    #[test]
    fn keyed_default_value_and_trailing_separator_conflict() {
        let result = parse_config(
            r#"
plugin: kubenodes
keyed_groups:
  - key: node_labels
    default_value: none
    trailing_separator: false
"#,
        );
        assert_matches!(result, Err(SettingsError::InvalidValue(msg)) if msg.contains("mutually exclusive"));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert_matches!(parse_config("plugin: [unterminated"), Err(SettingsError::Yaml(_)));
    }

    // ── verify_file / load_config ───────────────────────────────────

    #[test]
    fn verify_file_checks_suffix() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["kubernetes.yaml", "prod.kubernetes.yml", "cluster-kubernetes.yaml"] {
            let path = dir.path().join(name);
            std::fs::write(&path, "plugin: kubenodes").unwrap();
            assert!(verify_file(&path), "expected {name} to be accepted");
        }
        for name in ["inventory.yaml", "kubernetes.json", "kubernetes.yaml.bak"] {
            let path = dir.path().join(name);
            std::fs::write(&path, "plugin: kubenodes").unwrap();
            assert!(!verify_file(&path), "expected {name} to be rejected");
        }
    }

    #[test]
    fn verify_file_rejects_missing_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!verify_file(&dir.path().join("kubernetes.yaml")));
        let sub = dir.path().join("kubernetes.yaml");
        std::fs::create_dir(&sub).unwrap();
        assert!(!verify_file(&sub));
    }

    #[test]
    fn load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kubernetes.yaml");
        std::fs::write(&path, "plugin: kubenodes\ngroup: k8s\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.plugin, "kubenodes");
    }

    #[test]
    fn load_config_rejects_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts.yaml");
        std::fs::write(&path, "plugin: kubenodes").unwrap();

        assert_matches!(load_config(&path), Err(SettingsError::UnsupportedFile(p)) if p == path);
    }

    // ── parse_bool ──────────────────────────────────────────────────

    #[test]
    fn parse_bool_true_variants() {
        for val in &["true", "1", "yes", "on", "TRUE", "Yes", "ON"] {
            assert_eq!(parse_bool(val), Some(true), "failed for {val}");
        }
    }

    #[test]
    fn parse_bool_false_variants() {
        for val in &["false", "0", "no", "off", "FALSE", "No", "OFF"] {
            assert_eq!(parse_bool(val), Some(false), "failed for {val}");
        }
    }

    #[test]
    fn parse_bool_invalid() {
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }
}

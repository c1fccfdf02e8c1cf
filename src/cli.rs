//! Command line of the dynamic inventory script.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use kubenodes_core::Inventory;
use serde_json::Value;
use tracing::Level;

/// Ansible dynamic inventory of Kubernetes nodes.
#[derive(Parser, Debug)]
#[command(name = "kubenodes", version, about = "Ansible dynamic inventory of Kubernetes nodes")]
#[command(group(ArgGroup::new("mode").required(true).args(["list", "host", "verify"])))]
pub struct Cli {
    /// Inventory configuration file (name must end in kubernetes.yaml).
    #[arg(
        short,
        long,
        env = "KUBENODES_INVENTORY",
        default_value = "kubernetes.yaml"
    )]
    pub inventory: PathBuf,

    /// Print the whole inventory.
    #[arg(long)]
    pub list: bool,

    /// Print the variables of one host.
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Only check that the inventory file is a valid kubenodes configuration.
    #[arg(long)]
    pub verify: bool,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Log level for stderr output (overridden by `RUST_LOG`).
    #[arg(long, default_value = "warn")]
    pub log_level: Level,

    /// Log as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// The JSON document requested by `--list` or `--host`.
    pub fn output(&self, inventory: &Inventory) -> Value {
        match &self.host {
            Some(host) => inventory.host_json(host),
            None => inventory.to_ansible_json(),
        }
    }

    pub fn render(&self, document: &Value) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        }
    }
}

//! kubenodes binary: load the inventory file, list nodes, print JSON.

#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use kubenodes::build_inventory;
use kubenodes::cli::Cli;
use kubenodes_core::{Inventory, InventoryError};
use kubenodes_kube::KubeNodeSource;
use kubenodes_settings::{InventoryConfig, load_config};
use kubenodes_telemetry::{TelemetryConfig, init_telemetry};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = init_telemetry(&TelemetryConfig {
        log_level: cli.log_level,
        json: cli.log_json,
        ..TelemetryConfig::default()
    });

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("kubenodes: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(&cli.inventory)
        .with_context(|| format!("failed to load {}", cli.inventory.display()))?;
    if cli.verify {
        tracing::info!(path = %cli.inventory.display(), "inventory file is valid");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    let inventory = runtime.block_on(list_nodes_into_inventory(&config))?;

    println!("{}", cli.render(&cli.output(&inventory))?);
    Ok(())
}

async fn list_nodes_into_inventory(config: &InventoryConfig) -> Result<Inventory, InventoryError> {
    let source = KubeNodeSource::connect(config.context.as_deref()).await?;
    build_inventory(source, config).await
}

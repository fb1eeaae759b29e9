//! tiles - command-line control surface for the tiles app
//!
//! Loads the instance configuration, opens the transport session and
//! dispatches actions given as JSON.

mod cli;
mod logging_setup;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;
use tiles_control::{LogStatus, TilesAction, TilesConfig, TilesInstance, VariableTable, CATALOG};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use cli::{Args, Commands};

fn load_config(args: &Args) -> Result<TilesConfig> {
    let mut config = match &args.config {
        Some(path) => TilesConfig::load(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => TilesConfig::default(),
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.rx_port = port;
    }
    if let Some(port) = args.local_port {
        config.local_port = Some(port);
    }
    Ok(config)
}

fn variables(args: &Args) -> Result<VariableTable> {
    let mut table = VariableTable::new();
    for assignment in &args.vars {
        match VariableTable::parse_assignment(assignment) {
            Some((key, value)) => table.set(key, value),
            None => bail!(
                "Invalid variable '{}', expected NAMESPACE:NAME=VALUE",
                assignment
            ),
        }
    }
    Ok(table)
}

fn print_catalog() {
    for info in CATALOG {
        println!("{:<32} /tiles{:<28} {}", info.id, info.suffix, info.name);
    }
}

/// Dispatch JSON-lines actions from stdin until EOF or Ctrl-C
async fn run_stdin(instance: &TilesInstance) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let config = instance.config();
    info!(
        "Reading actions from stdin for {}:{}",
        config.host, config.rx_port
    );

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                match TilesAction::from_json(line) {
                    Ok(action) => {
                        instance.run_action(&action).await;
                    }
                    Err(e) => error!("Ignoring invalid action '{}': {}", line, e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if matches!(args.command, Commands::List) {
        print_catalog();
        return Ok(());
    }

    let config = load_config(&args)?;
    let _log_guard = logging_setup::init(&config.log, args.verbose)?;
    let vars = variables(&args)?;

    let mut instance = TilesInstance::new(Arc::new(vars), Arc::new(LogStatus));
    instance.reconfigure(config).await;
    if let Some(session) = instance.session() {
        info!(
            "Controlling tiles app at {} ({:?})",
            session.target(),
            session.state()
        );
    }

    let result = match &args.command {
        Commands::Send { action } => match TilesAction::from_json(action) {
            Ok(action) => {
                instance.run_action(&action).await;
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e).context("Invalid action JSON")),
        },
        Commands::Run => run_stdin(&instance).await,
        Commands::List => Ok(()),
    };

    instance.destroy().await;
    result
}

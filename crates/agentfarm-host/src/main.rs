//! Host adapter binary for the Agent Farm.
//!
//! Reads agent lifecycle and farm requests as JSON lines on stdin, feeds
//! them to the [`FarmEngine`], and writes engine notifications and state
//! snapshots as JSON lines on stdout. Logs go to stderr so stdout stays a
//! clean protocol channel.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (first argument, `AGENTFARM_CONFIG`, or
//!    `agentfarm-config.yaml` in the working directory)
//! 2. Initialize structured logging
//! 3. Load the saved farm, or start a new one
//! 4. Run the event loop until stdin closes or Ctrl-C
//! 5. Save the farm

mod error;
mod host;
mod persist;
mod protocol;

use std::path::PathBuf;
use std::time::Duration;

use agentfarm_core::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE};
use agentfarm_core::{Clock, FarmConfig, FarmEngine, SystemClock};
use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::HostError;
use crate::host::FarmHost;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config_path = config_path();
    let config = load_config(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // 2. Initialize structured logging on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!(
        config = %config_path.display(),
        state_path = %config.persistence.state_path.display(),
        season_length_days = config.farm.season_length_days,
        pump_interval_ms = config.host.pump_interval_ms,
        "agentfarm-host starting"
    );

    // 3. Load the farm.
    let state =
        persist::load_or_default(&config.persistence.state_path, &config, SystemClock.now());
    let engine = FarmEngine::new(state, &config, SystemClock);
    let mut host = FarmHost::new(engine, config.persistence.clone());

    // 4. Serve.
    run(&mut host, Duration::from_millis(config.host.pump_interval_ms))
        .await
        .context("event loop failed")?;

    // 5. Save.
    host.save().context("final save failed")?;
    info!(
        pawns = host.engine().pawns().len(),
        seeds = host.engine().state().economy.seeds,
        "agentfarm-host shutdown complete"
    );
    Ok(())
}

/// Config file location: first CLI argument, then the environment, then
/// the working directory.
fn config_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

fn load_config(path: &std::path::Path) -> Result<FarmConfig, HostError> {
    Ok(FarmConfig::load_or_default(path)?)
}

/// Pump stdin lines and timer ticks into the host until stdin closes.
async fn run(host: &mut FarmHost, pump_interval: Duration) -> Result<(), HostError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    let mut pump = tokio::time::interval(pump_interval);
    pump.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut ctrl_c = std::pin::pin!(tokio::signal::ctrl_c());

    loop {
        let output = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => host.handle_line(&line)?,
                None => {
                    info!("stdin closed");
                    break;
                }
            },
            _ = pump.tick() => host.pump()?,
            _ = &mut ctrl_c => {
                info!("interrupt received");
                break;
            }
        };
        write_lines(&mut stdout, &output).await?;
    }
    Ok(())
}

async fn write_lines(stdout: &mut tokio::io::Stdout, lines: &[String]) -> Result<(), HostError> {
    if lines.is_empty() {
        return Ok(());
    }
    for line in lines {
        stdout.write_all(line.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}

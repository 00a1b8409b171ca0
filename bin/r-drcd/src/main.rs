//! ---
//! drc_section: "01-core-functionality"
//! drc_subsection: "binary"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "Binary entrypoint for the R-DRC daemon."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
//! One invocation of `r-drcd run` executes exactly one control step and
//! exits: code 0 when the primary was healthy or the standby was activated,
//! non-zero when the step escalated, so cron/alarm schedulers can alert on
//! repeated failures.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use r_drc_common::config::{DrcConfig, Mode};
use r_drc_common::logging::init_tracing;
use r_drc_core::{
    new_registry, metrics, FailoverStep, NotificationService, PoolControlService, PoolIdentity,
    PoolQueryService, StepMetrics, StepOutcome,
};
use r_drc_net::{build_client, parse_endpoint, HttpNotifier, HttpPoolControl, HttpPoolQuery};
use r_drc_sim::{Capacity, InMemoryPoolControl, RecordingNotifier, StaticPoolQuery};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "R-DRC daemon",
    long_about = None
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, help = "Override application mode")]
    mode: Option<CliMode>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMode {
    Production,
    Simulation,
}

impl From<CliMode> for Mode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::Production => Mode::Production,
            CliMode::Simulation => Mode::Simulation,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Execute one control step")]
    Run,
    #[command(about = "Load and validate the configuration, then exit")]
    ValidateConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/example.prod.toml"));
    candidates.push(PathBuf::from("configs/example.sim.toml"));

    let loaded = DrcConfig::load_with_source(&candidates)?;
    let mut config = loaded.config;
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
        config.validate()?;
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::ValidateConfig => {
            println!(
                "configuration at {} is valid (mode: {:?})",
                loaded.source.display(),
                config.mode
            );
            Ok(())
        }
        Commands::Run => {
            init_tracing("r-drcd", &config.logging)?;
            info!(
                config_path = %loaded.source.display(),
                mode = ?config.mode,
                primary = %config.primary.name,
                standby = %config.standby.name,
                channel = %config.notification.channel,
                "configuration loaded"
            );
            run_step(&config).await
        }
    }
}

async fn run_step(config: &DrcConfig) -> Result<()> {
    let registry = new_registry();
    let step_metrics = if config.metrics.enabled {
        Some(StepMetrics::new(registry.clone())?)
    } else {
        None
    };

    let (query, control, notifier) = build_services(config)?;
    let step = FailoverStep::new(config, query, control, notifier, step_metrics);

    let started = Instant::now();
    let result = step.run().await;

    if config.metrics.enabled {
        if let Some(path) = &config.metrics.textfile {
            if let Err(err) = metrics::write_textfile(&registry, path) {
                warn!(error = %err, path = %path.display(), "failed to export metrics textfile");
            }
        }
    }

    match result {
        Ok(StepOutcome::PrimaryHealthy) => {
            info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "control step finished: primary healthy, no action taken"
            );
            Ok(())
        }
        Ok(StepOutcome::FailoverActivated { standby, directive }) => {
            info!(
                standby = %standby,
                directive = %directive,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "control step finished: standby activated"
            );
            Ok(())
        }
        // Non-zero exit so the scheduler can observe the failed step.
        Err(err) => Err(anyhow::Error::new(err).context("control step failed")),
    }
}

fn build_services(
    config: &DrcConfig,
) -> Result<(
    Arc<dyn PoolQueryService>,
    Arc<dyn PoolControlService>,
    Arc<dyn NotificationService>,
)> {
    match config.mode {
        Mode::Simulation => {
            let primary = PoolIdentity::from(&config.primary);
            let standby = PoolIdentity::from(&config.standby);
            let query =
                StaticPoolQuery::from_simulation(&config.simulation, &primary, &standby)?;
            let control = InMemoryPoolControl::new().with_pool(
                standby.name.clone(),
                Capacity {
                    min_size: 0,
                    desired_capacity: config.simulation.standby_initial_capacity,
                },
            );
            Ok((
                Arc::new(query),
                Arc::new(control),
                Arc::new(RecordingNotifier::new()),
            ))
        }
        Mode::Production => {
            let client = build_client(config.services.request_timeout)?;
            let primary_endpoint = config
                .services
                .pool_endpoints
                .get(&config.primary.region)
                .ok_or_else(|| anyhow!("no pool endpoint for region '{}'", config.primary.region))?;
            let standby_endpoint = config
                .services
                .pool_endpoints
                .get(&config.standby.region)
                .ok_or_else(|| anyhow!("no pool endpoint for region '{}'", config.standby.region))?;

            let query = HttpPoolQuery::new(client.clone(), parse_endpoint(primary_endpoint)?);
            let control = HttpPoolControl::new(client.clone(), parse_endpoint(standby_endpoint)?);
            let notifier = HttpNotifier::new(
                client,
                parse_endpoint(&config.services.notify_endpoint)
                    .context("invalid notification endpoint")?,
            );
            Ok((Arc::new(query), Arc::new(control), Arc::new(notifier)))
        }
    }
}

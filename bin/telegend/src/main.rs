//! ---
//! tg_section: "01-core-functionality"
//! tg_subsection: "binary"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Binary entrypoint for the telegen daemon."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use telegen_bus::{InMemoryBus, TelemetrySink, TracingSink};
use telegen_common::config::{AppConfig, SinkKind};
use telegen_common::logging::init_tracing;
use telegen_sched::{PublishScheduler, TokioClock};
use telegen_signal::{RandomWalk, SignalBounds, UniformDrift};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Synthetic telemetry generator",
    long_about = "Publishes a simulated battery temperature onto a named \
                  channel at a fixed rate, for developing downstream \
                  consumers without hardware attached."
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Publish rate in ticks per second")]
    rate: Option<f64>,

    #[arg(long, help = "Initial battery temperature in degrees Celsius")]
    initial_temp: Option<f64>,

    #[arg(long, help = "Lower clamp for the temperature walk")]
    min_temp: Option<f64>,

    #[arg(long, help = "Upper clamp for the temperature walk")]
    max_temp: Option<f64>,

    #[arg(long, help = "Channel name frames are published on")]
    channel: Option<String>,

    #[arg(long, help = "Payload field name carrying the reading")]
    field: Option<String>,

    #[arg(long, help = "Seed for the drift sampler")]
    seed: Option<u64>,

    #[arg(long, help = "Stop after this many ticks instead of running forever")]
    max_ticks: Option<u64>,
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(rate) = self.rate {
            config.publish.rate_hz = rate;
        }
        if let Some(initial) = self.initial_temp {
            config.signal.initial_temp_c = initial;
        }
        if let Some(min) = self.min_temp {
            config.signal.min_temp_c = min;
        }
        if let Some(max) = self.max_temp {
            config.signal.max_temp_c = max;
        }
        if let Some(channel) = &self.channel {
            config.publish.channel = channel.clone();
        }
        if let Some(field) = &self.field {
            config.publish.field = field.clone();
        }
        if let Some(seed) = self.seed {
            config.signal.random_seed = seed;
        }
        if let Some(limit) = self.max_ticks {
            config.publish.max_ticks = Some(limit);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/telegen.toml"));
    candidates.push(PathBuf::from("configs/example.dev.toml"));

    let loaded = AppConfig::load_with_source(&candidates)?;
    let mut config = loaded.config;
    cli.apply(&mut config);
    // Re-validate after CLI overrides; a bad --rate must fail before the
    // loop starts.
    config.validate()?;

    init_tracing("telegend", &config.logging)?;
    match &loaded.source {
        Some(path) => info!(config_path = %path.display(), "configuration loaded"),
        None => info!("running on built-in default configuration"),
    }

    let bounds = SignalBounds::new(config.signal.min_temp_c, config.signal.max_temp_c)
        .context("signal bounds rejected")?;
    let walk = RandomWalk::new(
        config.signal.initial_temp_c,
        bounds,
        Box::new(UniformDrift::seeded(config.signal.random_seed)),
    )
    .context("signal seed rejected")?;

    let sink: Arc<dyn TelemetrySink> = match config.publish.sink {
        SinkKind::Tracing => Arc::new(TracingSink),
        SinkKind::InMemory => {
            // Frames queued here are only observable to an embedding host;
            // warn so a standalone run is not silently useless.
            warn!("in_memory sink selected; frames stay inside the process");
            Arc::new(InMemoryBus::new())
        }
    };

    let scheduler = PublishScheduler::new(
        config.publish.rate_hz,
        config.publish.channel.clone(),
        config.publish.field.clone(),
        walk,
        sink,
        Arc::new(TokioClock),
    )?
    .with_max_ticks(config.publish.max_ticks);
    let reporter = scheduler.reporter();

    let (shutdown_tx, shutdown_rx) = broadcast::channel(4);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown requested");
        let _ = shutdown_tx.send(());
    });

    info!(
        rate_hz = config.publish.rate_hz,
        channel = %config.publish.channel,
        field = %config.publish.field,
        seed = config.signal.random_seed,
        "telegend starting"
    );
    let report = scheduler.run(shutdown_rx).await?;

    if let Some(summary) = reporter.histogram().snapshot() {
        let path = "target/telegen-jitter.json";
        if let Err(err) = reporter.histogram().write_json(path) {
            warn!(error = %err, "failed to write jitter summary");
        } else {
            info!(path, samples = summary.samples, mean_us = summary.mean_us, "jitter summary written");
        }
    }
    info!(
        ticks = report.ticks,
        published = report.published,
        publish_failures = report.publish_failures,
        final_value = report.final_value,
        "telegend stopped"
    );
    Ok(())
}

/// Shared graceful shutdown helper. Resolves on ctrl-c, and additionally on
/// SIGTERM on unix so container stops are clean.
async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        term.recv().await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = signal::ctrl_c() => {},
        _ = terminate => {},
    }
}

//! ---
//! tg_section: "01-core-functionality"
//! tg_subsection: "module"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Fixed-rate publish scheduling."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use telegen_bus::{TelemetryEnvelope, TelemetrySink};
use telegen_common::metrics::TickTimingReporter;
use telegen_common::time::interval_for_rate;
use telegen_signal::{RandomWalk, SignalError};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::clock::TickClock;

/// Errors raised by scheduler construction or a broken walk contract.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// Publish rate must be a positive finite number of ticks per second.
    #[error("invalid publish rate: {rate_hz} ticks/s")]
    InvalidRate {
        /// The rejected rate.
        rate_hz: f64,
    },
    /// The signal generator rejected a step; only possible when the walk and
    /// scheduler were built against different rates.
    #[error(transparent)]
    Signal(#[from] SignalError),
}

/// Tally of one scheduler run, returned when the loop exits.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerReport {
    /// Ticks executed, including ones whose publish failed.
    pub ticks: u64,
    /// Frames accepted by the sink.
    pub published: u64,
    /// Frames the sink rejected; the loop continued past each of them.
    pub publish_failures: u64,
    /// Simulated elapsed seconds (ticks x tick interval).
    pub elapsed_s: f64,
    /// Last reading produced by the walk.
    pub final_value: f64,
}

/// Drives the fixed-rate publish loop.
///
/// One tick = one sleep, one walk step, one publish. Ticks are strictly
/// sequential; the loop sleeps a fixed `1/rate` each iteration rather than
/// correcting towards deadlines, so cumulative drift under slow publish
/// calls is an accepted, documented limitation.
pub struct PublishScheduler {
    interval: Duration,
    dt: f64,
    channel: String,
    field: String,
    walk: RandomWalk,
    sink: Arc<dyn TelemetrySink>,
    clock: Arc<dyn TickClock>,
    reporter: Arc<TickTimingReporter>,
    max_ticks: Option<u64>,
}

impl std::fmt::Debug for PublishScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishScheduler")
            .field("interval", &self.interval)
            .field("channel", &self.channel)
            .field("field", &self.field)
            .field("sink", &self.sink.name())
            .field("max_ticks", &self.max_ticks)
            .finish_non_exhaustive()
    }
}

impl PublishScheduler {
    /// Build a scheduler ticking `rate_hz` times per second.
    pub fn new(
        rate_hz: f64,
        channel: impl Into<String>,
        field: impl Into<String>,
        walk: RandomWalk,
        sink: Arc<dyn TelemetrySink>,
        clock: Arc<dyn TickClock>,
    ) -> Result<Self, SchedulerError> {
        if !(rate_hz.is_finite() && rate_hz > 0.0) {
            return Err(SchedulerError::InvalidRate { rate_hz });
        }
        let interval = interval_for_rate(rate_hz);
        Ok(Self {
            interval,
            dt: 1.0 / rate_hz,
            channel: channel.into(),
            field: field.into(),
            walk,
            sink,
            clock,
            reporter: Arc::new(TickTimingReporter::new(interval)),
            max_ticks: None,
        })
    }

    /// Stop after `limit` ticks instead of running until shutdown.
    pub fn with_max_ticks(mut self, limit: Option<u64>) -> Self {
        self.max_ticks = limit;
        self
    }

    /// Shared reporter carrying tick jitter and publish tallies.
    pub fn reporter(&self) -> Arc<TickTimingReporter> {
        self.reporter.clone()
    }

    /// Run the loop until cancellation (or the optional tick limit).
    ///
    /// Cancellation is cooperative: the shutdown channel is checked before
    /// every sleep and preempts a sleep in progress, so shutdown latency is
    /// bounded by one tick interval and no partial frame is published.
    pub async fn run(
        mut self,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<SchedulerReport, SchedulerError> {
        info!(
            channel = %self.channel,
            field = %self.field,
            interval_ms = self.interval.as_millis() as u64,
            sink = self.sink.name(),
            "publish loop starting"
        );

        let mut tick: u64 = 0;
        let mut elapsed_s: f64 = 0.0;

        loop {
            tokio::select! {
                // Shutdown wins over an elapsed sleep so a cancelled tick is
                // never published.
                biased;
                _ = shutdown.recv() => {
                    debug!(tick, "shutdown signal received");
                    break;
                }
                _ = self.clock.sleep(self.interval) => {
                    tick += 1;
                    elapsed_s += self.dt;
                    self.reporter.record_tick();

                    let value = self.walk.step(self.dt)?;
                    let frame = TelemetryEnvelope::reading(&self.field, value, tick, elapsed_s);
                    match self.sink.publish(&self.channel, &frame) {
                        Ok(()) => {
                            self.reporter.record_publish();
                            debug!(tick, elapsed_s, value, "frame published");
                        }
                        Err(err) => {
                            // Fire-and-continue: liveness of the simulated
                            // signal outranks delivery guarantees.
                            self.reporter.record_publish_failure();
                            warn!(tick, error = %err, "publish failed; continuing");
                        }
                    }

                    if let Some(limit) = self.max_ticks {
                        if tick >= limit {
                            info!(tick, limit, "tick limit reached");
                            break;
                        }
                    }
                }
            }
        }

        let report = SchedulerReport {
            ticks: tick,
            published: self.reporter.published(),
            publish_failures: self.reporter.publish_failures(),
            elapsed_s,
            final_value: self.walk.value(),
        };
        info!(
            ticks = report.ticks,
            published = report.published,
            publish_failures = report.publish_failures,
            final_value = report.final_value,
            "publish loop stopped"
        );
        Ok(report)
    }
}

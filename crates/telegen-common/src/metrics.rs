//! ---
//! tg_section: "01-core-functionality"
//! tg_subsection: "module"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Shared primitives and utilities for the telegen runtime."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;

/// Absolute deviation samples between the scheduled and observed tick spacing.
#[derive(Debug, Default)]
pub struct JitterHistogram {
    samples: Mutex<Vec<f64>>,
}

impl JitterHistogram {
    pub fn observe(&self, jitter: Duration) {
        let micros = jitter.as_secs_f64() * 1_000_000.0;
        self.samples.lock().push(micros);
    }

    pub fn snapshot(&self) -> Option<JitterSummary> {
        let samples = self.samples.lock();
        let slice = samples.as_slice();
        if slice.is_empty() {
            return None;
        }
        let count = slice.len() as f64;
        let mean = slice.iter().sum::<f64>() / count;
        let max = slice.iter().copied().fold(f64::MIN, f64::max);
        let min = slice.iter().copied().fold(f64::MAX, f64::min);
        Some(JitterSummary {
            mean_us: mean,
            max_us: max,
            min_us: min,
            samples: slice.len() as u64,
        })
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        if let Some(summary) = self.snapshot() {
            let mut file = File::create(path)?;
            let json = serde_json::to_vec_pretty(&summary)
                .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
            file.write_all(&json)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct JitterSummary {
    pub mean_us: f64,
    pub max_us: f64,
    pub min_us: f64,
    pub samples: u64,
}

/// Records tick pacing and publish outcomes for the scheduler loop.
///
/// Publish failures are counted here so the loop can stay fire-and-continue
/// while tests and the shutdown path still see an exact failure tally.
#[derive(Debug)]
pub struct TickTimingReporter {
    target_interval: Duration,
    last_tick: Mutex<Option<Instant>>,
    histogram: JitterHistogram,
    published: AtomicU64,
    publish_failures: AtomicU64,
}

impl TickTimingReporter {
    pub fn new(target_interval: Duration) -> Self {
        Self {
            target_interval,
            last_tick: Mutex::new(None),
            histogram: JitterHistogram::default(),
            published: AtomicU64::new(0),
            publish_failures: AtomicU64::new(0),
        }
    }

    pub fn record_tick(&self) {
        let mut last_tick = self.last_tick.lock();
        let now = Instant::now();
        if let Some(previous) = *last_tick {
            let actual = now.duration_since(previous);
            let jitter = if actual > self.target_interval {
                actual - self.target_interval
            } else {
                self.target_interval - actual
            };
            self.histogram.observe(jitter);
        }
        *last_tick = Some(now);
    }

    pub fn record_publish(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_publish_failure(&self) {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    pub fn publish_failures(&self) -> u64 {
        self.publish_failures.load(Ordering::Relaxed)
    }

    pub fn histogram(&self) -> &JitterHistogram {
        &self.histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_histogram_has_no_summary() {
        let histogram = JitterHistogram::default();
        assert!(histogram.snapshot().is_none());
    }

    #[test]
    fn summary_tracks_mean_and_extremes() {
        let histogram = JitterHistogram::default();
        histogram.observe(Duration::from_micros(100));
        histogram.observe(Duration::from_micros(300));
        let summary = histogram.snapshot().expect("two samples recorded");
        assert_eq!(summary.samples, 2);
        assert!((summary.mean_us - 200.0).abs() < 1.0);
        assert!(summary.max_us >= summary.min_us);
    }

    #[test]
    fn reporter_counts_publish_outcomes() {
        let reporter = TickTimingReporter::new(Duration::from_millis(50));
        reporter.record_publish();
        reporter.record_publish();
        reporter.record_publish_failure();
        assert_eq!(reporter.published(), 2);
        assert_eq!(reporter.publish_failures(), 1);
    }
}

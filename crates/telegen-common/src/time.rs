//! ---
//! tg_section: "01-core-functionality"
//! tg_subsection: "module"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Shared primitives and utilities for the telegen runtime."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
use std::time::Duration;

/// Derive the tick interval from a publish rate in ticks per second.
///
/// The scheduler and the signal generator must both derive their per-tick
/// delta from the same rate; this helper is the single place that does the
/// conversion.
pub fn interval_for_rate(rate_hz: f64) -> Duration {
    Duration::from_secs_f64(1.0 / rate_hz)
}

/// Convert to human-friendly jitter units.
pub fn jitter_us(actual: Duration, expected: Duration) -> i64 {
    let actual_us = actual.as_secs_f64() * 1_000_000.0;
    let expected_us = expected.as_secs_f64() * 1_000_000.0;
    (actual_us - expected_us).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_hertz_yields_fifty_milliseconds() {
        assert_eq!(interval_for_rate(20.0), Duration::from_millis(50));
    }

    #[test]
    fn jitter_is_signed() {
        let expected = Duration::from_millis(50);
        assert_eq!(jitter_us(Duration::from_millis(51), expected), 1_000);
        assert_eq!(jitter_us(Duration::from_millis(49), expected), -1_000);
    }
}

//! ---
//! tg_section: "01-core-functionality"
//! tg_subsection: "module"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Fixed-rate publish scheduling."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
use std::time::Duration;

use async_trait::async_trait;

/// Clock capability used by the scheduler for its per-tick sleep.
///
/// The scheduler awaits this inside a `select!` against the shutdown
/// channel, so implementations need no cancellation logic of their own.
#[async_trait]
pub trait TickClock: Send + Sync {
    /// Suspend the loop for one tick interval.
    async fn sleep(&self, interval: Duration);
}

/// Production clock backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl TickClock for TokioClock {
    async fn sleep(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}

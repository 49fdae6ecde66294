//! ---
//! tg_section: "01-core-functionality"
//! tg_subsection: "module"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Fixed-rate publish scheduling."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
//! The publish scheduler: one cooperative loop that paces itself with
//! fixed-delay sleeps, advances the signal walk once per tick, and hands the
//! resulting frame to the injected sink.

pub mod clock;
pub mod scheduler;

pub use clock::{TickClock, TokioClock};
pub use scheduler::{PublishScheduler, SchedulerError, SchedulerReport};

//! ---
//! tg_section: "15-testing-qa-runbook"
//! tg_subsection: "integration-tests"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Integration tests for the telegen stack."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
use std::sync::Arc;
use std::time::Duration;

use telegen_bus::{InMemoryBus, TelemetrySink};
use telegen_common::config::AppConfig;
use telegen_sched::{PublishScheduler, TokioClock};
use telegen_signal::{RandomWalk, SignalBounds, UniformDrift};
use tokio::sync::broadcast;

fn walk_from(config: &AppConfig) -> RandomWalk {
    let bounds = SignalBounds::new(config.signal.min_temp_c, config.signal.max_temp_c)
        .expect("config bounds valid");
    RandomWalk::new(
        config.signal.initial_temp_c,
        bounds,
        Box::new(UniformDrift::seeded(config.signal.random_seed)),
    )
    .expect("config seed valid")
}

#[tokio::test]
async fn config_driven_run_publishes_the_requested_ticks() {
    let config: AppConfig = r#"
        [publish]
        rate_hz = 200.0
        channel = "bench/deviceState"
        max_ticks = 10

        [signal]
        random_seed = 1
    "#
    .parse()
    .expect("valid config");

    let bus = Arc::new(InMemoryBus::new());
    let scheduler = PublishScheduler::new(
        config.publish.rate_hz,
        config.publish.channel.clone(),
        config.publish.field.clone(),
        walk_from(&config),
        bus.clone() as Arc<dyn TelemetrySink>,
        Arc::new(TokioClock),
    )
    .expect("valid scheduler")
    .with_max_ticks(config.publish.max_ticks);

    let (_tx, rx) = broadcast::channel(1);
    let report = scheduler.run(rx).await.expect("run to completion");

    assert_eq!(report.ticks, 10);
    assert_eq!(report.published, 10);
    assert_eq!(report.publish_failures, 0);

    let frames = bus.drain();
    assert_eq!(frames.len(), 10);
    let mut previous = 0.0;
    for (channel, frame) in &frames {
        assert_eq!(channel, "bench/deviceState");
        let value = frame
            .value("batteryTempC")
            .expect("default field name carried through");
        assert!(
            (config.signal.min_temp_c..=config.signal.max_temp_c).contains(&value),
            "reading escaped bounds: {value}"
        );
        assert!(frame.elapsed_s > previous, "stamps must strictly increase");
        previous = frame.elapsed_s;
    }
}

#[tokio::test]
async fn shutdown_signal_stops_the_loop_promptly() {
    let config = AppConfig::default();
    let bus = Arc::new(InMemoryBus::new());
    let scheduler = PublishScheduler::new(
        config.publish.rate_hz,
        config.publish.channel.clone(),
        config.publish.field.clone(),
        walk_from(&config),
        bus.clone() as Arc<dyn TelemetrySink>,
        Arc::new(TokioClock),
    )
    .expect("valid scheduler");

    let (tx, rx) = broadcast::channel(1);
    let task = tokio::spawn(scheduler.run(rx));

    tokio::time::sleep(Duration::from_millis(120)).await;
    tx.send(()).expect("scheduler still listening");

    let report = tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("loop exits within one tick of cancellation")
        .expect("task join")
        .expect("run result");

    assert!(report.ticks >= 1, "at least one tick at 20 Hz over 120 ms");
    assert_eq!(report.published, bus.len() as u64);
    assert_eq!(report.ticks, report.published);
}

#[tokio::test]
async fn deterministic_seed_reproduces_the_same_frames() {
    let config = AppConfig::default();
    let mut runs = Vec::new();
    for _ in 0..2 {
        let bus = Arc::new(InMemoryBus::new());
        let scheduler = PublishScheduler::new(
            200.0,
            config.publish.channel.clone(),
            config.publish.field.clone(),
            walk_from(&config),
            bus.clone() as Arc<dyn TelemetrySink>,
            Arc::new(TokioClock),
        )
        .expect("valid scheduler")
        .with_max_ticks(Some(25));
        let (_tx, rx) = broadcast::channel(1);
        scheduler.run(rx).await.expect("run to completion");
        let values: Vec<f64> = bus
            .drain()
            .into_iter()
            .map(|(_, frame)| frame.value("batteryTempC").expect("reading present"))
            .collect();
        runs.push(values);
    }
    assert_eq!(runs[0], runs[1], "same seed must replay the same walk");
}

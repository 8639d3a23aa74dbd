//! End-to-end scheduling flows on a paused Tokio clock.

use sim_core::{ExportError, SimulationParameters};
use sim_session::config::SimulatorConfig;
use sim_session::scheduler::GenerationScheduler;
use sim_session::state::GenerationState;
use std::time::Duration;
use tokio::time::{advance, sleep};

fn scheduler() -> GenerationScheduler {
    let config = SimulatorConfig {
        seed: Some(2024),
        ..SimulatorConfig::default()
    };
    GenerationScheduler::from_config(&config)
}

#[tokio::test(start_paused = true)]
async fn mount_commits_default_paths() {
    let scheduler = scheduler();
    scheduler.mount();

    let snapshot = scheduler.wait_until_settled().await;
    assert_eq!(snapshot.state, GenerationState::Committed { request_id: 1 });
    assert_eq!(snapshot.error, None);

    let committed = scheduler.committed().unwrap();
    assert_eq!(committed.parameters(), &SimulationParameters::default());

    let series = committed.series();
    assert_eq!(series.len(), 513);
    assert_eq!(series.points()[0].values, [0.0; 3]);
    assert_eq!(series.points()[0].time, 0.0);
    for stats in committed.statistics() {
        assert!(stats.max_value >= 0.0);
        assert!(stats.min_value <= 0.0);
        assert!(stats.range >= 0.0);
    }
}

#[tokio::test(start_paused = true)]
async fn repeated_mount_generates_once() {
    let scheduler = scheduler();
    scheduler.mount();
    scheduler.mount();
    scheduler.wait_until_settled().await;
    scheduler.mount();

    let snapshot = scheduler.wait_until_settled().await;
    assert_eq!(snapshot.counters.started, 1);
    assert_eq!(snapshot.last_issued_id, 1);
}

#[tokio::test(start_paused = true)]
async fn invalid_hurst_surfaces_error_without_generating() {
    let scheduler = scheduler();
    scheduler.set_hurst(0.05);

    sleep(Duration::from_secs(1)).await;
    let snapshot = scheduler.snapshot();
    assert_eq!(
        snapshot.error.as_deref(),
        Some("Hurst exponent must be between 0.1 and 0.9")
    );
    assert!(matches!(snapshot.state, GenerationState::Failed { .. }));
    assert_eq!(snapshot.counters.started, 0);
    assert_eq!(snapshot.last_issued_id, 0);
    assert!(scheduler.committed().is_none());
}

#[tokio::test(start_paused = true)]
async fn rapid_changes_collapse_into_latest() {
    let scheduler = scheduler();
    scheduler.set_hurst(0.3);
    advance(Duration::from_millis(100)).await;
    scheduler.set_hurst(0.7);

    let snapshot = scheduler.wait_until_settled().await;
    assert_eq!(snapshot.counters.started, 1);
    assert_eq!(snapshot.counters.superseded, 1);
    assert_eq!(snapshot.committed_id, Some(snapshot.last_issued_id));
    assert_eq!(scheduler.committed().unwrap().parameters().hurst, 0.7);
}

#[tokio::test(start_paused = true)]
async fn newer_request_supersedes_in_flight_generation() {
    let scheduler = scheduler();
    scheduler.generate();
    scheduler.set_num_points(128);
    scheduler.generate();

    let snapshot = scheduler
        .wait_for(|s| s.committed_id.is_some() && s.counters.superseded >= 2)
        .await;
    // Request 1 ran but lost, request 2 was a cancelled debounce, request 3 commits
    assert_eq!(snapshot.committed_id, Some(3));
    assert_eq!(
        scheduler.inspect(|m| m.request_state(1).cloned()),
        Some(GenerationState::Superseded { request_id: 1 })
    );
    assert_eq!(scheduler.committed().unwrap().series().len(), 129);
}

#[tokio::test(start_paused = true)]
async fn changes_inside_throttle_window_are_dropped() {
    let scheduler = scheduler();
    scheduler.mount();
    scheduler.wait_until_settled().await;

    scheduler.set_hurst(0.3);
    let snapshot = scheduler.wait_until_settled().await;
    assert_eq!(snapshot.counters.throttled, 1);
    assert_eq!(snapshot.parameters.hurst, 0.3);
    assert_eq!(snapshot.committed_parameters.unwrap().hurst, 0.5);

    advance(Duration::from_millis(2100)).await;
    scheduler.set_hurst(0.7);
    let snapshot = scheduler.wait_until_settled().await;
    assert_eq!(snapshot.committed_parameters.unwrap().hurst, 0.7);
    assert_eq!(snapshot.counters.committed, 2);
}

#[tokio::test(start_paused = true)]
async fn manual_generate_ignores_throttle() {
    let scheduler = scheduler();
    scheduler.mount();
    scheduler.wait_until_settled().await;

    scheduler.set_time_length(5.0);
    scheduler.generate();
    let snapshot = scheduler.wait_until_settled().await;
    assert_eq!(snapshot.committed_parameters.unwrap().time_length, 5.0);

    let last = scheduler.committed().unwrap().series().last().copied().unwrap();
    assert_eq!(last.time, 5.0);
}

#[tokio::test(start_paused = true)]
async fn reset_discards_in_flight_generation() {
    let scheduler = scheduler();
    scheduler.mount();
    assert!(scheduler.snapshot().is_generating);

    scheduler.reset();
    let snapshot = scheduler.snapshot();
    assert_eq!(snapshot.state, GenerationState::Idle);
    assert_eq!(snapshot.parameters, SimulationParameters::default());

    let snapshot = scheduler.wait_for(|s| s.counters.superseded == 1).await;
    assert_eq!(snapshot.committed_id, None);
    assert_eq!(snapshot.state, GenerationState::Idle);
    assert!(scheduler.committed().is_none());
}

#[tokio::test(start_paused = true)]
async fn reset_keeps_parameters_and_allows_new_generation() {
    let scheduler = scheduler();
    scheduler.set_hurst(0.3);
    scheduler.wait_until_settled().await;

    scheduler.reset();
    assert!(scheduler.committed().is_none());
    assert_eq!(scheduler.parameters().hurst, 0.3);

    scheduler.generate();
    let snapshot = scheduler.wait_until_settled().await;
    assert_eq!(snapshot.committed_id, Some(2));
}

#[tokio::test(start_paused = true)]
async fn export_without_data_sets_visible_error() {
    let scheduler = scheduler();

    assert!(matches!(scheduler.export(), Err(ExportError::NoData)));
    assert_eq!(
        scheduler.snapshot().error.as_deref(),
        Some("No data to export")
    );

    scheduler.dismiss_error();
    assert_eq!(scheduler.snapshot().error, None);
}

#[tokio::test(start_paused = true)]
async fn export_writes_committed_paths() {
    let dir = tempfile::tempdir().unwrap();
    let scheduler = scheduler();
    scheduler.set_parameters(SimulationParameters::new(0.7, 256, 1.0));
    scheduler.wait_until_settled().await;

    let artifact = scheduler.export().unwrap();
    let path = artifact.write_to(dir.path()).unwrap();

    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.starts_with("# Fractional Brownian Motion paths\n"));
    assert!(content.contains("# Hurst: 0.7\n# NumPoints: 256\n# TimeLength: 1\n"));
    assert_eq!(content.lines().count(), 6 + 257);
    assert!(artifact.file_name.starts_with("fbm_paths_H0.70_"));
}

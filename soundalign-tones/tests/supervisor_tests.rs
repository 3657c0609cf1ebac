//! Liveness supervisor tests

mod helpers;

use helpers::{failing_write_factory, Capture};
use soundalign_common::Direction;
use soundalign_tones::playback::spawn_liveness_supervisor;
use soundalign_tones::{SynthesisParameters, ToneEngine};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

const PERIOD: Duration = Duration::from_millis(50);

/// Start an engine whose first write kills the worker, and kill it
async fn engine_with_dead_worker(capture: &Arc<Capture>) -> Arc<ToneEngine> {
    let engine = Arc::new(ToneEngine::new(
        SynthesisParameters::default(),
        failing_write_factory(capture, 1),
    ));
    engine.start().unwrap();
    engine
        .play_progress_sound(Some(10.0), Direction::Center)
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(3);
    while engine.is_worker_alive() && Instant::now() < deadline {
        sleep(Duration::from_millis(10)).await;
    }
    assert!(!engine.is_worker_alive());
    engine
}

#[tokio::test(flavor = "multi_thread")]
async fn test_supervisor_restarts_dead_worker() {
    let capture = Capture::new();
    let engine = engine_with_dead_worker(&capture).await;

    let handle = spawn_liveness_supervisor(Arc::clone(&engine), PERIOD);

    let deadline = Instant::now() + Duration::from_secs(3);
    while capture.opens() < 2 && Instant::now() < deadline {
        sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(capture.opens(), 2);
    assert!(engine.is_worker_alive());
    assert_eq!(engine.status().restarts, 1);

    // Shutting the engine down ends the supervisor
    let stopper = Arc::clone(&engine);
    tokio::task::spawn_blocking(move || stopper.stop(Duration::from_secs(2)))
        .await
        .unwrap();
    assert!(timeout(Duration::from_secs(1), handle).await.is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_supervisor_skips_disabled_engine() {
    let capture = Capture::new();
    let engine = engine_with_dead_worker(&capture).await;
    engine.set_enabled(false);

    let handle = spawn_liveness_supervisor(Arc::clone(&engine), PERIOD);
    sleep(PERIOD * 6).await;
    assert_eq!(capture.opens(), 1);
    assert!(!engine.is_worker_alive());

    // Re-enabling lets the next check restart it
    engine.set_enabled(true);
    let deadline = Instant::now() + Duration::from_secs(3);
    while !engine.is_worker_alive() && Instant::now() < deadline {
        sleep(Duration::from_millis(10)).await;
    }
    assert!(engine.is_worker_alive());

    handle.abort();
    let stopper = Arc::clone(&engine);
    tokio::task::spawn_blocking(move || stopper.stop(Duration::from_secs(2)))
        .await
        .unwrap();
}

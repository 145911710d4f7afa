//! Live API tests against a running tile lab server.
//! Run with: `TILESET_LAB_API_URL=http://host/api cargo test --features online -- --nocapture`
#![cfg(feature = "online")]

use std::sync::Arc;
use std::time::Duration;
use tileset_lab::{Client, JobRef, PollState, spawn_poller};

fn env_id(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[test]
fn dataset_progress_is_readable() {
    let client = Client::from_env().unwrap();
    let job = JobRef::DatasetIngestion {
        dataset_id: env_id("TLAB_DATASET", 1),
    };
    let p = client.job_progress(&job).unwrap();
    assert!((0.0..=100.0).contains(&p.progress));
}

#[test]
fn tileset_poll_reaches_a_terminal_state() {
    let client = Client::from_env().unwrap();
    let job = JobRef::TilesetGeneration {
        dataset_id: env_id("TLAB_DATASET", 1),
        tileset_id: env_id("TLAB_TILESET", 1),
    };
    let view = spawn_poller(Arc::new(client), job, Duration::from_millis(500), |_| {})
        .join()
        .unwrap();
    assert!(matches!(view.state, PollState::Completed | PollState::Failed));
}

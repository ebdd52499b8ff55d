//! End-to-end scan and join scenarios against the mock wireless host.
//!
//! # Purpose
//!
//! These tests wire the real controller, sequencer, and credential sources to
//! `MockWirelessHost` and check the observable behaviour of whole runs:
//!
//! - Which join requests reach the host, and in what order.
//! - How each run ends, and the sequencer state it leaves behind.
//! - Progress reported through the event channel.
//! - The scan flow, including a permission denial and the release of the
//!   results subscription.
//! - Cancellation through the shared running flag.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use netjoin_app::application::join_attempt::{
    JoinAttemptController, JoinConfig, JoinOutcome, JoinPrimitive, TrialEvent,
};
use netjoin_app::application::scan_networks::{NetworkScanCoordinator, ScanError, ScanPrimitive};
use netjoin_app::application::HostError;
use netjoin_app::infrastructure::host::mock::MockWirelessHost;
use netjoin_core::{
    DirectoryCredentialSource, InMemoryCredentialSource, NetworkDescriptor, SequencerState,
    TrialSequencer,
};
use tokio::sync::mpsc;
use uuid::Uuid;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn controller_for(
    source: InMemoryCredentialSource,
    host: Arc<MockWirelessHost>,
) -> JoinAttemptController {
    JoinAttemptController::new(
        TrialSequencer::new(Arc::new(source)),
        host as Arc<dyn JoinPrimitive>,
        JoinConfig::immediate(),
    )
}

fn joined_credentials(host: &MockWirelessHost) -> Vec<String> {
    host.joins
        .lock()
        .unwrap()
        .iter()
        .map(|(_, credential)| credential.clone())
        .collect()
}

async fn collect_events(mut rx: mpsc::Receiver<TrialEvent>) -> Vec<TrialEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

// ── Join runs ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_failing_network_walks_every_round_then_resets() {
    // Arrange
    let host = Arc::new(MockWirelessHost::new().with_network("Lab", None));
    let source = InMemoryCredentialSource::new()
        .with_round(1, ["aaa", "bbb"])
        .with_round(2, ["ccc"]);
    let mut controller = controller_for(source, Arc::clone(&host));
    let running = AtomicBool::new(true);

    // Act
    let report = controller.attempt(&NetworkDescriptor::new("Lab"), &running).await;

    // Assert
    assert_eq!(report.outcome, JoinOutcome::Exhausted);
    assert_eq!(report.attempts, 3);
    assert_eq!(joined_credentials(&host), vec!["aaa", "bbb", "ccc"]);
    assert_eq!(controller.sequencer().state(), &SequencerState::default());
}

#[tokio::test]
async fn test_matching_candidate_joins_and_keeps_position() {
    // Arrange
    let host = Arc::new(MockWirelessHost::new().with_network("Lab", Some("secret2")));
    let source = InMemoryCredentialSource::new().with_round(1, ["secret1", "secret2"]);
    let mut controller = controller_for(source, Arc::clone(&host));
    let running = AtomicBool::new(true);

    // Act
    let report = controller.attempt(&NetworkDescriptor::new("Lab"), &running).await;

    // Assert
    assert_eq!(report.outcome, JoinOutcome::Succeeded { round: 1, position: 2 });
    assert_eq!(report.attempts, 2);
    assert_eq!(host.join_count(), 2);
    assert_eq!(controller.sequencer().state().within_round_index, 1);
    assert_eq!(host.active_network_name().await, Some("\"Lab\"".to_string()));
}

#[tokio::test]
async fn test_no_rounds_exhausts_without_joining() {
    let host = Arc::new(MockWirelessHost::new().with_network("Lab", Some("x")));
    let mut controller = controller_for(InMemoryCredentialSource::new(), Arc::clone(&host));
    let running = AtomicBool::new(true);

    let report = controller.attempt(&NetworkDescriptor::new("Lab"), &running).await;

    assert_eq!(report.outcome, JoinOutcome::Exhausted);
    assert_eq!(report.attempts, 0);
    assert_eq!(host.join_count(), 0);
}

#[tokio::test]
async fn test_round_files_on_disk_drive_the_run() {
    // Arrange – round 2 is missing and skipped
    let dir: PathBuf = std::env::temp_dir().join(format!("netjoin_join_{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("1.txt"), "alpha\nbeta\n").unwrap();
    std::fs::write(dir.join("3.txt"), "gamma\n").unwrap();

    let host = Arc::new(MockWirelessHost::new().with_network("Lab", Some("gamma")));
    let mut controller = JoinAttemptController::new(
        TrialSequencer::new(Arc::new(DirectoryCredentialSource::new(&dir))),
        Arc::clone(&host) as Arc<dyn JoinPrimitive>,
        JoinConfig::immediate(),
    );
    let running = AtomicBool::new(true);

    // Act
    let report = controller.attempt(&NetworkDescriptor::new("Lab"), &running).await;

    // Assert
    assert_eq!(report.outcome, JoinOutcome::Succeeded { round: 3, position: 1 });
    assert_eq!(joined_credentials(&host), vec!["alpha", "beta", "gamma"]);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_failing_host_counts_every_attempt_as_failure() {
    let host = Arc::new(MockWirelessHost::new().with_network("Lab", Some("aaa")).failing());
    let source = InMemoryCredentialSource::new().with_round(1, ["aaa", "bbb"]);
    let mut controller = controller_for(source, Arc::clone(&host));
    let running = AtomicBool::new(true);

    let report = controller.attempt(&NetworkDescriptor::new("Lab"), &running).await;

    assert_eq!(report.outcome, JoinOutcome::Exhausted);
    assert_eq!(host.join_count(), 2);
}

// ── Progress events ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_progress_percentages_follow_position_in_round() {
    // Arrange
    let host = Arc::new(MockWirelessHost::new().with_network("Lab", None));
    let source = InMemoryCredentialSource::new().with_round(1, ["a", "b", "c", "d", "e"]);
    let (tx, rx) = mpsc::channel(64);
    let mut controller = controller_for(source, host).with_events(tx);
    let running = AtomicBool::new(true);

    // Act
    controller.attempt(&NetworkDescriptor::new("Lab"), &running).await;
    drop(controller);
    let events = collect_events(rx).await;

    // Assert
    let progress: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            TrialEvent::Attempting { progress, .. } => Some(progress.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(
        progress,
        vec![
            "1 / 5 (20.00%)",
            "2 / 5 (40.00%)",
            "3 / 5 (60.00%)",
            "4 / 5 (80.00%)",
            "5 / 5 (100.00%)",
        ]
    );
}

#[tokio::test]
async fn test_events_never_carry_candidate_values() {
    let host = Arc::new(MockWirelessHost::new().with_network("Lab", Some("hunter2")));
    let source = InMemoryCredentialSource::new().with_round(1, ["letmein", "hunter2"]);
    let (tx, rx) = mpsc::channel(64);
    let mut controller = controller_for(source, host).with_events(tx);
    let running = AtomicBool::new(true);

    controller.attempt(&NetworkDescriptor::new("Lab"), &running).await;
    drop(controller);
    let events = collect_events(rx).await;

    for event in &events {
        let text = format!("{event:?}");
        assert!(!text.contains("letmein") && !text.contains("hunter2"), "leaked in {text}");
    }
}

// ── Cancellation ──────────────────────────────────────────────────────────────

/// Clears the shared running flag once `stop_after` joins have been issued.
struct StoppingHost {
    running: Arc<AtomicBool>,
    stop_after: usize,
    joins: Mutex<usize>,
}

#[async_trait]
impl JoinPrimitive for StoppingHost {
    async fn join(&self, _network: &NetworkDescriptor, _credential: &str) -> Result<(), HostError> {
        let mut joins = self.joins.lock().unwrap();
        *joins += 1;
        if *joins == self.stop_after {
            self.running.store(false, Ordering::Relaxed);
        }
        Ok(())
    }

    async fn active_network_name(&self) -> Option<String> {
        None
    }
}

#[tokio::test]
async fn test_clearing_running_flag_stops_before_next_join() {
    // Arrange
    let running = Arc::new(AtomicBool::new(true));
    let host = Arc::new(StoppingHost {
        running: Arc::clone(&running),
        stop_after: 2,
        joins: Mutex::new(0),
    });
    let source = InMemoryCredentialSource::new().with_round(1, ["a", "b", "c", "d"]);
    let mut controller = JoinAttemptController::new(
        TrialSequencer::new(Arc::new(source)),
        Arc::clone(&host) as Arc<dyn JoinPrimitive>,
        JoinConfig::immediate(),
    );

    // Act
    let report = controller.attempt(&NetworkDescriptor::new("Lab"), &running).await;

    // Assert – the cancelled run keeps its place in the round
    assert_eq!(report.outcome, JoinOutcome::Cancelled);
    assert_eq!(report.attempts, 2);
    assert_eq!(*host.joins.lock().unwrap(), 2);
    assert_eq!(controller.sequencer().state().within_round_index, 2);
}

// ── Scanning ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_scan_then_join_selected_network() {
    // Arrange
    let host = Arc::new(
        MockWirelessHost::new()
            .with_network("", None)
            .with_network("Office", None)
            .with_network("Lab", Some("bbb")),
    );
    let mut coordinator = NetworkScanCoordinator::new(Arc::clone(&host) as Arc<dyn ScanPrimitive>);

    // Act – scan
    coordinator.start_scan().expect("scan starts");
    let names: Vec<String> = coordinator
        .wait_for_results()
        .await
        .expect("results arrive")
        .iter()
        .map(|d| d.name.clone())
        .collect();
    let target = coordinator.select("Lab").expect("Lab is listed");

    // Act – join
    let source = InMemoryCredentialSource::new().with_round(1, ["aaa", "bbb"]);
    let mut controller = controller_for(source, Arc::clone(&host));
    let running = AtomicBool::new(true);
    let report = controller.attempt(&target, &running).await;

    // Assert
    assert_eq!(names, vec!["Office", "Lab"]);
    assert_eq!(report.outcome, JoinOutcome::Succeeded { round: 1, position: 2 });
}

#[tokio::test]
async fn test_permission_denied_prevents_scan() {
    let host = Arc::new(MockWirelessHost::new().with_network("Lab", None).denying_permission());
    let mut coordinator = NetworkScanCoordinator::new(Arc::clone(&host) as Arc<dyn ScanPrimitive>);

    let result = coordinator.start_scan();

    assert_eq!(result, Err(ScanError::PermissionDenied));
    assert_eq!(*host.scans_started.lock().unwrap(), 0);
    assert_eq!(host.active_subscriptions(), 0);
    assert!(coordinator.networks().is_empty());
}

#[tokio::test]
async fn test_stop_and_drop_release_subscription() {
    let host = Arc::new(MockWirelessHost::new().with_network("Lab", None));

    let mut coordinator = NetworkScanCoordinator::new(Arc::clone(&host) as Arc<dyn ScanPrimitive>);
    coordinator.start_scan().unwrap();
    assert_eq!(host.active_subscriptions(), 1);
    coordinator.stop();
    assert_eq!(host.active_subscriptions(), 0);

    let mut second = NetworkScanCoordinator::new(Arc::clone(&host) as Arc<dyn ScanPrimitive>);
    second.start_scan().unwrap();
    assert_eq!(host.active_subscriptions(), 1);
    drop(second);
    assert_eq!(host.active_subscriptions(), 0);
}

#[tokio::test]
async fn test_wait_without_scan_is_not_started() {
    let host = Arc::new(MockWirelessHost::new());
    let mut coordinator = NetworkScanCoordinator::new(host as Arc<dyn ScanPrimitive>);

    let result = coordinator.wait_for_results().await;

    assert_eq!(result.err(), Some(ScanError::NotStarted));
}

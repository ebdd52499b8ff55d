//! JoinAttemptController: tries candidate credentials against one network.
//!
//! # The trial loop (for beginners)
//!
//! Joining is fire-and-forget on every host we support: the join call returns
//! before the radio has associated, and the only way to learn the result is to
//! wait and then ask the host which network it is connected to.  One trial
//! therefore looks like this:
//!
//! ```text
//! peek candidate ──► host.join(target, candidate) ──► sleep(verify_delay)
//!        ▲                                                   │
//!        │                                 host.active_network_name()
//!        │                                                   │
//!        └──── Failure: sequencer.on_failure() ◄─── compare with target
//!                                                            │
//!                                              Success: stop, keep state
//! ```
//!
//! Trials are strictly sequential: the next join request is never issued
//! before the previous verification delay has elapsed.  The loop ends on
//! success, on exhaustion of every credential round (after which the
//! sequencer is reset so the next run starts from round 1), or when the
//! caller clears the `running` flag.
//!
//! Candidate values are passed to the host and nowhere else: events and log
//! lines only carry positions and counts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use netjoin_core::{NetworkDescriptor, NextCandidate, TrialOutcome, TrialProgress, TrialSequencer};
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::HostError;

/// Host operations needed to try one credential.
///
/// Infrastructure implementations call the platform's wireless API; test
/// implementations record calls.
#[async_trait]
pub trait JoinPrimitive: Send + Sync {
    /// Asks the host to join `network` using `credential`.
    ///
    /// Returning `Ok` only means the request was accepted, not that the
    /// network was joined.
    async fn join(&self, network: &NetworkDescriptor, credential: &str) -> Result<(), HostError>;

    /// Name of the network the host is currently connected to, if any.
    async fn active_network_name(&self) -> Option<String>;
}

/// Timing of the trial loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinConfig {
    /// Pause before the first join request of a run.
    pub start_delay: Duration,
    /// Pause between a join request and the connection-state check.
    pub verify_delay: Duration,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_millis(100),
            verify_delay: Duration::from_secs(1),
        }
    }
}

impl JoinConfig {
    /// A configuration with no delays, for simulations and tests.
    pub fn immediate() -> Self {
        Self {
            start_delay: Duration::ZERO,
            verify_delay: Duration::ZERO,
        }
    }
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialEvent {
    /// A join request is about to be issued.
    Attempting { network: String, progress: TrialProgress },
    /// The attempt was verified as failed.
    Failed { network: String, progress: TrialProgress },
    /// The host reports the target network as connected.
    Succeeded { network: String, attempts: usize },
    /// Every credential round has been tried.
    Exhausted { network: String, attempts: usize },
    /// The caller stopped the run.
    Cancelled { network: String, attempts: usize },
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Joined using the candidate at `position` (1-based) of `round`.
    Succeeded { round: u32, position: usize },
    /// No candidate worked; the sequencer has been reset.
    Exhausted,
    /// Stopped by the caller; the sequencer keeps its position.
    Cancelled,
}

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinReport {
    /// Identifies the run in log output.
    pub run_id: Uuid,
    pub network: NetworkDescriptor,
    /// Join requests issued during this run.
    pub attempts: usize,
    pub outcome: JoinOutcome,
}

/// The join-attempt use case.
///
/// Owns the [`TrialSequencer`]; attempts never interleave because
/// [`attempt`](Self::attempt) takes `&mut self`.
pub struct JoinAttemptController {
    sequencer: TrialSequencer,
    host: Arc<dyn JoinPrimitive>,
    config: JoinConfig,
    events: Option<mpsc::Sender<TrialEvent>>,
}

impl JoinAttemptController {
    /// Creates a controller without an event channel.
    pub fn new(sequencer: TrialSequencer, host: Arc<dyn JoinPrimitive>, config: JoinConfig) -> Self {
        Self {
            sequencer,
            host,
            config,
            events: None,
        }
    }

    /// Sends every [`TrialEvent`] to `events`.
    ///
    /// Sends wait for channel capacity, so the receiver must be drained.
    pub fn with_events(mut self, events: mpsc::Sender<TrialEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// The sequencer driving this controller.
    pub fn sequencer(&self) -> &TrialSequencer {
        &self.sequencer
    }

    /// Runs trials against `target` until success, exhaustion, or until
    /// `running` is cleared.
    ///
    /// `running` is checked before each join request, so a cancelled run
    /// stops within one verification delay.
    pub async fn attempt(&mut self, target: &NetworkDescriptor, running: &AtomicBool) -> JoinReport {
        let run_id = Uuid::new_v4();
        info!(%run_id, "starting join run for {target}");

        if !self.config.start_delay.is_zero() {
            time::sleep(self.config.start_delay).await;
        }

        let mut attempts = 0usize;
        loop {
            if !running.load(Ordering::Relaxed) {
                info!(%run_id, "join run for {target} cancelled after {attempts} attempts");
                self.emit(TrialEvent::Cancelled { network: target.name.clone(), attempts })
                    .await;
                return Self::report(run_id, target, attempts, JoinOutcome::Cancelled);
            }

            let candidate = match self.sequencer.peek() {
                NextCandidate::Candidate(candidate) => candidate,
                NextCandidate::Exhausted => {
                    info!(%run_id, "candidates exhausted for {target} after {attempts} attempts");
                    self.sequencer.reset();
                    self.emit(TrialEvent::Exhausted { network: target.name.clone(), attempts })
                        .await;
                    return Self::report(run_id, target, attempts, JoinOutcome::Exhausted);
                }
            };

            attempts += 1;
            let progress = TrialProgress {
                round: candidate.round,
                attempt_in_round: candidate.position,
                round_size: candidate.round_size,
                total_attempts: attempts,
            };
            debug!(%run_id, "round {}: trying candidate {progress}", candidate.round);
            self.emit(TrialEvent::Attempting { network: target.name.clone(), progress })
                .await;

            if let Err(e) = self.host.join(target, &candidate.value).await {
                warn!(%run_id, "join request for {target} rejected: {e}");
            }
            time::sleep(self.config.verify_delay).await;

            let active = self.host.active_network_name().await;
            match TrialOutcome::from_active_network(target, active.as_deref()) {
                TrialOutcome::Success => {
                    self.sequencer.on_success();
                    info!(%run_id, "joined {target} after {attempts} attempts");
                    self.emit(TrialEvent::Succeeded { network: target.name.clone(), attempts })
                        .await;
                    return Self::report(
                        run_id,
                        target,
                        attempts,
                        JoinOutcome::Succeeded {
                            round: candidate.round,
                            position: candidate.position,
                        },
                    );
                }
                TrialOutcome::Failure => {
                    debug!(%run_id, "attempt {attempts} failed; active network is {active:?}");
                    self.sequencer.on_failure();
                    self.emit(TrialEvent::Failed { network: target.name.clone(), progress })
                        .await;
                }
            }
        }
    }

    async fn emit(&self, event: TrialEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).await.is_err() {
                debug!("trial event receiver dropped");
            }
        }
    }

    fn report(
        run_id: Uuid,
        target: &NetworkDescriptor,
        attempts: usize,
        outcome: JoinOutcome,
    ) -> JoinReport {
        JoinReport {
            run_id,
            network: target.clone(),
            attempts,
            outcome,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

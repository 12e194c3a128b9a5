//! The concurrent load dispatcher: per-target worker pools coordinating
//! through an atomic countdown, streaming outcomes as they complete.
mod counter;


pub use counter::RemainingCounter;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::types::{StressConfig, Target};
use crate::outcome::{OutcomeKind, RequestOutcome};
use crate::request::RequestBuilder;
use crate::shutdown::StopReceiver;
use crate::transport::{HttpTransport, TransportReply};

/// Dispatches every target's worker pool.
///
/// Policy (fixed): pools of different targets run overlapped, and their
/// outcomes interleave on the one `outcome_tx` stream in completion
/// order. No ordering is guaranteed across targets. The sender is
/// consumed so the stream closes exactly when the last pool finishes.
pub async fn run_all(
    config: &StressConfig,
    transport: Arc<dyn HttpTransport>,
    outcome_tx: mpsc::Sender<RequestOutcome>,
    stop_rx: StopReceiver,
) {
    let mut handles = Vec::with_capacity(config.targets.len());
    for (target_index, target) in config.targets.iter().enumerate() {
        let target = target.clone();
        let transport = Arc::clone(&transport);
        let outcome_tx = outcome_tx.clone();
        let stop_rx = stop_rx.clone();
        handles.push(tokio::spawn(async move {
            run_target(target_index, &target, transport, outcome_tx, stop_rx).await;
        }));
    }
    drop(outcome_tx);

    for handle in handles {
        if let Err(err) = handle.await {
            error!("Target pool task failed: {}", err);
        }
    }
}

/// Runs one target: exactly `concurrency` workers sharing one atomic
/// remaining-count counter initialized to `count`.
///
/// An uncancelled run records exactly `count` outcomes however many
/// attempts fail; a cancelled run stops claiming but still delivers every
/// outcome that completed.
pub async fn run_target(
    target_index: usize,
    target: &Target,
    transport: Arc<dyn HttpTransport>,
    outcome_tx: mpsc::Sender<RequestOutcome>,
    stop_rx: StopReceiver,
) {
    // One-time resolution (pattern compile, header/cookie/auth parsing,
    // body-file read) happens here; a failure is replayed per attempt.
    let builder = Arc::new(RequestBuilder::new(target));
    let counter = Arc::new(RemainingCounter::new(target.count));
    let workers = usize::try_from(target.concurrency).unwrap_or(usize::MAX);

    info!(
        "Target {}: {} request(s) across {} worker(s) against {}.",
        target_index, target.count, target.concurrency, target.url
    );

    let mut worker_handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let builder = Arc::clone(&builder);
        let counter = Arc::clone(&counter);
        let transport = Arc::clone(&transport);
        let outcome_tx = outcome_tx.clone();
        let stop_rx = stop_rx.clone();
        worker_handles.push(tokio::spawn(async move {
            worker_loop(target_index, builder, counter, transport, outcome_tx, stop_rx).await;
        }));
    }

    for handle in worker_handles {
        if let Err(err) = handle.await {
            error!("Worker task failed: {}", err);
        }
    }

    let unclaimed = counter.remaining();
    if unclaimed > 0 {
        info!(
            "Target {}: stopped with {} request(s) unclaimed.",
            target_index, unclaimed
        );
    } else {
        debug!("Target {}: all requests claimed.", target_index);
    }
}

async fn worker_loop(
    target_index: usize,
    builder: Arc<RequestBuilder>,
    counter: Arc<RemainingCounter>,
    transport: Arc<dyn HttpTransport>,
    outcome_tx: mpsc::Sender<RequestOutcome>,
    stop_rx: StopReceiver,
) {
    loop {
        // The stop flag is checked between claims only; an in-flight
        // request is bounded by its own timeout, never force-aborted.
        if *stop_rx.borrow() {
            break;
        }
        if !counter.claim() {
            break;
        }
        let outcome = run_attempt(target_index, &builder, transport.as_ref()).await;
        if outcome_tx.send(outcome).await.is_err() {
            // Aggregator went away; nothing left to report to.
            break;
        }
    }
}

async fn run_attempt(
    target_index: usize,
    builder: &RequestBuilder,
    transport: &dyn HttpTransport,
) -> RequestOutcome {
    let started_at = Utc::now();
    let descriptor = match builder.build(&mut rand::thread_rng()) {
        Ok(descriptor) => descriptor,
        Err(err) => {
            error!("Failed to build request: {}", err);
            return RequestOutcome {
                target_index,
                started_at,
                latency: Duration::ZERO,
                kind: OutcomeKind::BuildFailed {
                    reason: err.to_string(),
                },
                response_bytes: 0,
            };
        }
    };

    let start = Instant::now();
    let reply = transport.execute(&descriptor).await;
    let latency = start.elapsed();

    let (kind, response_bytes) = match reply {
        TransportReply::Response {
            status,
            response_bytes,
        } => (OutcomeKind::Response { status }, response_bytes),
        TransportReply::TimedOut => {
            warn!("Request to {} timed out.", descriptor.url);
            (OutcomeKind::TimedOut, 0)
        }
        TransportReply::Failed { reason } => {
            warn!("Request to {} failed: {}", descriptor.url, reason);
            (OutcomeKind::TransportFailed { reason }, 0)
        }
    };

    RequestOutcome {
        target_index,
        started_at,
        latency,
        kind,
        response_bytes,
    }
}

//! Poll loop implementation

use super::{CycleReport, PollStatus};
use crate::feed::{FeedFetcher, FeedKind, FeedRecord, FetchError};
use crate::hub::Broadcaster;
use crate::snapshot::SnapshotStore;
use crate::telemetry::{increment_counter, record_latency, CounterMetric, LatencyMetric};
use chrono::Utc;
use futures_util::future::join_all;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Fetch -> store -> broadcast, forever
pub struct PollLoop {
    fetchers: Vec<Arc<dyn FeedFetcher>>,
    store: Arc<SnapshotStore>,
    broadcaster: Arc<Broadcaster>,
    status: Arc<PollStatus>,
    interval: Duration,
}

impl PollLoop {
    pub fn new(
        fetchers: Vec<Arc<dyn FeedFetcher>>,
        store: Arc<SnapshotStore>,
        broadcaster: Arc<Broadcaster>,
        status: Arc<PollStatus>,
        interval: Duration,
    ) -> Self {
        Self {
            fetchers,
            store,
            broadcaster,
            status,
            interval,
        }
    }

    /// Run cycles until the task is dropped
    ///
    /// A panic inside a cycle is logged and the loop carries on after the
    /// usual sleep.
    pub async fn run(&self) {
        tracing::info!(
            feeds = self.fetchers.len(),
            interval_secs = self.interval.as_secs_f64(),
            "Poll loop started"
        );

        loop {
            match AssertUnwindSafe(self.run_cycle()).catch_unwind().await {
                Ok(report) => {
                    tracing::info!(
                        succeeded = ?report.succeeded,
                        failed = ?report.failed,
                        delivered = report.delivered,
                        pruned = report.pruned,
                        "Poll cycle complete"
                    );
                    self.status.record(report).await;
                }
                Err(panic) => {
                    increment_counter(CounterMetric::CycleAborted, 1);
                    tracing::error!(reason = %panic_message(panic.as_ref()), "Poll cycle aborted");
                }
            }

            sleep(self.interval).await;
        }
    }

    /// Run exactly one cycle
    ///
    /// All fetchers run concurrently; the broadcast happens only after every
    /// one of them has resolved, even if all failed.
    pub async fn run_cycle(&self) -> CycleReport {
        let started = Instant::now();

        let outcomes = join_all(self.fetchers.iter().map(|f| fetch_one(f.as_ref()))).await;

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (kind, outcome) in outcomes {
            match outcome {
                Ok(record) => {
                    self.store.write(record).await;
                    succeeded.push(kind);
                }
                Err(e) => {
                    tracing::warn!(feed = %kind, error = %e, "Feed fetch failed; keeping previous value");
                    failed.push(kind);
                }
            }
        }

        let snapshot = self.store.read_all().await;
        let broadcast = self.broadcaster.publish(&snapshot).await;

        record_latency(LatencyMetric::PollCycle, started.elapsed());

        CycleReport {
            finished_at: Utc::now(),
            succeeded,
            failed,
            delivered: broadcast.delivered,
            pruned: broadcast.pruned,
        }
    }
}

/// One fetch, with a panicking fetcher reported as a failure of its own feed
async fn fetch_one(fetcher: &dyn FeedFetcher) -> (FeedKind, Result<FeedRecord, FetchError>) {
    let kind = fetcher.kind();
    let started = Instant::now();

    let outcome = match AssertUnwindSafe(fetcher.fetch()).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(panic) => Err(FetchError::Panicked(panic_message(panic.as_ref()))),
    };

    record_latency(LatencyMetric::Fetch(kind), started.elapsed());
    match &outcome {
        Ok(_) => increment_counter(CounterMetric::FetchSucceeded(kind), 1),
        Err(_) => increment_counter(CounterMetric::FetchFailed(kind), 1),
    }

    (kind, outcome)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

//! Prometheus metrics
//!
//! Recorded through the `metrics` facade; without an installed exporter
//! every call is a no-op.

use crate::feed::FeedKind;
use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// One fetcher call
    Fetch(FeedKind),
    /// One full poll cycle, fetches and broadcast included
    PollCycle,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Registered WebSocket connections
    ActiveConnections,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Fetch returned a record
    FetchSucceeded(FeedKind),
    /// Fetch failed and the previous value was kept
    FetchFailed(FeedKind),
    /// Snapshot messages queued to clients
    BroadcastDelivered,
    /// Connections dropped after a failed send
    ConnectionPruned,
    /// Poll cycles aborted by a panic
    CycleAborted,
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let value_ms = duration.as_secs_f64() * 1000.0;
    match metric {
        LatencyMetric::Fetch(kind) => {
            ::metrics::histogram!("feeddash_fetch_latency_ms", "feed" => kind.as_str())
                .record(value_ms);
        }
        LatencyMetric::PollCycle => {
            ::metrics::histogram!("feeddash_poll_cycle_latency_ms").record(value_ms);
        }
    }
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    match metric {
        GaugeMetric::ActiveConnections => {
            ::metrics::gauge!("feeddash_active_connections").set(value);
        }
    }
}

/// Increment a counter
pub fn increment_counter(metric: CounterMetric, value: u64) {
    if value == 0 {
        return;
    }
    match metric {
        CounterMetric::FetchSucceeded(kind) => {
            ::metrics::counter!("feeddash_fetch_total", "feed" => kind.as_str(), "outcome" => "ok")
                .increment(value);
        }
        CounterMetric::FetchFailed(kind) => {
            ::metrics::counter!("feeddash_fetch_total", "feed" => kind.as_str(), "outcome" => "error")
                .increment(value);
        }
        CounterMetric::BroadcastDelivered => {
            ::metrics::counter!("feeddash_broadcast_delivered_total").increment(value);
        }
        CounterMetric::ConnectionPruned => {
            ::metrics::counter!("feeddash_connections_pruned_total").increment(value);
        }
        CounterMetric::CycleAborted => {
            ::metrics::counter!("feeddash_poll_cycles_aborted_total").increment(value);
        }
    }
}

/// Install the Prometheus recorder with a scrape listener on `port`
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics endpoint listening");
    Ok(())
}

//! feed-dash: live dashboard for public data feeds
//!
//! This library provides the core components for:
//! - Polling seismic, weather and crypto HTTP feeds
//! - Caching the latest normalized snapshot in memory
//! - Broadcasting snapshots to WebSocket clients
//! - Serving the snapshot and dashboard page over HTTP
//! - Structured logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod feed;
pub mod hub;
pub mod poll;
pub mod server;
pub mod service;
pub mod snapshot;
pub mod telemetry;

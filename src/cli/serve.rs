//! Serve command implementation

use crate::config::Config;
use crate::server;
use crate::service::Dashboard;
use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address (overrides `server.bind_addr`)
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Static asset directory (overrides `server.static_dir`)
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Seconds between poll cycles (overrides `poll.interval_secs`)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
}

impl ServeArgs {
    /// Fold command-line overrides into the loaded configuration
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(bind) = self.bind {
            config.server.bind_addr = bind;
        }
        if let Some(ref dir) = self.static_dir {
            config.server.static_dir = dir.clone();
        }
        if let Some(interval) = self.interval {
            config.poll.interval_secs = interval;
        }
        config
    }

    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let config = self.apply(config);
        let dashboard = Arc::new(Dashboard::from_config(&config)?);

        let poller = dashboard.spawn_poller();

        let listener = TcpListener::bind(config.server.bind_addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", config.server.bind_addr, e))?;
        let router = server::router(dashboard, &config.server.static_dir);

        let result = server::serve(listener, router, server::shutdown_signal()).await;
        poller.abort();
        result
    }
}

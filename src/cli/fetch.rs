//! Fetch command implementation

use crate::config::Config;
use crate::service::Dashboard;
use clap::Args;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Pretty-print the snapshot JSON
    #[arg(short, long)]
    pub pretty: bool,
}

impl FetchArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let dashboard = Dashboard::from_config(&config)?;
        let report = dashboard.poll_loop().run_cycle().await;

        tracing::info!(
            succeeded = ?report.succeeded,
            failed = ?report.failed,
            "Fetch complete"
        );

        let snapshot = dashboard.get_snapshot().await;
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        println!("{}", rendered);

        Ok(())
    }
}

//! Result proxy server CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use edu_result_server::{ServerArgs, ServerBuilder};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edu_result_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerArgs::parse().into_config();
    tracing::debug!(?config, "Loaded configuration");

    let server = ServerBuilder::new(config).build()?;
    server.run().await
}

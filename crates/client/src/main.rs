//! CropWise command line client - composition root binary.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cropwise_client::cli::{Cli, CliApp};
use cropwise_client::config::{self, ClientConfig};
use cropwise_client::infrastructure::storage::{FileStorageProvider, MemoryStorageProvider};
use cropwise_client::infrastructure::ApiAdapter;
use cropwise_client::Session;

#[tokio::main]
async fn main() -> ExitCode {
    config::load_dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cropwise_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_base_url(url)?;
    }
    if let Some(ms) = cli.timeout_ms {
        config = config.with_timeout(std::time::Duration::from_millis(ms));
    }
    tracing::debug!(
        api_url = %config.api_base_url,
        timeout_ms = config.request_timeout.as_millis() as u64,
        "Configuration loaded"
    );

    // Session
    let session = if cli.ephemeral {
        Session::new(MemoryStorageProvider::new())
    } else {
        let storage = match &config.storage_path {
            Some(path) => FileStorageProvider::at_path(path),
            None => FileStorageProvider::new(),
        };
        tracing::debug!(path = %storage.path().display(), "Using token storage");
        Session::new(storage)
    };

    // HTTP
    let raw_api = Arc::new(ApiAdapter::new(&config, session.clone()));

    let app = CliApp::new(raw_api, session, cli.json);
    let result = app.run(cli.command).await;
    app.flush().await;

    println!("{}", result?);
    Ok(())
}

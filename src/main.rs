//! Promoscout server binary.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use promoscout::api::server::{start_server, AppState};
use promoscout::providers::{GeminiProvider, OpenAiProvider};
use promoscout::{CodeFinder, Settings};

#[derive(Parser, Debug)]
#[command(name = "promoscout", version, about = "Coupon code discovery API server")]
struct Cli {
    /// Bind address (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides PORT).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("promoscout=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env().context("invalid startup configuration")?;
    if let Some(host) = cli.host {
        settings.host = host;
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }

    let finder = Arc::new(CodeFinder::new(
        Arc::new(GeminiProvider::new(&settings.gemini_api_key)),
        Arc::new(OpenAiProvider::new(&settings.openai_api_key)),
    ));

    start_server(&settings, AppState::new(finder))
        .await
        .context("API server failed")?;

    Ok(())
}

//! Suanni server entry point.

use anyhow::Context;
use clap::Parser;
use claude::Claude;
use std::sync::Arc;
use suanni_core::{
    InterpretConfig, Interpreter, Narrator, RelationshipAnalyzer, RelationshipConfig,
};
use suanni_server::{build_router, AppState};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "suanni",
    about = "Grounded chart interpretation over HTTP",
    version
)]
struct Args {
    /// Address to bind
    #[arg(long, env = "SUANNI_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "SUANNI_PORT", default_value_t = 3000)]
    port: u16,

    /// Override the model for every generative call
    #[arg(short, long, env = "SUANNI_MODEL")]
    model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads env fallbacks
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let claude = Claude::from_env().context("ANTHROPIC_API_KEY must be set")?;
    let narrator: Arc<dyn Narrator> = Arc::new(claude);

    let interpreter = Interpreter::from_shared(narrator.clone()).with_config(InterpretConfig {
        model: args.model.clone(),
        ..InterpretConfig::default()
    });
    let analyzer = RelationshipAnalyzer::from_shared(narrator).with_config(RelationshipConfig {
        model: args.model.clone(),
        ..RelationshipConfig::default()
    });

    let app = build_router(AppState::new(interpreter, analyzer));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, model = args.model.as_deref().unwrap_or("default"), "suanni listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}

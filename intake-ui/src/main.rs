//! Intake UI server - local JSON API for the gated intake wizard.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use axum::Router;
use clap::Parser;
use intake::context::IntakeContext;
use intake::io::config::load_config;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "intake-ui")]
#[command(about = "Local JSON API for the credential-gated intake wizard")]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value = "3001")]
    port: u16,

    /// Path to the TOML configuration file
    #[arg(long, default_value = "intake.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("intake_ui=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let cfg = load_config(&args.config).context("load config")?;
    info!(api_base = %cfg.api_base, "starting intake-ui");

    let ctx = IntakeContext::from_config(&cfg)?;
    // Application start: pick up a session persisted by an earlier run.
    let session = ctx.restore_session().await;
    info!(authenticated = session.authenticated, "session restored");

    let state = AppState::new(ctx, cfg.client_id.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", routes::api_router())
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

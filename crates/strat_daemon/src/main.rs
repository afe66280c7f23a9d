mod routes;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use routes::make_router_with_cors;
use state::AppState;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strat_daemon", about = "HTTP API for the race strategy planner")]
struct Args {
    #[arg(long, default_value = "./content")]
    content_dir: String,
    #[arg(long, default_value_t = 3001)]
    port: u16,
    #[arg(long, default_value = "http://localhost:5173")]
    cors_origin: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let content = strat_world::load_content(&args.content_dir)?;
    let app = make_router_with_cors(AppState::new(content), &args.cors_origin)?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, cors_origin = %args.cors_origin, "strat_daemon listening");
    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}

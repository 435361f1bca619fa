use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::settings::AppConfig;
use crate::infrastructure::media::MediaTools;
use crate::state::AppState;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
mod workers;

#[cfg(all(test, unix))]
mod test_support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("desqueeze=info,tower_http=info")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("invalid configuration")?;

    for dir in [&config.upload_dir, &config.downloads_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let media = MediaTools::new(&config.ffmpeg_path, &config.ffprobe_path);
    media.verify().await;

    let port = config.server_port;
    let app = app::create_app(AppState::new(config, media));

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

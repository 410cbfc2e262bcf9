mod agent;
mod config;
mod function;
mod handlers;
mod routes;
mod state;
mod translate;

use anyhow::Result;
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the function adapter keeps stdout for its response
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("korean_gloss=debug,tower_http=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let (config, source) = Config::resolve(&config_paths)?;
    match source {
        Some(path) => info!("Loaded configuration from: {}", path),
        None => info!("No config file found, using defaults. Tried: {:?}", config_paths),
    }
    if config.llm_config.api_key().is_none() {
        warn!("OPENAI_API_KEY is not set; translation requests will fail with a configuration error");
    }

    let app_state = AppState::new(config.clone())?;

    if std::env::args().skip(1).any(|arg| arg == "--invoke") {
        return function::run_once(&app_state.translator).await;
    }

    let app = routes::build_app(app_state);

    let host: std::net::IpAddr = config.system_config.host.parse()?;
    let addr = SocketAddr::from((host, config.system_config.port));
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

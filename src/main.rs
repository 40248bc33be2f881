mod app;
mod auth;
mod career;
mod config;
mod errors;
mod extractors;
mod state;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "vidyamitra=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::info!(
        "starting {} v{}",
        config::PROJECT_NAME,
        env!("CARGO_PKG_VERSION")
    );
    tracing::debug!(jwt = ?config.jwt, password = ?config.password, "auth config");

    let state = AppState::init(config)?;
    let config = state.config.clone();
    let app = app::build_app(state);

    app::serve(app, &config).await
}

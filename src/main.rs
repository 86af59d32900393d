mod app;
mod auth;
mod catalog;
mod config;
mod error;
mod state;

use crate::auth::repo_types::RevokedToken;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "storefront=debug,axum=info,tower_http=info".to_string());
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

    let app_state = AppState::init().await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&app_state.db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    match RevokedToken::purge_expired(&app_state.db).await {
        Ok(n) if n > 0 => tracing::info!(purged = n, "dropped expired blacklist entries"),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "blacklist purge failed"),
    }

    let app = app::build_app(app_state);
    app::serve(app).await
}

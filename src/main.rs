use tokio::sync::watch;

mod app;
mod auth;
mod config;
mod console;
mod gallery;
mod state;
mod templates;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "dogbook=debug,axum=info,tower_http=info".to_string());
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

    let state = AppState::init().await?;

    // Run migrations if present
    if let Err(e) = sqlx::migrate!("./migrations").run(&state.db).await {
        tracing::warn!(error = %e, "migrations folder not found or migration failed; continuing");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(console::command_loop(shutdown_tx));

    let router = app::build_app(state.clone());
    app::serve(router, &state.config, shutdown_rx).await?;

    // The listener has drained; only now is the pool closed.
    state.db.close().await;
    tracing::info!("database connection closed, exiting");
    Ok(())
}

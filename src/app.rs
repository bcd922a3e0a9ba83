use std::net::SocketAddr;

use axum::{response::Redirect, routing::get, Router};
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::Key, MemoryStore, SessionManagerLayer};

use crate::config::AppConfig;
use crate::console;
use crate::state::AppState;
use crate::{auth, gallery};

pub fn build_app(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let key = Key::derive_from(state.config.session_secret.as_bytes());
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_signed(key);

    Router::new()
        .route("/", get(|| async { Redirect::to("/login") }))
        .merge(auth::router())
        .merge(gallery::router())
        .with_state(state)
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(
    app: Router,
    config: &AppConfig,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(console::shutdown_signal(shutdown))
        .await?;
    Ok(())
}

use std::{future::Future, sync::Arc};

use axum::{
    Router, middleware, routing::{get, post}
};
use tokio::{net::TcpListener, signal};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::{
    RouteGuard, WebServerConfig, guard::route_guard, pages::{healthz, placeholder}, session::{self, SessionState}
};

/// Gateway router: session endpoints, liveness, and guarded pages.
pub fn router(config: &WebServerConfig) -> Router {
    let guard = Arc::new(RouteGuard::new(config.verifier.clone()));
    let state = SessionState {
        guard: guard.clone(),
        secure_cookies: config.secure_cookies,
    };

    let api = Router::new()
        .route("/api/session", post(session::establish).get(session::current))
        .route("/api/session/logout", post(session::logout))
        .route("/healthz", get(healthz))
        .with_state(state);

    let pages = match &config.static_dir {
        Some(dir) => Router::new().fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => Router::new().fallback(placeholder),
    };

    api.merge(pages)
        .layer(middleware::from_fn_with_state(guard, route_guard))
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve(listener: TcpListener, config: &WebServerConfig, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Bind to the configured address and serve until Ctrl+C or SIGTERM.
pub async fn run_web_server(config: WebServerConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.bind, config.port);
    let listener = TcpListener::bind(&addr).await?;

    if !config.verifier.is_signed() {
        warn!("no session secret configured; the route guard only checks that a cookie is present");
    }
    match &config.static_dir {
        Some(dir) => info!(%addr, static_dir = %dir.display(), "starting web gateway"),
        None => info!(%addr, "starting web gateway with placeholder pages"),
    }

    serve(listener, &config, shutdown_signal()).await?;
    info!("web gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

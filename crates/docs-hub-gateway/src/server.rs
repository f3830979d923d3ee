//! Server startup and lifecycle

use crate::{routes, AppConfig, AppState};
use anyhow::Context;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

/// Run the gateway until SIGINT or SIGTERM
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(config).context("failed to initialize storage backend")?);

    let addr = state.config.server.bind_addr().to_string();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    serve(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// In-flight requests get `server.shutdown_timeout_secs` to finish; whatever
/// is still running after that is aborted.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let grace = state.config.server.shutdown_timeout();
    let app = routes::create_router(state);

    info!("Docs Hub gateway listening on http://{}", listener.local_addr()?);

    let (drain_tx, drain_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = drain_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result.context("server task panicked")??;
            return Ok(());
        }
        _ = shutdown => {}
    }

    info!(grace_secs = grace.as_secs(), "Draining in-flight requests");
    let _ = drain_tx.send(());

    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => {
            result.context("server task panicked")??;
            info!("Gateway shutdown complete");
        }
        Err(_) => {
            warn!("Grace period elapsed, aborting remaining requests");
            server.abort();
        }
    }

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docs_hub_storage::MemoryCloud;
    use std::time::Duration;

    #[test_log::test(tokio::test)]
    async fn test_serve_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::with_share_links(
            AppConfig::default(),
            MemoryCloud::new("http://localhost"),
        ));

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(listener, state, async move {
            let _ = stop_rx.await;
        }));

        // The listener accepts before shutdown
        tokio::net::TcpStream::connect(addr).await.unwrap();

        stop_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(result.is_ok());
    }

    #[test_log::test(tokio::test)]
    async fn test_grace_period_is_bounded() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut config = AppConfig::default();
        config.server.shutdown_timeout_secs = 1;
        let state = Arc::new(AppState::with_share_links(
            config,
            MemoryCloud::new("http://localhost"),
        ));

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(listener, state, async move {
            let _ = stop_rx.await;
        }));

        // An idle keep-alive connection that never sends a request
        let _idle = tokio::net::TcpStream::connect(addr).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        stop_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("grace period was not enforced")
            .unwrap();
        assert!(result.is_ok());
    }
}

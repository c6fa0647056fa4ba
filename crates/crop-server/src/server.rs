//! Listener lifecycle

use crate::error::ServerError;
use crate::routes::routes;
use crate::state::AppState;
use crop_core::ServerConfig;
use std::future::Future;
use std::net::SocketAddr;

/// Serve until `shutdown` resolves.
///
/// Bind failures are returned before any request is accepted.
pub async fn serve<F>(config: &ServerConfig, state: AppState, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.bind_addr;
    let (bound, server) = warp::serve(routes(state, config.max_upload_bytes))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .map_err(|source| ServerError::Bind { addr, source })?;

    tracing::info!(
        addr = %bound,
        max_upload_bytes = config.max_upload_bytes,
        delay_ms = config.analysis_delay_ms,
        "crop server listening"
    );
    server.await;
    tracing::info!("crop server stopped");
    Ok(())
}

/// Serve on a random loopback port in the background and return the address.
///
/// Must be called inside a Tokio runtime. The server runs until the runtime stops.
///
/// # Panics
///
/// Panics if no loopback port can be bound.
#[must_use]
pub fn spawn_ephemeral(state: AppState, max_upload_bytes: u64) -> SocketAddr {
    let (addr, server) =
        warp::serve(routes(state, max_upload_bytes)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    tracing::debug!(%addr, "ephemeral crop server started");
    addr
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::PlaceholderAnalyzer;
    use crop_store::MemoryStore;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(Arc::new(PlaceholderAnalyzer::instant()), Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let taken = spawn_ephemeral(state(), 1024);
        let config = ServerConfig::new().with_bind_addr(taken);

        let err = serve(&config, state(), std::future::pending()).await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { addr, .. } if addr == taken));
    }

    #[tokio::test]
    async fn graceful_shutdown_returns() {
        let config = ServerConfig::new().with_bind_addr(([127, 0, 0, 1], 0).into());
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            serve(&config, state(), async {
                let _ = rx.await;
            })
            .await
        });
        tx.send(()).unwrap();

        let outcome = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(outcome.is_ok());
    }
}

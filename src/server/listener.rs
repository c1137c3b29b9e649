use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::Config;
use crate::handler::Router;
use crate::http::connection::{Connection, ConnectionLimits};

/// Pause after a failed accept so a persistent error (e.g. fd exhaustion)
/// does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Binds the configured address and serves until `shutdown` resolves.
pub async fn run(cfg: &Config, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr))?;

    info!(
        addr = %listener.local_addr()?,
        directory = ?cfg.directory,
        max_connections = cfg.max_connections,
        "Listening"
    );

    let router = Router::new(cfg.directory.clone());
    serve(
        listener,
        router,
        ConnectionLimits::from_config(cfg),
        cfg.max_connections,
        shutdown,
    )
    .await
}

/// Accepts connections and hands each one to its own task.
///
/// At most `max_connections` connections are served at once; when all
/// permits are taken the loop stops accepting until one is released. Once
/// `shutdown` resolves no new connections are accepted, and the call returns
/// after every in-flight connection has finished.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    limits: ConnectionLimits,
    max_connections: usize,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let router = Arc::new(router);
    let permits = Arc::new(Semaphore::new(max_connections));
    let all_permits = u32::try_from(max_connections).context("max_connections is too large")?;
    tokio::pin!(shutdown);

    loop {
        let permit = tokio::select! {
            _ = &mut shutdown => break,
            permit = permits.clone().acquire_owned() => permit.context("connection limiter closed")?,
        };

        let (socket, peer) = tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            },
        };
        debug!(%peer, "Accepted connection");

        let router = router.clone();
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, router, limits);
                if let Err(e) = conn.run().await {
                    warn!(error = %e, "Connection error");
                }
                drop(permit);
            }
            .instrument(info_span!("conn", %peer)),
        );
    }

    drop(listener);
    info!("Waiting for open connections to finish");
    let _drained = permits
        .acquire_many(all_permits)
        .await
        .context("connection limiter closed")?;
    Ok(())
}

//! HTTP listener with graceful shutdown.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;

use crate::error::Result;

/// Bound HTTP server.
pub struct Server {
    listener: TcpListener,
    router: Router,
    shutdown_tx: broadcast::Sender<()>,
}

impl Server {
    /// Binds the listener. Port 0 picks an ephemeral port.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn bind(
        addr: SocketAddr,
        router: Router,
        shutdown_tx: broadcast::Sender<()>,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router,
            shutdown_tx,
        })
    }

    /// Address the listener is bound to.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves requests until a shutdown signal is broadcast.
    ///
    /// # Errors
    ///
    /// Returns an error if the accept loop fails.
    pub async fn run(self) -> Result<()> {
        let addr = self.local_addr()?;
        info!(%addr, "Server listening");

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("Shutdown signal received, draining connections");
            })
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use axum::routing::get;

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (shutdown_tx, _) = broadcast::channel(1);
        let router = Router::new().route("/ping", get(|| async { "pong" }));

        let server = Server::bind("127.0.0.1:0".parse().unwrap(), router, shutdown_tx.clone())
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        assert_ne!(addr.port(), 0);

        let handle = tokio::spawn(server.run());

        let body = reqwest::get(format!("http://{addr}/ping"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "pong");

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{info, Instrument};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::request::Method;
use crate::server::router::Handler;
use crate::server::ServerState;

/// An HTTP server: configuration, route table, and the accept loop.
pub struct Server {
    config: Config,
    shared: Arc<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let shared = Arc::new(ServerState::new(&config));
        Self { config, shared }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers a handler. Returns `false` if the route was already taken.
    pub fn add_handler<H: Handler>(
        &self,
        method: Method,
        path: impl Into<String>,
        handler: H,
    ) -> bool {
        self.shared.router.register(method, path, handler)
    }

    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        let listener = TcpListener::bind(&self.config.listen_addr)
            .await
            .with_context(|| format!("binding {}", self.config.listen_addr))?;
        info!("Listening on {}", listener.local_addr()?);
        Ok(listener)
    }

    pub async fn listen(&self) -> anyhow::Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Runs the accept loop until accepting fails.
    ///
    /// At most `worker_pool_size` connections are processed at once; beyond
    /// that, new clients wait in the OS backlog.
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        let workers = Arc::new(Semaphore::new(self.config.worker_pool_size));
        let deadline = self.config.request_timeout();

        loop {
            let permit = Arc::clone(&workers)
                .acquire_owned()
                .await
                .context("worker pool closed")?;

            let (socket, peer) = listener.accept().await.context("accepting connection")?;
            info!("Accepted connection from {}", peer);

            let shared = Arc::clone(&self.shared);
            let span = tracing::info_span!("conn", peer = %peer);
            tokio::spawn(
                async move {
                    handle_connection(socket, peer, shared, deadline).await;
                    drop(permit);
                }
                .instrument(span),
            );
        }
    }
}

async fn handle_connection(
    socket: TcpStream,
    peer: SocketAddr,
    shared: Arc<ServerState>,
    deadline: Option<Duration>,
) {
    let mut conn = Connection::new(socket, shared);

    let result = match deadline {
        Some(limit) => match tokio::time::timeout(limit, conn.run()).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!("deadline of {:?} expired", limit)),
        },
        None => conn.run().await,
    };

    if let Err(e) = result {
        tracing::error!("Connection error from {}: {:#}", peer, e);
    }
}

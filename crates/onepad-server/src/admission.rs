//! Connection admission and worker supervision.
//!
//! The accept loop is the only place that blocks in the parent task and
//! the only place that mutates the worker set. Each accepted connection is
//! either dispatched to a freshly spawned worker or, when the cap is
//! already filled, closed on the spot - excess connections are dropped,
//! never buffered.

use std::net::SocketAddr;

use onepad_proto::Role;
use tokio::{
    net::{TcpListener, TcpSocket},
    task::JoinSet,
};

use crate::{error::ServerError, worker};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (e.g., "127.0.0.1:57111")
    pub bind_address: String,
    /// The transform this server performs and the only role it admits
    pub role: Role,
    /// Maximum concurrent in-flight connections
    pub max_connections: usize,
    /// Listen backlog
    pub backlog: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:0".to_string(),
            role: Role::Encrypt,
            max_connections: 5,
            backlog: 5,
        }
    }
}

/// A bound server, ready to run its accept loop.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    workers: JoinSet<()>,
}

impl Server {
    /// Binds and listens on the configured address.
    ///
    /// # Errors
    ///
    /// `Config` if the bind address does not parse, `Bind` if the socket
    /// cannot be created, bound, or put into listening state. Both are
    /// fatal at startup.
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let addr: SocketAddr = config
            .bind_address
            .parse()
            .map_err(|e| ServerError::Config(format!("bad bind address: {e}")))?;

        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        socket.bind(addr)?;
        let listener = socket.listen(config.backlog)?;

        Ok(Self { listener, config, workers: JoinSet::new() })
    }

    /// The locally bound address (resolves ephemeral ports).
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the accept loop until interrupted.
    ///
    /// Accept failures are logged and non-fatal. On ctrl-c the loop stops
    /// accepting, releases the listening socket, waits for every
    /// outstanding worker to finish, and returns `Ok(())` - the only way
    /// this method returns at all, so callers map it to the interrupt
    /// exit status.
    pub async fn run(mut self) -> Result<(), ServerError> {
        let mut interrupt = std::pin::pin!(tokio::signal::ctrl_c());

        loop {
            tokio::select! {
                sig = &mut interrupt => {
                    if let Err(e) = sig {
                        tracing::warn!("interrupt handler failed: {}", e);
                    }
                    break;
                },
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.admit(stream, peer),
                    Err(e) => {
                        tracing::warn!("accept failed: {}", e);
                    },
                },
            }
        }

        tracing::info!("interrupt: draining {} active workers", self.workers.len());
        drop(self.listener);
        while let Some(joined) = self.workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("worker task failed: {}", e);
            }
        }

        Ok(())
    }

    /// Reaps finished workers, then dispatches or rejects `stream`.
    fn admit(&mut self, stream: tokio::net::TcpStream, peer: SocketAddr) {
        while let Some(joined) = self.workers.try_join_next() {
            if let Err(e) = joined {
                tracing::error!("worker task failed: {}", e);
            }
        }

        if self.workers.len() >= self.config.max_connections {
            tracing::warn!(
                "{} connections in flight, rejecting {}",
                self.workers.len(),
                peer
            );
            drop(stream);
            return;
        }

        tracing::debug!("connection accepted from {}", peer);
        // The worker takes sole ownership of the stream; the parent keeps
        // no reference to it.
        self.workers.spawn(worker::serve(stream, self.config.role, peer));
    }
}

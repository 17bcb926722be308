//! Per-connection worker.
//!
//! A worker owns one accepted connection end-to-end: handshake, receive
//! payload and key, validate, transform, send the result, close. All
//! state is local to the worker; failures are logged here and never reach
//! the accept loop.

use std::net::SocketAddr;

use onepad_net::{ChannelError, HandshakeError, MessageChannel, handshake};
use onepad_proto::{CipherError, Role, cipher};
use thiserror::Error;
use tokio::net::TcpStream;

/// Why a single connection was abandoned.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The peer failed the identity handshake.
    #[error("handshake failed: {0}")]
    Handshake(#[from] HandshakeError),

    /// Sending or receiving a frame failed mid-exchange.
    #[error("transport failed: {0}")]
    Channel(#[from] ChannelError),

    /// Payload or key failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] CipherError),
}

/// Serves one connection to completion, logging any failure.
///
/// The connection closes on every exit path when the stream (owned by
/// this task) is dropped; a failed exchange sends no result frame, which
/// the client observes as a closed connection.
pub(crate) async fn serve(stream: TcpStream, role: Role, peer: SocketAddr) {
    match exchange(stream, role).await {
        Ok(()) => tracing::debug!("connection from {} served", peer),
        Err(e) => tracing::warn!("connection from {} failed: {}", peer, e),
    }
}

/// handshake -> payload -> key -> validate -> transform -> respond.
async fn exchange(stream: TcpStream, role: Role) -> Result<(), WorkerError> {
    let mut chan = MessageChannel::new(stream);

    handshake::verify(&mut chan, role).await?;

    let text = chan.recv().await?;
    let key = chan.recv().await?;

    let result = match role {
        Role::Encrypt => cipher::encode(&text, &key)?,
        Role::Decrypt => cipher::decode(&text, &key)?,
    };

    chan.send(&result).await?;
    Ok(())
}

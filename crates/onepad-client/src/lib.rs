//! Onepad client driver.
//!
//! One request per connection: connect, declare a role, send the text and
//! the key, receive the transformed result. Every stage failure is fatal
//! to the request - there is no retry logic anywhere.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;

use bytes::Bytes;
use onepad_net::{MessageChannel, handshake};
use onepad_proto::Role;
use tokio::net::{TcpStream, ToSocketAddrs};

pub use error::ClientError;

/// Runs one request against a server at `addr`.
///
/// Sequence: connect, announce `role`, send `text`, send `key`, receive
/// the result. `Ok(None)` means the exchange completed from our side but
/// the server closed without sending a result - the caller emits nothing,
/// matching the protocol's silence-on-failure observable.
///
/// # Errors
///
/// `Connect` on resolution/connect failure, `Handshake` when the server
/// rejects our role (the reply literal is carried in the error), `Send`
/// when transmitting the text or key fails. None of these are retried.
pub async fn drive<A>(
    addr: A,
    role: Role,
    text: &[u8],
    key: &[u8],
) -> Result<Option<Bytes>, ClientError>
where
    A: ToSocketAddrs,
{
    let stream = TcpStream::connect(addr).await.map_err(ClientError::Connect)?;
    let mut chan = MessageChannel::new(stream);

    handshake::announce(&mut chan, role).await?;

    chan.send(text).await.map_err(|source| ClientError::Send { what: "text", source })?;
    chan.send(key).await.map_err(|source| ClientError::Send { what: "key", source })?;

    match chan.recv().await {
        Ok(result) => Ok(Some(result)),
        Err(e) => {
            tracing::debug!("no result received: {}", e);
            Ok(None)
        },
    }
}

//! Client error types.

use onepad_net::{ChannelError, HandshakeError};
use thiserror::Error;

/// Errors from one client request.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Resolution or TCP connect failed.
    #[error("connect failed: {0}")]
    Connect(#[source] std::io::Error),

    /// The server rejected our role, or the handshake broke mid-exchange.
    #[error(transparent)]
    Handshake(#[from] HandshakeError),

    /// Transmitting the text or key failed.
    #[error("could not send {what}: {source}")]
    Send {
        /// Which message failed ("text" or "key").
        what: &'static str,
        /// The underlying channel failure.
        #[source]
        source: ChannelError,
    },
}

impl ClientError {
    /// True for failures to even reach a willing server (connect errors
    /// and role rejections); these share the connect-class exit status.
    pub fn is_connect_class(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Handshake(HandshakeError::Rejected { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_is_connect_class() {
        let err = ClientError::Handshake(HandshakeError::Rejected { reply: "INVALID ID".into() });
        assert!(err.is_connect_class());
    }

    #[test]
    fn send_failure_is_runtime_class() {
        let err = ClientError::Send {
            what: "key",
            source: ChannelError::ConnectionClosed,
        };
        assert!(!err.is_connect_class());
    }
}

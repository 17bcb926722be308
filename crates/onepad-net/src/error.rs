//! Wire-layer error types.

use thiserror::Error;

/// Failures while sending or receiving a frame.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The transport failed (or reported a zero-byte write) before the
    /// full frame was transmitted.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// The transport failed while reading a frame.
    #[error("receive failed: {0}")]
    RecvFailed(#[source] std::io::Error),

    /// The peer closed the connection before a complete frame arrived.
    ///
    /// Distinct from [`ChannelError::MalformedFrame`]: the bytes that did
    /// arrive were well-formed, there were just not enough of them. Callers
    /// treat this as "no more data", not as a protocol violation.
    #[error("connection closed before a complete frame")]
    ConnectionClosed,

    /// The length prefix was structurally invalid.
    #[error("malformed frame: {reason}")]
    MalformedFrame {
        /// What was wrong with the prefix.
        reason: String,
    },
}

/// Failures during the identity handshake.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// The server answered something other than `OK` to our role tag.
    #[error("role rejected: server replied {reply:?}")]
    Rejected {
        /// The verbatim reply, lossily decoded for display.
        reply: String,
    },

    /// The connecting peer presented a tag other than the one we accept.
    #[error("peer presented unexpected role tag {tag:?}")]
    UnexpectedRole {
        /// The verbatim tag, lossily decoded for display.
        tag: String,
    },

    /// The underlying channel failed mid-handshake.
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

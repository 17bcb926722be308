//! Onepad wire layer.
//!
//! The protocol exchanges opaque byte strings as length-prefixed frames
//! over a connected byte stream:
//!
//! ```text
//! frame := decimal-length SP raw-bytes
//! ```
//!
//! No terminator, no checksum, no version field. [`MessageChannel`] owns
//! the framing; [`handshake`] implements the one-round-trip role exchange
//! that precedes every request.
//!
//! Both sides are generic over `AsyncRead + AsyncWrite`, so the same code
//! runs against a real `TcpStream` and against `tokio::io::duplex` pipes
//! in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod channel;
mod error;
pub mod handshake;

pub use channel::MessageChannel;
pub use error::{ChannelError, HandshakeError};

/// TCP port gate for the non-reserved user range.
///
/// Binaries apply this before any socket operation; `u16` already caps
/// the upper end at 65535.
pub mod port {
    /// First port above the reserved range.
    pub const MIN: u16 = 1024;

    /// Returns true if `port` lies in the accepted user range.
    #[must_use]
    pub const fn is_user_range(port: u16) -> bool {
        port >= MIN
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn reserved_ports_are_rejected() {
            assert!(!is_user_range(0));
            assert!(!is_user_range(1023));
            assert!(is_user_range(1024));
            assert!(is_user_range(u16::MAX));
        }
    }
}

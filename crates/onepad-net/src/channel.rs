//! Length-prefixed message framing.
//!
//! A frame is the decimal payload length in ASCII, one space, then the raw
//! payload bytes: `"11 HELLO WORLD"` carries the 11-byte payload
//! `HELLO WORLD`. The prefix is authoritative; the receiver reads exactly
//! that many bytes, no more, no fewer.
//!
//! The framing imposes no maximum payload size of its own; callers that
//! need bounded memory enforce their own ceiling before sending. The only
//! structural limit is on the prefix itself: more than
//! [`MAX_PREFIX_DIGITS`] digits is rejected as malformed.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ChannelError;

/// Upper bound on length-prefix digits. Ten digits cover every u32 payload
/// length; anything longer is a garbage prefix, not a real frame.
pub const MAX_PREFIX_DIGITS: usize = 10;

/// A framed message channel over a connected byte stream.
///
/// Owns the stream for the lifetime of the exchange. Frames are immutable
/// once written: `send` transmits exactly one frame, `recv` consumes
/// exactly one frame and leaves any following bytes untouched.
#[derive(Debug)]
pub struct MessageChannel<S> {
    stream: S,
}

impl<S> MessageChannel<S> {
    /// Wraps a connected stream.
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Consumes the channel, returning the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> MessageChannel<S> {
    /// Sends one frame, returning the total bytes written (prefix
    /// included).
    ///
    /// Partial writes are retried until the whole frame is out.
    ///
    /// # Errors
    ///
    /// `SendFailed` if the transport errors or reports a zero-byte write
    /// mid-frame.
    pub async fn send(&mut self, payload: &[u8]) -> Result<usize, ChannelError> {
        let mut frame = BytesMut::with_capacity(MAX_PREFIX_DIGITS + 1 + payload.len());
        frame.extend_from_slice(payload.len().to_string().as_bytes());
        frame.extend_from_slice(b" ");
        frame.extend_from_slice(payload);

        // write_all loops over partial writes and surfaces a zero-byte
        // write as WriteZero.
        self.stream.write_all(&frame).await.map_err(ChannelError::SendFailed)?;
        self.stream.flush().await.map_err(ChannelError::SendFailed)?;

        tracing::trace!("sent frame: {} payload bytes", payload.len());
        Ok(frame.len())
    }

    /// Receives one frame, returning its payload.
    ///
    /// The length prefix is read one byte at a time until the space
    /// delimiter, then exactly the declared number of payload bytes are
    /// read.
    ///
    /// # Errors
    ///
    /// - `ConnectionClosed` if the peer closes before the frame completes
    ///   (at any point, prefix or payload)
    /// - `MalformedFrame` if the prefix has no digits, contains a
    ///   non-digit byte, or exceeds [`MAX_PREFIX_DIGITS`] digits
    /// - `RecvFailed` on transport errors
    pub async fn recv(&mut self) -> Result<Bytes, ChannelError> {
        let length = self.recv_prefix().await?;

        let mut payload = vec![0u8; length];
        self.stream.read_exact(&mut payload).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                ChannelError::ConnectionClosed
            } else {
                ChannelError::RecvFailed(e)
            }
        })?;

        tracing::trace!("received frame: {length} payload bytes");
        Ok(Bytes::from(payload))
    }

    /// Reads the decimal length prefix up to and including the space
    /// delimiter.
    async fn recv_prefix(&mut self) -> Result<usize, ChannelError> {
        let mut digits = [0u8; MAX_PREFIX_DIGITS];
        let mut count = 0usize;

        loop {
            let mut byte = [0u8; 1];
            let n = self.stream.read(&mut byte).await.map_err(ChannelError::RecvFailed)?;
            if n == 0 {
                return Err(ChannelError::ConnectionClosed);
            }

            match byte[0] {
                b' ' => break,
                b'0'..=b'9' => {
                    if count == MAX_PREFIX_DIGITS {
                        return Err(ChannelError::MalformedFrame {
                            reason: format!("length prefix exceeds {MAX_PREFIX_DIGITS} digits"),
                        });
                    }
                    digits[count] = byte[0];
                    count += 1;
                },
                other => {
                    return Err(ChannelError::MalformedFrame {
                        reason: format!("non-digit byte {other:#04x} in length prefix"),
                    });
                },
            }
        }

        if count == 0 {
            return Err(ChannelError::MalformedFrame {
                reason: "length prefix has no digits".to_string(),
            });
        }

        let mut length = 0u64;
        for &d in &digits[..count] {
            length = length * 10 + u64::from(d - b'0');
        }

        usize::try_from(length).map_err(|_| ChannelError::MalformedFrame {
            reason: format!("declared length {length} exceeds addressable size"),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;
    use tokio::io::AsyncWriteExt;

    use super::*;

    #[tokio::test]
    async fn frame_roundtrip() {
        let (a, b) = tokio::io::duplex(1024);
        let mut tx = MessageChannel::new(a);
        let mut rx = MessageChannel::new(b);

        let sent = tx.send(b"HELLO WORLD").await.unwrap();
        assert_eq!(sent, 3 + 11); // "11 " + payload

        let payload = rx.recv().await.unwrap();
        assert_eq!(&payload[..], b"HELLO WORLD");
    }

    #[tokio::test]
    async fn empty_frame_roundtrips() {
        let (a, b) = tokio::io::duplex(64);
        let mut tx = MessageChannel::new(a);
        let mut rx = MessageChannel::new(b);

        let sent = tx.send(b"").await.unwrap();
        assert_eq!(sent, 2); // "0 "

        let payload = rx.recv().await.unwrap();
        assert!(payload.is_empty());
    }

    #[tokio::test]
    async fn recv_consumes_exactly_one_frame() {
        let (a, b) = tokio::io::duplex(1024);
        let mut tx = MessageChannel::new(a);
        let mut rx = MessageChannel::new(b);

        tx.send(b"FIRST").await.unwrap();
        tx.send(b"SECOND FRAME").await.unwrap();

        assert_eq!(&rx.recv().await.unwrap()[..], b"FIRST");
        assert_eq!(&rx.recv().await.unwrap()[..], b"SECOND FRAME");
    }

    #[tokio::test]
    async fn eof_before_prefix_is_connection_closed() {
        let (a, b) = tokio::io::duplex(64);
        drop(a);
        let mut rx = MessageChannel::new(b);

        assert!(matches!(rx.recv().await, Err(ChannelError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn eof_mid_prefix_is_connection_closed() {
        let (mut a, b) = tokio::io::duplex(64);
        a.write_all(b"12").await.unwrap();
        drop(a);
        let mut rx = MessageChannel::new(b);

        assert!(matches!(rx.recv().await, Err(ChannelError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn eof_mid_payload_is_connection_closed() {
        let (mut a, b) = tokio::io::duplex(64);
        a.write_all(b"10 HELLO").await.unwrap();
        drop(a);
        let mut rx = MessageChannel::new(b);

        assert!(matches!(rx.recv().await, Err(ChannelError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn prefix_without_digits_is_malformed() {
        let (mut a, b) = tokio::io::duplex(64);
        a.write_all(b" HELLO").await.unwrap();
        let mut rx = MessageChannel::new(b);

        assert!(matches!(rx.recv().await, Err(ChannelError::MalformedFrame { .. })));
    }

    #[tokio::test]
    async fn non_digit_prefix_byte_is_malformed() {
        let (mut a, b) = tokio::io::duplex(64);
        a.write_all(b"1x HELLO").await.unwrap();
        let mut rx = MessageChannel::new(b);

        assert!(matches!(rx.recv().await, Err(ChannelError::MalformedFrame { .. })));
    }

    #[tokio::test]
    async fn oversized_prefix_is_malformed() {
        let (mut a, b) = tokio::io::duplex(64);
        a.write_all(b"99999999999 X").await.unwrap(); // 11 digits
        let mut rx = MessageChannel::new(b);

        assert!(matches!(rx.recv().await, Err(ChannelError::MalformedFrame { .. })));
    }

    #[test]
    fn roundtrip_any_payload_consumes_exact_bytes() {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();

        proptest!(|(payload in proptest::collection::vec(any::<u8>(), 0..512))| {
            rt.block_on(async {
                let (a, b) = tokio::io::duplex(4096);
                let mut tx = MessageChannel::new(a);
                let mut rx = MessageChannel::new(b);

                let written = tx.send(&payload).await.unwrap();
                prop_assert_eq!(
                    written,
                    payload.len().to_string().len() + 1 + payload.len()
                );

                // A sentinel frame directly behind the first one: recv must
                // leave it untouched.
                tx.send(b"SENTINEL").await.unwrap();

                let got = rx.recv().await.unwrap();
                prop_assert_eq!(&got[..], &payload[..]);
                prop_assert_eq!(&rx.recv().await.unwrap()[..], b"SENTINEL");
                Ok(())
            })?;
        });
    }
}

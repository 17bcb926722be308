//! One-round-trip identity handshake.
//!
//! The connecting peer sends its role tag as the first frame on the
//! connection; the accepting side compares it against the role it serves
//! and answers `OK` or `INVALID ID`. There are no retries and no
//! renegotiation - a rejected connection is closed without processing any
//! further messages.

use onepad_proto::{REPLY_INVALID_ID, REPLY_OK, Role};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{channel::MessageChannel, error::HandshakeError};

/// Client half: declare `role` and wait for the server's verdict.
///
/// # Errors
///
/// `Rejected` if the server replies anything but `OK`; `Channel` if the
/// exchange fails at the transport level. Callers must not send payload
/// data after either failure.
pub async fn announce<S>(chan: &mut MessageChannel<S>, role: Role) -> Result<(), HandshakeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    chan.send(role.tag()).await?;

    let reply = chan.recv().await?;
    if reply == REPLY_OK {
        Ok(())
    } else {
        Err(HandshakeError::Rejected { reply: String::from_utf8_lossy(&reply).into_owned() })
    }
}

/// Server half: read the peer's tag and accept or reject it.
///
/// A matching tag is answered with `OK`; any other tag is answered with
/// `INVALID ID` and the handshake fails. If the initial receive fails the
/// connection is abandoned without a reply.
///
/// # Errors
///
/// `UnexpectedRole` on a tag mismatch; `Channel` on transport failure.
pub async fn verify<S>(chan: &mut MessageChannel<S>, expected: Role) -> Result<(), HandshakeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let tag = chan.recv().await?;

    if tag == expected.tag() {
        chan.send(REPLY_OK).await?;
        Ok(())
    } else {
        // Best effort: the peer may already be gone, and the connection is
        // failed either way.
        if let Err(e) = chan.send(REPLY_INVALID_ID).await {
            tracing::debug!("could not deliver rejection reply: {e}");
        }
        Err(HandshakeError::UnexpectedRole { tag: String::from_utf8_lossy(&tag).into_owned() })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ChannelError;

    #[tokio::test]
    async fn matching_roles_shake_hands() {
        let (a, b) = tokio::io::duplex(256);
        let client = tokio::spawn(async move {
            let mut chan = MessageChannel::new(a);
            announce(&mut chan, Role::Encrypt).await
        });

        let mut server_chan = MessageChannel::new(b);
        verify(&mut server_chan, Role::Encrypt).await.unwrap();

        client.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn mismatched_role_is_rejected_with_invalid_id() {
        let (a, b) = tokio::io::duplex(256);
        let client = tokio::spawn(async move {
            let mut chan = MessageChannel::new(a);
            // Raw exchange so the test can observe the literal reply.
            chan.send(Role::Encrypt.tag()).await.unwrap();
            chan.recv().await.unwrap()
        });

        let mut server_chan = MessageChannel::new(b);
        let err = verify(&mut server_chan, Role::Decrypt).await.unwrap_err();
        assert!(matches!(err, HandshakeError::UnexpectedRole { .. }));

        let reply = client.await.unwrap();
        assert_eq!(&reply[..], REPLY_INVALID_ID);
    }

    #[tokio::test]
    async fn client_surfaces_rejection_reply() {
        let (a, b) = tokio::io::duplex(256);
        let server = tokio::spawn(async move {
            let mut chan = MessageChannel::new(b);
            let _ = verify(&mut chan, Role::Decrypt).await;
        });

        let mut chan = MessageChannel::new(a);
        let err = announce(&mut chan, Role::Encrypt).await.unwrap_err();
        match err {
            HandshakeError::Rejected { reply } => assert_eq!(reply, "INVALID ID"),
            other => panic!("expected rejection, got {other:?}"),
        }

        server.await.unwrap();
    }

    #[tokio::test]
    async fn peer_hangup_before_tag_abandons_connection() {
        let (a, b) = tokio::io::duplex(256);
        drop(a);

        let mut chan = MessageChannel::new(b);
        let err = verify(&mut chan, Role::Encrypt).await.unwrap_err();
        assert!(matches!(err, HandshakeError::Channel(ChannelError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn garbage_tag_is_rejected() {
        let (a, b) = tokio::io::duplex(256);
        let client = tokio::spawn(async move {
            let mut chan = MessageChannel::new(a);
            chan.send(b"root").await.unwrap();
            chan.recv().await.unwrap()
        });

        let mut chan = MessageChannel::new(b);
        assert!(verify(&mut chan, Role::Encrypt).await.is_err());
        assert_eq!(&client.await.unwrap()[..], REPLY_INVALID_ID);
    }
}

//! Role tags for the identity handshake.
//!
//! A connecting client declares one of two fixed roles; the accepting
//! server compares the tag against its own role and answers with
//! [`REPLY_OK`] or [`REPLY_INVALID_ID`]. Tags exist only on the wire
//! during the handshake and are never persisted.

use std::fmt;

/// Handshake reply for an accepted role.
pub const REPLY_OK: &[u8] = b"OK";

/// Handshake reply for a rejected role.
pub const REPLY_INVALID_ID: &[u8] = b"INVALID ID";

/// The intent a client declares when it connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Plaintext in, ciphertext out.
    Encrypt,
    /// Ciphertext in, plaintext out.
    Decrypt,
}

impl Role {
    /// The literal tag sent on the wire during the handshake.
    #[must_use]
    pub const fn tag(self) -> &'static [u8] {
        match self {
            Self::Encrypt => b"enc",
            Self::Decrypt => b"dec",
        }
    }

    /// Parses a wire tag back into a role.
    #[must_use]
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"enc" => Some(Self::Encrypt),
            b"dec" => Some(Self::Decrypt),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encrypt => write!(f, "encrypt"),
            Self::Decrypt => write!(f, "decrypt"),
        }
    }
}

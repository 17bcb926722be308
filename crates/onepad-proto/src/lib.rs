//! Onepad protocol primitives.
//!
//! Pure protocol logic shared by the client and server crates:
//!
//! - [`alphabet`]: the 27-symbol alphabet (A-Z plus space) and its mapping
//!   to residues 0-26
//! - [`cipher`]: the character-wise modular substitution transform
//! - [`role`]: the role tags exchanged during the identity handshake
//!
//! Everything in this crate is free of I/O and side effects, so the same
//! code backs the production binaries and the deterministic tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod alphabet;
pub mod cipher;
pub mod role;

pub use cipher::{CipherError, decode, encode, validate};
pub use role::{REPLY_INVALID_ID, REPLY_OK, Role};

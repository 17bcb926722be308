//! The modular substitution transform.
//!
//! [`encode`] and [`decode`] apply a position-wise add/subtract over the
//! 27-symbol alphabet: symbol `i` of the text pairs with symbol `i` of the
//! key, and the sum (or difference) modulo 27 selects the output symbol.
//! The two operations are inverses: `decode(encode(p, k), k) == p` for
//! every valid text/key pair.
//!
//! Both operations validate their inputs up front - alphabet membership of
//! text and key, and `key.len() >= text.len()` - and refuse to transform
//! anything on failure. Output length always equals input length, and the
//! inputs are never modified.

use thiserror::Error;

use crate::alphabet;

/// Validation failures raised before any transform runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// A byte outside the 27-symbol alphabet.
    #[error("invalid symbol {byte:#04x} at position {position}")]
    InvalidSymbol {
        /// Offset of the offending byte within its input.
        position: usize,
        /// The offending byte value.
        byte: u8,
    },

    /// The key is shorter than the text it must cover.
    #[error("key too short: key {key_len} bytes, text {text_len} bytes")]
    KeyTooShort {
        /// Length of the supplied key.
        key_len: usize,
        /// Length of the text the key must cover.
        text_len: usize,
    },
}

/// Encrypts `plain` with `key`: `out[i] = (plain[i] + key[i]) mod 27`.
///
/// # Errors
///
/// `InvalidSymbol` if either input contains a byte outside the alphabet,
/// `KeyTooShort` if `key.len() < plain.len()`. Nothing is transformed on
/// failure.
pub fn encode(plain: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError> {
    validate(plain, key)?;

    Ok(plain
        .iter()
        .zip(key)
        .map(|(&p, &k)| {
            let sum = (alphabet::residue(p) + alphabet::residue(k)) % alphabet::MODULUS;
            alphabet::symbol(sum)
        })
        .collect())
}

/// Decrypts `text` with `key`: `out[i] = (text[i] - key[i]) mod 27`.
///
/// The subtraction is normalised with `rem_euclid`, so residue differences
/// that would be negative wrap back into `0..=26`.
///
/// # Errors
///
/// Same validation as [`encode`].
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn decode(text: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError> {
    validate(text, key)?;

    Ok(text
        .iter()
        .zip(key)
        .map(|(&c, &k)| {
            let diff = i16::from(alphabet::residue(c)) - i16::from(alphabet::residue(k));
            // rem_euclid keeps the residue in 0..27 even when diff < 0.
            alphabet::symbol(diff.rem_euclid(i16::from(alphabet::MODULUS)) as u8)
        })
        .collect())
}

/// Validation gate shared by both transforms: alphabet membership of both
/// inputs, then the key-length requirement.
///
/// Public so callers (the client, before it ever connects) can reject bad
/// inputs without running a transform.
///
/// # Errors
///
/// `InvalidSymbol` or `KeyTooShort`, as for [`encode`].
pub fn validate(text: &[u8], key: &[u8]) -> Result<(), CipherError> {
    for input in [text, key] {
        if let Some(position) = alphabet::first_invalid(input) {
            return Err(CipherError::InvalidSymbol { position, byte: input[position] });
        }
    }

    if key.len() < text.len() {
        return Err(CipherError::KeyTooShort { key_len: key.len(), text_len: text.len() });
    }

    Ok(())
}

//! Random key generator.
//!
//! # Usage
//!
//! ```bash
//! # A 1024-symbol key on stdout, trailing newline included
//! onepad-keygen 1024 > key.txt
//! ```
//!
//! Symbols are drawn uniformly from the 27-symbol alphabet using OS
//! entropy with rejection sampling, so no symbol is favoured by the
//! modulo reduction.

use clap::Parser;
use onepad_proto::alphabet;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Largest multiple of the alphabet size below 256; bytes at or above
/// this would bias the low residues and are redrawn.
const REJECT_ABOVE: u8 = 243;

/// Onepad key generator
#[derive(Parser, Debug)]
#[command(name = "onepad-keygen")]
#[command(about = "Generate a random key over the onepad alphabet")]
#[command(version)]
struct Args {
    /// Number of key symbols to generate
    length: usize,
}

/// Draws `length` uniform alphabet symbols.
fn generate(length: usize) -> Result<String, getrandom::Error> {
    let mut key = String::with_capacity(length);
    let mut buf = [0u8; 256];

    'fill: while key.len() < length {
        getrandom::fill(&mut buf)?;
        for &byte in &buf {
            if byte >= REJECT_ABOVE {
                continue;
            }
            key.push(char::from(alphabet::symbol(byte % alphabet::MODULUS)));
            if key.len() == length {
                break 'fill;
            }
        }
    }

    Ok(key)
}

#[allow(clippy::print_stdout)] // the key on stdout is the product
fn main() {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    match generate(args.length) {
        Ok(key) => println!("{}", key),
        Err(e) => {
            tracing::error!("entropy source failed: {}", e);
            std::process::exit(1);
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        for length in [0, 1, 27, 1000] {
            let key = generate(length).unwrap();
            assert_eq!(key.len(), length);
        }
    }

    #[test]
    fn stays_within_alphabet() {
        let key = generate(4096).unwrap();
        assert!(key.bytes().all(alphabet::is_valid));
    }

    #[test]
    fn rejection_threshold_is_a_multiple_of_the_modulus() {
        assert_eq!(REJECT_ABOVE % alphabet::MODULUS, 0);
        assert!(u16::from(REJECT_ABOVE) + u16::from(alphabet::MODULUS) > 255);
    }
}

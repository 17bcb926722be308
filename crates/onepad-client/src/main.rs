//! Onepad client binary.
//!
//! # Usage
//!
//! ```bash
//! # Encrypt plaintext.txt with key.txt via the encrypt server on 57111
//! onepad-client plaintext.txt key.txt 57111 --role enc
//!
//! # Decrypt the result back
//! onepad-client ciphertext.txt key.txt 57112 --role dec
//! ```
//!
//! Prints the transformed text to stdout on success and nothing
//! otherwise. Inputs are validated (alphabet membership, key length)
//! before any connection is made.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use onepad_proto::{Role, cipher};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Process exit statuses. Usage errors exit 2 via clap.
mod exit {
    /// Runtime I/O or validation failure.
    pub const RUNTIME: i32 = 1;
    /// Bad port, connect failure, or role rejection.
    pub const CONNECT: i32 = 3;
}

/// Onepad transform client
#[derive(Parser, Debug)]
#[command(name = "onepad-client")]
#[command(about = "Onepad message transform client")]
#[command(version)]
struct Args {
    /// File containing the text to transform
    text: PathBuf,

    /// File containing the key (at least as long as the text)
    key: PathBuf,

    /// Server port (1024-65535)
    port: u16,

    /// Role to request from the server
    #[arg(short, long, value_enum)]
    role: RoleArg,

    /// Server host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// CLI spelling of the two request roles.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    /// Ask the encrypt server to encode
    Enc,
    /// Ask the decrypt server to decode
    Dec,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Enc => Self::Encrypt,
            RoleArg::Dec => Self::Decrypt,
        }
    }
}

/// Reads a message file, stripping one trailing newline if present.
async fn load_message(path: &Path) -> Result<Vec<u8>, std::io::Error> {
    let mut contents = tokio::fs::read(path).await?;
    if contents.last() == Some(&b'\n') {
        contents.pop();
    }
    Ok(contents)
}

#[tokio::main]
#[allow(clippy::print_stdout)] // the result on stdout is the product
async fn main() {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let text = match load_message(&args.text).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("could not read {}: {}", args.text.display(), e);
            std::process::exit(exit::RUNTIME);
        },
    };
    let key = match load_message(&args.key).await {
        Ok(key) => key,
        Err(e) => {
            tracing::error!("could not read {}: {}", args.key.display(), e);
            std::process::exit(exit::RUNTIME);
        },
    };

    if let Err(e) = cipher::validate(&text, &key) {
        tracing::error!("{}", e);
        std::process::exit(exit::RUNTIME);
    }

    if !onepad_net::port::is_user_range(args.port) {
        tracing::error!("invalid port {}: must be 1024-65535", args.port);
        std::process::exit(exit::CONNECT);
    }

    let role = Role::from(args.role);
    let addr = (args.host.as_str(), args.port);

    match onepad_client::drive(addr, role, &text, &key).await {
        Ok(Some(result)) => {
            println!("{}", String::from_utf8_lossy(&result));
        },
        Ok(None) => {
            // Server closed without a result; silence is the failure mode.
            tracing::warn!("server closed the connection without a result");
        },
        Err(e) => {
            let status = if e.is_connect_class() { exit::CONNECT } else { exit::RUNTIME };
            tracing::error!("{} request to port {} failed: {}", role, args.port, e);
            std::process::exit(status);
        },
    }
}

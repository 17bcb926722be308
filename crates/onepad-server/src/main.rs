//! Onepad server binary.
//!
//! # Usage
//!
//! ```bash
//! # Encrypt server on port 57111, default cap of 5 workers
//! onepad-server --port 57111 --role enc
//!
//! # Decrypt server with a larger cap
//! onepad-server --port 57112 --role dec --max-connections 16
//! ```
//!
//! Runs until interrupted (ctrl-c), then drains in-flight workers and
//! exits with status 130.

use clap::{Parser, ValueEnum};
use onepad_proto::Role;
use onepad_server::{Server, ServerConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Process exit statuses. Usage errors exit 2 via clap.
mod exit {
    /// Runtime I/O failure.
    pub const RUNTIME: i32 = 1;
    /// Bad port or bind failure.
    pub const CONNECT: i32 = 3;
    /// Terminated by interrupt.
    pub const INTERRUPT: i32 = 130;
}

/// Onepad transform server
#[derive(Parser, Debug)]
#[command(name = "onepad-server")]
#[command(about = "Onepad message transform server")]
#[command(version)]
struct Args {
    /// Port to listen on (1024-65535)
    #[arg(short, long)]
    port: u16,

    /// Which transform this server performs (and the only role it admits)
    #[arg(short, long, value_enum)]
    role: RoleArg,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Maximum concurrent in-flight connections
    #[arg(long, default_value_t = 5)]
    max_connections: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// CLI spelling of the two server roles.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    /// Plaintext in, ciphertext out
    Enc,
    /// Ciphertext in, plaintext out
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

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    if !onepad_net::port::is_user_range(args.port) {
        tracing::error!("invalid port {}: must be 1024-65535", args.port);
        std::process::exit(exit::CONNECT);
    }

    let role = Role::from(args.role);
    let config = ServerConfig {
        bind_address: format!("{}:{}", args.bind, args.port),
        role,
        max_connections: args.max_connections,
        ..ServerConfig::default()
    };

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("startup failed: {}", e);
            std::process::exit(exit::CONNECT);
        },
    };

    match server.local_addr() {
        Ok(addr) => tracing::info!("{} server listening on {}", role, addr),
        Err(e) => {
            tracing::error!("startup failed: {}", e);
            std::process::exit(exit::CONNECT);
        },
    }

    match server.run().await {
        Ok(()) => std::process::exit(exit::INTERRUPT),
        Err(e) => {
            tracing::error!("server failed: {}", e);
            std::process::exit(exit::RUNTIME);
        },
    }
}

//! Server error types.

use std::fmt;

/// Errors that are fatal to the whole server.
///
/// Per-connection failures never surface here; they are logged and
/// contained by the worker that owns the connection.
#[derive(Debug)]
pub enum ServerError {
    /// Configuration error (unparseable bind address)
    Config(String),

    /// Binding or listening on the configured address failed
    Bind(std::io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Bind(err) => write!(f, "bind error: {}", err),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        Self::Bind(err)
    }
}

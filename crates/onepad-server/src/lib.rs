//! Onepad production server.
//!
//! Accepts TCP connections, binds each one to a worker task, and applies
//! the role's transform to the payload/key pair the client sends.
//!
//! ## Architecture
//!
//! ```text
//! onepad-server
//!   ├─ Server       (bind + admission-controlled accept loop)
//!   ├─ worker       (one task per connection: handshake, exchange, transform)
//!   └─ onepad-net   (framing + handshake)
//! ```
//!
//! Admission control, not queueing: when the configured number of workers
//! is in flight, new connections are closed immediately without a
//! handshake. Finished workers are reaped lazily on the next admission
//! event.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod admission;
mod error;
mod worker;

pub use admission::{Server, ServerConfig};
pub use error::ServerError;
pub use worker::WorkerError;

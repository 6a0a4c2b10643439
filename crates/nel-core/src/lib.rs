//! # nel-core
//!
//! Shared, I/O-free building blocks for talking to a NEL session server.
//!
//! The server speaks a very small protocol: UTF-8 text, one JSON object (or a
//! bare text token) per line, newline-terminated in both directions.  This
//! crate owns the two pieces of that protocol that have no business knowing
//! about sockets or async runtimes:
//!
//! - **`framing`** – turns an arbitrarily chunked byte stream into discrete
//!   lines.  [`LineBuffer`] holds the bytes that have arrived but do not yet
//!   form a complete line, and [`ReadOutcome`] is the result type shared by
//!   every deadline-bounded line reader built on top of it.
//!
//! - **`protocol`** – the message codec.  [`OutboundMessage`] serialises the
//!   requests a client sends; [`InboundLine`] parses (best-effort) whatever
//!   the server sends back so it can be correlated by its `type` field.
//!
//! The socket side lives in `nel-probe`'s infrastructure layer.

pub mod framing;
pub mod protocol;

pub use framing::{LineBuffer, ReadOutcome};
pub use protocol::{CodecError, InboundLine, OutboundMessage, Request};

//! nel-probe library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! the binary entry point in `main.rs` share the same module tree.
//!
//! # What does nel-probe do?
//!
//! It is a diagnostic client for a NEL session server.  It lets an engineer
//! watch the server's line-delimited JSON protocol without a full game client:
//!
//! 1. Connects over TCP and prints the server's greeting.
//! 2. Runs the fixed handshake: `ping`, `noop`, `login_4399`, `open_server`,
//!    `join_game`.  Every step is best-effort: a missing reply is logged and
//!    the sequence moves on.
//! 3. Drops into an interactive mode where typed lines are sent verbatim and
//!    everything the server sends is printed as it arrives.
//!
//! # Architecture
//!
//! ```text
//! main.rs          clap CLI + env + profile → ProbeConfig, tracing setup
//! domain/          ProbeConfig, poll intervals, defaults
//! application/     ports (LineSource, LineSink, Transcript),
//!                  handshake sequencer, interactive session
//! infrastructure/  TCP line reader/writer, console transcript, profile file
//! ```
//!
//! **Dependency rule**: `application` only knows the port traits; the
//! infrastructure types implement them.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::ProbeError;

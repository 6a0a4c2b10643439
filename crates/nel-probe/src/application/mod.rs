//! Application layer for nel-probe.
//!
//! # What use cases does the probe have?
//!
//! - **`handshake`** – drives the fixed request/response sequence that takes a
//!   fresh connection to a joined game session.  Every step is best-effort and
//!   bounded by a deadline.
//!
//! - **`interactive`** – after the handshake, prints everything the server
//!   sends while forwarding operator-typed lines to it.
//!
//! Both talk to the outside world only through the traits in **`ports`**, so
//! they can be driven by in-memory streams in tests.

pub mod handshake;
pub mod interactive;
pub mod ports;

pub use handshake::{HandshakeReport, HandshakeSequencer, HandshakeState, StepOutcome};
pub use interactive::{ExitReason, InteractiveSession, SessionSummary};
pub use ports::{LineSink, LineSource, Transcript};

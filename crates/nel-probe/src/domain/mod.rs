//! Domain layer for nel-probe.
//!
//! Plain configuration types with no I/O, plus the overflow-safe deadline
//! arithmetic every bounded wait shares.  Populating them from the command
//! line, the environment or a profile file is the job of `main.rs` and the
//! infrastructure layer.

pub mod config;
pub mod deadline;

pub use config::{PollIntervals, ProbeConfig};
pub use deadline::deadline_after;

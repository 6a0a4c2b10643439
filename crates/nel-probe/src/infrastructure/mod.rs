//! Infrastructure layer for nel-probe: the TCP connection, the stdout
//! transcript and the optional profile file.

pub mod connection;
pub mod console;
pub mod profile;

pub use connection::{LineReader, LineWriter, ProbeConnection};
pub use console::ConsoleTranscript;
pub use profile::{load_profile, ProbeProfile, ProfileError};

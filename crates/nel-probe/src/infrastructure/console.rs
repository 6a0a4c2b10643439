//! Operator-facing transcript on stdout.
//!
//! Log output goes to stderr through `tracing`; this is the only place that
//! writes to stdout, so the transcript can be piped or diffed on its own.

use std::io::Write;

use crate::application::ports::Transcript;

/// Prints every exchanged line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleTranscript;

impl ConsoleTranscript {
    pub fn new() -> Self {
        Self
    }

    fn emit(&self, text: &str) {
        // Locking once per line keeps the reader task's output from
        // interleaving with the writer's inside a single line.
        let mut out = std::io::stdout().lock();
        // A closed stdout is not worth aborting the session over.
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

/// Formats a sent line the way it appears in the transcript.
pub fn format_sent(label: &str, line: &str) -> String {
    format!("sent({label}): {line}")
}

/// Formats a received line the way it appears in the transcript.
pub fn format_received(line: &str) -> String {
    format!("recv: {line}")
}

impl Transcript for ConsoleTranscript {
    fn sent(&self, label: &str, line: &str) {
        self.emit(&format_sent(label, line));
    }

    fn received(&self, line: &str) {
        self.emit(&format_received(line));
    }

    fn notice(&self, text: &str) {
        self.emit(text);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Traits the application layer uses to reach the connection and the console.

use std::time::Duration;

use async_trait::async_trait;
use nel_core::framing::ReadOutcome;
use nel_core::protocol::OutboundMessage;

use crate::error::ProbeError;

/// Inbound half of a connection: yields one line at a time.
#[async_trait]
pub trait LineSource: Send {
    /// Waits at most `timeout` for the next complete line.
    ///
    /// Returns [`ReadOutcome::TimedOut`] if the time runs out (bytes received
    /// so far stay buffered) and [`ReadOutcome::Closed`] if the peer closed
    /// the connection.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Io`] for transport failures such as a reset.
    async fn read_line(&mut self, timeout: Duration) -> Result<ReadOutcome, ProbeError>;
}

/// Outbound half of a connection.
#[async_trait]
pub trait LineSink: Send {
    /// Writes `message` followed by a newline and returns the line as sent.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    async fn send(&mut self, message: &OutboundMessage) -> Result<String, ProbeError>;

    /// Shuts the connection down for writing.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Io`] if the shutdown fails.
    async fn close(&mut self) -> Result<(), ProbeError>;
}

/// Where sent and received lines are echoed for the operator.
#[cfg_attr(test, mockall::automock)]
pub trait Transcript: Send + Sync {
    /// A line was written to the server.
    fn sent(&self, label: &str, line: &str);
    /// A line was received from the server.
    fn received(&self, line: &str);
    /// Operator-facing text that is neither sent nor received.
    fn notice(&self, text: &str);
}

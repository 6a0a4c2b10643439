//! Interactive session.
//!
//! Two tasks share one connection after the handshake:
//!
//! - a **background reader** that owns the inbound half (and the bytes the
//!   handshake left in its buffer) and echoes every line it receives;
//! - the **foreground writer**, which reads operator lines and sends them
//!   verbatim.
//!
//! The reader only reads and the writer only writes, so the two never touch
//! the same state.  The only thing they share is the stop flag, which the
//! reader checks between read attempts; each attempt is bounded by the
//! interactive poll interval, so the reader notices the flag within one
//! interval.  An in-flight read is never interrupted.
//!
//! Sends and receives are independent: there is no guarantee that the reply
//! to one line is printed before the next line is sent.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use nel_core::framing::ReadOutcome;
use nel_core::protocol::OutboundMessage;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::application::ports::{LineSink, LineSource, Transcript};
use crate::error::ProbeError;

/// Printed when the session starts.
pub const BANNER: &str = "interactive mode: type a line and press Enter to send it, `exit` to quit";

/// Why the foreground loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The operator typed `exit` or `quit`.
    QuitCommand,
    /// The operator's input ended.
    EndOfInput,
}

/// What happened during the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub lines_sent: usize,
    pub exit_reason: ExitReason,
}

/// Returns `true` for the commands that end the session.
fn is_quit_command(text: &str) -> bool {
    text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit")
}

/// Post-handshake interactive mode.
pub struct InteractiveSession<K> {
    sink: K,
    transcript: Arc<dyn Transcript>,
    poll: Duration,
}

impl<K: LineSink> InteractiveSession<K> {
    /// `poll` bounds each background read attempt.
    pub fn new(sink: K, transcript: Arc<dyn Transcript>, poll: Duration) -> Self {
        Self {
            sink,
            transcript,
            poll,
        }
    }

    /// Runs until the operator quits or their input ends, then closes the
    /// connection.
    ///
    /// `source` is moved into the background reader together with whatever
    /// it has buffered.
    ///
    /// # Errors
    ///
    /// Returns an error if a send fails or operator input cannot be read.
    /// The background reader is stopped and the connection closed first.
    pub async fn run<S, I>(mut self, source: S, input: I) -> Result<SessionSummary, ProbeError>
    where
        S: LineSource + 'static,
        I: AsyncBufRead + Unpin,
    {
        self.transcript.notice(BANNER);

        let stop = Arc::new(AtomicBool::new(false));
        let reader = tokio::spawn(receive_loop(
            source,
            Arc::clone(&self.transcript),
            Arc::clone(&stop),
            self.poll,
        ));

        let result = self.forward_input(input).await;

        stop.store(true, Ordering::Relaxed);
        if let Err(e) = reader.await {
            warn!("background reader ended abnormally: {e}");
        }
        if let Err(e) = self.sink.close().await {
            debug!("closing connection: {e}");
        }

        result
    }

    async fn forward_input<I>(&mut self, input: I) -> Result<SessionSummary, ProbeError>
    where
        I: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut lines_sent = 0;

        let exit_reason = loop {
            let Some(raw) = lines.next_line().await? else {
                break ExitReason::EndOfInput;
            };
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }
            if is_quit_command(text) {
                break ExitReason::QuitCommand;
            }

            let message = OutboundMessage::Raw(text.to_string());
            let line = self.sink.send(&message).await?;
            self.transcript.sent(message.label(), &line);
            lines_sent += 1;
        };

        info!("leaving interactive mode ({exit_reason:?}, {lines_sent} lines sent)");
        Ok(SessionSummary {
            lines_sent,
            exit_reason,
        })
    }
}

/// Echoes inbound lines until `stop` is set or the connection ends.
async fn receive_loop<S: LineSource>(
    mut source: S,
    transcript: Arc<dyn Transcript>,
    stop: Arc<AtomicBool>,
    poll: Duration,
) {
    while !stop.load(Ordering::Relaxed) {
        match source.read_line(poll).await {
            Ok(ReadOutcome::Line(line)) if line.is_empty() => {}
            Ok(ReadOutcome::Line(line)) => transcript.received(&line),
            Ok(ReadOutcome::TimedOut) => {}
            Ok(ReadOutcome::Closed) => {
                info!("server closed the connection");
                return;
            }
            Err(e) => {
                warn!("read from server failed: {e}");
                return;
            }
        }
    }
    debug!("background reader stopped");
}

// ── Tests ─────────────────────────────────────────────────────────────────────

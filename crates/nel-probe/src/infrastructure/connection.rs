//! TCP connection to the session server.
//!
//! # Deadline-bounded line reads
//!
//! [`LineReader::recv_line`] computes one absolute deadline and then alternates
//! between scanning the pending buffer and a single network read bounded by
//! the time left.  A read that times out is not an error: the loop re-checks
//! the deadline and reports [`ReadOutcome::TimedOut`] with every received byte
//! still buffered.  A zero-length read means the peer closed the connection;
//! it ends the wait immediately and empties the buffer.
//!
//! # Ownership of the leftover buffer
//!
//! The buffer lives inside the reader.  Moving the reader moves the buffer, so
//! there is never a second reader competing for the same bytes.  The handshake
//! borrows the reader; the interactive session then takes it by value.
//!
//! Uses only `tokio::net` and `tokio::io`, so it runs the same on every
//! platform tokio supports.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use nel_core::framing::{LineBuffer, ReadOutcome};
use nel_core::protocol::OutboundMessage;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::{self, Instant};
use tracing::debug;

use crate::application::ports::{LineSink, LineSource};
use crate::domain::{deadline_after, ProbeConfig};
use crate::error::ProbeError;

/// Size of each individual `read()` into the pending buffer.
pub const READ_CHUNK: usize = 4096;

/// Reads newline-terminated lines from a byte stream.
pub struct LineReader<R> {
    reader: R,
    buffer: LineBuffer,
    chunk: Vec<u8>,
}

impl<R> LineReader<R>
where
    R: AsyncRead + Unpin,
{
    /// Wraps `reader` with an empty pending buffer.
    pub fn new(reader: R) -> Self {
        Self::from_parts(reader, LineBuffer::new())
    }

    /// Wraps `reader`, continuing from bytes an earlier reader left behind.
    pub fn from_parts(reader: R, buffer: LineBuffer) -> Self {
        Self {
            reader,
            buffer,
            chunk: vec![0u8; READ_CHUNK],
        }
    }

    /// Splits the reader back into the stream and its pending bytes.
    pub fn into_parts(self) -> (R, LineBuffer) {
        (self.reader, self.buffer)
    }

    /// Bytes received but not yet returned as a line.
    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    /// Waits at most `timeout` for the next complete line.
    ///
    /// If several lines arrive in one read, only the first is returned; the
    /// rest stay buffered for the next call.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error for anything other than a timeout or
    /// an orderly close.
    pub async fn recv_line(&mut self, timeout: Duration) -> std::io::Result<ReadOutcome> {
        let deadline = deadline_after(timeout);

        loop {
            if let Some(line) = self.buffer.next_line() {
                return Ok(ReadOutcome::Line(line));
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(ReadOutcome::TimedOut);
            }

            match time::timeout(remaining, self.reader.read(&mut self.chunk)).await {
                // No data in this window; the deadline check above decides.
                Err(_elapsed) => continue,
                Ok(Ok(0)) => {
                    debug!("peer closed the connection ({} bytes pending)", self.buffer.len());
                    self.buffer.clear();
                    return Ok(ReadOutcome::Closed);
                }
                Ok(Ok(n)) => self.buffer.extend(&self.chunk[..n]),
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Ok(Err(e)) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl<R> LineSource for LineReader<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn read_line(&mut self, timeout: Duration) -> Result<ReadOutcome, ProbeError> {
        Ok(self.recv_line(timeout).await?)
    }
}

/// Writes one message per line.
pub struct LineWriter<W> {
    writer: W,
}

impl<W> LineWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes `message` plus `\n` and flushes.  Returns the line as sent,
    /// without the terminator.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Codec`] if the message cannot be encoded and
    /// [`ProbeError::Io`] if the write fails.
    pub async fn write_message(&mut self, message: &OutboundMessage) -> Result<String, ProbeError> {
        let mut wire = message.to_wire()?;

        // `write_all` keeps writing until the whole line is accepted.
        self.writer.write_all(&wire).await?;
        self.writer.flush().await?;

        wire.pop();
        Ok(String::from_utf8_lossy(&wire).into_owned())
    }
}

#[async_trait]
impl<W> LineSink for LineWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, message: &OutboundMessage) -> Result<String, ProbeError> {
        self.write_message(message).await
    }

    async fn close(&mut self) -> Result<(), ProbeError> {
        Ok(self.writer.shutdown().await?)
    }
}

/// An open connection, already split into its line-oriented halves.
pub struct ProbeConnection {
    pub reader: LineReader<OwnedReadHalf>,
    pub writer: LineWriter<OwnedWriteHalf>,
    pub peer_addr: SocketAddr,
}

impl ProbeConnection {
    /// Opens a TCP connection to `config.host:config.port`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::ConnectFailed`] if the server cannot be reached.
    pub async fn connect(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let addr = config.server_addr();
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| ProbeError::ConnectFailed {
                addr: addr.clone(),
                source,
            })?;

        // Interactive lines are tiny; do not let Nagle hold them back.
        stream.set_nodelay(true)?;
        let peer_addr = stream.peer_addr()?;

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: LineReader::new(read_half),
            writer: LineWriter::new(write_half),
            peer_addr,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

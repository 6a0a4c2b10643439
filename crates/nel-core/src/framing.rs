//! Newline framing over a byte stream.
//!
//! # Why a buffer is needed
//!
//! TCP is a stream protocol.  A single `read()` may return half a line, one
//! line, or several lines glued together.  [`LineBuffer`] accumulates the raw
//! bytes and hands back one complete line at a time, keeping everything after
//! the first `\n` for the next call.
//!
//! Bytes are never reordered or dropped by the buffer: every byte that goes in
//! through [`LineBuffer::extend`] comes out either as part of exactly one line
//! or is still pending.  The only operation that discards data is
//! [`LineBuffer::clear`], which the reader calls when the peer closes the
//! connection.
//!
//! There is no upper size bound; a line may span any number of reads.  The
//! buffer remembers how far it has already searched for a terminator, so a
//! long line arriving in small chunks is scanned once rather than once per
//! chunk.

/// Result of one deadline-bounded attempt to read a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete line, without its `\n` terminator.
    Line(String),
    /// The deadline passed before a complete line arrived.  Everything
    /// received so far is still pending in the buffer.
    TimedOut,
    /// The peer closed the connection (zero-length read).  The pending
    /// buffer has been emptied.
    Closed,
}

/// Bytes read from a connection but not yet resolved into a complete line.
///
/// There is exactly one `LineBuffer` per connection.  It moves together with
/// the read half of the stream from the handshake into the interactive phase.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    pending: Vec<u8>,
    /// Prefix of `pending` already known to contain no `\n`.
    scanned: usize,
}

impl LineBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends freshly received bytes to the end of the buffer.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Extracts the first complete line, if any.
    ///
    /// The `\n` is consumed and not part of the returned text.  A `\r` before
    /// it is kept.  Invalid UTF-8 is replaced with U+FFFD instead of failing,
    /// because a diagnostic client must still show whatever the server sent.
    pub fn next_line(&mut self) -> Option<String> {
        let Some(offset) = self.pending[self.scanned..].iter().position(|&b| b == b'\n') else {
            self.scanned = self.pending.len();
            return None;
        };
        let newline = self.scanned + offset;
        let line = String::from_utf8_lossy(&self.pending[..newline]).into_owned();
        self.pending.drain(..=newline);
        // The bytes after the terminator have not been searched yet.
        self.scanned = 0;
        Some(line)
    }

    /// The bytes still waiting for a terminator.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Number of pending bytes.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops all pending bytes.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.scanned = 0;
    }

    /// Consumes the buffer, returning the pending bytes.
    pub fn into_leftover(self) -> Vec<u8> {
        self.pending
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_line_on_empty_buffer_returns_none() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.next_line(), None);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_next_line_without_newline_keeps_bytes() {
        // Arrange
        let mut buf = LineBuffer::new();
        buf.extend(b"{\"type\":\"acc");

        // Act
        let line = buf.next_line();

        // Assert: nothing extracted, nothing lost
        assert_eq!(line, None);
        assert_eq!(buf.pending(), b"{\"type\":\"acc");
    }

    #[test]
    fn test_next_line_splits_at_first_newline() {
        let mut buf = LineBuffer::new();
        buf.extend(b"first\nsecond\nthird");

        assert_eq!(buf.next_line().as_deref(), Some("first"));
        assert_eq!(buf.next_line().as_deref(), Some("second"));
        assert_eq!(buf.next_line(), None);
        assert_eq!(buf.pending(), b"third");
    }

    #[test]
    fn test_empty_line_is_returned_as_empty_string() {
        let mut buf = LineBuffer::new();
        buf.extend(b"\nnext\n");

        assert_eq!(buf.next_line().as_deref(), Some(""));
        assert_eq!(buf.next_line().as_deref(), Some("next"));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_carriage_return_is_kept() {
        let mut buf = LineBuffer::new();
        buf.extend(b"connected\r\n");
        assert_eq!(buf.next_line().as_deref(), Some("connected\r"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_rejected() {
        // Arrange: 0xFF is never valid in UTF-8
        let mut buf = LineBuffer::new();
        buf.extend(&[b'o', b'k', 0xFF, b'\n']);

        // Act
        let line = buf.next_line().expect("a line must be produced");

        // Assert
        assert_eq!(line, "ok\u{FFFD}");
    }

    #[test]
    fn test_multibyte_character_split_across_reads() {
        // "角色" is 6 bytes; split it in the middle of the first character.
        let text = "角色\n".as_bytes();
        let mut buf = LineBuffer::new();
        buf.extend(&text[..1]);
        assert_eq!(buf.next_line(), None);
        buf.extend(&text[1..]);
        assert_eq!(buf.next_line().as_deref(), Some("角色"));
    }

    #[test]
    fn test_search_resumes_where_the_last_one_stopped() {
        // Arrange: a long line trickles in without a terminator
        let mut buf = LineBuffer::new();
        for _ in 0..1000 {
            buf.extend(b"x");
            assert_eq!(buf.next_line(), None);
        }

        // Assert: everything received so far is known to be terminator-free
        assert_eq!(buf.scanned, 1000);

        // Act: the terminator and the start of the next line arrive together
        buf.extend(b"\nnext");
        let line = buf.next_line().expect("line is complete");

        // Assert
        assert_eq!(line.len(), 1000);
        assert_eq!(buf.scanned, 0);
        assert_eq!(buf.pending(), b"next");
        assert_eq!(buf.next_line(), None);
        assert_eq!(buf.scanned, 4);
    }

    #[test]
    fn test_second_buffered_line_is_found_after_first_is_taken() {
        // The search offset must not skip the bytes after an extracted line.
        let mut buf = LineBuffer::new();
        buf.extend(b"ab");
        assert_eq!(buf.next_line(), None);
        buf.extend(b"\ncd\nef");

        assert_eq!(buf.next_line().as_deref(), Some("ab"));
        assert_eq!(buf.next_line().as_deref(), Some("cd"));
        assert_eq!(buf.next_line(), None);
        assert_eq!(buf.pending(), b"ef");
    }

    #[test]
    fn test_clear_discards_pending_bytes() {
        let mut buf = LineBuffer::new();
        buf.extend(b"partial");
        assert_eq!(buf.next_line(), None);
        buf.clear();
        assert_eq!(buf.len(), 0);
        buf.extend(b"\n");
        assert_eq!(buf.next_line().as_deref(), Some(""));
    }
}

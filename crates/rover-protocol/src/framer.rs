//! Stream framer for terminator-delimited protocol messages.
//!
//! TCP is a stream protocol without message boundaries: a single read may
//! contain a partial message, a complete message, several messages, or a
//! message split in the middle of the terminator sequence. The framer
//! accumulates bytes in a carry-over buffer and extracts complete payloads
//! delimited by a configurable terminator (default `\x07\x08`).
//!
//! # Length enforcement
//!
//! Every extraction call names the maximum payload length admissible at
//! that point of the conversation. The framer rejects a frame as oversize
//! *as soon as it is provably oversize*, without waiting for a terminator:
//!
//! - a complete terminator found at position `p > limit` is a syntax error;
//! - with no complete terminator, the frame is still viable only while a
//!   terminator could begin at some position `<= limit`. Once the buffer
//!   holds more than `limit` bytes and its tail is not a proper terminator
//!   prefix starting at a position `<= limit`, no valid placement remains.
//!
//! The second rule fires no later than the simple budget
//! `limit + terminator_len - 1` buffered bytes, and earlier whenever the
//! content proves the frame invalid (an 18-byte-limit read is rejected on
//! the 19th non-terminator byte).
//!
//! # Example
//!
//! ```
//! use rover_protocol::Framer;
//!
//! let mut framer = Framer::new();
//!
//! // A message split across reads, coalesced with the start of the next
//! framer.feed(b"Oompa Lo");
//! assert!(framer.next_frame(18).unwrap().is_none());
//!
//! framer.feed(b"ompa\x07\x080\x07\x08");
//! assert_eq!(&framer.next_frame(18).unwrap().unwrap()[..], b"Oompa Loompa");
//!
//! // The key id is already buffered; no further read needed
//! assert_eq!(&framer.next_frame(3).unwrap().unwrap()[..], b"0");
//! ```

use bytes::{Buf, Bytes, BytesMut};
use rover_core::constants::TERMINATOR;
use rover_core::{Error, Result};

/// Initial capacity of the carry-over buffer.
///
/// The largest admissible payload is a 98-byte secret plus terminator, so
/// a small buffer never reallocates in practice.
const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Outcome of scanning the buffer for the terminator.
enum Scan {
    /// Complete terminator starting at this payload length.
    Complete(usize),
    /// A proper terminator prefix runs from this position to the buffer end.
    Partial(usize),
    /// No trace of the terminator; it could only begin past the buffer.
    Absent,
}

/// Stateful framer over a terminator-delimited byte stream.
///
/// Bytes are appended with [`feed`](Framer::feed); complete payloads are
/// extracted with [`next_frame`](Framer::next_frame), which takes the
/// maximum payload length admissible for the message currently expected.
/// Bytes following an extracted terminator are retained for the next
/// frame, so coalesced messages are served without further reads.
#[derive(Debug)]
pub struct Framer {
    /// Carry-over buffer between reads and between frames.
    buffer: BytesMut,

    /// Terminator byte sequence ending every message.
    terminator: Vec<u8>,
}

impl Framer {
    /// Create a framer using the default terminator (`\x07\x08`).
    #[must_use]
    pub fn new() -> Self {
        Self::with_terminator(TERMINATOR)
    }

    /// Create a framer with a custom terminator.
    ///
    /// # Panics
    /// Panics if the terminator is empty.
    #[must_use]
    pub fn with_terminator(terminator: &[u8]) -> Self {
        assert!(!terminator.is_empty(), "terminator must not be empty");
        Self {
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            terminator: terminator.to_vec(),
        }
    }

    /// Append bytes received from the transport.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Number of bytes currently buffered.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Most bytes that can be buffered without a complete terminator while
    /// a frame of at most `limit` payload bytes is still possible.
    #[must_use]
    pub fn frame_budget(&self, limit: usize) -> usize {
        limit + self.terminator.len() - 1
    }

    /// Extract the next payload if a complete frame is buffered.
    ///
    /// `limit` is the maximum admissible payload length (excluding the
    /// terminator) for the message currently expected.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(payload))`: a complete frame within the limit; the
    ///   terminator is consumed and trailing bytes are retained.
    /// - `Ok(None)`: a frame within the limit is still possible but more
    ///   bytes are needed.
    /// - `Err(Error::Syntax)`: the buffered content proves the frame
    ///   cannot terminate within the limit.
    ///
    /// # Errors
    /// Returns `Error::Syntax` on oversize frames, as described above.
    pub fn next_frame(&mut self, limit: usize) -> Result<Option<Bytes>> {
        match self.scan() {
            Scan::Complete(payload_len) => {
                if payload_len > limit {
                    return Err(self.oversize(limit));
                }
                let payload = self.buffer.split_to(payload_len).freeze();
                self.buffer.advance(self.terminator.len());
                Ok(Some(payload))
            }
            Scan::Partial(start) => {
                if start > limit {
                    return Err(self.oversize(limit));
                }
                Ok(None)
            }
            Scan::Absent => {
                if self.buffer.len() > limit {
                    return Err(self.oversize(limit));
                }
                Ok(None)
            }
        }
    }

    /// Discard all buffered bytes.
    ///
    /// Used on error recovery; the session terminates on framing errors,
    /// so this mainly keeps dropped sessions from holding memory.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Scan for the first complete or trailing-partial terminator match.
    fn scan(&self) -> Scan {
        let buf = &self.buffer[..];
        let term = &self.terminator[..];

        for start in 0..buf.len() {
            if buf[start] != term[0] {
                continue;
            }
            let available = buf.len() - start;
            if available >= term.len() {
                if &buf[start..start + term.len()] == term {
                    return Scan::Complete(start);
                }
            } else if buf[start..] == term[..available] {
                return Scan::Partial(start);
            }
        }
        Scan::Absent
    }

    fn oversize(&self, limit: usize) -> Error {
        Error::syntax(format!(
            "no terminator within {limit} payload bytes ({} buffered)",
            self.buffer.len()
        ))
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut data = payload.to_vec();
        data.extend_from_slice(TERMINATOR);
        data
    }

    #[test]
    fn complete_frame_single_feed() {
        let mut framer = Framer::new();
        framer.feed(&frame(b"Oompa Loompa"));

        let payload = framer.next_frame(18).unwrap().unwrap();
        assert_eq!(&payload[..], b"Oompa Loompa");
        assert_eq!(framer.buffered(), 0);
    }

    #[test]
    fn partial_frame_needs_more_data() {
        let mut framer = Framer::new();
        framer.feed(b"Oompa");

        assert!(framer.next_frame(18).unwrap().is_none());

        framer.feed(b" Loompa\x07\x08");
        let payload = framer.next_frame(18).unwrap().unwrap();
        assert_eq!(&payload[..], b"Oompa Loompa");
    }

    #[test]
    fn coalesced_frames_served_from_carry_over() {
        let mut framer = Framer::new();
        framer.feed(b"Oompa Loompa\x07\x080\x07\x08");

        assert_eq!(&framer.next_frame(18).unwrap().unwrap()[..], b"Oompa Loompa");
        assert_eq!(&framer.next_frame(3).unwrap().unwrap()[..], b"0");
        assert!(framer.next_frame(3).unwrap().is_none());
    }

    #[test]
    fn byte_by_byte_feeding() {
        let mut framer = Framer::new();
        for &b in frame(b"OK -3 7").iter() {
            framer.feed(&[b]);
        }
        assert_eq!(&framer.next_frame(10).unwrap().unwrap()[..], b"OK -3 7");
    }

    #[test]
    fn terminator_split_across_feeds() {
        let mut framer = Framer::new();
        framer.feed(b"12\x07");
        assert!(framer.next_frame(3).unwrap().is_none());

        framer.feed(b"\x08");
        assert_eq!(&framer.next_frame(3).unwrap().unwrap()[..], b"12");
    }

    #[test]
    fn empty_payload() {
        let mut framer = Framer::new();
        framer.feed(TERMINATOR);

        let payload = framer.next_frame(18).unwrap().unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn payload_at_exact_limit_accepted() {
        let mut framer = Framer::new();
        let name = [b'a'; 18];
        framer.feed(&frame(&name));

        let payload = framer.next_frame(18).unwrap().unwrap();
        assert_eq!(&payload[..], &name[..]);
    }

    #[test]
    fn terminator_past_limit_rejected() {
        let mut framer = Framer::new();
        framer.feed(&frame(&[b'a'; 19]));

        assert!(framer.next_frame(18).is_err());
    }

    #[test]
    fn oversize_rejected_without_terminator() {
        // 19 non-terminator bytes against an 18-byte limit: provably
        // oversize on the 19th byte, before any terminator arrives.
        let mut framer = Framer::new();
        framer.feed(&[b'a'; 19]);

        assert!(framer.next_frame(18).is_err());
    }

    #[test]
    fn trailing_terminator_prefix_keeps_frame_viable() {
        // 18 payload bytes plus the first terminator byte: still viable.
        let mut framer = Framer::new();
        framer.feed(&[b'a'; 18]);
        framer.feed(b"\x07");
        assert!(framer.next_frame(18).unwrap().is_none());

        framer.feed(b"\x08");
        assert_eq!(framer.next_frame(18).unwrap().unwrap().len(), 18);
    }

    #[test]
    fn broken_terminator_prefix_rejected() {
        // The 0x07 at position 18 is not followed by 0x08, so no admissible
        // placement remains.
        let mut framer = Framer::new();
        framer.feed(&[b'a'; 18]);
        framer.feed(b"\x07");
        framer.feed(b"x");

        assert!(framer.next_frame(18).is_err());
    }

    #[test]
    fn stray_terminator_start_inside_payload() {
        // A lone 0x07 not followed by 0x08 is ordinary payload.
        let mut framer = Framer::new();
        framer.feed(b"a\x07b\x07\x08");

        assert_eq!(&framer.next_frame(18).unwrap().unwrap()[..], b"a\x07b");
    }

    #[test]
    fn rejection_is_never_later_than_budget() {
        let mut framer = Framer::new();
        let budget = framer.frame_budget(3);
        assert_eq!(budget, 4);

        // Keep the tail a viable terminator prefix for as long as possible.
        framer.feed(b"123\x07");
        assert!(framer.next_frame(3).unwrap().is_none());

        // One more non-terminator byte exceeds every admissible placement.
        framer.feed(b"4");
        assert!(framer.next_frame(3).is_err());
    }

    #[test]
    fn limit_can_differ_between_frames() {
        let mut framer = Framer::new();
        framer.feed(b"username here\x07\x0812345\x07\x08");

        assert!(framer.next_frame(18).unwrap().is_some());
        assert_eq!(&framer.next_frame(5).unwrap().unwrap()[..], b"12345");
    }

    #[test]
    fn clear_discards_buffer() {
        let mut framer = Framer::new();
        framer.feed(b"partial");
        framer.clear();

        assert_eq!(framer.buffered(), 0);
        framer.feed(&frame(b"ok"));
        assert!(framer.next_frame(18).unwrap().is_some());
    }

    #[test]
    fn custom_terminator() {
        let mut framer = Framer::with_terminator(b"\r\n");
        framer.feed(b"hello\r\nworld\r\n");

        assert_eq!(&framer.next_frame(10).unwrap().unwrap()[..], b"hello");
        assert_eq!(&framer.next_frame(10).unwrap().unwrap()[..], b"world");
    }

    #[test]
    fn overlapping_terminator_prefix() {
        // 0x07 0x07 0x08: the match starts at the second 0x07.
        let mut framer = Framer::new();
        framer.feed(b"ab\x07\x07\x08");

        assert_eq!(&framer.next_frame(10).unwrap().unwrap()[..], b"ab\x07");
    }
}

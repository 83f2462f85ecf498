//! Timed, framed message I/O for one session.
//!
//! [`MessageReader`] reads the socket in small chunks, feeds them to the
//! [`Framer`], and enforces the two timeout regimes: every chunk is
//! awaited under the governing deadline, so the inactivity clock resets on
//! every successfully received chunk, not only on complete messages.
//!
//! The recharge overlay is layered on every receive, exactly once per
//! message boundary: a framed `RECHARGING` switches the deadline to the
//! recharge timeout and admits only `FULL POWER`, after which the reader
//! goes back to awaiting the message that was originally due. A
//! `FULL POWER` outside recharging is a logic error.
//!
//! [`MessageWriter`] appends the terminator to outgoing messages and owns
//! the write half for the final shutdown.

use bytes::Bytes;
use rover_core::{Error, Result};
use rover_protocol::{ClientCommandKind, Framer, ServerMessage, is_full_power, is_recharging};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{debug, trace};

/// Socket read size. Small enough to exercise the framer's carry-over
/// logic under load, large enough to take a whole message at once.
const CHUNK_SIZE: usize = 64;

/// Reading side of a session transport.
#[derive(Debug)]
pub struct MessageReader {
    reader: OwnedReadHalf,
    framer: Framer,
    read_timeout: Duration,
    recharge_timeout: Duration,
}

impl MessageReader {
    pub fn new(
        reader: OwnedReadHalf,
        terminator: &[u8],
        read_timeout: Duration,
        recharge_timeout: Duration,
    ) -> Self {
        Self {
            reader,
            framer: Framer::with_terminator(terminator),
            read_timeout,
            recharge_timeout,
        }
    }

    /// Receive the next payload expected to be at most `max_len` bytes,
    /// transparently handling recharge pauses.
    ///
    /// # Errors
    ///
    /// - `Error::Syntax` when the frame is provably oversize or cannot be
    ///   delimited.
    /// - `Error::Logic` on recharge protocol misuse.
    /// - `Error::Timeout` when the governing deadline passes without data.
    /// - `Error::Closed` when the peer disconnects mid-conversation.
    pub async fn read_message(&mut self, max_len: usize) -> Result<Bytes> {
        loop {
            // Every receive also admits the RECHARGING literal, so the
            // framing limit is the maximum over the alternatives.
            let limit = max_len.max(ClientCommandKind::Recharging.max_len());
            let payload = self.read_frame(limit, self.read_timeout).await?;

            if is_recharging(&payload) {
                debug!("recharging started");
                self.await_full_power().await?;
                debug!("recharging finished");
                continue;
            }
            if is_full_power(&payload) {
                return Err(Error::logic("FULL POWER while not recharging"));
            }
            return Ok(payload);
        }
    }

    /// Wait out a recharge pause: exactly one message, which must be
    /// `FULL POWER`, under the recharge deadline.
    async fn await_full_power(&mut self) -> Result<()> {
        let payload = self
            .read_frame(ClientCommandKind::FullPower.max_len(), self.recharge_timeout)
            .await?;
        if !is_full_power(&payload) {
            return Err(Error::logic(format!(
                "expected FULL POWER, got {:?}",
                String::from_utf8_lossy(&payload)
            )));
        }
        Ok(())
    }

    /// Read chunks until the framer yields a complete payload within
    /// `limit`, each chunk awaited under `timeout`.
    async fn read_frame(&mut self, limit: usize, timeout: Duration) -> Result<Bytes> {
        loop {
            if let Some(payload) = self.framer.next_frame(limit)? {
                trace!(len = payload.len(), "frame received");
                return Ok(payload);
            }

            let mut chunk = [0u8; CHUNK_SIZE];
            let read = tokio::time::timeout(timeout, self.reader.read(&mut chunk))
                .await
                .map_err(|_| Error::Timeout(timeout))??;
            if read == 0 {
                return Err(Error::Closed);
            }
            trace!(bytes = read, "chunk received");
            self.framer.feed(&chunk[..read]);
        }
    }
}

/// Writing side of a session transport.
#[derive(Debug)]
pub struct MessageWriter {
    writer: OwnedWriteHalf,
    terminator: Vec<u8>,
}

impl MessageWriter {
    pub fn new(writer: OwnedWriteHalf, terminator: &[u8]) -> Self {
        Self {
            writer,
            terminator: terminator.to_vec(),
        }
    }

    /// Send one server message, terminator appended.
    pub async fn send(&mut self, message: ServerMessage) -> Result<()> {
        let encoded = message.encode(&self.terminator);
        debug!(%message, "sending");
        self.writer.write_all(&encoded).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Flush and shut the write half down. Errors from an already-closed
    /// peer are ignored.
    pub async fn close(&mut self) {
        let _ = self.writer.shutdown().await;
    }
}

//! Dump session over an async byte stream.
//!
//! [`DumpSession`] owns the link to the device and the growing
//! [`CaptureBuffer`]. It acknowledges every received chunk and, once the
//! link has been quiet for the idle timeout, re-decodes the whole buffer.

use std::time::Duration;

use memdump_core::{
    CellEncoding, Dataset, DecodeError, FrameDecoder, IncrementalDecoder, LogProgress, ReadBuffer,
};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;

use crate::buffer::CaptureBuffer;
use crate::error::{CaptureError, Result};
use crate::protocol::{Command, DEFAULT_IDLE_TIMEOUT, DEFAULT_MEMORY_CAPACITY, DEFAULT_READ_CHUNK};

/// Configuration for a dump session.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Quiet period after the last chunk before the buffer is decoded.
    pub idle_timeout: Duration,
    /// Expected device memory size, used for fill percentage.
    pub memory_capacity: usize,
    /// Maximum bytes read from the stream at once.
    pub read_chunk_size: usize,
    /// Send an acknowledge byte after every chunk.
    pub acknowledge: bool,
    /// How cell bytes are combined into values.
    pub cell_encoding: CellEncoding,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
            read_chunk_size: DEFAULT_READ_CHUNK,
            acknowledge: true,
            cell_encoding: CellEncoding::Unsigned,
        }
    }
}

impl CaptureConfig {
    /// Sets the idle timeout.
    #[must_use]
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Sets the expected device memory size.
    #[must_use]
    pub fn memory_capacity(mut self, capacity: usize) -> Self {
        self.memory_capacity = capacity;
        self
    }

    /// Sets the read chunk size (at least one byte).
    #[must_use]
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size.max(1);
        self
    }

    /// Enables or disables per-chunk acknowledgement.
    #[must_use]
    pub fn acknowledge(mut self, enabled: bool) -> Self {
        self.acknowledge = enabled;
        self
    }

    /// Sets the cell encoding.
    #[must_use]
    pub fn cell_encoding(mut self, encoding: CellEncoding) -> Self {
        self.cell_encoding = encoding;
        self
    }
}

/// Something that happened on the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A chunk was appended to the buffer.
    Received {
        /// Bytes in this chunk.
        chunk_len: usize,
        /// Bytes captured since the dump request.
        total_len: usize,
        /// Share of the device memory captured, 0 to 100.
        fill_percent: u8,
    },
    /// The link went idle and the buffer decoded.
    Decoded(Dataset),
    /// The link went idle and the buffer did not decode.
    DecodeFailed(DecodeError),
    /// The device closed the stream.
    Closed,
}

enum Step {
    Read(std::io::Result<usize>),
    Idle,
}

/// A dump transfer from one device.
pub struct DumpSession<S> {
    stream: S,
    config: CaptureConfig,
    buffer: CaptureBuffer,
    decoder: IncrementalDecoder,
    read_buf: Vec<u8>,
    idle_deadline: Option<Instant>,
    closed: bool,
}

impl<S> DumpSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a session over `stream`.
    pub fn new(stream: S, config: CaptureConfig) -> Self {
        let decoder = FrameDecoder::new().cell_encoding(config.cell_encoding);
        Self {
            stream,
            buffer: CaptureBuffer::with_capacity(config.memory_capacity),
            decoder: IncrementalDecoder::new(decoder),
            // A zero-length read would look like end of stream.
            read_buf: vec![0u8; config.read_chunk_size.max(1)],
            idle_deadline: None,
            closed: false,
            config,
        }
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Returns the bytes captured since the last dump request.
    #[must_use]
    pub fn buffer(&self) -> &CaptureBuffer {
        &self.buffer
    }

    /// Returns true once the device has closed the stream.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Consumes the session, returning the stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Discards the captured bytes.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.decoder.reset();
        self.idle_deadline = None;
    }

    /// Clears the buffer and asks the device to start a dump.
    ///
    /// # Errors
    /// Returns `CaptureError::Io` if the request cannot be written.
    pub async fn request_dump(&mut self) -> Result<()> {
        self.clear();
        self.send(Command::RequestDump).await?;
        tracing::info!("Dump requested");
        Ok(())
    }

    /// Decodes the captured bytes now.
    ///
    /// # Errors
    /// Returns the [`DecodeError`] of a malformed buffer.
    pub fn decode(&mut self) -> std::result::Result<Dataset, DecodeError> {
        self.idle_deadline = None;
        self.decoder.decode_with_progress(&self.buffer, &mut LogProgress)
    }

    /// Waits for the next event on the link.
    ///
    /// Every chunk yields [`CaptureEvent::Received`]. When no chunk arrives
    /// for the idle timeout after new data, the buffer is decoded once.
    /// When the device hangs up, pending data is decoded before
    /// [`CaptureEvent::Closed`] is returned.
    ///
    /// # Errors
    /// Returns `CaptureError::Io` if reading or acknowledging fails.
    pub async fn next_event(&mut self) -> Result<CaptureEvent> {
        if self.closed {
            if self.idle_deadline.is_some() {
                return Ok(self.decode_event());
            }
            return Ok(CaptureEvent::Closed);
        }

        let pending = self.idle_deadline.is_some();
        let deadline = self.idle_deadline.unwrap_or_else(Instant::now);
        let step = tokio::select! {
            read = self.stream.read(&mut self.read_buf) => Step::Read(read),
            () = tokio::time::sleep_until(deadline), if pending => Step::Idle,
        };

        match step {
            Step::Idle => Ok(self.decode_event()),
            Step::Read(Ok(0)) => {
                tracing::info!("Device closed the link after {} bytes", self.buffer.len());
                self.closed = true;
                if pending {
                    return Ok(self.decode_event());
                }
                Ok(CaptureEvent::Closed)
            }
            Step::Read(Ok(n)) => {
                self.buffer.extend(&self.read_buf[..n]);
                if self.config.acknowledge {
                    self.send(Command::Acknowledge).await?;
                }
                self.idle_deadline = Some(Instant::now() + self.config.idle_timeout);
                Ok(CaptureEvent::Received {
                    chunk_len: n,
                    total_len: self.buffer.len(),
                    fill_percent: self.buffer.fill_percent(),
                })
            }
            Step::Read(Err(e)) => Err(CaptureError::Io(e)),
        }
    }

    /// Drives the link until a complete dataset is decoded or the device
    /// hangs up.
    ///
    /// # Errors
    /// Returns `CaptureError::ConnectionClosed` if the device hangs up
    /// without sending anything, `CaptureError::Decode` if the final buffer
    /// is malformed, and `CaptureError::Io` on link failures.
    pub async fn run_to_completion(&mut self) -> Result<Dataset> {
        loop {
            match self.next_event().await? {
                CaptureEvent::Received {
                    total_len,
                    fill_percent,
                    ..
                } => {
                    tracing::debug!("Captured {} bytes ({}%)", total_len, fill_percent);
                }
                CaptureEvent::Decoded(dataset) if dataset.is_complete() => {
                    tracing::info!(
                        "Dump complete: {} rows x {} columns",
                        dataset.height(),
                        dataset.width()
                    );
                    return Ok(dataset);
                }
                CaptureEvent::Decoded(dataset) => {
                    tracing::debug!(
                        "Transfer paused with {} columns, waiting for log-stop",
                        dataset.width()
                    );
                }
                CaptureEvent::DecodeFailed(e) => {
                    tracing::warn!("Captured buffer does not decode yet: {}", e);
                }
                CaptureEvent::Closed => {
                    if self.buffer.is_empty() {
                        return Err(CaptureError::ConnectionClosed);
                    }
                    return Ok(self.decode()?);
                }
            }
        }
    }

    fn decode_event(&mut self) -> CaptureEvent {
        match self.decode() {
            Ok(dataset) => CaptureEvent::Decoded(dataset),
            Err(e) => CaptureEvent::DecodeFailed(e),
        }
    }

    async fn send(&mut self, command: Command) -> Result<()> {
        self.stream.write_all(&[command.as_byte()]).await?;
        self.stream.flush().await?;
        Ok(())
    }
}

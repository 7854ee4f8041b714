//! Mock serial link.
//!
//! Stands in for the Bluetooth module's UART: bytes sent through the handle
//! arrive in the receive buffer, lines written by the device come out of the
//! handle.

use crate::{HardwareError, Result, traits::SerialLink};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Mock serial link for testing and development.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockSerial;
/// use doorlock_hardware::traits::SerialLink;
///
/// #[tokio::main]
/// async fn main() -> doorlock_hardware::Result<()> {
///     let (mut link, handle) = MockSerial::new();
///
///     handle.send_line("SECRET1")?;
///     assert_eq!(link.available().await?, 8);
///     assert_eq!(link.read_line(15).await?, b"SECRET1");
///
///     link.write_line("Locked.").await?;
///     assert_eq!(handle.recv_output().await.as_deref(), Some("Locked."));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockSerial {
    input_rx: mpsc::UnboundedReceiver<Vec<u8>>,
    output_tx: mpsc::UnboundedSender<String>,

    /// Received bytes not yet read
    pending: VecDeque<u8>,
}

impl MockSerial {
    /// Create a new mock serial link and its controlling handle.
    pub fn new() -> (Self, MockSerialHandle) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();

        let link = Self {
            input_rx,
            output_tx,
            pending: VecDeque::new(),
        };
        let handle = MockSerialHandle {
            input_tx,
            output_rx: Arc::new(Mutex::new(output_rx)),
        };

        (link, handle)
    }

    fn fill(&mut self) {
        while let Ok(chunk) = self.input_rx.try_recv() {
            self.pending.extend(chunk);
        }
    }
}

impl SerialLink for MockSerial {
    async fn available(&mut self) -> Result<usize> {
        self.fill();
        Ok(self.pending.len())
    }

    async fn read_line(&mut self, max_len: usize) -> Result<Vec<u8>> {
        self.fill();

        let mut line = Vec::with_capacity(max_len);
        while line.len() < max_len {
            match self.pending.pop_front() {
                Some(b'\n') | None => break,
                Some(byte) => line.push(byte),
            }
        }
        Ok(line)
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        self.output_tx
            .send(line.to_string())
            .map_err(|_| HardwareError::disconnected("Serial output channel closed"))
    }
}

/// Handle for feeding a mock serial link and reading what it wrote.
///
/// Cloned handles share one output queue; each written line is received by
/// exactly one of them.
#[derive(Debug, Clone)]
pub struct MockSerialHandle {
    input_tx: mpsc::UnboundedSender<Vec<u8>>,
    output_rx: Arc<Mutex<mpsc::UnboundedReceiver<String>>>,
}

impl MockSerialHandle {
    /// Send `line` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the link has been dropped.
    pub fn send_line(&self, line: &str) -> Result<()> {
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\n');
        self.send_bytes(bytes)
    }

    /// Send raw bytes with no terminator added.
    ///
    /// # Errors
    ///
    /// Returns an error if the link has been dropped.
    pub fn send_bytes(&self, bytes: impl Into<Vec<u8>>) -> Result<()> {
        self.input_tx
            .send(bytes.into())
            .map_err(|_| HardwareError::disconnected("Serial input channel closed"))
    }

    /// Wait for the next line written by the link.
    ///
    /// Returns `None` once the link has been dropped and every line has been
    /// received.
    pub async fn recv_output(&self) -> Option<String> {
        self.output_rx.lock().await.recv().await
    }

    /// Take every line written so far without waiting.
    pub async fn drain_output(&self) -> Vec<String> {
        let mut rx = self.output_rx.lock().await;
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line);
        }
        lines
    }
}

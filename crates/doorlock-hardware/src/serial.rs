//! Serial link backed by a real UART.
//!
//! Available with the `hardware-serial` feature. Reads use the port's
//! timeout: a line that is not completed in time is returned as far as it
//! arrived, like the firmware's `readBytesUntil`.

use crate::{HardwareError, Result, traits::SerialLink};
use std::io::{ErrorKind, Read, Write};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

/// Serial link on a host serial port (for example an HC-08 on a USB UART).
pub struct SerialPortLink {
    name: String,
    port: Mutex<Box<dyn serialport::SerialPort>>,
}

impl SerialPortLink {
    /// Open `path` at `baud_rate` with the given read timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be opened.
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|e| HardwareError::disconnected(format!("{path}: {e}")))?;

        info!(path, baud_rate, "Opened serial link");

        Ok(Self {
            name: path.to_string(),
            port: Mutex::new(port),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn port(&mut self) -> Result<&mut Box<dyn serialport::SerialPort>> {
        self.port
            .get_mut()
            .map_err(|_| HardwareError::communication("Serial port lock poisoned"))
    }
}

impl std::fmt::Debug for SerialPortLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPortLink")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl SerialLink for SerialPortLink {
    async fn available(&mut self) -> Result<usize> {
        let waiting = self
            .port()?
            .bytes_to_read()
            .map_err(|e| HardwareError::communication(e.to_string()))?;
        Ok(waiting as usize)
    }

    async fn read_line(&mut self, max_len: usize) -> Result<Vec<u8>> {
        let port = self.port()?;
        let mut line = Vec::with_capacity(max_len);
        let mut byte = [0u8; 1];

        while line.len() < max_len {
            match port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) if byte[0] == b'\n' => break,
                Ok(_) => line.push(byte[0]),
                Err(e) if e.kind() == ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(line)
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        let port = self.port()?;
        port.write_all(line.as_bytes())?;
        port.write_all(b"\r\n")?;
        port.flush()?;
        Ok(())
    }
}

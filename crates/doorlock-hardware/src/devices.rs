//! Enum wrappers for hardware device dispatch.
//!
//! Native `async fn` in traits is not object-safe, so `Box<dyn SerialLink>`
//! is not available. The enums here give the controller one concrete type
//! that can hold either a mock or a real device, selected at runtime.
//!
//! # Examples
//!
//! ```
//! use doorlock_hardware::devices::AnySerialLink;
//! use doorlock_hardware::mock::MockSerial;
//!
//! let (link, _handle) = MockSerial::new();
//! let any_link = AnySerialLink::Mock(link);
//! ```

use crate::Result;
use crate::mock::MockSerial;
#[cfg(feature = "hardware-serial")]
use crate::serial::SerialPortLink;
use crate::traits::SerialLink;

/// Enum wrapper for serial link dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnySerialLink {
    /// Mock link fed from a [`MockSerialHandle`](crate::mock::MockSerialHandle).
    Mock(MockSerial),

    /// Host serial port.
    #[cfg(feature = "hardware-serial")]
    Port(SerialPortLink),
}

impl SerialLink for AnySerialLink {
    async fn available(&mut self) -> Result<usize> {
        match self {
            Self::Mock(link) => link.available().await,
            #[cfg(feature = "hardware-serial")]
            Self::Port(link) => link.available().await,
        }
    }

    async fn read_line(&mut self, max_len: usize) -> Result<Vec<u8>> {
        match self {
            Self::Mock(link) => link.read_line(max_len).await,
            #[cfg(feature = "hardware-serial")]
            Self::Port(link) => link.read_line(max_len).await,
        }
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        match self {
            Self::Mock(link) => link.write_line(line).await,
            #[cfg(feature = "hardware-serial")]
            Self::Port(link) => link.write_line(line).await,
        }
    }
}

impl From<MockSerial> for AnySerialLink {
    fn from(link: MockSerial) -> Self {
        Self::Mock(link)
    }
}

#[cfg(feature = "hardware-serial")]
impl From<SerialPortLink> for AnySerialLink {
    fn from(link: SerialPortLink) -> Self {
        Self::Port(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_dispatch() {
        let (link, handle) = MockSerial::new();
        let mut any_link = AnySerialLink::from(link);

        handle.send_line("SECRET1").unwrap();
        assert_eq!(any_link.available().await.unwrap(), 8);
        assert_eq!(any_link.read_line(15).await.unwrap(), b"SECRET1");

        any_link.write_line("Unlocked").await.unwrap();
        assert_eq!(handle.recv_output().await.as_deref(), Some("Unlocked"));
    }
}

//! Mock push button.

use crate::{HardwareError, Result, traits::ButtonDevice};
use tokio::sync::{mpsc, watch};

/// Mock push button for testing and development.
///
/// The line level can be held high through the handle, or a single
/// momentary press can be queued. A queued press reads `true` on exactly one
/// sample; a held line reads `true` on every sample until released.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockButton;
/// use doorlock_hardware::traits::ButtonDevice;
///
/// #[tokio::main]
/// async fn main() -> doorlock_hardware::Result<()> {
///     let (mut button, handle) = MockButton::new();
///
///     handle.press().await?;
///     assert!(button.is_pressed().await?);
///     assert!(!button.is_pressed().await?);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockButton {
    /// Queued momentary presses
    press_rx: mpsc::Receiver<()>,

    /// Held line level
    level_rx: watch::Receiver<bool>,

    /// Number of samples taken
    samples: usize,
}

impl MockButton {
    /// Create a new mock button and its controlling handle.
    pub fn new() -> (Self, MockButtonHandle) {
        let (press_tx, press_rx) = mpsc::channel(32);
        let (level_tx, level_rx) = watch::channel(false);

        let button = Self {
            press_rx,
            level_rx,
            samples: 0,
        };
        let handle = MockButtonHandle { press_tx, level_tx };

        (button, handle)
    }

    /// Number of times the line has been sampled.
    pub fn sample_count(&self) -> usize {
        self.samples
    }
}

impl ButtonDevice for MockButton {
    async fn is_pressed(&mut self) -> Result<bool> {
        self.samples += 1;
        if self.press_rx.try_recv().is_ok() {
            return Ok(true);
        }
        Ok(*self.level_rx.borrow())
    }
}

/// Handle for controlling a mock button.
#[derive(Debug, Clone)]
pub struct MockButtonHandle {
    press_tx: mpsc::Sender<()>,
    level_tx: watch::Sender<bool>,
}

impl MockButtonHandle {
    /// Queue one momentary press.
    ///
    /// # Errors
    ///
    /// Returns an error if the button has been dropped.
    pub async fn press(&self) -> Result<()> {
        self.press_tx
            .send(())
            .await
            .map_err(|_| HardwareError::disconnected("Button input channel closed"))
    }

    /// Hold the line at the active level until [`release`](Self::release).
    ///
    /// # Errors
    ///
    /// Returns an error if the button has been dropped.
    pub fn hold(&self) -> Result<()> {
        self.set_level(true)
    }

    /// Return the line to the inactive level.
    ///
    /// # Errors
    ///
    /// Returns an error if the button has been dropped.
    pub fn release(&self) -> Result<()> {
        self.set_level(false)
    }

    fn set_level(&self, level: bool) -> Result<()> {
        self.level_tx
            .send(level)
            .map_err(|_| HardwareError::disconnected("Button input channel closed"))
    }
}

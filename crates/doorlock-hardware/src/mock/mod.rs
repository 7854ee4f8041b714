//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware. Input devices come
//! paired with a handle that feeds them; output devices record what they were
//! told to do.

pub mod button;
pub mod notifier;
pub mod rfid;
pub mod serial;
pub mod stepper;

// Re-export commonly used types
pub use button::{MockButton, MockButtonHandle};
pub use notifier::MockNotifier;
pub use rfid::{MockRfid, MockRfidHandle};
pub use serial::{MockSerial, MockSerialHandle};
pub use stepper::MockStepper;

//! Hardware device abstraction layer for the door lock controller.
//!
//! This crate provides trait-based abstractions for the peripherals of a
//! motorized door lock: a push button, an RFID reader, a four-wire stepper
//! that throws the latch, a buzzer with a status LED, and a serial link to a
//! Bluetooth module. Mock implementations of every trait live in [`mock`]
//! so the controller can run and be tested without a board.
//!
//! # Design
//!
//! - **Async-first**: device operations are native `async fn` in traits
//!   (Rust 1.90 + Edition 2024 RPITIT).
//! - **Thread-safe**: all traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: all operations return [`Result<T>`] with a
//!   [`HardwareError`] describing the failure.
//!
//! # Example
//!
//! ```no_run
//! use doorlock_hardware::traits::{SerialLink, StepperMotor};
//! use doorlock_hardware::Result;
//!
//! async fn throw_and_report<M, S>(motor: &mut M, link: &mut S) -> Result<()>
//! where
//!     M: StepperMotor,
//!     S: SerialLink,
//! {
//!     motor.rotate(1631).await?;
//!     motor.release_coils().await?;
//!     link.write_line("Locked.").await
//! }
//! ```
//!
//! # Features
//!
//! - `hardware-serial`: [`serial::SerialPortLink`], a [`SerialLink`] on a
//!   host serial port, and the matching [`AnySerialLink`] variant.

pub mod devices;
pub mod error;
pub mod mock;
#[cfg(feature = "hardware-serial")]
pub mod serial;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use devices::AnySerialLink;
pub use error::{HardwareError, Result};
pub use traits::{
    ButtonDevice, CardData, CardDataBuilder, CardReader, MAX_UID_LENGTH, MIN_UID_LENGTH,
    NotificationSink, SerialLink, StepperMotor, TagFamily,
};
pub use types::{COILS_RELEASED, CoilLevels, Cue, FULL_STEP_SEQUENCE, StepperConfig};

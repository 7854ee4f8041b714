//! Door lock controller.
//!
//! This crate contains the access-control state machine that arbitrates the
//! three input channels of a motorized lock (push button, RFID card and a
//! Bluetooth serial token) and drives the latch between its two positions.
//!
//! The input checks are usable on their own through [`card::scan_card`] and
//! [`bluetooth::check_token`]; [`DoorController`] combines them in priority
//! order and owns the lock and unlock sequences.

pub mod bluetooth;
pub mod card;
pub mod controller;
pub mod error;
pub mod transition;

pub use bluetooth::TokenCheck;
pub use card::CardScan;
pub use controller::{DoorController, Peripherals};
pub use error::{ControllerError, Result};
pub use transition::{LockTransition, MAX_HISTORY_SIZE, Trigger};

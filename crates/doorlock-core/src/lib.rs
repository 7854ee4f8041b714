//! Core domain types for the door lock controller.
//!
//! This crate holds everything the controller needs that is not tied to a
//! peripheral: the lock state, the credential store and Bluetooth token used
//! to authorize a transition, the reference wiring constants, and the
//! configuration that builds them.

pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod types;

pub use config::{CredentialsConfig, DoorConfig, MotorConfig};
pub use credentials::{BluetoothToken, Credential, CredentialStore};
pub use error::{Error, Result};
pub use types::LockState;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

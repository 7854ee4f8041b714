//! Door lock configuration.
//!
//! [`DoorConfig::default()`] reproduces the reference build exactly. A
//! deployment can deserialize an override (for example from JSON) and must
//! call [`DoorConfig::validate`] before building runtime values from it.

use crate::constants::{
    COIL_PINS, DEFAULT_BLUETOOTH_TOKEN, DEFAULT_KEYS, KEY_SIZE, LINE_CAPACITY, MOTOR_SPEED_RPM,
    NUM_KEYS, SETTLE_DELAY_MS, STEPS_PER_REVOLUTION, STEPS_TO_THROW,
};
use crate::{BluetoothToken, Credential, CredentialStore, Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stepper motor parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    /// Full steps per revolution of the output shaft.
    pub steps_per_revolution: u32,

    /// Steps between the locked and unlocked latch positions.
    pub steps_to_throw: u32,

    /// Rotation speed in revolutions per minute.
    pub speed_rpm: u32,

    /// Driver input pins in energizing order.
    pub coil_pins: [u8; 4],
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            steps_per_revolution: STEPS_PER_REVOLUTION,
            steps_to_throw: STEPS_TO_THROW,
            speed_rpm: MOTOR_SPEED_RPM,
            coil_pins: COIL_PINS,
        }
    }
}

/// Stored card UIDs and the Bluetooth token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Length of every stored UID in bytes.
    pub key_size: usize,

    /// Upper bound on the number of stored UIDs.
    pub max_keys: usize,

    /// Stored UIDs as hex strings (`"AA BB CC DD"` or `"AABBCCDD"`).
    pub keys: Vec<String>,

    /// Token expected at the start of a serial line.
    pub bluetooth_token: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            key_size: KEY_SIZE,
            max_keys: NUM_KEYS,
            keys: DEFAULT_KEYS.iter().map(hex::encode_upper).collect(),
            bluetooth_token: String::from_utf8_lossy(DEFAULT_BLUETOOTH_TOKEN).into_owned(),
        }
    }
}

/// Complete door lock configuration.
///
/// # Examples
///
/// ```
/// use doorlock_core::DoorConfig;
///
/// let config = DoorConfig::default();
/// config.validate().unwrap();
///
/// assert_eq!(config.motor.steps_to_throw, 1631);
/// assert_eq!(config.line_capacity, 16);
///
/// let store = config.credential_store().unwrap();
/// assert!(store.contains(&[0xFF, 0xFF, 0xFF, 0xFF]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    pub motor: MotorConfig,

    /// Pause between the acknowledge cue and motor rotation.
    pub settle_delay_ms: u64,

    /// Serial line buffer size, terminator included.
    pub line_capacity: usize,

    /// Pause between control cycles. Zero only yields to the runtime.
    pub poll_interval_ms: u64,

    pub credentials: CredentialsConfig,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            motor: MotorConfig::default(),
            settle_delay_ms: SETTLE_DELAY_MS,
            line_capacity: LINE_CAPACITY,
            poll_interval_ms: 0,
            credentials: CredentialsConfig::default(),
        }
    }
}

impl DoorConfig {
    /// Check the configuration for values the controller cannot work with.
    ///
    /// # Errors
    /// Returns `Error::Config` (or the credential error that building the
    /// store or token produced) describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.motor.steps_per_revolution == 0 {
            return Err(Error::Config(
                "steps_per_revolution must be greater than 0".to_string(),
            ));
        }
        if self.motor.steps_to_throw == 0 {
            return Err(Error::Config("steps_to_throw must be greater than 0".to_string()));
        }
        if i32::try_from(self.motor.steps_to_throw).is_err() {
            return Err(Error::Config(format!(
                "steps_to_throw must fit in a signed step count, got {}",
                self.motor.steps_to_throw
            )));
        }
        if self.motor.speed_rpm == 0 {
            return Err(Error::Config("speed_rpm must be greater than 0".to_string()));
        }
        if self.line_capacity < 2 {
            return Err(Error::Config(format!(
                "line_capacity must be at least 2, got {}",
                self.line_capacity
            )));
        }

        self.credential_store()?;
        let token = self.bluetooth_token()?;
        if token.len() > self.max_line_len() {
            return Err(Error::Config(format!(
                "Bluetooth token of {} bytes cannot fit in a {}-byte line",
                token.len(),
                self.max_line_len()
            )));
        }

        Ok(())
    }

    /// Build the credential store described by this configuration.
    ///
    /// # Errors
    /// Returns an error if a key is not valid hex, has the wrong length, or
    /// there are more keys than `max_keys`.
    pub fn credential_store(&self) -> Result<CredentialStore> {
        let keys = self
            .credentials
            .keys
            .iter()
            .map(|key| Credential::from_hex(key))
            .collect::<Result<Vec<_>>>()?;
        CredentialStore::new(self.credentials.key_size, self.credentials.max_keys, keys)
    }

    /// Build the Bluetooth token described by this configuration.
    ///
    /// # Errors
    /// Returns `Error::InvalidToken` if the token is empty or contains a
    /// line terminator.
    pub fn bluetooth_token(&self) -> Result<BluetoothToken> {
        BluetoothToken::new(self.credentials.bluetooth_token.as_bytes())
    }

    /// Most line bytes a single serial read returns.
    #[must_use]
    pub fn max_line_len(&self) -> usize {
        self.line_capacity.saturating_sub(1)
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

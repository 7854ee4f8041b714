//! Common types shared across hardware device implementations.
//!
//! This module defines the feedback cues, stepper wiring and the full-step
//! coil sequence used by stepper drivers.

use crate::{HardwareError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Audible feedback played by the notification sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// A qualifying input was accepted and the latch is about to move.
    Acknowledge,

    /// The latch finished moving to the locked position.
    LockComplete,

    /// The latch finished moving to the unlocked position. Also played at
    /// startup, when the door is unlocked.
    UnlockComplete,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cue::Acknowledge => write!(f, "acknowledge"),
            Cue::LockComplete => write!(f, "lock-complete"),
            Cue::UnlockComplete => write!(f, "unlock-complete"),
        }
    }
}

/// Logic levels of the four driver input lines, in energizing order.
pub type CoilLevels = [bool; 4];

/// All four driver lines low.
pub const COILS_RELEASED: CoilLevels = [false; 4];

/// Four-wire full-step sequence.
///
/// Stepping forward walks this table in order, stepping backward walks it in
/// reverse. Each entry energizes two coils.
pub const FULL_STEP_SEQUENCE: [CoilLevels; 4] = [
    [true, false, true, false],
    [false, true, true, false],
    [false, true, false, true],
    [true, false, false, true],
];

/// Stepper wiring and geometry.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::types::StepperConfig;
/// use std::time::Duration;
///
/// let config = StepperConfig::new(2038, [4, 6, 5, 7]).unwrap();
/// // 60 s / (2038 steps * 15 rpm)
/// assert_eq!(config.step_delay(15), Duration::from_micros(1962));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepperConfig {
    /// Full steps per revolution of the output shaft.
    pub steps_per_revolution: u32,

    /// Driver input pins in energizing order.
    pub coil_pins: [u8; 4],
}

impl StepperConfig {
    /// Create a stepper configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `steps_per_revolution` is zero or a pin appears
    /// twice in `coil_pins`.
    pub fn new(steps_per_revolution: u32, coil_pins: [u8; 4]) -> Result<Self> {
        if steps_per_revolution == 0 {
            return Err(HardwareError::configuration(
                "steps_per_revolution must be greater than 0",
            ));
        }

        for (i, pin) in coil_pins.iter().enumerate() {
            if coil_pins[i + 1..].contains(pin) {
                return Err(HardwareError::configuration(format!(
                    "Coil pin {} assigned more than once",
                    pin
                )));
            }
        }

        Ok(Self {
            steps_per_revolution,
            coil_pins,
        })
    }

    /// Delay between two steps at the given speed.
    ///
    /// Returns `Duration::ZERO` for a speed of 0 rpm.
    pub fn step_delay(&self, rpm: u32) -> Duration {
        let steps_per_minute = u64::from(self.steps_per_revolution) * u64::from(rpm);
        if steps_per_minute == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(60_000_000 / steps_per_minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepper_config_validation() {
        assert!(StepperConfig::new(2038, [4, 6, 5, 7]).is_ok());
        assert!(StepperConfig::new(0, [4, 6, 5, 7]).is_err());
        assert!(StepperConfig::new(2038, [4, 4, 5, 7]).is_err());
    }

    #[test]
    fn test_step_delay() {
        let config = StepperConfig::new(200, [1, 2, 3, 4]).unwrap();
        assert_eq!(config.step_delay(60), Duration::from_millis(5));
        assert_eq!(config.step_delay(0), Duration::ZERO);
    }

    #[test]
    fn test_full_step_sequence_energizes_two_coils() {
        for levels in FULL_STEP_SEQUENCE {
            assert_eq!(levels.iter().filter(|l| **l).count(), 2);
        }
        assert!(COILS_RELEASED.iter().all(|l| !l));
    }

    #[test]
    fn test_cue_display() {
        assert_eq!(Cue::Acknowledge.to_string(), "acknowledge");
        assert_eq!(Cue::LockComplete.to_string(), "lock-complete");
        assert_eq!(Cue::UnlockComplete.to_string(), "unlock-complete");
    }

    #[test]
    fn test_cue_serialization() {
        let json = serde_json::to_string(&Cue::LockComplete).unwrap();
        assert_eq!(json, "\"lock_complete\"");
        let cue: Cue = serde_json::from_str(&json).unwrap();
        assert_eq!(cue, Cue::LockComplete);
    }
}

use crate::constants::{STATUS_LOCKED, STATUS_UNLOCKED};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of the door latch.
///
/// The controller starts `Unlocked`, matching the hardware at power-on: the
/// motor is not engaged and the indicator is lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Locked,
    #[default]
    Unlocked,
}

impl LockState {
    /// Returns `true` if the latch is thrown.
    #[inline]
    #[must_use]
    pub fn is_locked(self) -> bool {
        matches!(self, LockState::Locked)
    }

    /// The state a transition from this state ends in.
    #[inline]
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            LockState::Locked => LockState::Unlocked,
            LockState::Unlocked => LockState::Locked,
        }
    }

    /// Line echoed on the serial link when a command is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_core::LockState;
    ///
    /// assert_eq!(LockState::Locked.status_line(), "Locked.");
    /// assert_eq!(LockState::Unlocked.status_line(), "Unlocked");
    /// ```
    #[must_use]
    pub fn status_line(self) -> &'static str {
        match self {
            LockState::Locked => STATUS_LOCKED,
            LockState::Unlocked => STATUS_UNLOCKED,
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LockState::Locked => write!(f, "Locked"),
            LockState::Unlocked => write!(f, "Unlocked"),
        }
    }
}

//! Transition records.
//!
//! Every completed lock or unlock is recorded with the input channel that
//! triggered it. The records are for observation only; they never influence
//! which input wins a cycle.

use std::fmt;
use std::time::{Duration, Instant};

use doorlock_core::LockState;
use serde::{Deserialize, Serialize};

/// Maximum number of transitions kept in the controller's history.
///
/// Each record is a few dozen bytes, so the full ring stays well under 4KB.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Input that caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Push button read the active level.
    Button,

    /// A stored card was presented.
    Card,

    /// The Bluetooth token arrived on the serial link.
    Bluetooth,

    /// The host called [`lock`](crate::DoorController::lock) or
    /// [`unlock`](crate::DoorController::unlock) directly.
    Direct,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trigger::Button => "button",
            Trigger::Card => "card",
            Trigger::Bluetooth => "bluetooth",
            Trigger::Direct => "direct",
        };
        write!(f, "{name}")
    }
}

/// A single completed lock or unlock.
///
/// The `timestamp` is not serialized as `Instant` is process-specific; a
/// deserialized record carries the time of deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockTransition {
    pub from: LockState,
    pub to: LockState,
    pub trigger: Trigger,

    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl LockTransition {
    pub fn new(from: LockState, to: LockState, trigger: Trigger) -> Self {
        Self {
            from,
            to,
            trigger,
            timestamp: Instant::now(),
        }
    }

    /// Time since the transition completed.
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

impl fmt::Display for LockTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.trigger)
    }
}

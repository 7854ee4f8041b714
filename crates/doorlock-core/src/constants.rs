//! Reference constants for the door lock.
//!
//! These values describe the reference build: a 28BYJ-48 stepper driven by a
//! ULN2003 board in full-step mode, an RC522 reader, and an HC-08 Bluetooth
//! module on the serial port. They are the defaults of
//! [`DoorConfig`](crate::DoorConfig); a deployment can override them.
//!
//! # Stepper geometry
//!
//! The motor makes 32 full steps per revolution of the rotor (11.25 degrees
//! per step) behind a 64:1 gearbox, so one output revolution is roughly
//! 2038 steps. Throwing the latch takes 1631 of those.

// ============================================================================
// Actuator
// ============================================================================

/// Full steps per revolution of the geared output shaft.
pub const STEPS_PER_REVOLUTION: u32 = 2038;

/// Steps needed to move the latch between its locked and unlocked positions.
///
/// Positive values lock, negative values unlock.
pub const STEPS_TO_THROW: u32 = 1631;

/// Stepper speed in revolutions per minute.
///
/// 15 rpm is the practical maximum for the 28BYJ-48.
pub const MOTOR_SPEED_RPM: u32 = 15;

/// Driver input pins in energizing order: IN1, IN3, IN2, IN4.
///
/// The crossed middle pair is what lets the four-wire full-step sequence turn
/// the motor both clockwise and counter-clockwise.
pub const COIL_PINS: [u8; 4] = [4, 6, 5, 7];

/// Pause between the acknowledge cue and the start of motor rotation.
pub const SETTLE_DELAY_MS: u64 = 10;

// ============================================================================
// Credentials
// ============================================================================

/// Length of a stored card UID in bytes.
pub const KEY_SIZE: usize = 4;

/// Maximum number of stored card UIDs.
pub const NUM_KEYS: usize = 2;

/// Length of the Bluetooth token in bytes.
pub const BLUE_PASS_SIZE: usize = 7;

/// Stored card UIDs of the reference build.
pub const DEFAULT_KEYS: [[u8; KEY_SIZE]; NUM_KEYS] =
    [[0xFF, 0xFF, 0xFF, 0xFF], [0xFF, 0xFF, 0xFF, 0xFF]];

/// Bluetooth token of the reference build.
pub const DEFAULT_BLUETOOTH_TOKEN: &[u8; BLUE_PASS_SIZE] = b"FFFFFFF";

// ============================================================================
// Serial link
// ============================================================================

/// Capacity of the serial line buffer in bytes.
///
/// One byte is reserved for the terminator, so a single read returns at most
/// `LINE_CAPACITY - 1` bytes of a line.
pub const LINE_CAPACITY: usize = 16;

/// Line terminator on the serial link.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Baud rate of the serial/Bluetooth link.
pub const SERIAL_BAUD_RATE: u32 = 9600;

/// Status echo sent when the door is locked.
pub const STATUS_LOCKED: &str = "Locked.";

/// Status echo sent when the door is unlocked.
pub const STATUS_UNLOCKED: &str = "Unlocked";

//! Hardware device trait definitions.
//!
//! This module defines the contract between the door controller and its
//! peripherals: the push button, the RFID reader, the stepper motor that
//! moves the latch, the buzzer/LED notification sink and the serial link
//! carrying Bluetooth commands. Mock and real implementations can be swapped
//! behind these traits.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{Cue, StepperConfig};
use std::fmt;

/// Minimum UID length in bytes (per ISO 14443 specification).
pub const MIN_UID_LENGTH: usize = 4;

/// Maximum UID length in bytes (per ISO 14443 specification).
pub const MAX_UID_LENGTH: usize = 10;

/// Tag family reported by the reader, derived from the tag's SAK byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TagFamily {
    /// SAK says the UID is not complete yet.
    NotComplete,

    /// MIFARE Classic Mini (320 bytes).
    MifareMini,

    /// MIFARE Classic 1K.
    Mifare1K,

    /// MIFARE Classic 4K.
    Mifare4K,

    /// MIFARE Ultralight or Ultralight C.
    MifareUltralight,

    /// MIFARE Plus.
    MifarePlus,

    /// MIFARE TNP3XXX.
    Tnp3xxx,

    /// PICC compliant with ISO/IEC 14443-4.
    Iso14443_4,

    /// PICC compliant with ISO/IEC 18092 (NFC).
    Iso18092,

    /// SAK value with no known family.
    Unknown(u8),
}

impl TagFamily {
    /// Classify a tag from its SAK byte.
    ///
    /// Bit 7 of the SAK is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_hardware::traits::TagFamily;
    ///
    /// assert_eq!(TagFamily::from_sak(0x08), TagFamily::Mifare1K);
    /// assert_eq!(TagFamily::from_sak(0x88), TagFamily::Mifare1K);
    /// assert_eq!(TagFamily::from_sak(0x20), TagFamily::Iso14443_4);
    /// ```
    pub fn from_sak(sak: u8) -> Self {
        match sak & 0x7F {
            0x04 => Self::NotComplete,
            0x09 => Self::MifareMini,
            0x08 => Self::Mifare1K,
            0x18 => Self::Mifare4K,
            0x00 => Self::MifareUltralight,
            0x10 | 0x11 => Self::MifarePlus,
            0x01 => Self::Tnp3xxx,
            0x20 => Self::Iso14443_4,
            0x40 => Self::Iso18092,
            other => Self::Unknown(other),
        }
    }

    /// A SAK value that classifies as this family.
    pub fn sak(&self) -> u8 {
        match self {
            Self::NotComplete => 0x04,
            Self::MifareMini => 0x09,
            Self::Mifare1K => 0x08,
            Self::Mifare4K => 0x18,
            Self::MifareUltralight => 0x00,
            Self::MifarePlus => 0x10,
            Self::Tnp3xxx => 0x01,
            Self::Iso14443_4 => 0x20,
            Self::Iso18092 => 0x40,
            Self::Unknown(sak) => *sak,
        }
    }

    /// Get a human-readable name for the tag family.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotComplete => "SAK indicates UID is not complete",
            Self::MifareMini => "MIFARE Mini, 320 bytes",
            Self::Mifare1K => "MIFARE 1KB",
            Self::Mifare4K => "MIFARE 4KB",
            Self::MifareUltralight => "MIFARE Ultralight or Ultralight C",
            Self::MifarePlus => "MIFARE Plus",
            Self::Tnp3xxx => "MIFARE TNP3XXX",
            Self::Iso14443_4 => "PICC compliant with ISO/IEC 14443-4",
            Self::Iso18092 => "PICC compliant with ISO/IEC 18092 (NFC)",
            Self::Unknown(_) => "Unknown type",
        }
    }

    /// Check if this is one of the MIFARE Classic families the lock accepts.
    pub fn is_mifare_classic(&self) -> bool {
        matches!(self, Self::MifareMini | Self::Mifare1K | Self::Mifare4K)
    }
}

impl fmt::Display for TagFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// RFID card data.
///
/// Contains what the reader reported for one tag in its field: the UID, the
/// SAK byte, the tag family and when it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardData {
    /// Card unique identifier (4-10 bytes).
    pub uid: Vec<u8>,

    /// Select acknowledge byte.
    pub sak: u8,

    /// Tag family derived from `sak`.
    pub family: TagFamily,

    /// Timestamp when the card was read.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl CardData {
    /// Create new card data with the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the UID length is not within the valid range
    /// of 4-10 bytes as specified by ISO 14443.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_hardware::traits::{CardData, TagFamily};
    ///
    /// let card = CardData::new(vec![0x04, 0xAB, 0xCD, 0xEF], 0x08).unwrap();
    /// assert_eq!(card.family, TagFamily::Mifare1K);
    /// ```
    pub fn new(uid: Vec<u8>, sak: u8) -> Result<Self> {
        CardDataBuilder::new(uid, sak).build()
    }

    /// Create card data for a tag of the given family.
    ///
    /// # Errors
    ///
    /// Returns an error if the UID length is not within 4-10 bytes.
    pub fn with_family(uid: Vec<u8>, family: TagFamily) -> Result<Self> {
        Self::new(uid, family.sak())
    }

    /// Create a builder for constructing card data with optional fields.
    ///
    /// This allows setting custom timestamps for testing or replaying
    /// recorded reads.
    pub fn builder(uid: Vec<u8>, sak: u8) -> CardDataBuilder {
        CardDataBuilder::new(uid, sak)
    }

    /// Get the UID as space-separated hexadecimal bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_hardware::traits::CardData;
    ///
    /// let card = CardData::new(vec![0x04, 0xAB, 0xCD, 0xEF], 0x08).unwrap();
    /// assert_eq!(card.uid_hex(), "04 AB CD EF");
    /// ```
    pub fn uid_hex(&self) -> String {
        self.uid
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Builder for constructing CardData with optional fields.
#[derive(Debug, Clone)]
pub struct CardDataBuilder {
    uid: Vec<u8>,
    sak: u8,
    timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

impl CardDataBuilder {
    /// Create a new CardDataBuilder with required fields.
    pub fn new(uid: Vec<u8>, sak: u8) -> Self {
        Self {
            uid,
            sak,
            timestamp: None,
        }
    }

    /// Set a custom timestamp for the card read event.
    ///
    /// If not set, the current time will be used when build() is called.
    pub fn timestamp(mut self, timestamp: chrono::DateTime<chrono::Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Build the CardData instance with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the UID length is not between MIN_UID_LENGTH and
    /// MAX_UID_LENGTH.
    pub fn build(self) -> Result<CardData> {
        let uid_len = self.uid.len();
        if !(MIN_UID_LENGTH..=MAX_UID_LENGTH).contains(&uid_len) {
            return Err(crate::HardwareError::invalid_data(format!(
                "Card UID length must be between {} and {} bytes, got {}",
                MIN_UID_LENGTH, MAX_UID_LENGTH, uid_len
            )));
        }

        Ok(CardData {
            uid: self.uid,
            sak: self.sak,
            family: TagFamily::from_sak(self.sak),
            timestamp: self.timestamp.unwrap_or_else(chrono::Utc::now),
        })
    }
}

/// Momentary push button.
pub trait ButtonDevice: Send + Sync {
    /// Sample the button line once.
    ///
    /// Returns `true` while the line reads the active level. There is no
    /// edge detection or debouncing: a button held across several samples
    /// reads `true` each time.
    ///
    /// # Errors
    ///
    /// Returns an error if the input line cannot be read.
    async fn is_pressed(&mut self) -> Result<bool>;
}

/// RFID reader device abstraction.
///
/// # Examples
///
/// ```no_run
/// use doorlock_hardware::traits::CardReader;
/// use doorlock_hardware::error::Result;
///
/// async fn uid_of_next_card<R: CardReader>(reader: &mut R) -> Result<Option<Vec<u8>>> {
///     let Some(card) = reader.try_read_card().await? else {
///         return Ok(None);
///     };
///     let uid = card.uid.clone();
///     reader.release(&card).await?;
///     Ok(Some(uid))
/// }
/// ```
pub trait CardReader: Send + Sync {
    /// Read a newly presented card, if there is one.
    ///
    /// This is the idle fast path and must return immediately: `Ok(None)`
    /// means no new card is in the field or its serial could not be read.
    /// A successful read leaves the tag selected; the caller must hand it to
    /// [`release`](CardReader::release) exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader itself cannot be reached.
    async fn try_read_card(&mut self) -> Result<Option<CardData>>;

    /// Halt the tag and stop any crypto session on the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the halt command cannot be delivered.
    async fn release(&mut self, card: &CardData) -> Result<()>;
}

/// Stepper motor that moves the latch.
pub trait StepperMotor: Send + Sync {
    /// Apply steps-per-revolution and coil pin assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver rejects the configuration.
    async fn configure(&mut self, config: &StepperConfig) -> Result<()>;

    /// Set the rotation speed in revolutions per minute.
    ///
    /// # Errors
    ///
    /// Returns an error if `rpm` is zero or the driver rejects it.
    async fn set_speed(&mut self, rpm: u32) -> Result<()>;

    /// Move by `steps`; the sign selects the direction.
    ///
    /// Completes only after the last step. Coils stay energized afterwards
    /// until [`release_coils`](StepperMotor::release_coils) is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the motor is not configured or the move fails.
    async fn rotate(&mut self, steps: i32) -> Result<()>;

    /// Drive all four coil lines low.
    ///
    /// # Errors
    ///
    /// Returns an error if a coil line cannot be driven.
    async fn release_coils(&mut self) -> Result<()>;
}

/// Buzzer and status LED.
pub trait NotificationSink: Send + Sync {
    /// Play an audible cue. May block until the tune finishes.
    ///
    /// # Errors
    ///
    /// Returns an error if the buzzer cannot be driven.
    async fn play(&mut self, cue: Cue) -> Result<()>;

    /// Switch the status LED on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if the LED line cannot be driven.
    async fn set_indicator(&mut self, on: bool) -> Result<()>;
}

/// Line-oriented serial link (the Bluetooth module's UART).
pub trait SerialLink: Send + Sync {
    /// Number of received bytes waiting to be read.
    ///
    /// # Errors
    ///
    /// Returns an error if the link is down.
    async fn available(&mut self) -> Result<usize>;

    /// Read bytes up to a newline or `max_len` bytes, whichever comes first.
    ///
    /// The newline is consumed but not returned. Bytes beyond `max_len` are
    /// left for the next call. Returns early with what has arrived if the
    /// line is not completed in time.
    ///
    /// # Errors
    ///
    /// Returns an error if the link is down.
    async fn read_line(&mut self, max_len: usize) -> Result<Vec<u8>>;

    /// Write `line` followed by a line ending.
    ///
    /// # Errors
    ///
    /// Returns an error if the link is down.
    async fn write_line(&mut self, line: &str) -> Result<()>;
}

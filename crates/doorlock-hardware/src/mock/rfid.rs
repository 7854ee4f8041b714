//! Mock RFID reader implementation for testing and development.
//!
//! This module provides a simulated RC522-style reader. Cards are presented
//! through a handle and picked up by the next non-blocking poll.

use crate::{
    HardwareError, Result,
    traits::{CardData, CardReader, TagFamily},
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Mock RFID reader for testing and development.
///
/// Keeps the accounting needed to check the release discipline: how many
/// cards were read, how many were released, and whether a tag is currently
/// left selected.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockRfid;
/// use doorlock_hardware::traits::{CardReader, TagFamily};
///
/// #[tokio::main]
/// async fn main() -> doorlock_hardware::Result<()> {
///     let (mut reader, handle) = MockRfid::new();
///
///     assert!(reader.try_read_card().await?.is_none());
///
///     handle.present_card(vec![0xAA, 0xBB, 0xCC, 0xDD], TagFamily::Mifare1K).await?;
///
///     let card = reader.try_read_card().await?.unwrap();
///     assert_eq!(card.uid_hex(), "AA BB CC DD");
///     reader.release(&card).await?;
///
///     assert_eq!(reader.release_count(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockRfid {
    /// Channel receiver for presented cards
    card_rx: mpsc::Receiver<CardData>,

    /// UID of the tag left selected by the last read
    selected: Option<Vec<u8>>,

    /// Cards returned by `try_read_card`
    reads: usize,

    /// Calls to `release`
    releases: usize,
}

impl MockRfid {
    /// Create a new mock reader.
    ///
    /// Returns a tuple of (MockRfid, MockRfidHandle) where the handle
    /// can be used to simulate card presentations.
    pub fn new() -> (Self, MockRfidHandle) {
        let (card_tx, card_rx) = mpsc::channel(32);

        let reader = Self {
            card_rx,
            selected: None,
            reads: 0,
            releases: 0,
        };

        (reader, MockRfidHandle { card_tx })
    }

    /// Number of cards read so far.
    pub fn read_count(&self) -> usize {
        self.reads
    }

    /// Number of release calls so far.
    pub fn release_count(&self) -> usize {
        self.releases
    }

    /// Check if a tag was read and not yet released.
    pub fn has_active_session(&self) -> bool {
        self.selected.is_some()
    }

    /// Number of presented cards not yet picked up.
    pub fn pending_cards(&self) -> usize {
        self.card_rx.len()
    }
}

impl CardReader for MockRfid {
    async fn try_read_card(&mut self) -> Result<Option<CardData>> {
        let card = match self.card_rx.try_recv() {
            Ok(card) => card,
            Err(mpsc::error::TryRecvError::Empty) => return Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(HardwareError::disconnected("RFID event channel closed"));
            }
        };

        if let Some(previous) = &self.selected {
            warn!(uid = ?previous, "Reading a new card while the previous tag is still selected");
        }

        self.reads += 1;
        self.selected = Some(card.uid.clone());
        debug!(uid = %card.uid_hex(), family = %card.family, "Mock reader selected card");
        Ok(Some(card))
    }

    async fn release(&mut self, card: &CardData) -> Result<()> {
        self.releases += 1;
        match self.selected.take() {
            Some(uid) if uid == card.uid => {}
            Some(uid) => {
                warn!(selected = ?uid, released = ?card.uid, "Released a different card than the selected one");
            }
            None => warn!(uid = ?card.uid, "Released a card with no active session"),
        }
        Ok(())
    }
}

/// Handle for presenting cards to a mock RFID reader.
#[derive(Debug, Clone)]
pub struct MockRfidHandle {
    card_tx: mpsc::Sender<CardData>,
}

impl MockRfidHandle {
    /// Present a card of the given family.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The UID is not 4-10 bytes long
    /// - The reader has been dropped and the channel is closed
    pub async fn present_card(&self, uid: Vec<u8>, family: TagFamily) -> Result<()> {
        let card = CardData::with_family(uid, family)?;
        self.present(card).await
    }

    /// Present a fully specified card.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub async fn present(&self, card: CardData) -> Result<()> {
        self.card_tx
            .send(card)
            .await
            .map_err(|_| HardwareError::disconnected("RFID event channel closed"))
    }
}

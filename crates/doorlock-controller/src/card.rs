//! Card channel: read one tag, check it against the store, release it.

use doorlock_core::CredentialStore;
use doorlock_hardware::{CardReader, TagFamily};
use tracing::{debug, info, warn};

/// Outcome of one card poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardScan {
    /// No new card, or its serial could not be read.
    NoCard,

    /// The tag is not a MIFARE Classic and was not checked.
    Unsupported(TagFamily),

    /// The UID matches no stored credential.
    Denied,

    /// The UID matches the credential at `slot`.
    Granted { slot: usize },
}

impl CardScan {
    pub fn is_granted(&self) -> bool {
        matches!(self, CardScan::Granted { .. })
    }
}

/// Poll the reader once.
///
/// A card that was read is released before returning on every path, whether
/// it was granted, denied or unsupported. Reader errors are logged and
/// reported as [`CardScan::NoCard`].
pub async fn scan_card<R: CardReader>(reader: &mut R, store: &CredentialStore) -> CardScan {
    let card = match reader.try_read_card().await {
        Ok(Some(card)) => card,
        Ok(None) => return CardScan::NoCard,
        Err(e) => {
            warn!(error = %e, "Card reader poll failed");
            return CardScan::NoCard;
        }
    };

    debug!(picc_type = card.family.name(), sak = card.sak, "Card present");

    let outcome = if !card.family.is_mifare_classic() {
        warn!(picc_type = card.family.name(), "Tag is not MIFARE Classic");
        CardScan::Unsupported(card.family)
    } else {
        let uid = card.uid_hex();
        match store.find(&card.uid) {
            Some(slot) => {
                info!(%uid, slot, "Card accepted");
                CardScan::Granted { slot }
            }
            None => {
                info!(%uid, "Card rejected");
                CardScan::Denied
            }
        }
    };

    if let Err(e) = reader.release(&card).await {
        warn!(error = %e, uid = %card.uid_hex(), "Failed to release card");
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorlock_core::Credential;
    use doorlock_hardware::mock::MockRfid;
    use rstest::rstest;

    fn store() -> CredentialStore {
        CredentialStore::new(
            4,
            2,
            vec![
                Credential::new(vec![0xAA, 0xBB, 0xCC, 0xDD]).unwrap(),
                Credential::new(vec![0x01, 0x02, 0x03, 0x04]).unwrap(),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_no_card() {
        let (mut reader, _handle) = MockRfid::new();
        assert_eq!(scan_card(&mut reader, &store()).await, CardScan::NoCard);
        assert_eq!(reader.release_count(), 0);
    }

    #[rstest]
    #[case(vec![0xAA, 0xBB, 0xCC, 0xDD], CardScan::Granted { slot: 0 })]
    #[case(vec![0x01, 0x02, 0x03, 0x04], CardScan::Granted { slot: 1 })]
    #[case(vec![0xAA, 0xBB, 0xCC, 0xDE], CardScan::Denied)]
    #[case(vec![0xAA, 0xBB, 0x03, 0x04], CardScan::Denied)]
    #[case(vec![0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00], CardScan::Denied)]
    #[tokio::test]
    async fn test_classic_card_matching(#[case] uid: Vec<u8>, #[case] expected: CardScan) {
        let (mut reader, handle) = MockRfid::new();
        handle.present_card(uid, TagFamily::Mifare1K).await.unwrap();

        assert_eq!(scan_card(&mut reader, &store()).await, expected);
        assert_eq!(reader.release_count(), 1);
        assert!(!reader.has_active_session());
    }

    #[tokio::test]
    async fn test_unsupported_family_released_unchecked() {
        let (mut reader, handle) = MockRfid::new();
        handle
            .present_card(vec![0xAA, 0xBB, 0xCC, 0xDD], TagFamily::MifareUltralight)
            .await
            .unwrap();

        assert_eq!(
            scan_card(&mut reader, &store()).await,
            CardScan::Unsupported(TagFamily::MifareUltralight)
        );
        assert_eq!(reader.release_count(), 1);
        assert!(!reader.has_active_session());
    }

    #[tokio::test]
    async fn test_reader_error_is_no_card() {
        let (mut reader, handle) = MockRfid::new();
        drop(handle);
        assert_eq!(scan_card(&mut reader, &store()).await, CardScan::NoCard);
    }
}

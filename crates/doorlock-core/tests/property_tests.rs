//! Property-based tests for credential and token matching.
//!
//! These tests generate random UIDs, stores and serial lines to check that
//! matching is exact: no partial, prefix or cross-credential match ever
//! authorizes, and a short line is never read past its end.

use doorlock_core::{BluetoothToken, Credential, CredentialStore};
use proptest::prelude::*;

fn uid() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 4)
}

fn store_of(keys: &[Vec<u8>]) -> CredentialStore {
    CredentialStore::new(
        4,
        keys.len(),
        keys.iter().map(|k| Credential::new(k.clone()).unwrap()),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn stored_uid_always_matches(
        keys in prop::collection::vec(uid(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let store = store_of(&keys);
        let presented = &keys[pick.index(keys.len())];
        prop_assert!(store.contains(presented));
    }

    #[test]
    fn single_byte_difference_never_matches(
        key in uid(),
        position in 0usize..4,
        delta in 1u8..=255,
    ) {
        let store = store_of(std::slice::from_ref(&key));
        let mut presented = key.clone();
        presented[position] = presented[position].wrapping_add(delta);
        prop_assert!(!store.contains(&presented));
    }

    #[test]
    fn match_implies_some_key_is_equal(
        keys in prop::collection::vec(uid(), 0..8),
        presented in uid(),
    ) {
        let store = store_of(&keys);
        prop_assert_eq!(store.contains(&presented), keys.contains(&presented));
    }

    #[test]
    fn wrong_length_uid_never_matches(
        key in uid(),
        extra in prop::collection::vec(any::<u8>(), 1..7),
    ) {
        let store = store_of(std::slice::from_ref(&key));

        let mut longer = key.clone();
        longer.extend_from_slice(&extra);
        prop_assert!(!store.contains(&longer));
        prop_assert!(!store.contains(&key[..3]));
    }

    #[test]
    fn token_match_depends_only_on_prefix(
        token in prop::collection::vec(any::<u8>().prop_filter("no newline", |b| *b != b'\n'), 1..10),
        tail in prop::collection::vec(any::<u8>(), 0..10),
    ) {
        let parsed = BluetoothToken::new(token.clone()).unwrap();

        let mut line = token.clone();
        line.extend_from_slice(&tail);
        prop_assert!(parsed.matches_line(&line));

        for cut in 0..token.len() {
            prop_assert!(!parsed.matches_line(&token[..cut]));
        }
    }
}

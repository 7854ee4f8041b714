//! Credentials that authorize a lock transition.
//!
//! Two kinds of credential exist: card UIDs held in a [`CredentialStore`], and
//! a single [`BluetoothToken`] compared against lines received on the serial
//! link. Both are fixed at startup and read-only afterwards.
//!
//! Every comparison takes the length of both operands into account, so a
//! short UID or a short line can never be read past its end and can never
//! match. This is not a secure access scheme: UIDs and the token are plain
//! bytes.

use crate::{Error, Result};
use std::fmt;
use subtle::ConstantTimeEq;

/// A stored card UID.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(Box<[u8]>);

impl Credential {
    /// Create a credential from raw UID bytes.
    ///
    /// # Errors
    /// Returns `Error::InvalidCredential` if `bytes` is empty.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(Error::InvalidCredential {
                expected: 1,
                actual: 0,
            });
        }
        Ok(Credential(bytes.into_boxed_slice()))
    }

    /// Parse a credential from hex, ignoring spaces and colons.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_core::Credential;
    ///
    /// let key = Credential::from_hex("AA BB CC DD").unwrap();
    /// assert_eq!(key.as_bytes(), &[0xAA, 0xBB, 0xCC, 0xDD]);
    ///
    /// let key = Credential::from_hex("aa:bb:cc:dd").unwrap();
    /// assert_eq!(key.len(), 4);
    /// ```
    ///
    /// # Errors
    /// Returns `Error::InvalidCredentialEncoding` if the input is not valid hex.
    pub fn from_hex(input: &str) -> Result<Self> {
        let digits: String = input
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ':')
            .collect();
        let bytes =
            hex::decode(&digits).map_err(|e| Error::InvalidCredentialEncoding(e.to_string()))?;
        Self::new(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `uid` has the same length and every byte is equal.
    ///
    /// A UID that only shares a prefix with this credential does not match.
    #[must_use]
    pub fn matches(&self, uid: &[u8]) -> bool {
        self.0.ct_eq(uid).into()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Credential({self})")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for byte in self.0.iter() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{byte:02X}")?;
            first = false;
        }
        Ok(())
    }
}

/// The set of card UIDs allowed to operate the lock.
///
/// All stored credentials have exactly `key_size` bytes. The store is built
/// once and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    key_size: usize,
    keys: Vec<Credential>,
}

impl CredentialStore {
    /// Build a store from a list of credentials.
    ///
    /// # Errors
    /// Returns an error if:
    /// - `key_size` is zero (`Error::Config`)
    /// - more than `max_keys` credentials are given (`Error::CredentialStoreFull`)
    /// - any credential is not `key_size` bytes long (`Error::InvalidCredential`)
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_core::{Credential, CredentialStore};
    ///
    /// let store = CredentialStore::new(
    ///     4,
    ///     2,
    ///     vec![Credential::from_hex("AABBCCDD").unwrap()],
    /// )
    /// .unwrap();
    ///
    /// assert!(store.contains(&[0xAA, 0xBB, 0xCC, 0xDD]));
    /// assert!(!store.contains(&[0xAA, 0xBB, 0xCC, 0x00]));
    /// ```
    pub fn new(
        key_size: usize,
        max_keys: usize,
        keys: impl IntoIterator<Item = Credential>,
    ) -> Result<Self> {
        if key_size == 0 {
            return Err(Error::Config("key size must be at least 1 byte".to_string()));
        }

        let keys: Vec<Credential> = keys.into_iter().collect();
        if keys.len() > max_keys {
            return Err(Error::CredentialStoreFull { max: max_keys });
        }

        if let Some(bad) = keys.iter().find(|key| key.len() != key_size) {
            return Err(Error::InvalidCredential {
                expected: key_size,
                actual: bad.len(),
            });
        }

        Ok(Self { key_size, keys })
    }

    /// Index of the first stored credential equal to `uid`.
    ///
    /// Each candidate is compared on its own; bytes matched against one
    /// credential never count towards another.
    #[must_use]
    pub fn find(&self, uid: &[u8]) -> Option<usize> {
        if uid.len() != self.key_size {
            return None;
        }
        self.keys.iter().position(|key| key.matches(uid))
    }

    #[must_use]
    pub fn contains(&self, uid: &[u8]) -> bool {
        self.find(uid).is_some()
    }

    #[must_use]
    pub fn key_size(&self) -> usize {
        self.key_size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.keys.iter()
    }
}

/// The token that authorizes a transition over the serial link.
///
/// A received line matches when its first `len()` bytes equal the token.
/// Anything after that is ignored, so `"SECRET1\r"` and `"SECRET1-extra"`
/// both match `"SECRET1"`. A line shorter than the token never matches.
#[derive(Clone, PartialEq, Eq)]
pub struct BluetoothToken(Box<[u8]>);

impl BluetoothToken {
    /// # Errors
    /// Returns `Error::InvalidToken` if `bytes` is empty or contains a line
    /// terminator.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(Error::InvalidToken("token cannot be empty".to_string()));
        }
        if bytes.contains(&crate::constants::LINE_TERMINATOR) {
            return Err(Error::InvalidToken(
                "token cannot contain a line terminator".to_string(),
            ));
        }
        Ok(BluetoothToken(bytes.into_boxed_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compare the leading bytes of `line` against the token.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_core::BluetoothToken;
    ///
    /// let token = BluetoothToken::new("SECRET1").unwrap();
    /// assert!(token.matches_line(b"SECRET1"));
    /// assert!(token.matches_line(b"SECRET1 and more"));
    /// assert!(!token.matches_line(b"SECRET"));
    /// assert!(!token.matches_line(b"WRONG12"));
    /// ```
    #[must_use]
    pub fn matches_line(&self, line: &[u8]) -> bool {
        line.get(..self.0.len())
            .is_some_and(|prefix| prefix.ct_eq(&self.0).into())
    }
}

impl fmt::Debug for BluetoothToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BluetoothToken({} bytes)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key(hex: &str) -> Credential {
        Credential::from_hex(hex).unwrap()
    }

    fn store(keys: &[&str]) -> CredentialStore {
        CredentialStore::new(4, 2, keys.iter().map(|k| key(k))).unwrap()
    }

    #[test]
    fn test_credential_display() {
        assert_eq!(key("0a0b0c0d").to_string(), "0A 0B 0C 0D");
        assert_eq!(format!("{:?}", key("AABBCCDD")), "Credential(AA BB CC DD)");
    }

    #[test]
    fn test_credential_rejects_empty_and_bad_hex() {
        assert!(Credential::new(Vec::new()).is_err());
        assert!(Credential::from_hex("").is_err());
        assert!(matches!(
            Credential::from_hex("AABBCCZZ"),
            Err(Error::InvalidCredentialEncoding(_))
        ));
        assert!(Credential::from_hex("AAB").is_err());
    }

    #[rstest]
    #[case(&[0xAA, 0xBB, 0xCC, 0xDD], true)]
    #[case(&[0xAA, 0xBB, 0xCC, 0xDE], false)]
    #[case(&[0xAA, 0xBB, 0xCC], false)]
    #[case(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE], false)]
    fn test_credential_matches_exactly(#[case] uid: &[u8], #[case] expected: bool) {
        assert_eq!(key("AABBCCDD").matches(uid), expected);
    }

    #[test]
    fn test_store_matches_any_position() {
        let store = store(&["11223344", "AABBCCDD"]);
        assert_eq!(store.find(&[0x11, 0x22, 0x33, 0x44]), Some(0));
        assert_eq!(store.find(&[0xAA, 0xBB, 0xCC, 0xDD]), Some(1));
        assert_eq!(store.find(&[0x00, 0x00, 0x00, 0x00]), None);
    }

    #[test]
    fn test_store_partial_matches_do_not_accumulate() {
        // Each key shares two leading bytes with the UID. Summed across both
        // keys that is four matched bytes, which must not authorize.
        let store = store(&["AABB0000", "AABB1111"]);
        assert!(!store.contains(&[0xAA, 0xBB, 0xCC, 0xDD]));
    }

    #[test]
    fn test_store_rejects_wrong_length_uid() {
        let store = store(&["AABBCCDD"]);
        assert!(!store.contains(&[0xAA, 0xBB, 0xCC, 0xDD, 0x01, 0x02, 0x03]));
        assert!(!store.contains(&[]));
    }

    #[test]
    fn test_store_validation() {
        assert!(matches!(
            CredentialStore::new(4, 1, vec![key("AABBCCDD"), key("11223344")]),
            Err(Error::CredentialStoreFull { max: 1 })
        ));
        assert!(matches!(
            CredentialStore::new(4, 2, vec![key("AABBCC")]),
            Err(Error::InvalidCredential {
                expected: 4,
                actual: 3
            })
        ));
        assert!(matches!(
            CredentialStore::new(0, 2, Vec::new()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_empty_store_matches_nothing() {
        let store = CredentialStore::new(4, 2, Vec::new()).unwrap();
        assert!(store.is_empty());
        assert!(!store.contains(&[0xFF, 0xFF, 0xFF, 0xFF]));
    }

    #[rstest]
    #[case(b"SECRET1", true)]
    #[case(b"SECRET1\r", true)]
    #[case(b"SECRET1SECRET1", true)]
    #[case(b"SECRET", false)]
    #[case(b"", false)]
    #[case(b"secret1", false)]
    #[case(b"WRONG12", false)]
    fn test_token_matches_line(#[case] line: &[u8], #[case] expected: bool) {
        let token = BluetoothToken::new("SECRET1").unwrap();
        assert_eq!(token.matches_line(line), expected);
    }

    #[test]
    fn test_token_validation() {
        assert!(matches!(
            BluetoothToken::new(""),
            Err(Error::InvalidToken(_))
        ));
        assert!(BluetoothToken::new("ABC\nDEF").is_err());
        assert_eq!(BluetoothToken::new("FFFFFFF").unwrap().len(), 7);
    }

    #[test]
    fn test_token_debug_hides_bytes() {
        let token = BluetoothToken::new("SECRET1").unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains("SECRET1"));
        assert!(debug.contains("7 bytes"));
    }
}

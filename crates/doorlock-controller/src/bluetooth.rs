//! Bluetooth channel: one serial line per poll, checked against the token.

use doorlock_core::{BluetoothToken, LockState};
use doorlock_hardware::SerialLink;
use tracing::{debug, warn};

/// Outcome of one serial poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCheck {
    /// Nothing was waiting; no bytes were consumed.
    NoInput,

    /// The line started with the token.
    Accepted,

    /// The line did not start with the token and the lock state was echoed.
    Rejected,
}

/// Poll the serial link once.
///
/// Reads at most `max_line_len` bytes. A rejected line is answered with
/// exactly one status line for `state`. Link errors are logged and reported
/// as [`TokenCheck::NoInput`].
pub async fn check_token<S: SerialLink>(
    link: &mut S,
    token: &BluetoothToken,
    state: LockState,
    max_line_len: usize,
) -> TokenCheck {
    match link.available().await {
        Ok(0) => return TokenCheck::NoInput,
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "Serial link poll failed");
            return TokenCheck::NoInput;
        }
    }

    let line = match link.read_line(max_line_len).await {
        Ok(line) => line,
        Err(e) => {
            warn!(error = %e, "Failed to read serial line");
            return TokenCheck::NoInput;
        }
    };

    if token.matches_line(&line) {
        debug!("Bluetooth token accepted");
        return TokenCheck::Accepted;
    }

    debug!(len = line.len(), %state, "Bluetooth line rejected");
    if let Err(e) = link.write_line(state.status_line()).await {
        warn!(error = %e, "Failed to echo lock state");
    }
    TokenCheck::Rejected
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorlock_hardware::mock::MockSerial;
    use rstest::rstest;

    fn token() -> BluetoothToken {
        BluetoothToken::new(b"SECRET1".to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_no_input_consumes_nothing() {
        let (mut link, handle) = MockSerial::new();
        let check = check_token(&mut link, &token(), LockState::Unlocked, 15).await;

        assert_eq!(check, TokenCheck::NoInput);
        assert!(handle.drain_output().await.is_empty());
    }

    #[rstest]
    #[case("SECRET1")]
    #[case("SECRET1 trailing")]
    #[tokio::test]
    async fn test_token_accepted(#[case] line: &str) {
        let (mut link, handle) = MockSerial::new();
        handle.send_line(line).unwrap();

        let check = check_token(&mut link, &token(), LockState::Unlocked, 15).await;
        assert_eq!(check, TokenCheck::Accepted);
        assert!(handle.drain_output().await.is_empty());
    }

    #[rstest]
    #[case("WRONG12", LockState::Locked, "Locked.")]
    #[case("SECRET", LockState::Unlocked, "Unlocked")]
    #[case("", LockState::Locked, "Locked.")]
    #[case("secret1", LockState::Unlocked, "Unlocked")]
    #[tokio::test]
    async fn test_rejected_line_echoes_state(
        #[case] line: &str,
        #[case] state: LockState,
        #[case] echo: &str,
    ) {
        let (mut link, handle) = MockSerial::new();
        handle.send_line(line).unwrap();

        let check = check_token(&mut link, &token(), state, 15).await;
        assert_eq!(check, TokenCheck::Rejected);
        assert_eq!(handle.drain_output().await, vec![echo.to_string()]);
    }

    #[tokio::test]
    async fn test_overflow_bytes_read_on_next_poll() {
        let (mut link, handle) = MockSerial::new();
        handle.send_line("ABCDEFGHIJKLMNOSECRET1").unwrap();

        let first = check_token(&mut link, &token(), LockState::Locked, 15).await;
        let second = check_token(&mut link, &token(), LockState::Locked, 15).await;

        assert_eq!(first, TokenCheck::Rejected);
        assert_eq!(second, TokenCheck::Accepted);
        assert_eq!(handle.drain_output().await, vec!["Locked.".to_string()]);
    }
}

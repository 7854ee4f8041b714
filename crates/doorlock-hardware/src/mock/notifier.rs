//! Mock buzzer and status LED.

use crate::{Result, traits::NotificationSink, types::Cue};
use tracing::debug;

/// Mock notification sink that records every cue and the LED level.
#[derive(Debug, Default)]
pub struct MockNotifier {
    cues: Vec<Cue>,
    indicator: bool,
    indicator_writes: usize,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far, oldest first.
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn last_cue(&self) -> Option<Cue> {
        self.cues.last().copied()
    }

    /// Current LED level.
    pub fn indicator(&self) -> bool {
        self.indicator
    }

    /// Number of times the LED was driven.
    pub fn indicator_writes(&self) -> usize {
        self.indicator_writes
    }
}

impl NotificationSink for MockNotifier {
    async fn play(&mut self, cue: Cue) -> Result<()> {
        debug!(%cue, "Mock buzzer playing cue");
        self.cues.push(cue);
        Ok(())
    }

    async fn set_indicator(&mut self, on: bool) -> Result<()> {
        self.indicator = on;
        self.indicator_writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_cues_in_order() {
        let mut notifier = MockNotifier::new();
        notifier.play(Cue::Acknowledge).await.unwrap();
        notifier.play(Cue::LockComplete).await.unwrap();

        assert_eq!(notifier.cues(), &[Cue::Acknowledge, Cue::LockComplete]);
        assert_eq!(notifier.last_cue(), Some(Cue::LockComplete));
    }

    #[tokio::test]
    async fn test_indicator_level() {
        let mut notifier = MockNotifier::new();
        assert!(!notifier.indicator());

        notifier.set_indicator(true).await.unwrap();
        assert!(notifier.indicator());
        notifier.set_indicator(false).await.unwrap();
        assert!(!notifier.indicator());
        assert_eq!(notifier.indicator_writes(), 2);
    }
}

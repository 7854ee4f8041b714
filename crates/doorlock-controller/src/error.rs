use doorlock_core::LockState;
use doorlock_hardware::HardwareError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),

    #[error(transparent)]
    Core(#[from] doorlock_core::Error),

    /// The latch did not finish moving. The lock state was left unchanged.
    #[error("Failed to move latch to {target}: {source}")]
    Actuator {
        target: LockState,
        #[source]
        source: HardwareError,
    },
}

pub type Result<T> = std::result::Result<T, ControllerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actuator_error_names_target() {
        let error = ControllerError::Actuator {
            target: LockState::Locked,
            source: HardwareError::actuator("stalled"),
        };
        assert!(error.to_string().starts_with("Failed to move latch to Locked"));
    }

    #[test]
    fn test_core_error_is_transparent() {
        let error = ControllerError::from(doorlock_core::Error::Config("bad".to_string()));
        assert_eq!(error.to_string(), "Configuration error: bad");
    }
}

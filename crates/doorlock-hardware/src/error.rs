//! Error types for peripheral operations.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors reported by the door lock peripherals.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected, or its mock handle was dropped.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Link-level failure talking to a device.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// A device reported data outside its valid range.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Device rejected or lacks its configuration.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// Motor failed to complete a move.
    #[error("Actuator error: {message}")]
    ActuatorError { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    pub fn actuator(message: impl Into<String>) -> Self {
        Self::ActuatorError {
            message: message.into(),
        }
    }
}

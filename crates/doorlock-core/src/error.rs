use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Credential errors
    #[error("Invalid credential: expected {expected} bytes, got {actual}")]
    InvalidCredential { expected: usize, actual: usize },

    #[error("Invalid credential encoding: {0}")]
    InvalidCredentialEncoding(String),

    #[error("Credential store full: at most {max} keys allowed")]
    CredentialStoreFull { max: usize },

    #[error("Invalid Bluetooth token: {0}")]
    InvalidToken(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

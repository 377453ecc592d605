use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WhoisError {
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    /// The TLD is known not to publish an expiration date, so it is refused
    /// before any connection is made.
    #[error("Unsupported TLD: domain extension {0} does not have a grace period")]
    UnsupportedTld(String),

    #[error("Connection to {server} failed: {source}")]
    Connection {
        server: String,
        #[source]
        source: io::Error,
    },

    #[error("Network timeout")]
    Timeout,

    #[error("Write error: {0}")]
    Write(#[source] io::Error),

    #[error("Read error: {0}")]
    Read(#[source] io::Error),

    #[error("Response too large")]
    ResponseTooLarge,

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl From<tokio::time::error::Elapsed> for WhoisError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        WhoisError::Timeout
    }
}

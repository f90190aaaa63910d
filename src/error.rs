use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlPanelError {
    #[error("Please provide a filename to activate")]
    EmptyFilename,
    #[error("Filename must be a single line: {0:?}")]
    InvalidFilename(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("at least one server URL is required")]
    NoServers,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid base64 content: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("subscription is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

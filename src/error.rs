//! Error types for the pager
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

use crate::domain::page::LoadDirection;

/// Main error type for the crate
#[derive(Debug, Snafu)]
pub enum Error {
    /// A real or virtual index has no backing item
    #[snafu(display("Index {index} out of range (count {count})"))]
    IndexOutOfRange { index: usize, count: usize },

    /// Inserting a page would leave a gap or duplicate a key
    #[snafu(display("Invalid insert: {message}"))]
    InvalidInsert { message: String },

    /// A load result arrived for a window that has since changed identity
    #[snafu(display("Stale apply: {message}"))]
    StaleApply { message: String },

    /// An upward range was requested while the window already starts at 0
    #[snafu(display("No items precede the origin"))]
    BeforeOrigin,

    /// A load was requested while another one is still outstanding
    #[snafu(display("A {direction} load is already in flight"))]
    LoadInFlight { direction: LoadDirection },

    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// The item source failed to produce a page
    #[snafu(display("Fetch error: {message}"))]
    Fetch { message: String },

    /// Timeout error
    #[snafu(display("Timeout: {message}"))]
    Timeout { message: String },

    /// Channel send error
    #[snafu(display("Channel send error: {message}"))]
    ChannelSend { message: String },

    /// IO error (config file operations)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },
}

impl Error {
    /// Create an invalid-insert error
    pub fn invalid_insert(message: impl Into<String>) -> Self {
        Error::InvalidInsert {
            message: message.into(),
        }
    }

    /// Create a stale-apply error
    pub fn stale(message: impl Into<String>) -> Self {
        Error::StaleApply {
            message: message.into(),
        }
    }

    /// Create an invalid-configuration error
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::Invalid {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;

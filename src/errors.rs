/*!
 * Error types for the srtsmith application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while reading subtitle text (FormatError)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubtitleError {
    /// A timestamp did not match `HH:MM:SS,mmm`
    #[error("Invalid timestamp: \"{0}\"")]
    InvalidTimestamp(String),

    /// A block could not be turned into an entry
    #[error("Malformed block {block_number} at line {line_number}: {reason}")]
    MalformedBlock {
        /// 1-based position of the block in the file
        block_number: usize,
        /// 1-based line on which the block starts
        line_number: usize,
        /// What was wrong with it
        reason: String,
    },
}

/// Errors raised by the byte codec
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    /// Unknown encoding label
    #[error("Unsupported encoding: {0}")]
    Unsupported(String),

    /// A byte has no mapping in the declared code page
    #[error("Byte 0x{byte:02X} at offset {offset} cannot be decoded as {encoding}")]
    UnmappableByte {
        encoding: &'static str,
        byte: u8,
        offset: usize,
    },

    /// The buffer is not well-formed in the declared encoding
    #[error("Malformed {encoding} sequence at offset {offset}")]
    Malformed {
        encoding: &'static str,
        offset: usize,
    },

    /// A character cannot be represented in the target encoding
    #[error("Character '{ch}' (U+{code:04X}) at position {position} cannot be encoded as {encoding}")]
    Unrepresentable {
        encoding: &'static str,
        ch: char,
        code: u32,
        position: usize,
    },
}

/// Errors raised while configuring plugins
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Plugin identifier not in the catalogue
    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    /// Parameter not declared by the plugin
    #[error("Plugin '{plugin}' has no parameter '{param}'")]
    UnknownParam { plugin: String, param: String },

    /// Value is NaN or infinite
    #[error("Parameter '{plugin}.{param}' must be a finite number")]
    NotFinite { plugin: String, param: String },

    /// Value lies outside the declared bounds
    #[error("Parameter '{plugin}.{param}' = {value} is out of range (min {min})")]
    OutOfRange {
        plugin: String,
        param: String,
        value: f64,
        min: f64,
    },

    /// Value is not one of the declared options
    #[error("Parameter '{plugin}.{param}' = {value} is not one of the allowed options")]
    NotAnOption {
        plugin: String,
        param: String,
        value: f64,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle parsing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the codec
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Error from plugin configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

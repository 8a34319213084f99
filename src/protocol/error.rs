//! Protocol error types

use thiserror::Error;

use super::FieldType;

/// Protocol engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Message id not present in the registry
    #[error("unknown message id {id}")]
    UnknownMessage {
        /// Requested message id
        id: u8,
    },

    /// Message name not present in the registry
    #[error("unknown message '{name}'")]
    UnknownMessageName {
        /// Requested message name
        name: String,
    },

    /// Encode called without a value for a field
    #[error("no value supplied for field '{field}'")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// Field kind the codec cannot handle in this direction
    #[error("unsupported field type {kind} for field '{field}'")]
    UnsupportedFieldType {
        /// Field name
        field: String,
        /// Offending kind
        kind: FieldType,
    },

    /// Checksum mismatch
    #[error("checksum mismatch: expected {expected:#06x}, got {found:#06x}")]
    ChecksumMismatch {
        /// Checksum computed over the frame
        expected: u16,
        /// Checksum carried by the frame
        found: u16,
    },

    /// Type token could not be resolved to a field kind
    #[error("invalid field type '{token}'")]
    InvalidFieldType {
        /// Raw type token from the schema
        token: String,
    },

    /// Array arity in a type token is zero or not a number
    #[error("invalid array length in type '{token}'")]
    InvalidArrayLength {
        /// Raw type token from the schema
        token: String,
    },

    /// Two definitions share an id or a name
    #[error("duplicate message definition '{name}' (id {id})")]
    DuplicateMessage {
        /// Message id
        id: u8,
        /// Message name
        name: String,
    },

    /// Two fields of one message share a name
    #[error("duplicate field '{field}' in message '{message}'")]
    DuplicateField {
        /// Message name
        message: String,
        /// Field name
        field: String,
    },

    /// Supplied value does not have the shape the field needs
    #[error("value for field '{field}' does not match type {kind}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Declared kind
        kind: FieldType,
    },

    /// Supplied numeric value does not fit the field kind
    #[error("value for field '{field}' out of range for {kind}")]
    ValueOutOfRange {
        /// Field name
        field: String,
        /// Declared kind
        kind: FieldType,
    },

    /// Array or text value longer than the declared arity
    #[error("field '{field}' holds at most {max} elements, got {len}")]
    ArrayTooLong {
        /// Field name
        field: String,
        /// Supplied length
        len: usize,
        /// Declared arity
        max: usize,
    },

    /// Payload does not fit the one-byte length header
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Buffer too small
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Frame does not begin with the version's start marker
    #[error("invalid start byte {found:#04x}")]
    InvalidStartByte {
        /// Byte found at offset 0
        found: u8,
    },

    /// Engine used before its schema was loaded
    #[error("schema not loaded")]
    NotLoaded,

    /// Schema load attempted twice
    #[error("schema already loaded")]
    AlreadyLoaded,

    /// Capture file could not be opened
    #[cfg(feature = "debug-tools")]
    #[error("capture failed: {0}")]
    Capture(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for msgpack-ext.

use thiserror::Error;

use crate::ext::{TYPE_MAX, TYPE_MIN};

/// Boxed error raised by a registered handler.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for all ext operations.
#[derive(Debug, Error)]
pub enum ExtError {
    /// Type code outside the signed 8-bit range.
    #[error("type code {value} out of range: must be >= {min} and <= {max}")]
    TypeRange { value: i64, min: i64, max: i64 },

    /// Input could not be treated as the expected kind of value.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Internal state was never initialized.
    ///
    /// Reserved: ext values are fully initialized by construction, so no
    /// operation in this crate currently returns it.
    #[error("invariant violated: {0}")]
    InvariantViolation(&'static str),

    /// Payload longer than the framing (or configured limit) allows.
    #[error("payload size {size} exceeds maximum {max}")]
    PayloadTooLarge { size: u64, max: u64 },

    /// Input ended before a complete ext value was read.
    #[error("truncated ext value: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    /// Input continued past a single complete ext value.
    #[error("{0} trailing bytes after ext value")]
    TrailingBytes(usize),

    /// Error raised by a registered handler, passed through as-is.
    #[error("handler error: {0}")]
    Handler(#[source] BoxError),

    /// I/O error while flushing packed bytes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ext header encode error.
    #[error("ext encode error: {0}")]
    Encode(#[from] rmp::encode::ValueWriteError),

    /// Ext header decode error.
    #[error("ext decode error: {0}")]
    Decode(#[from] rmp::decode::ValueReadError),

    /// MsgPack serialization error.
    #[error("MsgPack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MsgPack deserialization error.
    #[error("MsgPack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
}

impl ExtError {
    /// Range error for `value`, naming the valid bounds.
    pub fn type_range(value: i64) -> Self {
        ExtError::TypeRange {
            value,
            min: i64::from(TYPE_MIN),
            max: i64::from(TYPE_MAX),
        }
    }

    /// Wrap an arbitrary handler error.
    pub fn handler<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        ExtError::Handler(err.into())
    }
}

/// Result type alias using ExtError.
pub type Result<T> = std::result::Result<T, ExtError>;

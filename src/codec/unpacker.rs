//! Ext buffer for accumulating partial reads.
//!
//! Implements a state machine for handling fragmented ext values:
//! - `WaitingForMeta`: Need the marker and the full length/type header
//! - `WaitingForPayload`: Header parsed, need N more payload bytes
//!
//! Every complete value is minted through [`HandlerRegistry::create`], so
//! registered handlers see the payload of their type code.
//!
//! # Example
//!
//! ```
//! use msgpack_ext::codec::ExtBuffer;
//! use msgpack_ext::handler::HandlerRegistry;
//!
//! let registry = HandlerRegistry::new();
//! let mut buffer = ExtBuffer::new();
//!
//! // Data arrives in chunks
//! assert!(buffer.push(b"\xd5\x01", &registry).unwrap().is_empty());
//! let values = buffer.push(b"aa", &registry).unwrap();
//!
//! assert_eq!(values.len(), 1);
//! assert_eq!(values[0].as_ext().unwrap().data(), b"aa");
//! ```

use bytes::{Bytes, BytesMut};
use rmp::decode::ExtMeta;
use rmp::Marker;

use crate::error::{ExtError, Result};
use crate::handler::{Decoded, HandlerRegistry};

/// Default maximum payload size (1 GB).
pub const DEFAULT_MAX_PAYLOAD_SIZE: u32 = 1_073_741_824;

/// State machine for ext parsing.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Waiting for a complete ext header.
    WaitingForMeta,
    /// Header parsed, waiting for payload bytes.
    WaitingForPayload { type_code: i8, remaining: u32 },
}

/// Buffer for accumulating incoming bytes and extracting complete ext values.
pub struct ExtBuffer {
    /// Accumulated input bytes.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
    /// Maximum allowed payload size.
    max_payload_size: u32,
    /// Values decoded by a push that then failed, returned by the next push.
    pending: Vec<Decoded>,
}

impl ExtBuffer {
    /// Create a new ext buffer with default settings.
    ///
    /// Default capacity: 64KB, max payload: 1GB.
    pub fn new() -> Self {
        Self::with_capacity_and_max_payload(64 * 1024, DEFAULT_MAX_PAYLOAD_SIZE)
    }

    /// Create a new ext buffer with custom max payload size.
    pub fn with_max_payload(max_payload_size: u32) -> Self {
        Self::with_capacity_and_max_payload(64 * 1024, max_payload_size)
    }

    /// Create a new ext buffer with custom capacity and max payload.
    pub fn with_capacity_and_max_payload(capacity: usize, max_payload_size: u32) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            state: State::WaitingForMeta,
            max_payload_size,
            pending: Vec::new(),
        }
    }

    /// Push data into the buffer and mint all complete ext values.
    ///
    /// Partial data is buffered internally for the next push. Values decoded
    /// before an error are kept and returned, in order, ahead of anything the
    /// next push decodes (pushing an empty slice is enough to collect them).
    ///
    /// # Errors
    ///
    /// - [`ExtError::TypeMismatch`] if the input holds a non-ext value
    /// - [`ExtError::PayloadTooLarge`] if a payload exceeds the configured max
    /// - any error from the handler registered for a decoded type code
    ///
    /// After `TypeMismatch` or `PayloadTooLarge` the buffered input can no
    /// longer be framed, so it is discarded and parsing restarts with the next
    /// push. After a handler error only the failing value is consumed; the
    /// bytes that follow it stay buffered.
    pub fn push(&mut self, data: &[u8], registry: &HandlerRegistry) -> Result<Vec<Decoded>> {
        self.buffer.extend_from_slice(data);

        let mut values = std::mem::take(&mut self.pending);
        loop {
            let (type_code, payload) = match self.try_extract_one() {
                Ok(Some(item)) => item,
                Ok(None) => break,
                Err(e) => {
                    self.clear();
                    self.pending = values;
                    return Err(e);
                }
            };

            match registry.create(i64::from(type_code), payload) {
                Ok(value) => values.push(value),
                Err(e) => {
                    self.pending = values;
                    return Err(e);
                }
            }
        }

        Ok(values)
    }

    /// Number of decoded values held back by a failed push.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Try to extract a single `(type, payload)` pair from the buffer.
    fn try_extract_one(&mut self) -> Result<Option<(i8, Bytes)>> {
        match self.state {
            State::WaitingForMeta => {
                let Some((meta, meta_len)) = read_meta(&self.buffer)? else {
                    return Ok(None);
                };

                if meta.size > self.max_payload_size {
                    tracing::warn!(
                        "Rejecting ext type {} with {} byte payload (max {})",
                        meta.typeid,
                        meta.size,
                        self.max_payload_size
                    );
                    return Err(ExtError::PayloadTooLarge {
                        size: u64::from(meta.size),
                        max: u64::from(self.max_payload_size),
                    });
                }

                let _ = self.buffer.split_to(meta_len);

                if meta.size == 0 {
                    return Ok(Some((meta.typeid, Bytes::new())));
                }

                self.state = State::WaitingForPayload {
                    type_code: meta.typeid,
                    remaining: meta.size,
                };

                self.try_extract_one()
            }

            State::WaitingForPayload {
                type_code,
                remaining,
            } => {
                let remaining = remaining as usize;

                if self.buffer.len() < remaining {
                    return Ok(None);
                }

                let payload = self.buffer.split_to(remaining).freeze();
                self.state = State::WaitingForMeta;

                Ok(Some((type_code, payload)))
            }
        }
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Check if a value is partially buffered.
    pub fn is_mid_value(&self) -> bool {
        matches!(self.state, State::WaitingForPayload { .. }) || !self.buffer.is_empty()
    }

    /// Clear the buffer and reset state.
    ///
    /// Values held back by a failed push are kept.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = State::WaitingForMeta;
    }
}

impl Default for ExtBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode exactly one ext value from `data` and mint it through `registry`.
///
/// # Errors
///
/// - [`ExtError::TypeMismatch`] if `data` does not start with an ext marker
/// - [`ExtError::Truncated`] if `data` ends early
/// - [`ExtError::TrailingBytes`] if `data` continues past the value
///
/// # Example
///
/// ```
/// use msgpack_ext::codec::read_ext;
/// use msgpack_ext::handler::HandlerRegistry;
///
/// let registry = HandlerRegistry::new();
/// let value = read_ext(b"\xd6\x01aaaa", &registry).unwrap();
/// let ext = value.as_ext().unwrap();
/// assert_eq!(ext.type_code(), 1);
/// assert_eq!(ext.data(), b"aaaa");
/// ```
pub fn read_ext(data: &[u8], registry: &HandlerRegistry) -> Result<Decoded> {
    let Some((meta, meta_len)) = read_meta(data)? else {
        let needed = match data.first() {
            Some(&byte) => meta_len(Marker::from_u8(byte))?,
            None => 1,
        };
        return Err(ExtError::Truncated {
            needed,
            available: data.len(),
        });
    };

    let end = meta_len + meta.size as usize;
    if data.len() < end {
        return Err(ExtError::Truncated {
            needed: end,
            available: data.len(),
        });
    }
    if data.len() > end {
        return Err(ExtError::TrailingBytes(data.len() - end));
    }

    registry.create(
        i64::from(meta.typeid),
        Bytes::copy_from_slice(&data[meta_len..end]),
    )
}

/// Header length (marker, length and type bytes) for an ext marker.
fn meta_len(marker: Marker) -> Result<usize> {
    match marker {
        Marker::FixExt1 | Marker::FixExt2 | Marker::FixExt4 | Marker::FixExt8 | Marker::FixExt16 => {
            Ok(2)
        }
        Marker::Ext8 => Ok(3),
        Marker::Ext16 => Ok(4),
        Marker::Ext32 => Ok(6),
        other => Err(ExtError::TypeMismatch(format!(
            "expected ext marker, found {:?}",
            other
        ))),
    }
}

/// Parse the ext header at the start of `buf`.
///
/// Returns `None` if more bytes are needed.
fn read_meta(buf: &[u8]) -> Result<Option<(ExtMeta, usize)>> {
    let Some(&first) = buf.first() else {
        return Ok(None);
    };

    let len = meta_len(Marker::from_u8(first))?;
    if buf.len() < len {
        return Ok(None);
    }

    let mut rd = &buf[..len];
    let meta = rmp::decode::read_ext_meta(&mut rd)?;
    Ok(Some((meta, len)))
}

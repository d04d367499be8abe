//! Packer for the MessagePack ext family.
//!
//! Writes the ext framing through `rmp::encode::write_ext_meta`, which picks
//! the smallest layout for the payload length:
//! ```text
//! ┌────────────┬────────────────┬──────────┬──────────┐
//! │ Marker     │ Length         │ Type     │ Payload  │
//! ├────────────┼────────────────┼──────────┼──────────┤
//! │ d4..d8     │ (implied 1-16) │ int8     │ N bytes  │
//! │ c7         │ uint8          │ int8     │ N bytes  │
//! │ c8         │ uint16 BE      │ int8     │ N bytes  │
//! │ c9         │ uint32 BE      │ int8     │ N bytes  │
//! └────────────┴────────────────┴──────────┴──────────┘
//! ```

use std::io::Write;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ExtError, Result};
use crate::ext::ExtendedValue;

/// Default packer buffer capacity (4KB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 4 * 1024;

/// Largest payload the ext32 layout can frame.
pub const MAX_EXT_PAYLOAD_SIZE: u64 = u32::MAX as u64;

/// Output sink for ext values.
///
/// All data is appended to a single `BytesMut` buffer; [`Packer::take`]
/// hands it out without copying.
#[derive(Debug)]
pub struct Packer {
    buffer: BytesMut,
}

impl Packer {
    /// Create a new packer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    /// Create a new packer with custom capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Write one ext value.
    ///
    /// # Errors
    ///
    /// - [`ExtError::TypeRange`] if the value's type code was moved out of
    ///   range through [`ExtendedValue::set_type`]
    /// - [`ExtError::PayloadTooLarge`] if the payload exceeds ext32 limits
    ///
    /// Nothing is written on error.
    pub fn write_ext_value(&mut self, value: &ExtendedValue) -> Result<&mut Self> {
        let type_code = value.wire_type()?;
        self.write_ext(type_code, value.data())
    }

    /// Write raw ext framing and payload.
    pub fn write_ext(&mut self, type_code: i8, data: &[u8]) -> Result<&mut Self> {
        let len = u32::try_from(data.len()).map_err(|_| ExtError::PayloadTooLarge {
            size: data.len() as u64,
            max: MAX_EXT_PAYLOAD_SIZE,
        })?;

        {
            let mut writer = (&mut self.buffer).writer();
            rmp::encode::write_ext_meta(&mut writer, len, type_code)?;
        }
        self.buffer.extend_from_slice(data);

        tracing::trace!("Packed ext type {} ({} bytes)", type_code, len);
        Ok(self)
    }

    /// Packed bytes so far.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the number of packed bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing has been packed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard packed bytes.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Take the packed bytes, leaving the packer empty (zero-copy).
    pub fn take(&mut self) -> Bytes {
        self.buffer.split().freeze()
    }

    /// Flush packed bytes to `out`, leaving the packer empty.
    ///
    /// Returns the number of bytes written.
    pub fn write_to<W: Write>(&mut self, mut out: W) -> Result<usize> {
        out.write_all(&self.buffer)?;
        let written = self.buffer.len();
        self.buffer.clear();
        Ok(written)
    }
}

impl Default for Packer {
    fn default() -> Self {
        Self::new()
    }
}

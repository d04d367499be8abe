//! MsgPack codec using `rmp-serde`.
//!
//! Uses `to_vec_named` so structs are serialized as maps (with field
//! names). [`ExtendedValue`](crate::ext::ExtendedValue) fields inside those
//! structs are written in ext format, byte-identical to
//! [`Packer`](super::Packer) output.
//!
//! # Example
//!
//! ```
//! use msgpack_ext::codec::MsgPackCodec;
//! use msgpack_ext::ext::ExtendedValue;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Message {
//!     id: u32,
//!     blob: ExtendedValue,
//! }
//!
//! let msg = Message { id: 42, blob: ExtendedValue::new(1, &b"aa"[..]).unwrap() };
//! let encoded = MsgPackCodec::encode(&msg).unwrap();
//! let decoded: Message = MsgPackCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, msg);
//! ```

use crate::error::Result;

/// MessagePack codec for structured data.
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Encode a value to MsgPack bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized, including ext values
    /// whose type code is out of range.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    /// Decode MsgPack bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

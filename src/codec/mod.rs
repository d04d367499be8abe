//! Codec module - getting ext values on and off the wire.
//!
//! - [`Packer`] - writes ext framing and payloads into a byte buffer
//! - [`ExtBuffer`] / [`read_ext`] - read ext values back, minting them through
//!   a [`HandlerRegistry`](crate::handler::HandlerRegistry)
//! - [`MsgPackCodec`] - MessagePack using `rmp-serde`, for ext values embedded
//!   in structured payloads
//!
//! # Example
//!
//! ```
//! use msgpack_ext::codec::{read_ext, Packer};
//! use msgpack_ext::ext::ExtendedValue;
//! use msgpack_ext::handler::HandlerRegistry;
//!
//! let value = ExtendedValue::new(42, &b"payload"[..]).unwrap();
//!
//! let mut packer = Packer::new();
//! value.to_wire(&mut packer).unwrap();
//!
//! let registry = HandlerRegistry::new();
//! let decoded = read_ext(packer.as_bytes(), &registry).unwrap();
//! assert_eq!(decoded.as_ext(), Some(&value));
//! ```

mod msgpack;
mod packer;
mod unpacker;

pub use msgpack::MsgPackCodec;
pub use packer::{Packer, DEFAULT_BUFFER_CAPACITY, MAX_EXT_PAYLOAD_SIZE};
pub use unpacker::{read_ext, ExtBuffer, DEFAULT_MAX_PAYLOAD_SIZE};

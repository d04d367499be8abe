//! # msgpack-ext
//!
//! MessagePack ext values with a per-type-code handler registry.
//!
//! An ext value is a signed 8-bit type code plus an opaque byte payload.
//! Decoding code never builds one directly: it asks a [`HandlerRegistry`] to
//! [`create`](HandlerRegistry::create) it, which lets callers register
//! handlers that turn specific type codes into richer domain objects.
//!
//! ## Architecture
//!
//! - **ext**: [`ExtendedValue`] data model, range checks and equality
//! - **handler**: [`HandlerRegistry`] and the dispatch entry point
//! - **codec**: ext framing on and off the wire ([`codec::Packer`],
//!   [`codec::ExtBuffer`]) plus a serde bridge ([`codec::MsgPackCodec`])
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use msgpack_ext::codec::{read_ext, Packer};
//! use msgpack_ext::{ExtendedValue, HandlerRegistry};
//!
//! #[derive(Debug, PartialEq)]
//! struct Timestamp(u32);
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_typed(-1, |data: Bytes| {
//!     let secs: [u8; 4] = data[..].try_into().map_err(msgpack_ext::ExtError::handler)?;
//!     Ok(Timestamp(u32::from_be_bytes(secs)))
//! });
//!
//! let mut packer = Packer::new();
//! ExtendedValue::new(-1, vec![0, 0, 1, 0])
//!     .unwrap()
//!     .to_wire(&mut packer)
//!     .unwrap();
//!
//! let decoded = read_ext(packer.as_bytes(), &registry).unwrap();
//! assert_eq!(decoded.downcast_ref::<Timestamp>(), Some(&Timestamp(256)));
//! ```

pub mod codec;
pub mod error;
pub mod ext;
pub mod handler;

pub use error::{ExtError, Result};
pub use ext::{ExtendedValue, Variant};
pub use handler::{Decoded, HandlerRegistry};

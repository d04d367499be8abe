//! Ext module - the tagged binary value of the MessagePack ext family.
//!
//! Provides:
//! - [`ExtendedValue`] - signed 8-bit type code plus an opaque payload
//! - [`Variant`] - discriminant separating plain values from handler-minted ones
//!
//! # Example
//!
//! ```
//! use msgpack_ext::ext::{ExtendedValue, Variant};
//!
//! let value = ExtendedValue::new(5, &b"ab"[..]).unwrap();
//! assert_eq!(value.type_code(), 5);
//! assert_eq!(value.data(), b"ab");
//! assert_eq!(value.variant(), Variant::PLAIN);
//!
//! assert!(ExtendedValue::new(128, &b""[..]).is_err());
//! ```

mod serde_impl;
mod value;

pub use value::{ExtendedValue, Variant, TYPE_MAX, TYPE_MIN};

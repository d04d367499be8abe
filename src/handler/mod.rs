//! Handler module - per-type-code decoding hooks and dispatch.
//!
//! Provides:
//! - [`HandlerRegistry`] - maps ext type codes to handlers, and mints values
//!   through [`HandlerRegistry::create`]
//! - [`Decoded`] - what a dispatch produces: a plain ext value or a handler's
//!   own domain object
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use msgpack_ext::handler::{Decoded, HandlerRegistry};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point { x: u8, y: u8 }
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_typed(7, |data: Bytes| Ok(Point { x: data[0], y: data[1] }));
//!
//! let point = registry.create(7, vec![3, 4]).unwrap();
//! assert_eq!(point.downcast_ref::<Point>(), Some(&Point { x: 3, y: 4 }));
//!
//! // Unregistered codes fall back to a plain ext value.
//! let plain = registry.create(8, vec![3, 4]).unwrap();
//! assert_eq!(plain.as_ext().unwrap().data(), &[3, 4]);
//! ```

mod decoded;
mod registry;

pub use decoded::Decoded;
pub use registry::{ExtHandler, HandlerRegistry, TypedHandler};

//! Handler registry for dispatching ext values by type code.
//!
//! The registry maps type codes to handlers. [`HandlerRegistry::create`] is
//! the single place where ext values are minted: a registered handler takes
//! over construction for its type code, every other code falls back to a
//! plain [`ExtendedValue`].
//!
//! Registration never validates the 8-bit range and never fails; the last
//! registration for a type code wins.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use msgpack_ext::ext::{ExtendedValue, Variant};
//! use msgpack_ext::handler::{Decoded, HandlerRegistry};
//!
//! const UPPER: Variant = Variant::new("upper");
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register(3, |data: Bytes| {
//!     let upper = data.to_ascii_uppercase();
//!     Ok(Decoded::Ext(ExtendedValue::with_variant(UPPER, 3, upper)?))
//! });
//!
//! let value = registry.create(3, "abc").unwrap().into_ext().unwrap();
//! assert_eq!(value.data(), b"ABC");
//! assert_eq!(value.variant(), UPPER);
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use bytes::Bytes;

use super::Decoded;
use crate::error::Result;
use crate::ext::ExtendedValue;

/// Trait for ext handlers.
pub trait ExtHandler: Send + Sync + 'static {
    /// Build a value from the raw payload bytes.
    fn call(&self, payload: Bytes) -> Result<Decoded>;
}

impl<F> ExtHandler for F
where
    F: Fn(Bytes) -> Result<Decoded> + Send + Sync + 'static,
{
    fn call(&self, payload: Bytes) -> Result<Decoded> {
        (self)(payload)
    }
}

/// Wrapper that boxes a handler's typed result into [`Decoded::Custom`].
pub struct TypedHandler<F, T>
where
    F: Fn(Bytes) -> Result<T> + Send + Sync + 'static,
    T: Any + Send + Sync,
{
    handler: F,
    _phantom: PhantomData<fn() -> T>,
}

impl<F, T> TypedHandler<F, T>
where
    F: Fn(Bytes) -> Result<T> + Send + Sync + 'static,
    T: Any + Send + Sync,
{
    /// Create a new typed handler.
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _phantom: PhantomData,
        }
    }
}

impl<F, T> ExtHandler for TypedHandler<F, T>
where
    F: Fn(Bytes) -> Result<T> + Send + Sync + 'static,
    T: Any + Send + Sync,
{
    fn call(&self, payload: Bytes) -> Result<Decoded> {
        (self.handler)(payload).map(Decoded::custom)
    }
}

/// Registry mapping ext type codes to handlers.
///
/// Lookup and dispatch take `&self`, registration takes `&mut self`. Share a
/// registry across threads by wrapping it in a lock of the caller's choice.
#[derive(Default)]
pub struct HandlerRegistry {
    /// Handlers by type code.
    handlers: HashMap<i64, Arc<dyn ExtHandler>>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler closure for `type_code`.
    ///
    /// Replaces any handler already registered for the code. Returns the
    /// stored handler so it can be registered again elsewhere.
    pub fn register<F>(&mut self, type_code: i64, handler: F) -> Arc<dyn ExtHandler>
    where
        F: Fn(Bytes) -> Result<Decoded> + Send + Sync + 'static,
    {
        self.register_handler(type_code, Arc::new(handler))
    }

    /// Register a handler whose result is boxed into [`Decoded::Custom`].
    pub fn register_typed<F, T>(&mut self, type_code: i64, handler: F) -> Arc<dyn ExtHandler>
    where
        F: Fn(Bytes) -> Result<T> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        self.register_handler(type_code, Arc::new(TypedHandler::new(handler)))
    }

    /// Register an already shared handler.
    pub fn register_handler(
        &mut self,
        type_code: i64,
        handler: Arc<dyn ExtHandler>,
    ) -> Arc<dyn ExtHandler> {
        if self
            .handlers
            .insert(type_code, Arc::clone(&handler))
            .is_some()
        {
            tracing::debug!("Replaced ext handler for type {}", type_code);
        }
        handler
    }

    /// Get the handler for a type code.
    pub fn lookup(&self, type_code: i64) -> Option<&dyn ExtHandler> {
        self.handlers.get(&type_code).map(|h| h.as_ref())
    }

    /// Check if a handler is registered for a type code.
    pub fn contains(&self, type_code: i64) -> bool {
        self.handlers.contains_key(&type_code)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered type codes, in ascending order.
    pub fn type_codes(&self) -> Vec<i64> {
        let mut codes: Vec<i64> = self.handlers.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Mint a value for `(type_code, payload)`.
    ///
    /// If a handler is registered for `type_code` it is called exactly once
    /// with the payload, and its result (or error) is returned unchanged.
    /// Otherwise a plain [`ExtendedValue`] is built, which fails for type
    /// codes outside `[-128, 127]`.
    pub fn create(&self, type_code: i64, payload: impl Into<Bytes>) -> Result<Decoded> {
        let payload = payload.into();

        if let Some(handler) = self.lookup(type_code) {
            tracing::debug!(
                "Dispatching ext type {} ({} bytes) to handler",
                type_code,
                payload.len()
            );
            return handler.call(payload);
        }

        tracing::trace!("Building plain ext value for type {}", type_code);
        ExtendedValue::new(type_code, payload).map(Decoded::Ext)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("type_codes", &self.type_codes())
            .finish()
    }
}

//! Result of dispatching an ext value.

use std::any::Any;
use std::fmt;

use crate::ext::ExtendedValue;

/// Value minted by [`HandlerRegistry::create`](super::HandlerRegistry::create).
///
/// A handler may return anything; the dispatcher passes it through without
/// checking that it is ext-compatible.
pub enum Decoded {
    /// An ext value, plain or handler-minted.
    Ext(ExtendedValue),
    /// A handler's own domain object.
    Custom(Box<dyn Any + Send + Sync>),
}

impl Decoded {
    /// Box a domain object.
    pub fn custom<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Decoded::Custom(Box::new(value))
    }

    /// Check if this is an ext value.
    #[inline]
    pub fn is_ext(&self) -> bool {
        matches!(self, Decoded::Ext(_))
    }

    /// Borrow the ext value, if any.
    pub fn as_ext(&self) -> Option<&ExtendedValue> {
        match self {
            Decoded::Ext(ext) => Some(ext),
            Decoded::Custom(_) => None,
        }
    }

    /// Take the ext value, if any.
    pub fn into_ext(self) -> Option<ExtendedValue> {
        match self {
            Decoded::Ext(ext) => Some(ext),
            Decoded::Custom(_) => None,
        }
    }

    /// Borrow a domain object of type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Decoded::Custom(value) => value.downcast_ref::<T>(),
            Decoded::Ext(_) => None,
        }
    }

    /// Take a domain object of type `T`, handing `self` back on mismatch.
    pub fn downcast<T: Any>(self) -> std::result::Result<Box<T>, Decoded> {
        match self {
            Decoded::Custom(value) => value.downcast::<T>().map_err(Decoded::Custom),
            ext => Err(ext),
        }
    }
}

impl From<ExtendedValue> for Decoded {
    fn from(ext: ExtendedValue) -> Self {
        Decoded::Ext(ext)
    }
}

impl fmt::Debug for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::Ext(ext) => f.debug_tuple("Ext").field(ext).finish(),
            Decoded::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ext_accessors() {
        let ext = ExtendedValue::new(1, &b"a"[..]).unwrap();
        let decoded = Decoded::from(ext.clone());

        assert!(decoded.is_ext());
        assert_eq!(decoded.as_ext(), Some(&ext));
        assert!(decoded.downcast_ref::<u32>().is_none());
        assert_eq!(decoded.into_ext(), Some(ext));
    }

    #[test]
    fn test_custom_downcast() {
        let decoded = Decoded::custom(42u32);

        assert!(!decoded.is_ext());
        assert!(decoded.as_ext().is_none());
        assert_eq!(decoded.downcast_ref::<u32>(), Some(&42));
        assert!(decoded.downcast_ref::<String>().is_none());

        let back = decoded.downcast::<String>().unwrap_err();
        assert_eq!(*back.downcast::<u32>().unwrap(), 42);
    }

    #[test]
    fn test_downcast_ext_returns_self() {
        let decoded = Decoded::from(ExtendedValue::new(2, &b"b"[..]).unwrap());
        let back = decoded.downcast::<u32>().unwrap_err();
        assert!(back.is_ext());
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", Decoded::custom(1u8)), "Custom(..)");
        let ext = Decoded::from(ExtendedValue::new(2, &b"b"[..]).unwrap());
        assert!(format!("{ext:?}").starts_with("Ext(ExtendedValue"));
    }
}

//! Extended value data model.
//!
//! An ext value is a signed 8-bit type code and an opaque byte payload.
//! The payload is held in `bytes::Bytes`, so clones share the same immutable
//! buffer and nothing can mutate it after construction.

use std::fmt;

use bytes::Bytes;

use crate::codec::Packer;
use crate::error::{ExtError, Result};

/// Smallest valid ext type code.
pub const TYPE_MIN: i8 = i8::MIN;

/// Largest valid ext type code.
pub const TYPE_MAX: i8 = i8::MAX;

/// Discriminant compared alongside type code and payload.
///
/// Values built by [`ExtendedValue::new`] are [`Variant::PLAIN`]. A handler
/// that wants its own flavour of ext value mints it with
/// [`ExtendedValue::with_variant`]; such values never compare equal to plain
/// ones, even with identical fields. Variants made by [`Variant::new`] are
/// always distinct from `PLAIN`, including one named `"plain"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variant {
    name: &'static str,
    custom: bool,
}

impl Variant {
    /// Variant of values built by the plain constructor.
    pub const PLAIN: Variant = Variant {
        name: "plain",
        custom: false,
    };

    /// Create a named custom variant.
    pub const fn new(name: &'static str) -> Self {
        Self { name, custom: true }
    }

    /// Variant name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check if this is the plain constructor's variant.
    #[inline]
    pub fn is_plain(&self) -> bool {
        !self.custom
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A MessagePack ext value.
///
/// Equality (`==`, [`ExtendedValue::equals`]) holds iff both values share the
/// same variant, the same type code and byte-identical payloads.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ExtendedValue {
    variant: Variant,
    type_code: i64,
    payload: Bytes,
}

impl ExtendedValue {
    /// Create a plain ext value.
    ///
    /// # Errors
    ///
    /// Returns [`ExtError::TypeRange`] if `type_code` is outside `[-128, 127]`.
    ///
    /// # Example
    ///
    /// ```
    /// use msgpack_ext::ext::ExtendedValue;
    ///
    /// let value = ExtendedValue::new(-1, vec![0x00, 0x01]).unwrap();
    /// assert_eq!(value.type_code(), -1);
    /// assert_eq!(value.data(), &[0x00, 0x01]);
    /// ```
    pub fn new(type_code: i64, payload: impl Into<Bytes>) -> Result<Self> {
        Self::with_variant(Variant::PLAIN, type_code, payload)
    }

    /// Create an ext value tagged with a custom variant.
    ///
    /// Same validation as [`ExtendedValue::new`].
    pub fn with_variant(
        variant: Variant,
        type_code: i64,
        payload: impl Into<Bytes>,
    ) -> Result<Self> {
        check_range(type_code)?;
        Ok(Self {
            variant,
            type_code,
            payload: payload.into(),
        })
    }

    /// Current type code.
    #[inline]
    pub fn type_code(&self) -> i64 {
        self.type_code
    }

    /// Overwrite the type code without range validation.
    ///
    /// Returns the new value. A type code set here that falls outside
    /// `[-128, 127]` is only rejected when the value is packed; use
    /// [`ExtendedValue::try_set_type`] to validate up front.
    pub fn set_type(&mut self, type_code: i64) -> i64 {
        self.type_code = type_code;
        self.type_code
    }

    /// Overwrite the type code, rejecting values outside `[-128, 127]`.
    ///
    /// On error the current type code is left unchanged.
    pub fn try_set_type(&mut self, type_code: i64) -> Result<i8> {
        let wire = check_range(type_code)?;
        self.type_code = type_code;
        Ok(wire)
    }

    /// Type code as it goes on the wire.
    ///
    /// # Errors
    ///
    /// Returns [`ExtError::TypeRange`] if the type code was moved out of range
    /// through [`ExtendedValue::set_type`].
    pub fn wire_type(&self) -> Result<i8> {
        check_range(self.type_code)
    }

    /// Payload bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.payload
    }

    /// Payload as `Bytes` (cheap, shares the buffer).
    #[inline]
    pub fn payload(&self) -> Bytes {
        self.payload.clone()
    }

    /// Variant discriminant.
    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Byte-exact equality including the variant discriminant.
    #[inline]
    pub fn equals(&self, other: &ExtendedValue) -> bool {
        self == other
    }

    /// Append this value to `packer` in ext format.
    ///
    /// # Example
    ///
    /// ```
    /// use msgpack_ext::codec::Packer;
    /// use msgpack_ext::ext::ExtendedValue;
    ///
    /// let value = ExtendedValue::new(1, &b"aa"[..]).unwrap();
    /// let mut packer = Packer::new();
    /// value.to_wire(&mut packer).unwrap();
    /// assert_eq!(packer.as_bytes(), b"\xd5\x01aa");
    /// ```
    pub fn to_wire<'p>(&self, packer: &'p mut Packer) -> Result<&'p mut Packer> {
        packer.write_ext_value(self)
    }

    /// Pack this value into a fresh buffer.
    pub fn to_msgpack(&self) -> Result<Bytes> {
        let mut packer = Packer::with_capacity(self.payload.len() + 6);
        self.to_wire(&mut packer)?;
        Ok(packer.take())
    }
}

impl fmt::Debug for ExtendedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedValue")
            .field("variant", &self.variant)
            .field("type_code", &self.type_code)
            .field("payload", &self.payload)
            .finish()
    }
}

impl fmt::Display for ExtendedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ext({}, type={}, {} bytes)",
            self.variant,
            self.type_code,
            self.payload.len()
        )
    }
}

fn check_range(type_code: i64) -> Result<i8> {
    i8::try_from(type_code).map_err(|_| ExtError::type_range(type_code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_full_range() {
        for t in i64::from(TYPE_MIN)..=i64::from(TYPE_MAX) {
            let value = ExtendedValue::new(t, vec![t as u8, 0xFF]).unwrap();
            assert_eq!(value.type_code(), t);
            assert_eq!(value.data(), &[t as u8, 0xFF]);
            assert_eq!(value.wire_type().unwrap() as i64, t);
        }
    }

    #[test]
    fn test_construct_out_of_range() {
        for t in [-129, 128, 255, -1000, i64::MAX, i64::MIN] {
            let err = ExtendedValue::new(t, &b"payload"[..]).unwrap_err();
            match err {
                ExtError::TypeRange { value, min, max } => {
                    assert_eq!(value, t);
                    assert_eq!(min, -128);
                    assert_eq!(max, 127);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_empty_payload_is_valid() {
        let value = ExtendedValue::new(0, Bytes::new()).unwrap();
        assert!(value.data().is_empty());
    }

    #[test]
    fn test_payload_coercions() {
        let from_str = ExtendedValue::new(1, "aa").unwrap();
        let from_string = ExtendedValue::new(1, String::from("aa")).unwrap();
        let from_vec = ExtendedValue::new(1, vec![b'a', b'a']).unwrap();
        let from_static = ExtendedValue::new(1, &b"aa"[..]).unwrap();
        assert_eq!(from_str, from_string);
        assert_eq!(from_string, from_vec);
        assert_eq!(from_vec, from_static);
    }

    #[test]
    fn test_equality_byte_exact() {
        let a = ExtendedValue::new(5, &b"ab"[..]).unwrap();
        let b = ExtendedValue::new(5, &b"ab"[..]).unwrap();
        let c = ExtendedValue::new(5, &b"ac"[..]).unwrap();
        let d = ExtendedValue::new(6, &b"ab"[..]).unwrap();
        let e = ExtendedValue::new(5, &b"abc"[..]).unwrap();

        assert!(a.equals(&a));
        assert!(a.equals(&b));
        assert!(b.equals(&a));
        assert!(!a.equals(&c));
        assert!(!a.equals(&d));
        assert!(!a.equals(&e));
    }

    #[test]
    fn test_equality_compares_content_not_identity() {
        let a = ExtendedValue::new(9, vec![1, 2, 3]).unwrap();
        let b = ExtendedValue::new(9, vec![1, 2, 3]).unwrap();
        assert_ne!(a.data().as_ptr(), b.data().as_ptr());
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_variants_never_equal() {
        const TIMESTAMP: Variant = Variant::new("timestamp");

        let plain = ExtendedValue::new(-1, &b"\x00\x00\x00\x01"[..]).unwrap();
        let custom = ExtendedValue::with_variant(TIMESTAMP, -1, &b"\x00\x00\x00\x01"[..]).unwrap();

        assert_eq!(plain.type_code(), custom.type_code());
        assert_eq!(plain.data(), custom.data());
        assert!(!plain.equals(&custom));
        assert!(!custom.equals(&plain));
        assert_eq!(custom.variant().name(), "timestamp");
    }

    #[test]
    fn test_custom_variant_named_plain_is_distinct() {
        let impostor = Variant::new("plain");
        assert_ne!(impostor, Variant::PLAIN);
        assert_eq!(impostor.name(), Variant::PLAIN.name());
        assert!(Variant::PLAIN.is_plain());
        assert!(!impostor.is_plain());

        let plain = ExtendedValue::new(1, &b"ab"[..]).unwrap();
        let custom = ExtendedValue::with_variant(impostor, 1, &b"ab"[..]).unwrap();
        assert!(!plain.equals(&custom));
    }

    #[test]
    fn test_with_variant_validates_range() {
        let result = ExtendedValue::with_variant(Variant::new("x"), 200, Bytes::new());
        assert!(matches!(result, Err(ExtError::TypeRange { value: 200, .. })));
    }

    #[test]
    fn test_set_type_is_unguarded() {
        let mut value = ExtendedValue::new(1, &b"x"[..]).unwrap();

        assert_eq!(value.set_type(42), 42);
        assert_eq!(value.type_code(), 42);

        // Out-of-range values are stored as-is.
        assert_eq!(value.set_type(1000), 1000);
        assert_eq!(value.type_code(), 1000);
        assert!(matches!(
            value.wire_type(),
            Err(ExtError::TypeRange { value: 1000, .. })
        ));
    }

    #[test]
    fn test_try_set_type_validates() {
        let mut value = ExtendedValue::new(1, &b"x"[..]).unwrap();

        assert_eq!(value.try_set_type(-128).unwrap(), -128);
        assert_eq!(value.type_code(), -128);

        assert!(value.try_set_type(128).is_err());
        assert_eq!(value.type_code(), -128);
    }

    #[test]
    fn test_payload_shares_buffer() {
        let value = ExtendedValue::new(3, vec![7u8; 64]).unwrap();
        let shared = value.payload();
        assert_eq!(shared.as_ptr(), value.data().as_ptr());
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(ExtendedValue::new(5, &b"ab"[..]).unwrap());
        set.insert(ExtendedValue::new(5, &b"ab"[..]).unwrap());
        set.insert(ExtendedValue::new(5, &b"ac"[..]).unwrap());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        let value = ExtendedValue::new(7, &b"abc"[..]).unwrap();
        assert_eq!(value.to_string(), "ext(plain, type=7, 3 bytes)");
    }

    #[test]
    fn test_to_msgpack() {
        let value = ExtendedValue::new(1, &b"aaaa"[..]).unwrap();
        assert_eq!(&value.to_msgpack().unwrap()[..], b"\xd6\x01aaaa");
    }

    #[test]
    fn test_to_wire_rejects_out_of_range_type() {
        let mut value = ExtendedValue::new(1, &b"aa"[..]).unwrap();
        value.set_type(-200);

        let mut packer = Packer::new();
        assert!(matches!(
            value.to_wire(&mut packer),
            Err(ExtError::TypeRange { value: -200, .. })
        ));
        assert!(packer.is_empty());
    }
}

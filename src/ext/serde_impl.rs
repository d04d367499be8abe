//! Serde support for [`ExtendedValue`].
//!
//! `rmp-serde` maps a newtype struct named `_ExtStruct` wrapping an
//! `(i8, bytes)` tuple onto the MessagePack ext family, so an ext value
//! embedded in any serde structure is packed with the same bytes
//! [`Packer`](crate::codec::Packer) produces. Deserialized values are always
//! [`Variant::PLAIN`](super::Variant::PLAIN).

use serde::de::{Deserialize, Deserializer, Error as _};
use serde::ser::{Error as _, Serialize, Serializer};

use super::ExtendedValue;

#[derive(serde::Serialize)]
#[serde(rename = "_ExtStruct")]
struct ExtStructRef<'a>((i8, &'a serde_bytes::Bytes));

#[derive(serde::Deserialize)]
#[serde(rename = "_ExtStruct")]
struct ExtStruct((i8, serde_bytes::ByteBuf));

impl Serialize for ExtendedValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let type_code = self.wire_type().map_err(S::Error::custom)?;
        ExtStructRef((type_code, serde_bytes::Bytes::new(self.data()))).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ExtendedValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ExtStruct((type_code, data)) = ExtStruct::deserialize(deserializer)?;
        ExtendedValue::new(i64::from(type_code), data.into_vec()).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::MsgPackCodec;
    use crate::error::ExtError;
    use crate::ext::Variant;

    #[test]
    fn test_serialize_matches_packer() {
        let value = ExtendedValue::new(1, &b"aa"[..]).unwrap();
        let encoded = MsgPackCodec::encode(&value).unwrap();
        assert_eq!(encoded, b"\xd5\x01aa");
        assert_eq!(&encoded[..], &value.to_msgpack().unwrap()[..]);
    }

    #[test]
    fn test_deserialize_ext() {
        let decoded: ExtendedValue = MsgPackCodec::decode(b"\xc7\x03\xfeabc").unwrap();
        assert_eq!(decoded.type_code(), -2);
        assert_eq!(decoded.data(), b"abc");
        assert_eq!(decoded.variant(), Variant::PLAIN);
    }

    #[test]
    fn test_serialize_out_of_range_fails() {
        let mut value = ExtendedValue::new(1, &b"aa"[..]).unwrap();
        value.set_type(500);
        let result = MsgPackCodec::encode(&value);
        assert!(matches!(result, Err(ExtError::MsgPackEncode(_))));
    }

    #[test]
    fn test_deserialize_non_ext_fails() {
        // fixstr "aa"
        let result: crate::error::Result<ExtendedValue> = MsgPackCodec::decode(b"\xa2aa");
        assert!(result.is_err());
    }
}

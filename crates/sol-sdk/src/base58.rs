//! Base58 text form shared by the fixed-width byte types.
//!
//! Keys, blockhashes and signatures are all rendered as plain Base58 of
//! their raw bytes (Bitcoin alphabet, no checksum).

use crate::error::SdkError;

/// Decode a Base58 string into exactly `N` bytes.
pub(crate) fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], SdkError> {
    // Each Base58 character carries less than 6 bits, so anything longer
    // than this cannot decode to N bytes.
    let max_chars = N * 138 / 100 + 1;
    if s.len() > max_chars {
        return Err(SdkError::InvalidEncoding(format!(
            "{} characters is too long for {N} bytes",
            s.len()
        )));
    }

    let bytes = bs58::decode(s)
        .into_vec()
        .map_err(|e| SdkError::InvalidEncoding(format!("base58 decode failed: {e}")))?;

    bytes.try_into().map_err(|v: Vec<u8>| {
        SdkError::InvalidEncoding(format!("expected {N} bytes, got {}", v.len()))
    })
}

/// Implement `Display`, `Debug`, `FromStr` and serde for a newtype over
/// `[u8; N]` using its Base58 text form.
macro_rules! impl_base58_text {
    ($ty:ident, $len:expr) => {
        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&bs58::encode(&self.0).into_string())
            }
        }

        impl ::std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($ty), self)
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::error::SdkError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $crate::base58::decode_fixed::<$len>(s).map(Self)
            }
        }

        impl ::serde::Serialize for $ty {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                let s = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use impl_base58_text;

//! Account and program addresses.
//!
//! An address is a raw 32-byte Ed25519 public key; its text form is the
//! Base58 encoding of those bytes with no hashing step and no checksum.
//! Programs are addressed exactly like accounts.

use curve25519_dalek::edwards::CompressedEdwardsY;

use crate::base58::impl_base58_text;
use crate::error::SdkError;

/// Size of a public key in bytes.
pub const PUBKEY_BYTES: usize = 32;

/// A 32-byte account or program address.
///
/// Equality and hashing are byte-exact. `PublicKey::default()` is 32 zero
/// bytes, which is the System program's address.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey(pub(crate) [u8; PUBKEY_BYTES]);

impl_base58_text!(PublicKey, PUBKEY_BYTES);

impl PublicKey {
    pub const fn new_from_array(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// Build a key from a slice that must be exactly 32 bytes long.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, SdkError> {
        let arr: [u8; PUBKEY_BYTES] =
            bytes.try_into().map_err(|_| SdkError::InvalidKeyLength {
                expected: PUBKEY_BYTES,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Parse the Base58 text form.
    pub fn from_base58(s: &str) -> Result<Self, SdkError> {
        s.parse()
    }

    pub fn to_base58(&self) -> String {
        self.to_string()
    }

    pub const fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    pub const fn as_array(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    /// Whether these bytes decompress to a point on the Ed25519 curve.
    ///
    /// Uses the same point-decompression rule as signature verification, so
    /// an off-curve key provably has no corresponding private key.
    pub fn is_on_curve(&self) -> bool {
        CompressedEdwardsY(self.0).decompress().is_some()
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; PUBKEY_BYTES]> for PublicKey {
    fn from(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = SdkError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_slice(bytes)
    }
}

/// Validate an address string.
///
/// Returns `Ok(true)` for Base58 text that decodes to exactly 32 bytes, or
/// the decoding error otherwise.
pub fn validate_address(address: &str) -> Result<bool, SdkError> {
    PublicKey::from_base58(address).map(|_| true)
}

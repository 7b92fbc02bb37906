use crate::base58::impl_base58_text;

/// Size of a blockhash in bytes.
pub const HASH_BYTES: usize = 32;

/// A 32-byte recent blockhash, as returned by the network.
///
/// The core never checks its age; a stale hash is rejected remotely.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hash(pub(crate) [u8; HASH_BYTES]);

impl_base58_text!(Hash, HASH_BYTES);

impl Hash {
    pub const fn new_from_array(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; HASH_BYTES] {
        self.0
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_BYTES]> for Hash {
    fn from(bytes: [u8; HASH_BYTES]) -> Self {
        Self::new_from_array(bytes)
    }
}

use ed25519_dalek::VerifyingKey;

use crate::base58::impl_base58_text;
use crate::pubkey::PublicKey;

/// Size of an Ed25519 signature in bytes.
pub const SIGNATURE_BYTES: usize = 64;

/// A 64-byte Ed25519 signature.
///
/// Within a transaction a signature is bound by position to the signer key
/// at the same index of the message's account table.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub(crate) [u8; SIGNATURE_BYTES]);

impl_base58_text!(Signature, SIGNATURE_BYTES);

impl Default for Signature {
    fn default() -> Self {
        Self([0u8; SIGNATURE_BYTES])
    }
}

impl Signature {
    pub const fn new_from_array(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; SIGNATURE_BYTES] {
        self.0
    }

    /// Strict Ed25519 verification of `message` against `pubkey`.
    ///
    /// Returns `false` for off-curve keys as well as bad signatures.
    pub fn verify(&self, pubkey: &PublicKey, message: &[u8]) -> bool {
        let Ok(vk) = VerifyingKey::from_bytes(pubkey.as_array()) else {
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(&self.0);
        vk.verify_strict(message, &sig).is_ok()
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; SIGNATURE_BYTES]> for Signature {
    fn from(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self::new_from_array(bytes)
    }
}

impl From<ed25519_dalek::Signature> for Signature {
    fn from(sig: ed25519_dalek::Signature) -> Self {
        Self(sig.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer as _, SigningKey};

    #[test]
    fn verify_accepts_matching_key() {
        let signing_key = SigningKey::from_bytes(&[0x42u8; 32]);
        let pubkey = PublicKey::from(signing_key.verifying_key().to_bytes());
        let sig = Signature::from(signing_key.sign(b"hello"));
        assert!(sig.verify(&pubkey, b"hello"));
        assert!(!sig.verify(&pubkey, b"hellO"));
    }

    #[test]
    fn verify_rejects_off_curve_key() {
        let sig = Signature::default();
        assert!(!sig.verify(&PublicKey::from([0x02u8; 32]), b"msg"));
    }

    #[test]
    fn text_roundtrip() {
        let sig = Signature::new_from_array([0x5au8; 64]);
        let parsed: Signature = sig.to_string().parse().unwrap();
        assert_eq!(parsed, sig);
        assert_eq!(parsed.to_bytes(), [0x5au8; 64]);
    }
}

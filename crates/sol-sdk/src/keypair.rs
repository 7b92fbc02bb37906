//! Ed25519 key pairs.
//!
//! The 64-byte secret layout is the conventional one: a 32-byte seed
//! followed by the 32-byte public key derived from it.

use ed25519_dalek::{Signer as _, SigningKey};
use zeroize::Zeroize;

use crate::error::SdkError;
use crate::pubkey::PublicKey;
use crate::signature::Signature;
use crate::signer::Signer;

/// Size of the raw key-pair secret in bytes.
pub const KEYPAIR_BYTES: usize = 64;

/// A caller-owned Ed25519 key pair. Key material is zeroed on drop.
pub struct Keypair(SigningKey);

impl Keypair {
    /// Load a key pair from its 64-byte secret.
    ///
    /// The trailing 32 bytes must be the public key of the leading seed.
    pub fn from_bytes(secret: &[u8]) -> Result<Self, SdkError> {
        if secret.len() != KEYPAIR_BYTES {
            return Err(SdkError::InvalidKeyLength {
                expected: KEYPAIR_BYTES,
                actual: secret.len(),
            });
        }

        let mut buf = [0u8; KEYPAIR_BYTES];
        buf.copy_from_slice(secret);
        let result = SigningKey::from_keypair_bytes(&buf);
        buf.zeroize();

        result
            .map(Self)
            .map_err(|e| SdkError::InvalidKeypair(e.to_string()))
    }

    /// Derive a key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut seed = *seed;
        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Self(signing_key)
    }

    /// Load a key pair from the Base58 text of its 64-byte secret.
    pub fn from_base58_string(s: &str) -> Result<Self, SdkError> {
        let mut bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| SdkError::InvalidEncoding(format!("base58 decode failed: {e}")))?;
        let result = Self::from_bytes(&bytes);
        bytes.zeroize();
        result
    }

    pub fn to_bytes(&self) -> [u8; KEYPAIR_BYTES] {
        self.0.to_keypair_bytes()
    }

    pub fn pubkey(&self) -> PublicKey {
        PublicKey::from(self.0.verifying_key().to_bytes())
    }

    /// Sign arbitrary bytes. Ed25519 signing is deterministic.
    pub fn sign_message(&self, message: &[u8]) -> Signature {
        Signature::from(self.0.sign(message))
    }
}

impl Signer for Keypair {
    fn pubkey(&self) -> PublicKey {
        Keypair::pubkey(self)
    }

    fn sign_message(&self, message: &[u8]) -> Signature {
        Keypair::sign_message(self, message)
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Keypair").field(&self.pubkey()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE_SECRET: [u8; 64] = [
        61, 103, 131, 192, 166, 221, 206, 161, 9, 35, 0, 68, 42, 71, 136, 199, 24, 39, 146, 179,
        140, 139, 58, 149, 172, 52, 81, 3, 205, 236, 212, 77, 108, 177, 196, 22, 17, 53, 254, 10,
        102, 110, 46, 250, 91, 28, 21, 184, 202, 194, 206, 0, 15, 147, 229, 224, 198, 197, 133,
        147, 200, 177, 40, 246,
    ];

    #[test]
    fn from_bytes_recovers_pubkey() {
        let kp = Keypair::from_bytes(&ALICE_SECRET).unwrap();
        assert_eq!(
            kp.pubkey().to_string(),
            "8KJFQsdnPyzVYtazr6YFjXHDiWpHh151yudd7BJL1e7P"
        );
    }

    #[test]
    fn from_bytes_wrong_length() {
        assert_eq!(
            Keypair::from_bytes(&ALICE_SECRET[..32]).unwrap_err(),
            SdkError::InvalidKeyLength {
                expected: 64,
                actual: 32
            }
        );
    }

    #[test]
    fn from_bytes_mismatched_public_half() {
        let mut secret = ALICE_SECRET;
        secret[63] ^= 0xff;
        assert!(matches!(
            Keypair::from_bytes(&secret),
            Err(SdkError::InvalidKeypair(_))
        ));
    }

    #[test]
    fn to_bytes_roundtrip() {
        let kp = Keypair::from_bytes(&ALICE_SECRET).unwrap();
        assert_eq!(kp.to_bytes(), ALICE_SECRET);
    }

    #[test]
    fn from_seed_matches_from_bytes() {
        let seed: [u8; 32] = ALICE_SECRET[..32].try_into().unwrap();
        let kp = Keypair::from_seed(&seed);
        assert_eq!(kp.to_bytes(), ALICE_SECRET);
    }

    #[test]
    fn from_base58_string_roundtrip() {
        let text = bs58::encode(ALICE_SECRET).into_string();
        let kp = Keypair::from_base58_string(&text).unwrap();
        assert_eq!(kp.to_bytes(), ALICE_SECRET);
    }

    #[test]
    fn signing_is_deterministic_and_verifies() {
        let kp = Keypair::from_seed(&[0x55u8; 32]);
        let a = kp.sign_message(b"payload");
        let b = kp.sign_message(b"payload");
        assert_eq!(a, b);
        assert!(a.verify(&kp.pubkey(), b"payload"));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = Keypair::from_bytes(&ALICE_SECRET).unwrap();
        let debug = format!("{kp:?}");
        assert!(debug.contains("8KJFQsdnPyzVYtazr6YFjXHDiWpHh151yudd7BJL1e7P"));
        assert!(!debug.contains("61, 103"));
    }
}

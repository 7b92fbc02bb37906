//! Signing seam and signature collection.

use log::{debug, trace};

use crate::error::SdkError;
use crate::pubkey::PublicKey;
use crate::signature::Signature;

/// Anything that can produce an Ed25519 signature for one public key.
///
/// [`Keypair`](crate::keypair::Keypair) is the in-process implementation;
/// hardware or remote signers plug in here.
pub trait Signer {
    fn pubkey(&self) -> PublicKey;
    fn sign_message(&self, message: &[u8]) -> Signature;
}

impl<T: Signer + ?Sized> Signer for &T {
    fn pubkey(&self) -> PublicKey {
        (**self).pubkey()
    }

    fn sign_message(&self, message: &[u8]) -> Signature {
        (**self).sign_message(message)
    }
}

/// Produce one signature per required signer, in `signer_keys` order.
///
/// Every required key must be matched by one of `available` before any
/// signing happens; the first absent key fails the whole call with
/// [`SdkError::MissingSigner`]. Extra available signers are ignored.
pub fn sign_message_bytes(
    message_bytes: &[u8],
    signer_keys: &[PublicKey],
    available: &[&dyn Signer],
) -> Result<Vec<Signature>, SdkError> {
    let mut matched = Vec::with_capacity(signer_keys.len());
    for key in signer_keys {
        let signer = available
            .iter()
            .find(|s| s.pubkey() == *key)
            .ok_or(SdkError::MissingSigner(*key))?;
        matched.push(*signer);
    }

    let signatures: Vec<Signature> = matched
        .iter()
        .map(|signer| {
            let sig = signer.sign_message(message_bytes);
            trace!("signed message for {}", signer.pubkey());
            sig
        })
        .collect();

    debug!(
        "produced {} signature(s) over {} message bytes",
        signatures.len(),
        message_bytes.len()
    );
    Ok(signatures)
}

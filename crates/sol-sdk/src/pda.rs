//! Program derived addresses.
//!
//! A program derived address (PDA) is
//! `SHA-256(seed_0 || ... || seed_n || program_id || "ProgramDerivedAddress")`
//! accepted only when the digest is NOT a valid Ed25519 point, so no private
//! key can exist for it. [`find_program_address`] appends a one-byte bump
//! seed, searching from 255 down to 0 for the first off-curve candidate.

use log::{debug, trace};
use sha2::{Digest, Sha256};

use crate::error::SdkError;
use crate::pubkey::{PublicKey, PUBKEY_BYTES};

/// Maximum number of seeds, bump included.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed in bytes.
pub const MAX_SEED_LEN: usize = 32;

/// Literal appended to every PDA hash input.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Derive a program address from `seeds` and `program_id`.
///
/// Fails with [`SdkError::InvalidSeeds`] when the digest lies on the curve.
pub fn create_program_address(
    seeds: &[&[u8]],
    program_id: &PublicKey,
) -> Result<PublicKey, SdkError> {
    if seeds.len() > MAX_SEEDS {
        return Err(SdkError::TooManySeeds(seeds.len()));
    }
    for (index, seed) in seeds.iter().enumerate() {
        if seed.len() > MAX_SEED_LEN {
            return Err(SdkError::SeedTooLong {
                index,
                len: seed.len(),
            });
        }
    }

    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id);
    hasher.update(PDA_MARKER);

    let hash: [u8; PUBKEY_BYTES] = hasher.finalize().into();
    let candidate = PublicKey::from(hash);

    if candidate.is_on_curve() {
        return Err(SdkError::InvalidSeeds);
    }

    Ok(candidate)
}

/// Find the first valid program address for `seeds`, trying bump seeds
/// from 255 down to 0.
///
/// Returns the address together with the bump that produced it. Seed limit
/// violations are reported immediately rather than retried.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &PublicKey,
) -> Result<(PublicKey, u8), SdkError> {
    let found = search_bump(|bump| {
        let bump_seed = [bump];
        let mut seeds_with_bump = seeds.to_vec();
        seeds_with_bump.push(&bump_seed);
        create_program_address(&seeds_with_bump, program_id)
    })?;

    debug!(
        "found program address {} with bump {} under {program_id}",
        found.0, found.1
    );
    Ok(found)
}

fn search_bump<F>(mut attempt: F) -> Result<(PublicKey, u8), SdkError>
where
    F: FnMut(u8) -> Result<PublicKey, SdkError>,
{
    for bump in (0..=u8::MAX).rev() {
        match attempt(bump) {
            Ok(address) => return Ok((address, bump)),
            Err(SdkError::InvalidSeeds) => trace!("bump {bump} lands on the curve"),
            Err(e) => return Err(e),
        }
    }

    Err(SdkError::NoViableBumpSeed)
}

/// Derive an address from a base key, a text seed and an owning program:
/// `SHA-256(base || seed || owner)`.
///
/// The result is not checked against the curve. Owners whose trailing bytes
/// spell the PDA marker are refused, since they could forge program
/// addresses.
pub fn create_with_seed(
    base: &PublicKey,
    seed: &str,
    owner: &PublicKey,
) -> Result<PublicKey, SdkError> {
    if seed.len() > MAX_SEED_LEN {
        return Err(SdkError::SeedTooLong {
            index: 0,
            len: seed.len(),
        });
    }

    if owner.as_ref().ends_with(PDA_MARKER) {
        return Err(SdkError::IllegalOwner);
    }

    let hash: [u8; PUBKEY_BYTES] = Sha256::new()
        .chain_update(base)
        .chain_update(seed.as_bytes())
        .chain_update(owner)
        .finalize()
        .into();

    Ok(PublicKey::from(hash))
}

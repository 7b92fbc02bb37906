//! Token Metadata program addresses.

use sol_sdk::{find_program_address, PublicKey};

use crate::error::ProgramError;
use crate::ids::TOKEN_METADATA_PROGRAM_ID;

const METADATA_PREFIX: &[u8] = b"metadata";

/// Metadata account for `mint`: the program address of
/// `["metadata", metadata_program_id, mint]`.
pub fn find_metadata_address(mint: &PublicKey) -> Result<(PublicKey, u8), ProgramError> {
    Ok(find_program_address(
        &[METADATA_PREFIX, TOKEN_METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &TOKEN_METADATA_PROGRAM_ID,
    )?)
}

//! Associated Token Account program.
//!
//! The associated token account for a wallet and mint is the program address
//! derived from `[wallet, token_program_id, mint]` under the ATA program.

use log::debug;
use sol_sdk::{find_program_address, AccountMeta, Instruction, PublicKey};

use crate::error::ProgramError;
use crate::ids::{ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, SYSVAR_RENT_ID, TOKEN_PROGRAM_ID};

/// Derive the associated token account address for `wallet` and `mint`,
/// together with its bump seed.
pub fn find_associated_token_address(
    wallet: &PublicKey,
    mint: &PublicKey,
) -> Result<(PublicKey, u8), ProgramError> {
    let found = find_program_address(
        &[wallet.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )?;
    debug!("associated token account for {wallet} / {mint}: {}", found.0);
    Ok(found)
}

/// Create the associated token account of `wallet` for `mint`, paid for by
/// `funder`. Returns the instruction and the address it will create.
pub fn create_associated_token_account(
    funder: &PublicKey,
    wallet: &PublicKey,
    mint: &PublicKey,
) -> Result<(Instruction, PublicKey), ProgramError> {
    let (associated, _bump) = find_associated_token_address(wallet, mint)?;

    let ix = Instruction::new(
        ASSOCIATED_TOKEN_PROGRAM_ID,
        vec![
            AccountMeta::new(*funder, true),
            AccountMeta::new(associated, false),
            AccountMeta::new_readonly(*wallet, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSVAR_RENT_ID, false),
        ],
        Vec::new(),
    );
    Ok((ix, associated))
}

//! SPL Token instructions.
//!
//! Data is a 1-byte discriminant followed by little-endian fields. Builders
//! that act on behalf of an authority accept a list of multisig signers: when
//! the list is empty the authority itself signs, otherwise the authority is a
//! multisig account and each listed key signs in its place.

use sol_sdk::{AccountMeta, Instruction, PublicKey};

use crate::error::ProgramError;
use crate::ids::{SYSVAR_RENT_ID, TOKEN_PROGRAM_ID};

/// Packed size of a mint account.
pub const MINT_ACCOUNT_SIZE: u64 = 82;
/// Packed size of a token account.
pub const TOKEN_ACCOUNT_SIZE: u64 = 165;
/// Packed size of a multisig account.
pub const MULTISIG_ACCOUNT_SIZE: u64 = 355;

/// Most signers a multisig account can hold.
pub const MAX_SIGNERS: usize = 11;

const INITIALIZE_MINT: u8 = 0;
const INITIALIZE_ACCOUNT: u8 = 1;
const INITIALIZE_MULTISIG: u8 = 2;
const TRANSFER: u8 = 3;
const APPROVE: u8 = 4;
const REVOKE: u8 = 5;
const SET_AUTHORITY: u8 = 6;
const MINT_TO: u8 = 7;
const BURN: u8 = 8;
const CLOSE_ACCOUNT: u8 = 9;
const FREEZE_ACCOUNT: u8 = 10;
const THAW_ACCOUNT: u8 = 11;
const TRANSFER_CHECKED: u8 = 12;
const APPROVE_CHECKED: u8 = 13;
const MINT_TO_CHECKED: u8 = 14;
const BURN_CHECKED: u8 = 15;
const INITIALIZE_ACCOUNT2: u8 = 16;
const SYNC_NATIVE: u8 = 17;

/// Which authority a [`set_authority`] call replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AuthorityType {
    MintTokens = 0,
    FreezeAccount = 1,
    AccountOwner = 2,
    CloseAccount = 3,
}

// ---------------------------------------------------------------------------
// Encoding helpers
// ---------------------------------------------------------------------------

fn amount_data(tag: u8, amount: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(9);
    data.push(tag);
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

fn checked_amount_data(tag: u8, amount: u64, decimals: u8) -> Vec<u8> {
    let mut data = amount_data(tag, amount);
    data.push(decimals);
    data
}

/// `COption<Pubkey>` packing: `0` for none, `1 ++ key` for some.
fn push_optional_key(data: &mut Vec<u8>, key: Option<&PublicKey>) {
    match key {
        Some(key) => {
            data.push(1);
            data.extend_from_slice(key.as_ref());
        }
        None => data.push(0),
    }
}

/// Append `authority` and, for a multisig authority, its signers.
fn push_authority(accounts: &mut Vec<AccountMeta>, authority: &PublicKey, signers: &[PublicKey]) {
    accounts.push(AccountMeta::new_readonly(*authority, signers.is_empty()));
    accounts.extend(signers.iter().map(|s| AccountMeta::new_readonly(*s, true)));
}

fn with_authority(
    mut accounts: Vec<AccountMeta>,
    authority: &PublicKey,
    signers: &[PublicKey],
    data: Vec<u8>,
) -> Instruction {
    accounts.reserve(1 + signers.len());
    push_authority(&mut accounts, authority, signers);
    Instruction::new(TOKEN_PROGRAM_ID, accounts, data)
}

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

/// Initialize `mint` with `decimals` and its authorities.
pub fn initialize_mint(
    mint: &PublicKey,
    decimals: u8,
    mint_authority: &PublicKey,
    freeze_authority: Option<&PublicKey>,
) -> Instruction {
    let mut data = Vec::with_capacity(2 + 32 + 33);
    data.push(INITIALIZE_MINT);
    data.push(decimals);
    data.extend_from_slice(mint_authority.as_ref());
    push_optional_key(&mut data, freeze_authority);

    Instruction::new(
        TOKEN_PROGRAM_ID,
        vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(SYSVAR_RENT_ID, false),
        ],
        data,
    )
}

/// Initialize a token `account` for `mint`, owned by `owner`.
pub fn initialize_account(account: &PublicKey, mint: &PublicKey, owner: &PublicKey) -> Instruction {
    Instruction::new(
        TOKEN_PROGRAM_ID,
        vec![
            AccountMeta::new(*account, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(SYSVAR_RENT_ID, false),
        ],
        vec![INITIALIZE_ACCOUNT],
    )
}

/// Like [`initialize_account`], but the owner travels in the data instead of
/// the account list.
pub fn initialize_account2(
    account: &PublicKey,
    mint: &PublicKey,
    owner: &PublicKey,
) -> Instruction {
    let mut data = Vec::with_capacity(33);
    data.push(INITIALIZE_ACCOUNT2);
    data.extend_from_slice(owner.as_ref());

    Instruction::new(
        TOKEN_PROGRAM_ID,
        vec![
            AccountMeta::new(*account, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSVAR_RENT_ID, false),
        ],
        data,
    )
}

/// Initialize an `m`-of-`signers.len()` multisig account.
///
/// The signer keys are only recorded here, so they are listed read-only and
/// do not sign.
pub fn initialize_multisig(
    multisig: &PublicKey,
    signers: &[PublicKey],
    m: u8,
) -> Result<Instruction, ProgramError> {
    if signers.is_empty() || signers.len() > MAX_SIGNERS {
        return Err(ProgramError::InvalidMultisig(format!(
            "signer count {} outside 1..={MAX_SIGNERS}",
            signers.len()
        )));
    }
    if m == 0 || usize::from(m) > signers.len() {
        return Err(ProgramError::InvalidMultisig(format!(
            "m = {m} with {} signers",
            signers.len()
        )));
    }

    let mut accounts = Vec::with_capacity(2 + signers.len());
    accounts.push(AccountMeta::new(*multisig, false));
    accounts.push(AccountMeta::new_readonly(SYSVAR_RENT_ID, false));
    accounts.extend(signers.iter().map(|s| AccountMeta::new_readonly(*s, false)));

    Ok(Instruction::new(
        TOKEN_PROGRAM_ID,
        accounts,
        vec![INITIALIZE_MULTISIG, m],
    ))
}

// ---------------------------------------------------------------------------
// Transfers and delegation
// ---------------------------------------------------------------------------

/// Move `amount` base units from `source` to `destination`.
pub fn transfer(
    source: &PublicKey,
    destination: &PublicKey,
    authority: &PublicKey,
    signers: &[PublicKey],
    amount: u64,
) -> Instruction {
    with_authority(
        vec![
            AccountMeta::new(*source, false),
            AccountMeta::new(*destination, false),
        ],
        authority,
        signers,
        amount_data(TRANSFER, amount),
    )
}

/// [`transfer`] that also asserts the mint and its decimals.
pub fn transfer_checked(
    source: &PublicKey,
    mint: &PublicKey,
    destination: &PublicKey,
    authority: &PublicKey,
    signers: &[PublicKey],
    amount: u64,
    decimals: u8,
) -> Instruction {
    with_authority(
        vec![
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*destination, false),
        ],
        authority,
        signers,
        checked_amount_data(TRANSFER_CHECKED, amount, decimals),
    )
}

/// Let `delegate` move up to `amount` from `source`.
pub fn approve(
    source: &PublicKey,
    delegate: &PublicKey,
    authority: &PublicKey,
    signers: &[PublicKey],
    amount: u64,
) -> Instruction {
    with_authority(
        vec![
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*delegate, false),
        ],
        authority,
        signers,
        amount_data(APPROVE, amount),
    )
}

pub fn approve_checked(
    source: &PublicKey,
    mint: &PublicKey,
    delegate: &PublicKey,
    authority: &PublicKey,
    signers: &[PublicKey],
    amount: u64,
    decimals: u8,
) -> Instruction {
    with_authority(
        vec![
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(*delegate, false),
        ],
        authority,
        signers,
        checked_amount_data(APPROVE_CHECKED, amount, decimals),
    )
}

/// Clear the delegate of `source`.
pub fn revoke(source: &PublicKey, authority: &PublicKey, signers: &[PublicKey]) -> Instruction {
    with_authority(
        vec![AccountMeta::new(*source, false)],
        authority,
        signers,
        vec![REVOKE],
    )
}

/// Replace (or with `None`, permanently remove) one authority of `owned`.
///
/// Removing the `MintTokens` authority fixes the supply for good.
pub fn set_authority(
    owned: &PublicKey,
    new_authority: Option<&PublicKey>,
    authority_type: AuthorityType,
    authority: &PublicKey,
    signers: &[PublicKey],
) -> Instruction {
    let mut data = Vec::with_capacity(3 + 32);
    data.push(SET_AUTHORITY);
    data.push(authority_type as u8);
    push_optional_key(&mut data, new_authority);

    with_authority(
        vec![AccountMeta::new(*owned, false)],
        authority,
        signers,
        data,
    )
}

// ---------------------------------------------------------------------------
// Supply
// ---------------------------------------------------------------------------

pub fn mint_to(
    mint: &PublicKey,
    destination: &PublicKey,
    authority: &PublicKey,
    signers: &[PublicKey],
    amount: u64,
) -> Instruction {
    with_authority(
        vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new(*destination, false),
        ],
        authority,
        signers,
        amount_data(MINT_TO, amount),
    )
}

pub fn mint_to_checked(
    mint: &PublicKey,
    destination: &PublicKey,
    authority: &PublicKey,
    signers: &[PublicKey],
    amount: u64,
    decimals: u8,
) -> Instruction {
    with_authority(
        vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new(*destination, false),
        ],
        authority,
        signers,
        checked_amount_data(MINT_TO_CHECKED, amount, decimals),
    )
}

pub fn burn(
    account: &PublicKey,
    mint: &PublicKey,
    authority: &PublicKey,
    signers: &[PublicKey],
    amount: u64,
) -> Instruction {
    with_authority(
        vec![AccountMeta::new(*account, false), AccountMeta::new(*mint, false)],
        authority,
        signers,
        amount_data(BURN, amount),
    )
}

pub fn burn_checked(
    account: &PublicKey,
    mint: &PublicKey,
    authority: &PublicKey,
    signers: &[PublicKey],
    amount: u64,
    decimals: u8,
) -> Instruction {
    with_authority(
        vec![AccountMeta::new(*account, false), AccountMeta::new(*mint, false)],
        authority,
        signers,
        checked_amount_data(BURN_CHECKED, amount, decimals),
    )
}

// ---------------------------------------------------------------------------
// Account lifecycle
// ---------------------------------------------------------------------------

/// Close `account`, sending its lamports to `destination`.
pub fn close_account(
    account: &PublicKey,
    destination: &PublicKey,
    authority: &PublicKey,
    signers: &[PublicKey],
) -> Instruction {
    with_authority(
        vec![
            AccountMeta::new(*account, false),
            AccountMeta::new(*destination, false),
        ],
        authority,
        signers,
        vec![CLOSE_ACCOUNT],
    )
}

pub fn freeze_account(
    account: &PublicKey,
    mint: &PublicKey,
    authority: &PublicKey,
    signers: &[PublicKey],
) -> Instruction {
    with_authority(
        vec![
            AccountMeta::new(*account, false),
            AccountMeta::new_readonly(*mint, false),
        ],
        authority,
        signers,
        vec![FREEZE_ACCOUNT],
    )
}

pub fn thaw_account(
    account: &PublicKey,
    mint: &PublicKey,
    authority: &PublicKey,
    signers: &[PublicKey],
) -> Instruction {
    with_authority(
        vec![
            AccountMeta::new(*account, false),
            AccountMeta::new_readonly(*mint, false),
        ],
        authority,
        signers,
        vec![THAW_ACCOUNT],
    )
}

/// Bring a wrapped-SOL account's token amount in line with its lamports.
pub fn sync_native(account: &PublicKey) -> Instruction {
    Instruction::new(
        TOKEN_PROGRAM_ID,
        vec![AccountMeta::new(*account, false)],
        vec![SYNC_NATIVE],
    )
}

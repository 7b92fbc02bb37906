//! System Program instructions.
//!
//! Every System instruction starts with a u32 LE discriminant followed by
//! fixed-width little-endian fields.

use sol_sdk::{AccountMeta, Instruction, PublicKey};

use crate::ids::SYSTEM_PROGRAM_ID;

const CREATE_ACCOUNT: u32 = 0;
const ASSIGN: u32 = 1;
const TRANSFER: u32 = 2;
const CREATE_ACCOUNT_WITH_SEED: u32 = 3;
const ALLOCATE: u32 = 8;

fn data_with_tag(tag: u32, capacity: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + capacity);
    data.extend_from_slice(&tag.to_le_bytes());
    data
}

/// Move `lamports` from `from` (signer) to `to`.
///
/// Data: `[2, 0, 0, 0] ++ lamports (u64 LE)`, 12 bytes.
pub fn transfer(from: &PublicKey, to: &PublicKey, lamports: u64) -> Instruction {
    let mut data = data_with_tag(TRANSFER, 8);
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction::new(
        SYSTEM_PROGRAM_ID,
        vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data,
    )
}

/// Create `new_account`, fund it with `lamports`, reserve `space` bytes and
/// hand it to `owner`. Both accounts sign.
pub fn create_account(
    from: &PublicKey,
    new_account: &PublicKey,
    lamports: u64,
    space: u64,
    owner: &PublicKey,
) -> Instruction {
    let mut data = data_with_tag(CREATE_ACCOUNT, 8 + 8 + 32);
    data.extend_from_slice(&lamports.to_le_bytes());
    data.extend_from_slice(&space.to_le_bytes());
    data.extend_from_slice(owner.as_ref());

    Instruction::new(
        SYSTEM_PROGRAM_ID,
        vec![
            AccountMeta::new(*from, true),
            AccountMeta::new(*new_account, true),
        ],
        data,
    )
}

/// Like [`create_account`], but the new address is
/// `create_with_seed(base, seed, owner)` and only `base` has to sign.
///
/// `to` must be that derived address; the program recomputes and checks it.
pub fn create_account_with_seed(
    from: &PublicKey,
    to: &PublicKey,
    base: &PublicKey,
    seed: &str,
    lamports: u64,
    space: u64,
    owner: &PublicKey,
) -> Instruction {
    let mut data = data_with_tag(CREATE_ACCOUNT_WITH_SEED, 32 + 8 + seed.len() + 8 + 8 + 32);
    data.extend_from_slice(base.as_ref());
    data.extend_from_slice(&(seed.len() as u64).to_le_bytes());
    data.extend_from_slice(seed.as_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    data.extend_from_slice(&space.to_le_bytes());
    data.extend_from_slice(owner.as_ref());

    let mut accounts = vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)];
    if base != from {
        accounts.push(AccountMeta::new_readonly(*base, true));
    }

    Instruction::new(SYSTEM_PROGRAM_ID, accounts, data)
}

/// Reassign `account` to `owner`.
pub fn assign(account: &PublicKey, owner: &PublicKey) -> Instruction {
    let mut data = data_with_tag(ASSIGN, 32);
    data.extend_from_slice(owner.as_ref());

    Instruction::new(
        SYSTEM_PROGRAM_ID,
        vec![AccountMeta::new(*account, true)],
        data,
    )
}

/// Reserve `space` bytes of data in `account`.
pub fn allocate(account: &PublicKey, space: u64) -> Instruction {
    let mut data = data_with_tag(ALLOCATE, 8);
    data.extend_from_slice(&space.to_le_bytes());

    Instruction::new(
        SYSTEM_PROGRAM_ID,
        vec![AccountMeta::new(*account, true)],
        data,
    )
}

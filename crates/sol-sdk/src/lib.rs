//! Client-side transaction toolkit for Solana.
//!
//! Compiles logical instructions into the canonical message layout, signs
//! it, serializes the wire bytes, and derives program addresses, all without
//! pulling in `solana-sdk`. Signing uses `ed25519-dalek`, the on-curve test
//! uses `curve25519-dalek`, and text forms use `bs58`.
//!
//! Every operation is a pure function of its arguments: no I/O, no shared
//! state, no embedded key material.

pub mod account_table;
mod base58;
pub mod cluster;
pub mod compact;
pub mod error;
pub mod hash;
pub mod instruction;
pub mod keypair;
pub mod message;
pub mod pda;
pub mod pubkey;
pub mod signature;
pub mod signer;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use account_table::AccountTable;
pub use cluster::{all_clusters, cluster_by_name, Cluster};
pub use compact::{decode_compact_u16, encode_compact_u16};
pub use error::SdkError;
pub use hash::Hash;
pub use instruction::{AccountMeta, CompiledInstruction, Instruction};
pub use keypair::Keypair;
pub use message::{Message, MessageHeader};
pub use pda::{create_program_address, create_with_seed, find_program_address};
pub use pubkey::{validate_address, PublicKey};
pub use signature::Signature;
pub use signer::Signer;
pub use transaction::{
    create_raw_transaction, sign_raw_transaction, Transaction, TransactionParams,
};

use thiserror::Error;

use crate::pubkey::PublicKey;

/// Errors produced while encoding, deriving, compiling or signing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid keypair: {0}")]
    InvalidKeypair(String),

    #[error("seed {index} is {len} bytes, longer than the 32 byte maximum")]
    SeedTooLong { index: usize, len: usize },

    #[error("too many seeds: {0} (maximum 16)")]
    TooManySeeds(usize),

    #[error("derived address lies on the ed25519 curve")]
    InvalidSeeds,

    #[error("no bump seed yields an off-curve address")]
    NoViableBumpSeed,

    #[error("owner ends with the program derived address marker")]
    IllegalOwner,

    #[error("malformed compact length")]
    MalformedLength,

    #[error("length {0} does not fit a compact-u16 prefix")]
    LengthOverflow(usize),

    #[error("account table too large: {count} {class}")]
    TableTooLarge { class: &'static str, count: usize },

    #[error("missing signer: {0}")]
    MissingSigner(PublicKey),

    #[error("key {0} is not a required signer")]
    UnexpectedSigner(PublicKey),

    #[error("malformed transaction: {0}")]
    MalformedTransaction(String),
}

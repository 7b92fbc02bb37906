use sol_sdk::SdkError;
use thiserror::Error;

/// Errors raised while building program instructions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("invalid multisig: {0}")]
    InvalidMultisig(String),

    #[error(transparent)]
    Sdk(#[from] SdkError),
}

//! Instruction builders for the programs a wallet talks to most: System,
//! SPL Token, Associated Token Account and Token Metadata.
//!
//! Builders only produce [`sol_sdk::Instruction`] values; compiling and
//! signing them is `sol_sdk`'s job.

pub mod associated_token;
pub mod error;
pub mod ids;
pub mod system;
pub mod token;
pub mod token_metadata;

pub use associated_token::{create_associated_token_account, find_associated_token_address};
pub use error::ProgramError;
pub use ids::*;
pub use token_metadata::find_metadata_address;

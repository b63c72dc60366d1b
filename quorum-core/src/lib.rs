pub mod asset;
pub mod command;
pub mod error;
pub mod id;
pub mod proposal;

// Re-export the main types for convenience
pub use asset::Asset;
pub use command::{Command, CommandHash, CommandReceipt, GovernanceEvent};
pub use error::{GovernanceError, QuorumError, StorageError};
pub use id::{AccountId, AssetId, ProposalId};
pub use proposal::{
    GovernanceAction, Proposal, ProposalStatus, ProposalSummary, ACTION_DESTROY_ASSET,
};

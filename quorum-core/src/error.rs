use crate::id::{AccountId, AssetId, ProposalId};
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// A rejected governance call. None of these leave partial state behind.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceError {
    /// The threshold exceeds the number of co-signers at creation
    #[error("Invalid threshold: {required} signatures required but only {signers} co-signers given")]
    InvalidThreshold { required: u32, signers: usize },

    /// The referenced asset has no live record
    #[error("Asset not found: {0}")]
    AssetNotFound(AssetId),

    /// The referenced proposal has no record
    #[error("Proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    /// The caller is neither a co-signer nor the owner of the asset
    #[error("Unauthorized: {account} is neither a co-signer nor the owner of {asset}")]
    Unauthorized { account: AccountId, asset: AssetId },

    /// The asset has an empty co-signer sequence
    #[error("No co-signers registered for {0}")]
    NoSigners(AssetId),

    /// The caller is not the current holder of the asset
    #[error("{account} is not the current holder of {asset}")]
    NotHolder { account: AccountId, asset: AssetId },
}

/// Errors raised while persisting or loading runtime state
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO errors that occur when reading/writing files
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Errors that occur during command journal operations
    #[error("Journal error: {0}")]
    Journal(String),

    /// Malformed or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors that don't fit in other categories
    #[error("Other error: {0}")]
    Other(String),

    /// Anyhow error wrapper for error context
    #[error(transparent)]
    Context(#[from] anyhow::Error),
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<String> for StorageError {
    fn from(err: String) -> Self {
        StorageError::Other(err)
    }
}

impl From<&str> for StorageError {
    fn from(err: &str) -> Self {
        StorageError::Other(err.to_string())
    }
}

/// Error returned by runtime entry points
#[derive(Error, Debug)]
pub enum QuorumError {
    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl QuorumError {
    /// The governance rejection behind this error, if it is one
    pub fn governance(&self) -> Option<&GovernanceError> {
        match self {
            QuorumError::Governance(err) => Some(err),
            QuorumError::Storage(_) => None,
        }
    }
}

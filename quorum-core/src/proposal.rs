use crate::id::{AccountId, AssetId, ProposalId};
use serde::{Deserialize, Serialize};

/// Action code that destroys the target asset
pub const ACTION_DESTROY_ASSET: u32 = 1;

/// The closed set of actions an approved proposal can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GovernanceAction {
    /// Burn the target asset
    DestroyAsset,

    /// A code with no registered action. Approval still succeeds, nothing runs.
    Unrecognized(u32),
}

impl GovernanceAction {
    /// Map a raw action code onto the known actions
    pub fn from_code(code: u32) -> Self {
        match code {
            ACTION_DESTROY_ASSET => GovernanceAction::DestroyAsset,
            other => GovernanceAction::Unrecognized(other),
        }
    }

    /// The raw action code
    pub fn code(&self) -> u32 {
        match self {
            GovernanceAction::DestroyAsset => ACTION_DESTROY_ASSET,
            GovernanceAction::Unrecognized(code) => *code,
        }
    }
}

impl From<u32> for GovernanceAction {
    fn from(code: u32) -> Self {
        GovernanceAction::from_code(code)
    }
}

/// Proposal state. There is no rejected or expired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Waiting for quorum
    Open,
    /// Quorum reached and the action has run. Terminal.
    Approved,
}

/// A recorded request to perform an action on an asset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Proposal {
    /// Unique identifier for the proposal
    pub id: ProposalId,

    /// Co-signer or owner who submitted the proposal
    pub proposer: AccountId,

    /// The asset this proposal governs
    pub target_asset: AssetId,

    /// Raw action code as submitted
    pub action_code: u32,

    /// Opaque parameters interpreted per action
    pub params: Vec<String>,

    /// Flips to true once, when quorum is reached
    pub approved: bool,
}

impl Proposal {
    /// Create an open proposal
    pub fn new(
        id: ProposalId,
        proposer: AccountId,
        target_asset: AssetId,
        action_code: u32,
        params: Vec<String>,
    ) -> Self {
        Self {
            id,
            proposer,
            target_asset,
            action_code,
            params,
            approved: false,
        }
    }

    /// The action this proposal triggers on approval
    pub fn action(&self) -> GovernanceAction {
        GovernanceAction::from_code(self.action_code)
    }

    pub fn status(&self) -> ProposalStatus {
        if self.approved {
            ProposalStatus::Approved
        } else {
            ProposalStatus::Open
        }
    }

    pub fn is_open(&self) -> bool {
        !self.approved
    }

    /// The client-facing projection: proposer, asset, action code, approved
    pub fn summary(&self) -> ProposalSummary {
        ProposalSummary {
            proposer: self.proposer,
            asset: self.target_asset,
            action_code: self.action_code,
            approved: self.approved,
        }
    }
}

/// Read-only view of a proposal returned to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSummary {
    pub proposer: AccountId,
    pub asset: AssetId,
    pub action_code: u32,
    pub approved: bool,
}

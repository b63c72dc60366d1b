use crate::error::{GovernanceError, StorageError};
use crate::id::{AccountId, AssetId, ProposalId};
use crate::proposal::GovernanceAction;
use serde::{Deserialize, Serialize};

/// Command hash type (32-byte array)
pub type CommandHash = [u8; 32];

/// A state-mutating call, together with the account that made it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Mint a new asset owned and held by the caller
    CreateAsset {
        caller: AccountId,
        co_signers: Vec<AccountId>,
        required_signatures: u32,
    },

    /// Raise a proposal against an asset
    SubmitProposal {
        caller: AccountId,
        asset: AssetId,
        action_code: u32,
        params: Vec<String>,
    },

    /// Record the caller's vote on a proposal
    CastVote {
        caller: AccountId,
        proposal: ProposalId,
        approve: bool,
    },

    /// Hand the asset to another holder
    TransferHolder {
        caller: AccountId,
        asset: AssetId,
        to: AccountId,
    },
}

impl Command {
    /// The account issuing the command
    pub fn caller(&self) -> &AccountId {
        match self {
            Command::CreateAsset { caller, .. }
            | Command::SubmitProposal { caller, .. }
            | Command::CastVote { caller, .. }
            | Command::TransferHolder { caller, .. } => caller,
        }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Command::CreateAsset { .. } => "create_asset",
            Command::SubmitProposal { .. } => "submit_proposal",
            Command::CastVote { .. } => "cast_vote",
            Command::TransferHolder { .. } => "transfer_holder",
        }
    }

    /// Hash of the command at a given journal position.
    ///
    /// Rejected commands have no position and hash with `None`.
    pub fn hash(&self, sequence: Option<u64>) -> Result<CommandHash, StorageError> {
        let encoded = bincode::serialize(&(sequence, self))?;
        Ok(*blake3::hash(&encoded).as_bytes())
    }
}

/// Observable effect of an accepted command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    AssetCreated {
        asset: AssetId,
        owner: AccountId,
        co_signers: Vec<AccountId>,
        required_signatures: u32,
    },
    ProposalSubmitted {
        proposal: ProposalId,
        asset: AssetId,
        proposer: AccountId,
        action_code: u32,
    },
    VoteCast {
        proposal: ProposalId,
        asset: AssetId,
        voter: AccountId,
        approve: bool,
        tally: u32,
    },
    ProposalApproved {
        proposal: ProposalId,
        asset: AssetId,
        tally: u32,
    },
    ActionExecuted {
        proposal: ProposalId,
        asset: AssetId,
        action: GovernanceAction,
    },
    AssetDestroyed {
        asset: AssetId,
    },
    HolderTransferred {
        asset: AssetId,
        from: AccountId,
        to: AccountId,
    },
}

impl GovernanceEvent {
    /// The asset this event concerns
    pub fn asset(&self) -> AssetId {
        match self {
            GovernanceEvent::AssetCreated { asset, .. }
            | GovernanceEvent::ProposalSubmitted { asset, .. }
            | GovernanceEvent::VoteCast { asset, .. }
            | GovernanceEvent::ProposalApproved { asset, .. }
            | GovernanceEvent::ActionExecuted { asset, .. }
            | GovernanceEvent::AssetDestroyed { asset }
            | GovernanceEvent::HolderTransferred { asset, .. } => *asset,
        }
    }
}

/// A receipt of a processed command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReceipt {
    /// Hash of the command, see [`Command::hash`]
    pub command_hash: CommandHash,

    /// Journal position, `None` for rejected commands
    pub sequence: Option<u64>,

    /// Whether the command was accepted
    pub success: bool,

    /// The rejection, if the command was not accepted
    pub error: Option<GovernanceError>,

    /// Events emitted by an accepted command, in order
    pub events: Vec<GovernanceEvent>,

    /// Milliseconds since the Unix epoch when the command was processed
    pub timestamp: i64,
}

impl CommandReceipt {
    /// Receipt for an accepted command
    pub fn accepted(
        command_hash: CommandHash,
        sequence: u64,
        events: Vec<GovernanceEvent>,
        timestamp: i64,
    ) -> Self {
        Self {
            command_hash,
            sequence: Some(sequence),
            success: true,
            error: None,
            events,
            timestamp,
        }
    }

    /// Receipt for a rejected command
    pub fn rejected(command_hash: CommandHash, error: GovernanceError, timestamp: i64) -> Self {
        Self {
            command_hash,
            sequence: None,
            success: false,
            error: Some(error),
            events: Vec::new(),
            timestamp,
        }
    }

    /// Whether any event of this receipt concerns the given asset
    pub fn touches_asset(&self, asset: &AssetId) -> bool {
        self.events.iter().any(|event| event.asset() == *asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(approve: bool) -> Command {
        Command::CastVote {
            caller: AccountId::from_seed("voter"),
            proposal: ProposalId(1),
            approve,
        }
    }

    #[test]
    fn test_hash_depends_on_sequence_and_content() {
        let command = vote(true);
        let first = command.hash(Some(1)).unwrap();

        assert_eq!(first, command.hash(Some(1)).unwrap());
        assert_ne!(first, command.hash(Some(2)).unwrap());
        assert_ne!(first, command.hash(None).unwrap());
        assert_ne!(first, vote(false).hash(Some(1)).unwrap());
    }

    #[test]
    fn test_caller_and_kind() {
        let command = vote(true);
        assert_eq!(command.caller(), &AccountId::from_seed("voter"));
        assert_eq!(command.kind(), "cast_vote");
    }

    #[test]
    fn test_receipt_asset_index() {
        let receipt = CommandReceipt::accepted(
            [0u8; 32],
            1,
            vec![GovernanceEvent::AssetDestroyed { asset: AssetId(5) }],
            0,
        );
        assert!(receipt.touches_asset(&AssetId(5)));
        assert!(!receipt.touches_asset(&AssetId(6)));

        let rejected =
            CommandReceipt::rejected([0u8; 32], GovernanceError::AssetNotFound(AssetId(5)), 0);
        assert!(!rejected.success);
        assert!(rejected.sequence.is_none());
        assert!(!rejected.touches_asset(&AssetId(5)));
    }
}

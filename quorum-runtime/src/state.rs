use crate::voting::VotingEngine;
use log::debug;
use quorum_core::asset::Asset;
use quorum_core::command::{Command, GovernanceEvent};
use quorum_core::error::GovernanceError;
use quorum_core::id::{AccountId, AssetId, ProposalId};
use quorum_core::proposal::Proposal;
use quorum_registry::{AssetRegistry, InMemoryAssetRegistry, ProposalStore, VoteLedger};

/// The asset table, proposal table and vote ledger, mutated only through
/// [`GovernanceState::apply`].
#[derive(Debug, Clone)]
pub struct GovernanceState<R: AssetRegistry = InMemoryAssetRegistry> {
    registry: R,
    proposals: ProposalStore,
    votes: VoteLedger,
    engine: VotingEngine,
}

impl Default for GovernanceState<InMemoryAssetRegistry> {
    fn default() -> Self {
        Self::new(InMemoryAssetRegistry::new())
    }
}

impl<R: AssetRegistry> GovernanceState<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            proposals: ProposalStore::new(),
            votes: VoteLedger::new(),
            engine: VotingEngine::default(),
        }
    }

    /// Validate a command against the current state without applying it
    pub fn check(&self, command: &Command) -> Result<(), GovernanceError> {
        match command {
            Command::CreateAsset {
                co_signers,
                required_signatures,
                ..
            } => self.registry.check_create(co_signers, *required_signatures),
            Command::SubmitProposal { caller, asset, .. } => {
                self.proposals.check_submit(&self.registry, caller, asset)
            }
            Command::CastVote {
                caller,
                proposal,
                approve,
            } => self
                .engine
                .check_vote(
                    &self.registry,
                    &self.proposals,
                    &self.votes,
                    proposal,
                    caller,
                    *approve,
                )
                .map(|_| ()),
            Command::TransferHolder { caller, asset, .. } => {
                self.registry.check_transfer(asset, caller)
            }
        }
    }

    /// Apply a command, returning the events it produced.
    ///
    /// On error nothing has changed.
    pub fn apply(&mut self, command: &Command) -> Result<Vec<GovernanceEvent>, GovernanceError> {
        let events = match command {
            Command::CreateAsset {
                caller,
                co_signers,
                required_signatures,
            } => {
                let asset =
                    self.registry
                        .create_asset(*caller, co_signers.clone(), *required_signatures)?;
                vec![GovernanceEvent::AssetCreated {
                    asset,
                    owner: *caller,
                    co_signers: co_signers.clone(),
                    required_signatures: *required_signatures,
                }]
            }
            Command::SubmitProposal {
                caller,
                asset,
                action_code,
                params,
            } => {
                let proposal = self.proposals.submit(
                    &self.registry,
                    *caller,
                    *asset,
                    *action_code,
                    params.clone(),
                )?;
                vec![GovernanceEvent::ProposalSubmitted {
                    proposal,
                    asset: *asset,
                    proposer: *caller,
                    action_code: *action_code,
                }]
            }
            Command::CastVote {
                caller,
                proposal,
                approve,
            } => {
                self.engine
                    .cast_vote(
                        &mut self.registry,
                        &mut self.proposals,
                        &mut self.votes,
                        proposal,
                        caller,
                        *approve,
                    )?
                    .events
            }
            Command::TransferHolder { caller, asset, to } => {
                self.registry.transfer_holder(asset, caller, *to)?;
                vec![GovernanceEvent::HolderTransferred {
                    asset: *asset,
                    from: *caller,
                    to: *to,
                }]
            }
        };

        debug!(
            "Applied {} from {} ({} events)",
            command.kind(),
            command.caller(),
            events.len()
        );
        Ok(events)
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn proposals(&self) -> &ProposalStore {
        &self.proposals
    }

    pub fn votes(&self) -> &VoteLedger {
        &self.votes
    }

    /// Get an asset record, destroyed or not
    pub fn asset(&self, id: &AssetId) -> Result<&Asset, GovernanceError> {
        self.registry
            .get_asset(id)
            .ok_or(GovernanceError::AssetNotFound(*id))
    }

    pub fn proposal(&self, id: &ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals.get(id)
    }

    /// Current qualifying approval count of a proposal
    pub fn tally(&self, id: &ProposalId) -> Result<u32, GovernanceError> {
        self.engine
            .tally(&self.registry, &self.proposals, &self.votes, id)
    }

    /// Latest vote of an account on a proposal
    pub fn vote_of(
        &self,
        id: &ProposalId,
        voter: &AccountId,
    ) -> Result<Option<bool>, GovernanceError> {
        self.proposals.get(id)?;
        Ok(self.votes.vote_of(id, voter))
    }
}

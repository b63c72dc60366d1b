use crate::asset_registry::AssetRegistry;
use crate::membership::MembershipOracle;
use quorum_core::error::GovernanceError;
use quorum_core::id::{AccountId, AssetId, ProposalId};
use quorum_core::proposal::Proposal;
use std::collections::BTreeMap;

/// Append-only store of proposals.
///
/// Proposals are never removed. The only mutation after submission is the
/// one-way approval flag, which is owned by the voting engine.
#[derive(Debug, Clone)]
pub struct ProposalStore {
    proposals: BTreeMap<ProposalId, Proposal>,
    next_id: u64,
}

impl ProposalStore {
    /// Create an empty store. The first proposal gets ID 1.
    pub fn new() -> Self {
        Self {
            proposals: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Validate a submission without touching the store
    ///
    /// # Parameters
    /// * `registry` - The asset registry the proposal targets
    /// * `proposer` - The submitting account
    /// * `asset` - The target asset
    ///
    /// # Returns
    /// `AssetNotFound` if the asset is not live, `Unauthorized` if the proposer
    /// is neither a co-signer nor the owner
    pub fn check_submit<R: AssetRegistry + ?Sized>(
        &self,
        registry: &R,
        proposer: &AccountId,
        asset: &AssetId,
    ) -> Result<(), GovernanceError> {
        if !registry.asset_exists(asset) {
            return Err(GovernanceError::AssetNotFound(*asset));
        }

        if !MembershipOracle::new(registry).is_authorized(asset, proposer) {
            return Err(GovernanceError::Unauthorized {
                account: *proposer,
                asset: *asset,
            });
        }

        Ok(())
    }

    /// Record a new open proposal
    ///
    /// # Parameters
    /// * `registry` - The asset registry the proposal targets
    /// * `proposer` - The submitting account
    /// * `asset` - The target asset
    /// * `action_code` - Raw action code, see `GovernanceAction`
    /// * `params` - Opaque parameters for the action
    ///
    /// # Returns
    /// The newly allocated, sequential proposal ID
    pub fn submit<R: AssetRegistry + ?Sized>(
        &mut self,
        registry: &R,
        proposer: AccountId,
        asset: AssetId,
        action_code: u32,
        params: Vec<String>,
    ) -> Result<ProposalId, GovernanceError> {
        self.check_submit(registry, &proposer, &asset)?;

        let id = ProposalId(self.next_id);
        self.next_id += 1;
        self.proposals
            .insert(id, Proposal::new(id, proposer, asset, action_code, params));

        Ok(id)
    }

    /// Get a proposal by ID
    pub fn get(&self, id: &ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(id)
            .ok_or(GovernanceError::ProposalNotFound(*id))
    }

    /// Flip the approval flag.
    ///
    /// # Returns
    /// `true` if the proposal moved from open to approved, `false` if it was
    /// already approved
    pub fn mark_approved(&mut self, id: &ProposalId) -> Result<bool, GovernanceError> {
        let proposal = self
            .proposals
            .get_mut(id)
            .ok_or(GovernanceError::ProposalNotFound(*id))?;

        if proposal.approved {
            return Ok(false);
        }
        proposal.approved = true;
        Ok(true)
    }

    /// Number of proposals ever submitted
    pub fn count(&self) -> u64 {
        self.next_id - 1
    }

    /// The ID the next submitted proposal will receive
    pub fn next_proposal_id(&self) -> ProposalId {
        ProposalId(self.next_id)
    }

    /// Iterate over the proposals targeting an asset, in ID order
    pub fn for_asset<'a>(&'a self, asset: &'a AssetId) -> impl Iterator<Item = &'a Proposal> + 'a {
        self.proposals
            .values()
            .filter(move |proposal| proposal.target_asset == *asset)
    }
}

impl Default for ProposalStore {
    fn default() -> Self {
        Self::new()
    }
}

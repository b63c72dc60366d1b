use quorum_core::id::{AccountId, ProposalId};
use std::collections::BTreeMap;

/// Latest vote per (proposal, voter).
///
/// Re-casting overwrites; no history of earlier votes is kept. Membership is
/// not checked here, so tallies must filter voters against the asset.
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    votes: BTreeMap<ProposalId, BTreeMap<AccountId, bool>>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote, returning the value it replaced
    pub fn record(&mut self, proposal: ProposalId, voter: AccountId, approve: bool) -> Option<bool> {
        self.votes
            .entry(proposal)
            .or_default()
            .insert(voter, approve)
    }

    /// The latest vote of `voter` on `proposal`
    pub fn vote_of(&self, proposal: &ProposalId, voter: &AccountId) -> Option<bool> {
        self.votes
            .get(proposal)
            .and_then(|ballots| ballots.get(voter))
            .copied()
    }

    /// Every recorded (voter, vote) pair for a proposal. Each voter appears once.
    pub fn votes_for<'a>(
        &'a self,
        proposal: &ProposalId,
    ) -> impl Iterator<Item = (&'a AccountId, bool)> + 'a {
        self.votes
            .get(proposal)
            .into_iter()
            .flat_map(|ballots| ballots.iter().map(|(voter, approve)| (voter, *approve)))
    }

    /// Number of voters with a recorded vote on a proposal
    pub fn voter_count(&self, proposal: &ProposalId) -> usize {
        self.votes.get(proposal).map(BTreeMap::len).unwrap_or(0)
    }
}

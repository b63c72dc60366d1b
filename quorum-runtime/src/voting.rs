//! Vote recording and quorum tally.
//!
//! A proposal is `Open` until the number of distinct co-signers-or-owner
//! whose latest vote is `true` reaches the target asset's threshold. It then
//! becomes `Approved` and its action runs exactly once. Later votes are still
//! recorded but never re-run the action.

use crate::executor::ActionExecutor;
use log::{debug, info};
use quorum_core::asset::Asset;
use quorum_core::command::GovernanceEvent;
use quorum_core::error::GovernanceError;
use quorum_core::id::{AccountId, AssetId, ProposalId};
use quorum_core::proposal::Proposal;
use quorum_registry::{AssetRegistry, MembershipOracle, ProposalStore, VoteLedger};
use std::collections::BTreeMap;

/// What a validated vote will do once applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotePlan {
    pub proposal: ProposalId,
    pub asset: AssetId,
    pub voter: AccountId,
    pub approve: bool,

    /// Tally after the vote is recorded
    pub tally: u32,

    /// Whether this vote moves the proposal from open to approved
    pub approves_proposal: bool,
}

/// The result of an applied vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub plan: VotePlan,
    pub events: Vec<GovernanceEvent>,
}

/// Records votes, tallies quorum and triggers approved actions
#[derive(Debug, Clone, Copy, Default)]
pub struct VotingEngine {
    executor: ActionExecutor,
}

impl VotingEngine {
    pub fn new(executor: ActionExecutor) -> Self {
        Self { executor }
    }

    /// Count the distinct eligible voters whose latest vote is `true`.
    ///
    /// `pending` is a vote not yet in the ledger; it replaces the voter's
    /// recorded value. Voters outside co-signers ∪ {owner} never count, and
    /// the owner counts once whether or not it is also a co-signer.
    pub fn tally_with(
        asset: &Asset,
        votes: &VoteLedger,
        proposal: &ProposalId,
        pending: Option<(&AccountId, bool)>,
    ) -> u32 {
        let mut ballots: BTreeMap<&AccountId, bool> = votes.votes_for(proposal).collect();
        if let Some((voter, approve)) = pending {
            ballots.insert(voter, approve);
        }

        ballots
            .into_iter()
            .filter(|(voter, approve)| *approve && asset.is_member(voter))
            .count() as u32
    }

    /// Current tally of a proposal
    pub fn tally<R: AssetRegistry + ?Sized>(
        &self,
        registry: &R,
        proposals: &ProposalStore,
        votes: &VoteLedger,
        proposal: &ProposalId,
    ) -> Result<u32, GovernanceError> {
        let record = proposals.get(proposal)?;
        let asset = Self::target_asset(registry, record)?;
        Ok(Self::tally_with(asset, votes, proposal, None))
    }

    /// Validate a vote and work out its effect without mutating anything
    ///
    /// # Parameters
    /// * `registry` - The asset registry
    /// * `proposals` - The proposal store
    /// * `votes` - The vote ledger
    /// * `proposal` - The proposal being voted on
    /// * `voter` - The voting account
    /// * `approve` - The vote
    ///
    /// # Returns
    /// `ProposalNotFound`, `Unauthorized` or `NoSigners` in that order of
    /// precedence; `AssetNotFound` if the vote would approve a proposal whose
    /// action can no longer run. Otherwise the plan for `cast_vote`.
    pub fn check_vote<R: AssetRegistry + ?Sized>(
        &self,
        registry: &R,
        proposals: &ProposalStore,
        votes: &VoteLedger,
        proposal: &ProposalId,
        voter: &AccountId,
        approve: bool,
    ) -> Result<VotePlan, GovernanceError> {
        let record = proposals.get(proposal)?;
        let asset_id = record.target_asset;

        if !MembershipOracle::new(registry).is_authorized(&asset_id, voter) {
            return Err(GovernanceError::Unauthorized {
                account: *voter,
                asset: asset_id,
            });
        }

        let asset = Self::target_asset(registry, record)?;
        if asset.co_signers.is_empty() {
            return Err(GovernanceError::NoSigners(asset_id));
        }

        let tally = Self::tally_with(asset, votes, proposal, Some((voter, approve)));
        let approves_proposal = record.is_open() && tally >= asset.required_signatures;

        if approves_proposal {
            self.executor
                .check(record.action(), &asset_id, &record.params, registry)?;
        }

        Ok(VotePlan {
            proposal: *proposal,
            asset: asset_id,
            voter: *voter,
            approve,
            tally,
            approves_proposal,
        })
    }

    /// Record a vote, retally and run the action if quorum is reached.
    ///
    /// All validation happens before the first mutation, so a rejected vote
    /// leaves the ledger, the proposal and the registry untouched.
    pub fn cast_vote<R: AssetRegistry + ?Sized>(
        &self,
        registry: &mut R,
        proposals: &mut ProposalStore,
        votes: &mut VoteLedger,
        proposal: &ProposalId,
        voter: &AccountId,
        approve: bool,
    ) -> Result<VoteOutcome, GovernanceError> {
        let plan = self.check_vote(&*registry, proposals, votes, proposal, voter, approve)?;

        votes.record(plan.proposal, plan.voter, plan.approve);
        debug!(
            "{} voted {} on {} (tally {})",
            plan.voter, plan.approve, plan.proposal, plan.tally
        );

        let mut events = vec![GovernanceEvent::VoteCast {
            proposal: plan.proposal,
            asset: plan.asset,
            voter: plan.voter,
            approve: plan.approve,
            tally: plan.tally,
        }];

        // mark_approved only returns true on the open -> approved edge
        if plan.approves_proposal && proposals.mark_approved(&plan.proposal)? {
            info!("{} approved with tally {}", plan.proposal, plan.tally);
            events.push(GovernanceEvent::ProposalApproved {
                proposal: plan.proposal,
                asset: plan.asset,
                tally: plan.tally,
            });

            let record = proposals.get(&plan.proposal)?;
            let action = record.action();
            events.extend(
                self.executor
                    .execute(action, &plan.asset, &record.params, registry)?,
            );
            events.push(GovernanceEvent::ActionExecuted {
                proposal: plan.proposal,
                asset: plan.asset,
                action,
            });
        }

        Ok(VoteOutcome { plan, events })
    }

    fn target_asset<'r, R: AssetRegistry + ?Sized>(
        registry: &'r R,
        proposal: &Proposal,
    ) -> Result<&'r Asset, GovernanceError> {
        registry
            .get_asset(&proposal.target_asset)
            .ok_or(GovernanceError::AssetNotFound(proposal.target_asset))
    }
}

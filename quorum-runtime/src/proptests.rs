//! Property-based tests for quorum voting
//!
//! Tests for:
//! - Approval: a proposal is approved once distinct members' latest approvals reach the threshold
//! - Monotonicity: an approved proposal stays approved
//! - Single execution: the action runs exactly once per approved proposal
//! - Assets without co-signers reject every member vote

use crate::runtime::{GovernanceRuntime, QuorumRuntime};
use proptest::prelude::*;
use quorum_core::command::{Command, GovernanceEvent};
use quorum_core::error::GovernanceError;
use quorum_core::id::AccountId;
use std::collections::{BTreeMap, BTreeSet};

// No action registered for this code, so the asset survives approval
const NOOP_ACTION: u32 = 0;

// Index 0 is the owner; the last index is never listed as a co-signer
const POOL_SIZE: u8 = 6;

fn pool_account(index: u8) -> AccountId {
    AccountId::from_seed(&format!("pool-{}", index))
}

proptest! {
    #[test]
    fn prop_approval_tracks_latest_member_votes(
        signer_indices in prop::collection::vec(0u8..POOL_SIZE - 1, 0..6),
        threshold_seed in any::<u32>(),
        votes in prop::collection::vec((0u8..POOL_SIZE, any::<bool>()), 0..24),
    ) {
        let owner = pool_account(0);
        let co_signers: Vec<AccountId> = signer_indices.iter().map(|i| pool_account(*i)).collect();
        let threshold = threshold_seed % (co_signers.len() as u32 + 1);
        let has_co_signers = !co_signers.is_empty();

        let members: BTreeSet<AccountId> = co_signers
            .iter()
            .copied()
            .chain(std::iter::once(owner))
            .collect();

        let runtime = GovernanceRuntime::new();
        let asset = runtime.create_asset(owner, co_signers, threshold).unwrap();
        let proposal = runtime
            .submit_proposal(owner, asset, NOOP_ACTION, vec![])
            .unwrap();

        let mut latest: BTreeMap<AccountId, bool> = BTreeMap::new();
        let mut expected_approved = false;
        let mut executions = 0;

        for (index, approve) in votes {
            let voter = pool_account(index);
            let receipt = runtime
                .process(Command::CastVote { caller: voter, proposal, approve })
                .unwrap();

            if members.contains(&voter) && !has_co_signers {
                // Only the owner can reach this, and nobody may vote without co-signers
                prop_assert_eq!(receipt.error, Some(GovernanceError::NoSigners(asset)));
                prop_assert_eq!(runtime.vote_of(&proposal, &voter).unwrap(), None);
            } else if members.contains(&voter) {
                prop_assert!(receipt.success);
                latest.insert(voter, approve);
                let count = latest.values().filter(|v| **v).count() as u32;
                if count >= threshold {
                    expected_approved = true;
                }
                prop_assert_eq!(runtime.tally(&proposal).unwrap(), count);
            } else {
                prop_assert_eq!(
                    receipt.error,
                    Some(GovernanceError::Unauthorized { account: voter, asset })
                );
            }

            executions += receipt
                .events
                .iter()
                .filter(|event| matches!(event, GovernanceEvent::ActionExecuted { .. }))
                .count();

            prop_assert_eq!(
                runtime.get_proposal(&proposal).unwrap().approved,
                expected_approved
            );
        }

        prop_assert!(executions <= 1);
        prop_assert_eq!(executions == 1, expected_approved);
        prop_assert!(runtime.asset_exists(&asset).unwrap());
    }

    #[test]
    fn prop_threshold_above_signer_count_is_rejected(
        signer_count in 0usize..6,
        excess in 1u32..4,
    ) {
        let owner = pool_account(0);
        let co_signers: Vec<AccountId> = (1..=signer_count as u8).map(pool_account).collect();
        let required = signer_count as u32 + excess;

        let runtime = GovernanceRuntime::new();
        let receipt = runtime
            .process(Command::CreateAsset { caller: owner, co_signers, required_signatures: required })
            .unwrap();

        prop_assert_eq!(
            receipt.error,
            Some(GovernanceError::InvalidThreshold { required, signers: signer_count })
        );
        prop_assert_eq!(runtime.last_sequence().unwrap(), 0);
    }
}

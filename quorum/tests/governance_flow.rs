use quorum::{
    AccountId, AssetId, GovernanceError, GovernanceEvent, GovernanceRuntime, ProposalId,
    QuorumError, QuorumRuntime, RuntimeConfig, ACTION_DESTROY_ASSET,
};
use tempfile::tempdir;

fn governance_err<T: std::fmt::Debug>(result: Result<T, QuorumError>) -> GovernanceError {
    match result {
        Err(err) => err
            .governance()
            .cloned()
            .unwrap_or_else(|| panic!("expected a governance error, got {:?}", err)),
        Ok(value) => panic!("expected an error, got {:?}", value),
    }
}

#[test]
fn two_of_two_co_signers_destroy_an_asset() {
    let owner = AccountId::from_seed("owner");
    let a = AccountId::from_seed("a");
    let b = AccountId::from_seed("b");
    let runtime = GovernanceRuntime::new();

    let asset = runtime.create_asset(owner, vec![a, b], 2).unwrap();
    assert_eq!(asset, AssetId(1));
    assert_eq!(runtime.holder_of(&asset).unwrap(), owner);

    let proposal = runtime
        .submit_proposal(a, asset, ACTION_DESTROY_ASSET, vec![])
        .unwrap();
    assert_eq!(proposal, ProposalId(1));
    assert_eq!(runtime.get_proposal_count().unwrap(), 1);

    runtime.cast_vote(a, proposal, true).unwrap();
    assert!(!runtime.get_proposal(&proposal).unwrap().approved);

    runtime.cast_vote(b, proposal, true).unwrap();
    assert!(runtime.get_proposal(&proposal).unwrap().approved);
    assert!(!runtime.asset_exists(&asset).unwrap());
    assert_eq!(
        governance_err(runtime.holder_of(&asset)),
        GovernanceError::AssetNotFound(asset)
    );
}

#[test]
fn owner_proposal_approved_by_single_co_signer() {
    let owner = AccountId::from_seed("owner");
    let a = AccountId::from_seed("a");
    let runtime = GovernanceRuntime::new();

    let asset = runtime.create_asset(owner, vec![a], 1).unwrap();
    let proposal = runtime
        .submit_proposal(owner, asset, ACTION_DESTROY_ASSET, vec![])
        .unwrap();
    runtime.cast_vote(a, proposal, true).unwrap();

    let summary = runtime.get_proposal(&proposal).unwrap();
    assert!(summary.approved);
    assert_eq!(summary.proposer, owner);
    assert!(!runtime.asset_exists(&asset).unwrap());
}

#[test]
fn vote_on_asset_without_co_signers_is_rejected() {
    let owner = AccountId::from_seed("owner");
    let runtime = GovernanceRuntime::new();

    let asset = runtime.create_asset(owner, vec![], 0).unwrap();
    let proposal = runtime
        .submit_proposal(owner, asset, ACTION_DESTROY_ASSET, vec![])
        .unwrap();

    assert_eq!(
        governance_err(runtime.cast_vote(owner, proposal, true)),
        GovernanceError::NoSigners(asset)
    );
    assert!(!runtime.get_proposal(&proposal).unwrap().approved);
    assert!(runtime.asset_exists(&asset).unwrap());
    assert_eq!(runtime.vote_of(&proposal, &owner).unwrap(), None);
}

#[test]
fn outsiders_cannot_propose_or_vote() {
    let owner = AccountId::from_seed("owner");
    let a = AccountId::from_seed("a");
    let outsider = AccountId::from_seed("outsider");
    let runtime = GovernanceRuntime::new();

    let asset = runtime.create_asset(owner, vec![a], 1).unwrap();
    assert_eq!(
        governance_err(runtime.submit_proposal(outsider, asset, ACTION_DESTROY_ASSET, vec![])),
        GovernanceError::Unauthorized {
            account: outsider,
            asset
        }
    );
    assert_eq!(runtime.get_proposal_count().unwrap(), 0);

    let proposal = runtime
        .submit_proposal(a, asset, ACTION_DESTROY_ASSET, vec![])
        .unwrap();
    assert_eq!(
        governance_err(runtime.cast_vote(outsider, proposal, true)),
        GovernanceError::Unauthorized {
            account: outsider,
            asset
        }
    );
    assert_eq!(runtime.tally(&proposal).unwrap(), 0);
    assert!(runtime.asset_exists(&asset).unwrap());
}

#[test]
fn threshold_cannot_exceed_co_signers() {
    let owner = AccountId::from_seed("owner");
    let a = AccountId::from_seed("a");
    let runtime = GovernanceRuntime::new();

    assert_eq!(
        governance_err(runtime.create_asset(owner, vec![a], 2)),
        GovernanceError::InvalidThreshold {
            required: 2,
            signers: 1
        }
    );

    // Ids are allocated only for accepted assets
    assert_eq!(runtime.create_asset(owner, vec![a], 1).unwrap(), AssetId(1));
}

#[test]
fn unknown_ids_are_reported() {
    let owner = AccountId::from_seed("owner");
    let runtime = GovernanceRuntime::new();

    assert_eq!(
        governance_err(runtime.submit_proposal(owner, AssetId(5), ACTION_DESTROY_ASSET, vec![])),
        GovernanceError::AssetNotFound(AssetId(5))
    );
    assert_eq!(
        governance_err(runtime.cast_vote(owner, ProposalId(5), true)),
        GovernanceError::ProposalNotFound(ProposalId(5))
    );
    assert_eq!(
        governance_err(runtime.get_proposal(&ProposalId(5))),
        GovernanceError::ProposalNotFound(ProposalId(5))
    );
    assert_eq!(
        governance_err(runtime.get_asset(&AssetId(5))),
        GovernanceError::AssetNotFound(AssetId(5))
    );
}

#[test]
fn second_destroy_proposal_cannot_be_approved() {
    let owner = AccountId::from_seed("owner");
    let a = AccountId::from_seed("a");
    let runtime = GovernanceRuntime::new();

    let asset = runtime.create_asset(owner, vec![a], 1).unwrap();
    let first = runtime
        .submit_proposal(owner, asset, ACTION_DESTROY_ASSET, vec![])
        .unwrap();
    let second = runtime
        .submit_proposal(a, asset, ACTION_DESTROY_ASSET, vec![])
        .unwrap();

    runtime.cast_vote(a, first, true).unwrap();
    assert!(!runtime.asset_exists(&asset).unwrap());

    // Approving the second would destroy twice, so the vote is refused whole
    assert_eq!(
        governance_err(runtime.cast_vote(a, second, true)),
        GovernanceError::AssetNotFound(asset)
    );
    assert!(!runtime.get_proposal(&second).unwrap().approved);
    assert_eq!(runtime.vote_of(&second, &a).unwrap(), None);

    // A vote that does not approve is still recorded
    runtime.cast_vote(a, second, false).unwrap();
    assert_eq!(runtime.vote_of(&second, &a).unwrap(), Some(false));
}

#[test]
fn journal_survives_restart() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("quorum.json");
    std::fs::write(
        &config_path,
        format!(
            r#"{{ "journal_path": {:?} }}"#,
            temp_dir.path().join("commands.journal")
        ),
    )
    .unwrap();
    let config = RuntimeConfig::from_json_file(&config_path).unwrap();

    let owner = AccountId::from_seed("owner");
    let a = AccountId::from_seed("a");
    let b = AccountId::from_seed("b");

    let proposal = {
        let runtime = GovernanceRuntime::open(config.clone()).unwrap();
        let asset = runtime.create_asset(owner, vec![a, b], 2).unwrap();
        let proposal = runtime
            .submit_proposal(a, asset, ACTION_DESTROY_ASSET, vec![])
            .unwrap();
        runtime.cast_vote(a, proposal, true).unwrap();
        proposal
    };

    let runtime = GovernanceRuntime::open(config).unwrap();
    assert_eq!(runtime.get_proposal_count().unwrap(), 1);
    assert_eq!(runtime.tally(&proposal).unwrap(), 1);

    let events = runtime
        .execute(quorum::Command::CastVote {
            caller: b,
            proposal,
            approve: true,
        })
        .unwrap();
    assert!(events.contains(&GovernanceEvent::AssetDestroyed { asset: AssetId(1) }));
    assert!(!runtime.asset_exists(&AssetId(1)).unwrap());
}

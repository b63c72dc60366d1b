use crate::config::RuntimeConfig;
use crate::receipts::InMemoryReceiptStorage;
use crate::state::GovernanceState;
use log::{debug, info, warn};
use quorum_core::asset::Asset;
use quorum_core::command::{Command, CommandHash, CommandReceipt, GovernanceEvent};
use quorum_core::error::{QuorumError, StorageError};
use quorum_core::id::{AccountId, AssetId, ProposalId};
use quorum_core::proposal::ProposalSummary;
use quorum_registry::{
    AssetRegistry, CommandJournal, FileCommandJournal, InMemoryAssetRegistry,
    InMemoryCommandJournal, JournalEntry,
};
use std::sync::{Mutex, MutexGuard};

/// Entry points of a quorum-governed asset system.
///
/// Mutations go through [`QuorumRuntime::process`], which validates, journals
/// and applies one command at a time. The typed helpers wrap it.
pub trait QuorumRuntime {
    /// Process a mutating command
    ///
    /// # Parameters
    /// * `command` - The command, carrying its calling account
    ///
    /// # Returns
    /// A receipt for the accepted or rejected command. Err only when storage
    /// failed, in which case nothing was applied.
    fn process(&self, command: Command) -> Result<CommandReceipt, StorageError>;

    /// Process a command, turning a rejection into an error
    fn execute(&self, command: Command) -> Result<Vec<GovernanceEvent>, QuorumError> {
        let receipt = self.process(command)?;
        match receipt.error {
            Some(err) => Err(err.into()),
            None => Ok(receipt.events),
        }
    }

    /// Create an asset owned and held by `caller`
    fn create_asset(
        &self,
        caller: AccountId,
        co_signers: Vec<AccountId>,
        required_signatures: u32,
    ) -> Result<AssetId, QuorumError> {
        let events = self.execute(Command::CreateAsset {
            caller,
            co_signers,
            required_signatures,
        })?;
        events
            .iter()
            .find_map(|event| match event {
                GovernanceEvent::AssetCreated { asset, .. } => Some(*asset),
                _ => None,
            })
            .ok_or_else(|| StorageError::Other("No AssetCreated event emitted".to_string()).into())
    }

    /// Raise a proposal against `asset` on behalf of `caller`
    fn submit_proposal(
        &self,
        caller: AccountId,
        asset: AssetId,
        action_code: u32,
        params: Vec<String>,
    ) -> Result<ProposalId, QuorumError> {
        let events = self.execute(Command::SubmitProposal {
            caller,
            asset,
            action_code,
            params,
        })?;
        events
            .iter()
            .find_map(|event| match event {
                GovernanceEvent::ProposalSubmitted { proposal, .. } => Some(*proposal),
                _ => None,
            })
            .ok_or_else(|| {
                StorageError::Other("No ProposalSubmitted event emitted".to_string()).into()
            })
    }

    /// Record `caller`'s vote on a proposal
    fn cast_vote(
        &self,
        caller: AccountId,
        proposal: ProposalId,
        approve: bool,
    ) -> Result<(), QuorumError> {
        self.execute(Command::CastVote {
            caller,
            proposal,
            approve,
        })
        .map(|_| ())
    }

    /// Hand an asset from its current holder to `to`
    fn transfer_holder(
        &self,
        caller: AccountId,
        asset: AssetId,
        to: AccountId,
    ) -> Result<(), QuorumError> {
        self.execute(Command::TransferHolder { caller, asset, to })
            .map(|_| ())
    }

    /// Get a proposal's proposer, target asset, action code and approval flag
    fn get_proposal(&self, id: &ProposalId) -> Result<ProposalSummary, QuorumError>;

    /// Number of proposals ever submitted
    fn get_proposal_count(&self) -> Result<u64, StorageError>;

    /// Get an asset record. Destroyed assets are returned with no holder.
    fn get_asset(&self, id: &AssetId) -> Result<Asset, QuorumError>;

    fn asset_exists(&self, id: &AssetId) -> Result<bool, StorageError>;

    fn holder_of(&self, id: &AssetId) -> Result<AccountId, QuorumError>;

    /// Current qualifying approval count of a proposal
    fn tally(&self, id: &ProposalId) -> Result<u32, QuorumError>;

    /// Latest vote of `voter` on a proposal, if any
    fn vote_of(&self, id: &ProposalId, voter: &AccountId) -> Result<Option<bool>, QuorumError>;

    /// Get the receipt of a processed command
    fn get_receipt(&self, hash: &CommandHash) -> Result<Option<CommandReceipt>, StorageError>;
}

struct RuntimeState<R: AssetRegistry> {
    state: GovernanceState<R>,
    last_sequence: u64,
}

/// A runtime that serializes every command behind one lock and journals
/// accepted commands before applying them.
pub struct GovernanceRuntime<R: AssetRegistry + Send = InMemoryAssetRegistry> {
    inner: Mutex<RuntimeState<R>>,
    journal: Box<dyn CommandJournal>,
    receipts: InMemoryReceiptStorage,
    config: RuntimeConfig,
}

impl GovernanceRuntime<InMemoryAssetRegistry> {
    /// Create an empty runtime with an in-memory journal
    pub fn new() -> Self {
        Self::from_parts(
            InMemoryAssetRegistry::new(),
            Box::new(InMemoryCommandJournal::new()),
            RuntimeConfig::default(),
        )
    }

    /// Open a runtime, replaying the configured journal file if there is one
    pub fn open(config: RuntimeConfig) -> Result<Self, StorageError> {
        let journal: Box<dyn CommandJournal> = match &config.journal_path {
            Some(path) => Box::new(FileCommandJournal::open(path)?),
            None => Box::new(InMemoryCommandJournal::new()),
        };
        Self::with_registry(InMemoryAssetRegistry::new(), journal, config)
    }
}

impl Default for GovernanceRuntime<InMemoryAssetRegistry> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AssetRegistry + Send> GovernanceRuntime<R> {
    fn from_parts(registry: R, journal: Box<dyn CommandJournal>, config: RuntimeConfig) -> Self {
        Self {
            inner: Mutex::new(RuntimeState {
                state: GovernanceState::new(registry),
                last_sequence: 0,
            }),
            journal,
            receipts: InMemoryReceiptStorage::new(config.receipt_capacity),
            config,
        }
    }

    /// Build a runtime over `registry` and replay every entry of `journal`
    pub fn with_registry(
        registry: R,
        journal: Box<dyn CommandJournal>,
        config: RuntimeConfig,
    ) -> Result<Self, StorageError> {
        let runtime = Self::from_parts(registry, journal, config);
        runtime.replay()?;
        Ok(runtime)
    }

    fn replay(&self) -> Result<(), StorageError> {
        let mut inner = self.lock()?;

        for entry in self.journal.iterate_entries() {
            let entry = entry.map_err(|e| {
                warn!("Journal replay stopped: {}", e);
                e
            })?;

            let expected = inner.last_sequence + 1;
            if entry.sequence != expected {
                warn!(
                    "Journal out of order: expected entry {}, found {}",
                    expected, entry.sequence
                );
                return Err(StorageError::Journal(format!(
                    "Expected sequence {}, found {}",
                    expected, entry.sequence
                )));
            }

            let hash = entry.command.hash(Some(entry.sequence))?;
            let events = inner.state.apply(&entry.command).map_err(|e| {
                warn!("Journal entry {} no longer applies: {}", entry.sequence, e);
                StorageError::Journal(format!(
                    "Entry {} ({}) failed to apply: {}",
                    entry.sequence,
                    entry.command.kind(),
                    e
                ))
            })?;
            inner.last_sequence = entry.sequence;

            self.receipts.store_receipt(&CommandReceipt::accepted(
                hash,
                entry.sequence,
                events,
                entry.timestamp,
            ))?;
        }

        if inner.last_sequence > 0 {
            info!("Replayed {} journal entries", inner.last_sequence);
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, RuntimeState<R>>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Other(format!("Runtime lock poisoned: {}", e)))
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Sequence number of the last accepted command
    pub fn last_sequence(&self) -> Result<u64, StorageError> {
        Ok(self.lock()?.last_sequence)
    }

    /// Retained receipts with events on `asset`, oldest first
    pub fn receipts_for_asset(&self, asset: &AssetId) -> Result<Vec<CommandReceipt>, StorageError> {
        self.receipts.receipts_for_asset(asset)
    }
}

impl<R: AssetRegistry + Send> QuorumRuntime for GovernanceRuntime<R> {
    fn process(&self, command: Command) -> Result<CommandReceipt, StorageError> {
        let mut inner = self.lock()?;

        if let Err(err) = inner.state.check(&command) {
            warn!(
                "Rejected {} from {}: {}",
                command.kind(),
                command.caller(),
                err
            );
            let receipt = CommandReceipt::rejected(
                command.hash(None)?,
                err,
                chrono::Utc::now().timestamp_millis(),
            );
            self.receipts.store_receipt(&receipt)?;
            return Ok(receipt);
        }

        let sequence = inner.last_sequence + 1;
        let hash = command.hash(Some(sequence))?;
        let entry = JournalEntry::new(sequence, command);
        self.journal.append(&entry)?;

        let events = inner.state.apply(&entry.command).map_err(|e| {
            StorageError::Other(format!(
                "Entry {} journaled but failed to apply: {}",
                sequence, e
            ))
        })?;
        inner.last_sequence = sequence;
        debug!(
            "Accepted {} as entry {} ({} events)",
            entry.command.kind(),
            sequence,
            events.len()
        );

        let receipt = CommandReceipt::accepted(hash, sequence, events, entry.timestamp);
        self.receipts.store_receipt(&receipt)?;
        Ok(receipt)
    }

    fn get_proposal(&self, id: &ProposalId) -> Result<ProposalSummary, QuorumError> {
        let inner = self.lock()?;
        let summary = inner.state.proposal(id)?.summary();
        Ok(summary)
    }

    fn get_proposal_count(&self) -> Result<u64, StorageError> {
        Ok(self.lock()?.state.proposals().count())
    }

    fn get_asset(&self, id: &AssetId) -> Result<Asset, QuorumError> {
        let inner = self.lock()?;
        let asset = inner.state.asset(id)?.clone();
        Ok(asset)
    }

    fn asset_exists(&self, id: &AssetId) -> Result<bool, StorageError> {
        Ok(self.lock()?.state.registry().asset_exists(id))
    }

    fn holder_of(&self, id: &AssetId) -> Result<AccountId, QuorumError> {
        let inner = self.lock()?;
        let holder = inner.state.registry().holder_of(id)?;
        Ok(holder)
    }

    fn tally(&self, id: &ProposalId) -> Result<u32, QuorumError> {
        let inner = self.lock()?;
        let tally = inner.state.tally(id)?;
        Ok(tally)
    }

    fn vote_of(&self, id: &ProposalId, voter: &AccountId) -> Result<Option<bool>, QuorumError> {
        let inner = self.lock()?;
        let vote = inner.state.vote_of(id, voter)?;
        Ok(vote)
    }

    fn get_receipt(&self, hash: &CommandHash) -> Result<Option<CommandReceipt>, StorageError> {
        self.receipts.get_receipt(hash)
    }
}

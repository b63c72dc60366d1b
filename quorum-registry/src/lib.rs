pub mod asset_registry;
pub mod journal;
pub mod membership;
pub mod proposal_store;
pub mod vote_ledger;

// Re-export the main types for convenience
pub use asset_registry::{AssetRegistry, InMemoryAssetRegistry};
pub use journal::{CommandJournal, FileCommandJournal, InMemoryCommandJournal, JournalEntry};
pub use membership::MembershipOracle;
pub use proposal_store::ProposalStore;
pub use vote_ledger::VoteLedger;

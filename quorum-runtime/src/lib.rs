pub mod config;
pub mod executor;
pub mod receipts;
pub mod runtime;
pub mod state;
pub mod voting;

#[cfg(test)]
mod proptests;

// Re-export the main types for convenience
pub use config::{RuntimeConfig, DEFAULT_RECEIPT_CAPACITY};
pub use executor::ActionExecutor;
pub use receipts::InMemoryReceiptStorage;
pub use runtime::{GovernanceRuntime, QuorumRuntime};
pub use state::GovernanceState;
pub use voting::{VoteOutcome, VotePlan, VotingEngine};

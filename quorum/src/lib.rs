//! Quorum-governed digital assets
//!
//! An asset is owned by a primary account together with a set of co-signers.
//! Governance actions on it, destruction included, are raised as proposals
//! and run once enough distinct co-signers or the owner approve.
//!
//! This crate re-exports all the components of the system.

pub use quorum_core::*;
pub use quorum_registry::*;
pub use quorum_runtime::*;

use crate::asset_registry::AssetRegistry;
use quorum_core::id::{AccountId, AssetId};

/// Read-only membership lookups against an asset registry.
///
/// Unknown assets are never an error here: every question about them is
/// answered with `false`.
pub struct MembershipOracle<'a, R: AssetRegistry + ?Sized> {
    registry: &'a R,
}

impl<'a, R: AssetRegistry + ?Sized> MembershipOracle<'a, R> {
    pub fn new(registry: &'a R) -> Self {
        Self { registry }
    }

    /// Whether `account` appears in the asset's co-signer sequence
    pub fn is_co_signer(&self, asset: &AssetId, account: &AccountId) -> bool {
        self.registry
            .get_asset(asset)
            .map(|record| record.has_co_signer(account))
            .unwrap_or(false)
    }

    /// Whether `account` created the asset
    pub fn is_owner(&self, asset: &AssetId, account: &AccountId) -> bool {
        self.registry
            .get_asset(asset)
            .map(|record| record.owner == *account)
            .unwrap_or(false)
    }

    /// Co-signer or owner. Gates every proposal and vote.
    pub fn is_authorized(&self, asset: &AssetId, account: &AccountId) -> bool {
        self.is_co_signer(asset, account) || self.is_owner(asset, account)
    }
}

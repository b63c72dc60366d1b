use quorum_core::asset::Asset;
use quorum_core::error::GovernanceError;
use quorum_core::id::{AccountId, AssetId};
use std::collections::BTreeMap;

/// Registry of governed assets.
///
/// Implementations own the asset records. The governance layer only asks
/// whether an asset exists, who holds it, and asks for it to be destroyed.
pub trait AssetRegistry {
    /// Validate a creation request without touching the registry
    ///
    /// # Parameters
    /// * `co_signers` - The proposed signer sequence
    /// * `required_signatures` - The proposed threshold
    ///
    /// # Returns
    /// `InvalidThreshold` if the threshold exceeds the number of co-signers
    fn check_create(
        &self,
        co_signers: &[AccountId],
        required_signatures: u32,
    ) -> Result<(), GovernanceError> {
        if required_signatures as usize > co_signers.len() {
            return Err(GovernanceError::InvalidThreshold {
                required: required_signatures,
                signers: co_signers.len(),
            });
        }
        Ok(())
    }

    /// Create a new asset owned and held by `owner`
    ///
    /// # Parameters
    /// * `owner` - The creating account
    /// * `co_signers` - Accounts granted proposing and voting rights
    /// * `required_signatures` - Approval threshold
    ///
    /// # Returns
    /// The newly allocated, sequential asset ID
    fn create_asset(
        &mut self,
        owner: AccountId,
        co_signers: Vec<AccountId>,
        required_signatures: u32,
    ) -> Result<AssetId, GovernanceError>;

    /// Get the record of an asset, including destroyed ones
    fn get_asset(&self, id: &AssetId) -> Option<&Asset>;

    /// Whether the asset was created and has not been destroyed
    fn asset_exists(&self, id: &AssetId) -> bool {
        self.get_asset(id).map(Asset::is_live).unwrap_or(false)
    }

    /// Get the current holder of a live asset
    ///
    /// # Returns
    /// `AssetNotFound` if the asset was never created or has been destroyed
    fn holder_of(&self, id: &AssetId) -> Result<AccountId, GovernanceError> {
        self.get_asset(id)
            .and_then(|asset| asset.holder)
            .ok_or(GovernanceError::AssetNotFound(*id))
    }

    /// Destroy a live asset
    ///
    /// # Returns
    /// `AssetNotFound` if the asset does not exist or is already destroyed
    fn destroy_asset(&mut self, id: &AssetId) -> Result<(), GovernanceError>;

    /// Validate a holder transfer without touching the registry
    fn check_transfer(&self, id: &AssetId, from: &AccountId) -> Result<(), GovernanceError> {
        let holder = self.holder_of(id)?;
        if holder != *from {
            return Err(GovernanceError::NotHolder {
                account: *from,
                asset: *id,
            });
        }
        Ok(())
    }

    /// Move a live asset from its current holder to another account
    ///
    /// # Parameters
    /// * `id` - The asset to transfer
    /// * `from` - Must be the current holder
    /// * `to` - The new holder
    fn transfer_holder(
        &mut self,
        id: &AssetId,
        from: &AccountId,
        to: AccountId,
    ) -> Result<(), GovernanceError>;

    /// The ID the next created asset will receive
    fn next_asset_id(&self) -> AssetId;

    /// Number of assets ever created, destroyed ones included
    fn asset_count(&self) -> usize;
}

/// In-memory asset registry
#[derive(Debug, Clone)]
pub struct InMemoryAssetRegistry {
    assets: BTreeMap<AssetId, Asset>,
    next_id: u64,
}

impl InMemoryAssetRegistry {
    /// Create an empty registry. The first asset gets ID 1.
    pub fn new() -> Self {
        Self {
            assets: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Iterate over all asset records in ID order
    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }
}

impl Default for InMemoryAssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetRegistry for InMemoryAssetRegistry {
    fn create_asset(
        &mut self,
        owner: AccountId,
        co_signers: Vec<AccountId>,
        required_signatures: u32,
    ) -> Result<AssetId, GovernanceError> {
        self.check_create(&co_signers, required_signatures)?;

        let id = AssetId(self.next_id);
        self.next_id += 1;
        self.assets
            .insert(id, Asset::new(id, owner, co_signers, required_signatures));

        Ok(id)
    }

    fn get_asset(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.get(id)
    }

    fn destroy_asset(&mut self, id: &AssetId) -> Result<(), GovernanceError> {
        match self.assets.get_mut(id) {
            Some(asset) if asset.is_live() => {
                asset.holder = None;
                Ok(())
            }
            _ => Err(GovernanceError::AssetNotFound(*id)),
        }
    }

    fn transfer_holder(
        &mut self,
        id: &AssetId,
        from: &AccountId,
        to: AccountId,
    ) -> Result<(), GovernanceError> {
        self.check_transfer(id, from)?;

        let asset = self
            .assets
            .get_mut(id)
            .ok_or(GovernanceError::AssetNotFound(*id))?;
        asset.holder = Some(to);

        Ok(())
    }

    fn next_asset_id(&self) -> AssetId {
        AssetId(self.next_id)
    }

    fn asset_count(&self) -> usize {
        self.assets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts() -> (AccountId, AccountId, AccountId) {
        (
            AccountId::from_seed("owner"),
            AccountId::from_seed("a"),
            AccountId::from_seed("b"),
        )
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let (owner, a, b) = accounts();
        let mut registry = InMemoryAssetRegistry::new();

        let first = registry.create_asset(owner, vec![a, b], 2).unwrap();
        let second = registry.create_asset(a, vec![b], 1).unwrap();

        assert_eq!(first, AssetId(1));
        assert_eq!(second, AssetId(2));
        assert_eq!(registry.next_asset_id(), AssetId(3));
        assert_eq!(registry.holder_of(&first).unwrap(), owner);
        assert_eq!(registry.holder_of(&second).unwrap(), a);
    }

    #[test]
    fn test_invalid_threshold_registers_nothing() {
        let (owner, a, b) = accounts();
        let mut registry = InMemoryAssetRegistry::new();

        let err = registry.create_asset(owner, vec![a, b], 3).unwrap_err();
        assert_eq!(
            err,
            GovernanceError::InvalidThreshold {
                required: 3,
                signers: 2
            }
        );
        assert_eq!(registry.asset_count(), 0);
        assert_eq!(registry.next_asset_id(), AssetId(1));
    }

    #[test]
    fn test_empty_signers_with_zero_threshold_is_allowed() {
        let (owner, _, _) = accounts();
        let mut registry = InMemoryAssetRegistry::new();

        let id = registry.create_asset(owner, vec![], 0).unwrap();
        assert!(registry.asset_exists(&id));
    }

    #[test]
    fn test_destroy_is_guarded() {
        let (owner, a, _) = accounts();
        let mut registry = InMemoryAssetRegistry::new();
        let id = registry.create_asset(owner, vec![a], 1).unwrap();

        registry.destroy_asset(&id).unwrap();
        assert!(!registry.asset_exists(&id));
        assert_eq!(
            registry.holder_of(&id).unwrap_err(),
            GovernanceError::AssetNotFound(id)
        );

        // The record survives for membership lookups
        assert!(registry.get_asset(&id).unwrap().has_co_signer(&a));

        assert_eq!(
            registry.destroy_asset(&id).unwrap_err(),
            GovernanceError::AssetNotFound(id)
        );
        assert_eq!(
            registry.destroy_asset(&AssetId(99)).unwrap_err(),
            GovernanceError::AssetNotFound(AssetId(99))
        );
    }

    #[test]
    fn test_transfer_holder() {
        let (owner, a, b) = accounts();
        let mut registry = InMemoryAssetRegistry::new();
        let id = registry.create_asset(owner, vec![a], 1).unwrap();

        assert_eq!(
            registry.transfer_holder(&id, &a, b).unwrap_err(),
            GovernanceError::NotHolder {
                account: a,
                asset: id
            }
        );

        registry.transfer_holder(&id, &owner, b).unwrap();
        assert_eq!(registry.holder_of(&id).unwrap(), b);

        // Ownership and membership are unaffected
        let asset = registry.get_asset(&id).unwrap();
        assert_eq!(asset.owner, owner);
        assert_eq!(asset.co_signers, vec![a]);
    }
}

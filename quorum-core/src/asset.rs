use crate::id::{AccountId, AssetId};
use serde::{Deserialize, Serialize};

/// An asset governed jointly by its co-signers and its owner.
///
/// The signer set and threshold are fixed at creation. Destroying the asset
/// clears the holder but keeps the record, so membership questions about a
/// destroyed asset still have an answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Asset {
    /// Unique identifier for this asset
    pub id: AssetId,

    /// Accounts granted proposing and voting rights, in creation order.
    /// Duplicates are kept as given.
    pub co_signers: Vec<AccountId>,

    /// Minimum number of distinct approving voters
    pub required_signatures: u32,

    /// The account that created the asset
    pub owner: AccountId,

    /// Current holder, `None` once the asset has been destroyed
    pub holder: Option<AccountId>,
}

impl Asset {
    /// Create a live asset held by its owner
    pub fn new(
        id: AssetId,
        owner: AccountId,
        co_signers: Vec<AccountId>,
        required_signatures: u32,
    ) -> Self {
        Self {
            id,
            co_signers,
            required_signatures,
            owner,
            holder: Some(owner),
        }
    }

    /// Get the asset ID
    pub fn id(&self) -> &AssetId {
        &self.id
    }

    /// Get the owner
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Get the current holder
    pub fn holder(&self) -> Option<&AccountId> {
        self.holder.as_ref()
    }

    /// Whether the asset has not been destroyed
    pub fn is_live(&self) -> bool {
        self.holder.is_some()
    }

    /// Linear scan of the co-signer sequence
    pub fn has_co_signer(&self, account: &AccountId) -> bool {
        self.co_signers.iter().any(|signer| signer == account)
    }

    /// Co-signer or owner
    pub fn is_member(&self, account: &AccountId) -> bool {
        self.has_co_signer(account) || self.owner == *account
    }
}

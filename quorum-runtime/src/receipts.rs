use quorum_core::command::{CommandHash, CommandReceipt};
use quorum_core::error::StorageError;
use quorum_core::id::AssetId;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Bounded in-memory storage for command receipts
pub struct InMemoryReceiptStorage {
    capacity: usize,
    inner: Mutex<ReceiptIndex>,
}

#[derive(Default)]
struct ReceiptIndex {
    // Mapping from command hash to receipt
    by_hash: HashMap<CommandHash, CommandReceipt>,

    // Insertion order, oldest first
    order: VecDeque<CommandHash>,

    // Mapping from asset ID to the hashes of receipts with events on it
    by_asset: HashMap<AssetId, Vec<CommandHash>>,
}

impl ReceiptIndex {
    fn remove(&mut self, hash: &CommandHash) {
        if let Some(receipt) = self.by_hash.remove(hash) {
            for event in &receipt.events {
                if let Some(hashes) = self.by_asset.get_mut(&event.asset()) {
                    hashes.retain(|h| h != hash);
                    if hashes.is_empty() {
                        self.by_asset.remove(&event.asset());
                    }
                }
            }
        }
    }
}

impl InMemoryReceiptStorage {
    /// Create a storage that keeps at most `capacity` receipts
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(ReceiptIndex::default()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ReceiptIndex>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Other(format!("Receipt storage lock poisoned: {}", e)))
    }

    /// Store a receipt, evicting the oldest ones beyond capacity
    pub fn store_receipt(&self, receipt: &CommandReceipt) -> Result<(), StorageError> {
        if self.capacity == 0 {
            return Ok(());
        }

        let mut index = self.lock()?;
        let hash = receipt.command_hash;

        // Identical rejected commands hash the same; keep only the latest
        if index.by_hash.contains_key(&hash) {
            index.remove(&hash);
            index.order.retain(|h| *h != hash);
        }

        let mut assets: Vec<AssetId> = receipt.events.iter().map(|event| event.asset()).collect();
        assets.dedup();
        for asset in assets {
            index.by_asset.entry(asset).or_default().push(hash);
        }
        index.by_hash.insert(hash, receipt.clone());
        index.order.push_back(hash);

        while index.order.len() > self.capacity {
            if let Some(oldest) = index.order.pop_front() {
                index.remove(&oldest);
            }
        }

        Ok(())
    }

    /// Get a receipt by command hash
    pub fn get_receipt(&self, hash: &CommandHash) -> Result<Option<CommandReceipt>, StorageError> {
        Ok(self.lock()?.by_hash.get(hash).cloned())
    }

    /// Receipts with events on the given asset, oldest first
    pub fn receipts_for_asset(&self, asset: &AssetId) -> Result<Vec<CommandReceipt>, StorageError> {
        let index = self.lock()?;
        let receipts = index
            .by_asset
            .get(asset)
            .map(|hashes| {
                hashes
                    .iter()
                    .filter_map(|hash| index.by_hash.get(hash).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(receipts)
    }

    /// Number of receipts currently held
    pub fn len(&self) -> usize {
        self.lock().map(|index| index.by_hash.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! RehashTable: public facade over the rehash controller.

use crate::error::TableError;
use crate::hasher::{BuildNameHasher, NameHasher};
use crate::limits::block_in_range;
use crate::prime::normalize_capacity;
use crate::probe::ProbePolicy;
use crate::record::Record;
use crate::rehash::{RehashController, RehashState};

/// Open-addressed table of [`Record`]s keyed by `(name, block_id)`.
///
/// Growth and tombstone cleanup happen inside the `insert`/`remove` call
/// that crosses a threshold, so between calls the table is never
/// mid-migration.
pub struct RehashTable<H = BuildNameHasher> {
    hasher: H,
    tables: RehashController,
}

impl RehashTable {
    /// Default hasher and the default (quadratic) probing policy.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity, BuildNameHasher::default(), ProbePolicy::default())
    }
}

impl<H: NameHasher> RehashTable<H> {
    /// `capacity` is clamped into `[MINPRIME, MAXPRIME]` and rounded up to a
    /// prime. `policy` is both the active and the pending policy.
    pub fn new(capacity: usize, hasher: H, policy: ProbePolicy) -> Self {
        Self {
            hasher,
            tables: RehashController::new(normalize_capacity(capacity), policy),
        }
    }

    pub fn try_insert(&mut self, record: Record) -> Result<(), TableError> {
        if !block_in_range(record.block_id()) {
            return Err(TableError::BlockOutOfRange(record.block_id()));
        }
        if record.is_empty() {
            return Err(TableError::EmptyName);
        }
        let hash = self.hasher.hash_name(record.name());
        self.tables.insert(hash, record)
    }

    /// Returns false for an out-of-range block id, an empty name, a full
    /// table, or a live duplicate.
    pub fn insert(&mut self, record: Record) -> bool {
        self.try_insert(record).is_ok()
    }

    pub fn try_remove(&mut self, record: &Record) -> Result<(), TableError> {
        let hash = self.hasher.hash_name(record.name());
        self.tables.remove(hash, record.name(), record.block_id())
    }

    pub fn remove(&mut self, record: &Record) -> bool {
        self.try_remove(record).is_ok()
    }

    /// Borrowed live record with the given identity.
    pub fn get(&self, name: &str, block_id: u32) -> Option<&Record> {
        let hash = self.hasher.hash_name(name);
        self.tables.get(hash, name, block_id)
    }

    /// Copy of the live record, or the empty sentinel ([`Record::is_empty`]).
    pub fn find(&self, name: &str, block_id: u32) -> Record {
        self.get(name, block_id).cloned().unwrap_or_default()
    }

    pub fn contains(&self, name: &str, block_id: u32) -> bool {
        self.get(name, block_id).is_some()
    }

    pub fn try_update_disk_block(&mut self, record: &Record, block_id: u32) -> Result<(), TableError> {
        if !block_in_range(block_id) {
            return Err(TableError::BlockOutOfRange(block_id));
        }
        let hash = self.hasher.hash_name(record.name());
        self.tables
            .update(hash, record.name(), record.block_id(), block_id)
    }

    pub fn update_disk_block(&mut self, record: &Record, block_id: u32) -> bool {
        self.try_update_disk_block(record, block_id).is_ok()
    }

    /// Queues `policy` for the table allocated by the next rehash.
    pub fn change_probing_policy(&mut self, policy: ProbePolicy) {
        self.tables.set_pending_policy(policy);
    }

    pub fn load_factor(&self) -> f64 {
        self.tables.current().load_factor()
    }

    pub fn tombstone_ratio(&self) -> f64 {
        self.tables.current().tombstone_ratio()
    }

    pub fn capacity(&self) -> usize {
        self.tables.current().capacity()
    }

    /// Live records in the current table.
    pub fn len(&self) -> usize {
        self.tables.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.current().is_empty()
    }

    /// Slots of the current table written so far, live or tombstone.
    pub fn occupied(&self) -> usize {
        self.tables.current().occupied()
    }

    pub fn deleted(&self) -> usize {
        self.tables.current().deleted()
    }

    /// Policy the current table probes with.
    pub fn policy(&self) -> ProbePolicy {
        self.tables.current().policy()
    }

    pub fn pending_policy(&self) -> ProbePolicy {
        self.tables.pending_policy()
    }

    pub fn rehash_state(&self) -> RehashState {
        self.tables.state()
    }

    pub fn is_rehashing(&self) -> bool {
        self.rehash_state() != RehashState::Idle
    }

    pub fn has_old_table(&self) -> bool {
        self.tables.old().is_some()
    }

    /// Every live record exactly once, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.tables.iter()
    }
}

//! RehashController: current/old table pair and the transfer cursor.
//!
//! A rehash moves the current table aside as the old table, allocates a
//! fresh current table sized from the live count, and copies live entries
//! over one slice (a quarter of the old capacity) at a time. Only one
//! rehash is ever in flight: the trigger is not evaluated while migrating,
//! and the public path drains the old table before returning.

use crate::bucket_table::BucketTable;
use crate::error::TableError;
use crate::limits::{GROWTH_FACTOR, MAX_LOAD_FACTOR, MAX_TOMBSTONE_RATIO, MIGRATION_SLICES};
use crate::prime::find_next_prime;
use crate::probe::ProbePolicy;
use crate::record::Record;
use log::{debug, trace, warn};

/// Observable phase of the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RehashState {
    Idle,
    Migrating { cursor: usize },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Trigger {
    LoadFactor,
    Tombstones,
}

impl Trigger {
    fn of(table: &BucketTable) -> Option<Trigger> {
        if table.load_factor() > MAX_LOAD_FACTOR {
            Some(Trigger::LoadFactor)
        } else if table.tombstone_ratio() > MAX_TOMBSTONE_RATIO {
            Some(Trigger::Tombstones)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct RehashController {
    current: BucketTable,
    old: Option<BucketTable>,
    cursor: Option<usize>, // None while idle
    pending: ProbePolicy,
}

impl RehashController {
    pub(crate) fn new(capacity: usize, policy: ProbePolicy) -> Self {
        Self {
            current: BucketTable::new(capacity, policy),
            old: None,
            cursor: None,
            pending: policy,
        }
    }

    pub(crate) fn current(&self) -> &BucketTable {
        &self.current
    }

    pub(crate) fn old(&self) -> Option<&BucketTable> {
        self.old.as_ref()
    }

    pub(crate) fn state(&self) -> RehashState {
        match self.cursor {
            Some(cursor) => RehashState::Migrating { cursor },
            None => RehashState::Idle,
        }
    }

    pub(crate) fn pending_policy(&self) -> ProbePolicy {
        self.pending
    }

    /// Takes effect when the next rehash allocates a table.
    pub(crate) fn set_pending_policy(&mut self, policy: ProbePolicy) {
        debug!(
            "probing policy {:?} queued (active {:?})",
            policy,
            self.current.policy()
        );
        self.pending = policy;
    }

    pub(crate) fn insert(&mut self, hash: u64, record: Record) -> Result<(), TableError> {
        if self
            .pending_old_position(hash, record.name(), record.block_id())
            .is_some()
        {
            return Err(TableError::DuplicateKey);
        }
        self.current.insert(hash, record)?;
        self.maybe_rehash();
        Ok(())
    }

    /// Removes from the current table, falling back to the part of the old
    /// table the cursor has not passed yet.
    pub(crate) fn remove(&mut self, hash: u64, name: &str, block_id: u32) -> Result<(), TableError> {
        if self.current.remove(hash, name, block_id).is_ok() {
            self.maybe_rehash();
            return Ok(());
        }

        let i = self
            .pending_old_position(hash, name, block_id)
            .ok_or(TableError::NotFound)?;
        let drain = match self.old.as_mut() {
            Some(old) => {
                old.remove(hash, name, block_id)?;
                debug_assert!(old.find(hash, name, block_id).is_some());
                debug_assert_eq!(old.record_at(i).map(|(_, live)| live), Some(false));
                old.tombstone_ratio() > MAX_TOMBSTONE_RATIO
            }
            None => return Err(TableError::NotFound),
        };
        if drain {
            // Finishing the migration is the rehash of the old table: its
            // tombstones are never copied.
            self.finish();
            self.maybe_rehash();
        }
        Ok(())
    }

    pub(crate) fn update(
        &mut self,
        hash: u64,
        name: &str,
        block_id: u32,
        new_block_id: u32,
    ) -> Result<(), TableError> {
        // The target identity may still wait in the old table.
        if new_block_id != block_id
            && self
                .pending_old_position(hash, name, new_block_id)
                .is_some()
        {
            return Err(TableError::DuplicateKey);
        }
        match self.current.update(hash, name, block_id, new_block_id) {
            Ok(_) => return Ok(()),
            Err(TableError::NotFound) => {}
            Err(e) => return Err(e),
        }

        self.pending_old_position(hash, name, block_id)
            .ok_or(TableError::NotFound)?;
        if self.current.get(hash, name, new_block_id).is_some() {
            return Err(TableError::DuplicateKey);
        }
        match self.old.as_mut() {
            Some(old) => old.update(hash, name, block_id, new_block_id).map(|_| ()),
            None => Err(TableError::NotFound),
        }
    }

    /// Live record from the current table, else from the old one.
    pub(crate) fn get(&self, hash: u64, name: &str, block_id: u32) -> Option<&Record> {
        self.current
            .get(hash, name, block_id)
            .or_else(|| self.old.as_ref()?.get(hash, name, block_id))
    }

    /// Live records of the current table followed by those the cursor has
    /// not reached in the old table.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        let pending = self
            .old
            .as_ref()
            .zip(self.cursor)
            .into_iter()
            .flat_map(|(old, cursor)| old.live_in(cursor..old.capacity()).map(|(_, r)| r));
        self.current.iter().chain(pending)
    }

    /// Starts and completes a rehash if the current table crossed a
    /// threshold and none is in flight.
    pub(crate) fn maybe_rehash(&mut self) -> bool {
        if self.cursor.is_some() {
            return false;
        }
        let Some(trigger) = Trigger::of(&self.current) else {
            return false;
        };
        self.begin(trigger);
        self.finish();
        true
    }

    /// IDLE -> MIGRATING. The current table becomes the old table (any
    /// earlier old table is dropped) and a fresh table sized for the live
    /// entries takes its place under the pending policy.
    pub(crate) fn begin(&mut self, trigger: Trigger) {
        let live = self.current.len();
        let capacity = find_next_prime(GROWTH_FACTOR.saturating_mul(live));
        let fresh = BucketTable::new(capacity, self.pending);
        let old = core::mem::replace(&mut self.current, fresh);
        debug!(
            "rehash started ({:?}): capacity {} -> {}, {} live, {} tombstones, policy {:?} -> {:?}",
            trigger,
            old.capacity(),
            capacity,
            live,
            old.deleted(),
            old.policy(),
            self.pending
        );
        self.old = Some(old);
        self.cursor = Some(0);
    }

    /// Copies the live entries of one slice into the current table and
    /// advances the cursor. Returns true once the old table is drained and
    /// dropped.
    pub(crate) fn step(&mut self) -> bool {
        let (Some(old), Some(cursor)) = (self.old.as_ref(), self.cursor) else {
            return true;
        };
        let old_capacity = old.capacity();
        let end = cursor
            .saturating_add((old_capacity / MIGRATION_SLICES).max(1))
            .min(old_capacity);

        let mut moved = 0usize;
        for (hash, record) in old.live_in(cursor..end) {
            match self.current.insert(hash, record.clone()) {
                Ok(_) => moved += 1,
                Err(e) => warn!("rehash dropped {record}: {e}"),
            }
        }
        trace!("migrated slots {cursor}..{end}: {moved} records");

        if end >= old_capacity {
            self.old = None;
            self.cursor = None;
            debug!(
                "rehash complete: capacity {}, {} live",
                self.current.capacity(),
                self.current.len()
            );
            true
        } else {
            self.cursor = Some(end);
            false
        }
    }

    fn finish(&mut self) {
        while !self.step() {}
    }

    /// Slot in the old table holding a live match the cursor has not passed.
    fn pending_old_position(&self, hash: u64, name: &str, block_id: u32) -> Option<usize> {
        let old = self.old.as_ref()?;
        let cursor = self.cursor?;
        old.find_live(hash, name, block_id).filter(|&i| i >= cursor)
    }
}

//! BucketTable: fixed-capacity open-addressed slot array with tombstones.
//!
//! Callers pass the precomputed name hash with every operation; entries
//! keep the hash they were inserted with so a table can be migrated without
//! hashing again.

use crate::error::TableError;
use crate::probe::ProbePolicy;
use crate::record::Record;
use core::ops::Range;

#[derive(Clone, Debug)]
struct Entry {
    record: Record,
    hash: u64,
}

#[derive(Clone, Debug, Default)]
enum Slot {
    #[default]
    Empty,
    Tombstone(Entry),
    Live(Entry),
}

impl Slot {
    #[inline]
    fn entry(&self) -> Option<&Entry> {
        match self {
            Slot::Empty => None,
            Slot::Tombstone(e) | Slot::Live(e) => Some(e),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BucketTable {
    slots: Vec<Slot>,
    policy: ProbePolicy,
    occupied: usize, // live + tombstones
    deleted: usize,
}

impl BucketTable {
    /// `capacity` is expected to be an already normalized prime.
    pub fn new(capacity: usize, policy: ProbePolicy) -> Self {
        debug_assert!(capacity > 1);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::default);
        Self {
            slots,
            policy,
            occupied: 0,
            deleted: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
    pub fn policy(&self) -> ProbePolicy {
        self.policy
    }
    pub fn occupied(&self) -> usize {
        self.occupied
    }
    pub fn deleted(&self) -> usize {
        self.deleted
    }
    pub fn len(&self) -> usize {
        self.occupied - self.deleted
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn is_full(&self) -> bool {
        self.occupied >= self.capacity()
    }

    /// Live entries over capacity.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Tombstones over occupied slots; zero for a table never written.
    pub fn tombstone_ratio(&self) -> f64 {
        if self.occupied == 0 {
            0.0
        } else {
            self.deleted as f64 / self.occupied as f64
        }
    }

    /// Index of the first slot along the probe sequence whose identity
    /// matches, live or tombstone. Stops at the first empty slot.
    pub fn find(&self, hash: u64, name: &str, block_id: u32) -> Option<usize> {
        self.position(hash, |slot| match slot.entry() {
            Some(e) => e.record.matches(name, block_id),
            None => false,
        })
    }

    /// Live record with the given identity.
    pub fn get(&self, hash: u64, name: &str, block_id: u32) -> Option<&Record> {
        let i = self.find_live(hash, name, block_id)?;
        match &self.slots[i] {
            Slot::Live(e) => Some(&e.record),
            _ => None,
        }
    }

    /// Record stored at `index` and whether it is live.
    pub fn record_at(&self, index: usize) -> Option<(&Record, bool)> {
        match self.slots.get(index)? {
            Slot::Empty => None,
            Slot::Tombstone(e) => Some((&e.record, false)),
            Slot::Live(e) => Some((&e.record, true)),
        }
    }

    /// Writes `record` into the first empty or tombstone slot along its probe
    /// sequence. Fails without mutating if the table is full, no reusable
    /// slot is reachable, or a live record with the same identity exists.
    pub fn insert(&mut self, hash: u64, record: Record) -> Result<usize, TableError> {
        if self.is_full() {
            return Err(TableError::TableFull);
        }
        // The live duplicate may sit past a reusable slot, so scan the
        // whole chain before choosing where to write.
        if self
            .find_live(hash, record.name(), record.block_id())
            .is_some()
        {
            return Err(TableError::DuplicateKey);
        }
        let i = self
            .position(hash, |slot| !matches!(slot, Slot::Live(_)))
            .ok_or(TableError::TableFull)?;
        match self.slots[i] {
            Slot::Empty => self.occupied += 1,
            Slot::Tombstone(_) => self.deleted -= 1,
            Slot::Live(_) => unreachable!("insert position holds a live entry"),
        }
        self.slots[i] = Slot::Live(Entry { record, hash });
        Ok(i)
    }

    /// Tombstones the live record with this identity. Only tombstones (or
    /// nothing) matching is reported as `NotFound`.
    ///
    /// An update can leave a tombstone of an identity ahead of the live slot
    /// that now carries it, so the search skips tombstones.
    pub fn remove(&mut self, hash: u64, name: &str, block_id: u32) -> Result<usize, TableError> {
        let i = self
            .find_live(hash, name, block_id)
            .ok_or(TableError::NotFound)?;
        let slot = &mut self.slots[i];
        *slot = match core::mem::take(slot) {
            Slot::Live(e) => Slot::Tombstone(e),
            other => other,
        };
        self.deleted += 1;
        Ok(i)
    }

    /// Rewrites the block id of a live record in place. The slot stays
    /// valid because probing depends on the name hash only.
    pub fn update(
        &mut self,
        hash: u64,
        name: &str,
        block_id: u32,
        new_block_id: u32,
    ) -> Result<usize, TableError> {
        let i = self
            .find_live(hash, name, block_id)
            .ok_or(TableError::NotFound)?;
        if new_block_id != block_id && self.find_live(hash, name, new_block_id).is_some() {
            return Err(TableError::DuplicateKey);
        }
        if let Slot::Live(e) = &mut self.slots[i] {
            e.record.set_block_id(new_block_id);
        }
        Ok(i)
    }

    /// Live records in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.live_in(0..self.capacity()).map(|(_, r)| r)
    }

    /// Live records in `range` paired with their stored hashes.
    pub(crate) fn live_in(&self, range: Range<usize>) -> impl Iterator<Item = (u64, &Record)> + '_ {
        let end = range.end.min(self.capacity());
        let start = range.start.min(end);
        self.slots[start..end].iter().filter_map(|slot| match slot {
            Slot::Live(e) => Some((e.hash, &e.record)),
            _ => None,
        })
    }

    /// Index of the live slot with this identity, scanning the whole chain
    /// rather than stopping at a same-identity tombstone.
    pub fn find_live(&self, hash: u64, name: &str, block_id: u32) -> Option<usize> {
        self.position(hash, |slot| match slot {
            Slot::Live(e) => e.record.matches(name, block_id),
            _ => false,
        })
    }

    /// First index along the probe sequence where `hit` holds. An empty
    /// slot ends the chain unless `hit` accepts it.
    fn position<F>(&self, hash: u64, mut hit: F) -> Option<usize>
    where
        F: FnMut(&Slot) -> bool,
    {
        for i in self.policy.probe(hash, self.capacity()) {
            let slot = &self.slots[i];
            if hit(slot) {
                return Some(i);
            }
            if matches!(slot, Slot::Empty) {
                return None;
            }
        }
        None
    }
}

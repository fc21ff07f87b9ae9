//! Fixed bounds and thresholds shared by every layer.

/// Smallest capacity a table may have.
pub const MINPRIME: usize = 101;
/// Largest capacity a table may have.
pub const MAXPRIME: usize = 99991;

/// Smallest valid block id (inclusive).
pub const DISKMIN: u32 = 100;
/// Largest valid block id (inclusive).
pub const DISKMAX: u32 = 999_999;

/// A rehash starts once `live / capacity` exceeds this.
pub const MAX_LOAD_FACTOR: f64 = 0.5;
/// A rehash starts once `deleted / occupied` exceeds this.
pub const MAX_TOMBSTONE_RATIO: f64 = 0.8;

/// New capacity is the next prime at or above `GROWTH_FACTOR * live`.
pub const GROWTH_FACTOR: usize = 4;
/// The old table is drained in this many contiguous slices.
pub const MIGRATION_SLICES: usize = 4;

#[inline]
pub fn block_in_range(block_id: u32) -> bool {
    (DISKMIN..=DISKMAX).contains(&block_id)
}

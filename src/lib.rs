//! rehash-table: an open-addressed table of `(name, block_id)` records
//! with tombstone deletion and incremental rehashing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep each layer small enough that its invariants can be checked
//!   in isolation.
//! - Layers:
//!   - BucketTable: a fixed-capacity slot array. Each slot is `Empty`,
//!     `Tombstone(entry)` or `Live(entry)`; probing follows the table's
//!     `ProbePolicy`. Owns the no-duplicate-live-identity invariant.
//!   - RehashController: owns the current table, the old table while a
//!     rehash is in flight, the transfer cursor, and the pending policy.
//!   - RehashTable<H>: public API. Hashes names, checks block ranges, and
//!     forwards to the controller.
//!
//! Constraints
//! - Single-threaded and synchronous; no internal locking.
//! - Capacities are primes in `[MINPRIME, MAXPRIME]`.
//! - Expected failures are values (`TableError` or `false`), never panics,
//!   and leave the table unchanged.
//!
//! Rehashing
//! - Trigger: after an insert or remove, load factor `> 0.5` or tombstone
//!   ratio `> 0.8` on the current table, and no rehash in flight.
//! - The current table moves aside as the old table; a fresh table of
//!   `find_next_prime(4 * live)` slots takes its place under the pending
//!   policy; live entries are copied over in quarter-capacity slices;
//!   tombstones are dropped with the old table.
//! - The triggering call drains the old table before it returns.
//!
//! Hashing
//! - Each entry stores the hash computed at insertion; migration never
//!   calls the user hasher.
//!
//! Notes and non-goals
//! - Keys are exactly `(name, block_id)`; there is no generic key type.
//! - No persistence; no shrinking below `MINPRIME`.

mod bucket_table;
#[cfg(test)]
mod bucket_table_proptest;
mod error;
pub mod hasher;
pub mod limits;
pub mod prime;
pub mod probe;
mod record;
mod rehash;
mod rehash_table;

// Public surface
pub use error::TableError;
pub use hasher::{times33, BuildNameHasher, NameHasher};
pub use probe::ProbePolicy;
pub use record::Record;
pub use rehash::RehashState;
pub use rehash_table::RehashTable;

#[cfg(feature = "bench_internal")]
pub use bucket_table::BucketTable;

use crate::limits::{DISKMAX, DISKMIN};
use thiserror::Error;

/// Why a table operation was refused. A refused operation never mutates
/// the table.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    #[error("block id {0} outside [{min}, {max}]", min = DISKMIN, max = DISKMAX)]
    BlockOutOfRange(u32),
    /// An empty name is reserved for the lookup-miss sentinel.
    #[error("record name is empty")]
    EmptyName,
    #[error("no free slot reachable in table")]
    TableFull,
    #[error("a live record with the same identity already exists")]
    DuplicateKey,
    #[error("no live record with that identity")]
    NotFound,
}

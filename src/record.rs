//! Record payload: a named file pointing at a disk block.

use core::fmt;

/// A `(name, block_id)` pair. Two records are the same entry iff both
/// fields are equal. The default value is the empty sentinel returned by
/// lookups that miss.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Record {
    name: String,
    block_id: u32,
}

impl Record {
    pub fn new(name: impl Into<String>, block_id: u32) -> Self {
        Self {
            name: name.into(),
            block_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn block_id(&self) -> u32 {
        self.block_id
    }

    /// True for the sentinel returned by a failed lookup. Tables refuse
    /// records with an empty name, so a stored record is never empty.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    pub(crate) fn set_block_id(&mut self, block_id: u32) {
        self.block_id = block_id;
    }

    #[inline]
    pub(crate) fn matches(&self, name: &str, block_id: u32) -> bool {
        self.block_id == block_id && self.name == name
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.block_id)
    }
}

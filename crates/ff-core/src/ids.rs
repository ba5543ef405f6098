use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier used across the model graph.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    ///
    /// # Panics
    /// If `index` is `u32::MAX`, which has no `index+1`.
    pub fn from_index(index: u32) -> Self {
        match NonZeroU32::MIN.checked_add(index) {
            Some(raw) => Self(raw),
            None => panic!("id index {index} out of range"),
        }
    }

    /// Create an Id from a `usize` arena position.
    ///
    /// # Panics
    /// If the position does not fit an id. Only the model builder allocates
    /// ids, so this fires while the catalog is assembled.
    pub fn from_usize(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(index) => Self::from_index(index),
            Err(_) => panic!("arena position {index} does not fit a u32 id"),
        }
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Recover the 0-based index as an arena position.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type VarId = Id;
pub type EqId = Id;

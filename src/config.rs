//! Per-table configuration.

use crate::error::TableError;
use crate::hash::HashMode;

/// Smallest bucket count a table is ever created with.
pub const MIN_CAPACITY: usize = 16;
/// Growth is triggered once `len * 100 / capacity` exceeds this.
pub const DEFAULT_MAX_LOAD_PERCENT: usize = 200;
/// Capacity multiplier applied on each growth.
pub const GROW_FACTOR: usize = 2;

/// Settings fixed for a table's lifetime, except `hash_mode`, which only
/// changes through [`ChainMap::rebuild`](crate::ChainMap::rebuild).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TableConfig {
    pub hash_mode: HashMode,
    pub initial_capacity: usize,
    pub max_load_percent: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            hash_mode: HashMode::default(),
            initial_capacity: MIN_CAPACITY,
            max_load_percent: DEFAULT_MAX_LOAD_PERCENT,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hash_mode(mut self, mode: HashMode) -> Self {
        self.hash_mode = mode;
        self
    }

    /// Values below [`MIN_CAPACITY`] are raised to it.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_max_load_percent(mut self, percent: usize) -> Self {
        self.max_load_percent = percent;
        self
    }

    /// Normalized copy used by the table, or an error if unusable.
    pub(crate) fn validated(self) -> Result<Self, TableError> {
        if self.max_load_percent == 0 {
            return Err(TableError::InvalidLoadFactor);
        }
        Ok(Self {
            initial_capacity: self.initial_capacity.max(MIN_CAPACITY),
            ..self
        })
    }
}

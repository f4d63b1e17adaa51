//! chain-hashmap: a single-threaded, separate-chaining hash table keyed by
//! byte strings, with selectable FNV hashing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an O(1) expected-time map whose collision behavior is easy to
//!   observe and to stress with a deliberately weak hash.
//! - Layers:
//!   - `hash`: pure, unseeded 32-bit hash functions (FNV-1a, FNV-1,
//!     Debug) and bucket placement by `hash % capacity`.
//!   - `ChainMap<V>`: bucket array of chain heads over generational
//!     entry slots; insert/get/remove walk one chain comparing full keys.
//!   - `Iter` / `Cursor`: bucket-then-chain traversal, either borrowing
//!     the map or detached with generation checks.
//!   - `Stats`: occupancy and collision figures plus a text dump.
//!
//! Constraints
//! - Keys are copied into the table; values are stored as-is and never
//!   inspected.
//! - Within a chain each key appears at most once; new keys are pushed
//!   at the chain head, so chain order is newest first.
//! - Capacity starts at 16 (or the configured initial capacity) and only
//!   ever doubles.
//!
//! Growth
//! - A new key triggers growth when `len * 100 / capacity` already
//!   exceeds the configured maximum (200 by default) before it is
//!   counted. The bucket for the new key is computed after growing.
//! - Rehash moves slot keys between chains; entries are never copied.
//!   Each entry caches its hash, so growth does not rehash key bytes.
//! - A rehash that fails to move exactly `len` entries panics: it is an
//!   internal invariant violation, not a caller error.
//! - Bucket array allocation failure is reported as
//!   `TableError::OutOfMemory` instead of aborting.
//!
//! Hash mode
//! - The hash function is fixed per table at construction. Switching it
//!   goes through `ChainMap::rebuild`, which re-places every entry, so a
//!   table never holds entries placed under two different functions.
//!
//! Iteration
//! - `iter()` borrows the map, so the compiler rules out mutation while
//!   it lives.
//! - `cursor()` returns a detached `Cursor`. Growth, rebuild, removal and
//!   clear bump a per-table generation; a stale cursor fails with
//!   `IterError::Invalidated` instead of reading moved positions.
//!
//! Notes and non-goals
//! - Not internally synchronized; `&mut self` on every mutation makes
//!   external locking the caller's job.
//! - No ordered iteration, no shrinking, no serialization.

mod chain_map;
#[cfg(test)]
mod chain_map_proptest;
pub mod config;
mod error;
pub mod hash;
mod iter;
mod stats;

// Public surface
pub use chain_map::{ChainMap, Insert};
pub use config::TableConfig;
pub use error::{IterError, TableError};
pub use hash::HashMode;
pub use iter::{Cursor, Iter};
pub use stats::Stats;

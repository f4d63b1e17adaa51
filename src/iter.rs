//! Iteration over a `ChainMap`: a borrowing iterator and a detached cursor.
//!
//! Both scan buckets low to high and each chain head to tail. Order is
//! determined by hashing and chain position, not insertion or key order.

use crate::chain_map::{ChainMap, Entry};
use crate::error::IterError;
use core::iter::FusedIterator;
use slotmap::DefaultKey;

/// Yield the entry at the cursor position and advance past it.
///
/// `pending` is the next entry already located within the current bucket;
/// when absent, buckets are scanned forward from `bucket`.
fn step<'a, V>(
    map: &'a ChainMap<V>,
    bucket: &mut usize,
    pending: &mut Option<DefaultKey>,
) -> Option<&'a Entry<V>> {
    let buckets = map.buckets();
    let k = match pending.take() {
        Some(k) => k,
        None => {
            while *bucket < buckets.len() && buckets[*bucket].is_none() {
                *bucket += 1;
            }
            buckets.get(*bucket).copied().flatten()?
        }
    };
    let e = map.entry(k)?;
    *pending = e.next;
    if e.next.is_none() {
        *bucket += 1;
    }
    Some(e)
}

/// Borrowing iterator over `(key, value)` pairs of a `ChainMap`.
pub struct Iter<'a, V> {
    map: &'a ChainMap<V>,
    bucket: usize,
    pending: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(map: &'a ChainMap<V>) -> Self {
        Self {
            map,
            bucket: 0,
            pending: None,
            remaining: map.len(),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = step(self.map, &mut self.bucket, &mut self.pending)?;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// Cursor that does not borrow its table, for interleaving iteration with
/// other work on the owner's side.
///
/// A cursor remembers which table created it and that table's structural
/// generation. Growth, [`rebuild`](ChainMap::rebuild), removal and
/// [`clear`](ChainMap::clear) bump the generation; the next call to
/// [`Cursor::next`] then fails with [`IterError::Invalidated`] instead of
/// walking stale positions. Inserting without growth keeps the cursor
/// valid, though the new entry may or may not be yielded.
#[derive(Debug, Clone)]
pub struct Cursor {
    table_id: u64,
    generation: u64,
    bucket: usize,
    pending: Option<DefaultKey>,
}

impl Cursor {
    pub(crate) fn new<V>(map: &ChainMap<V>) -> Self {
        Self {
            table_id: map.id(),
            generation: map.generation(),
            bucket: 0,
            pending: None,
        }
    }

    /// Next `(key, value)` pair, or `Ok(None)` once every bucket is scanned.
    #[allow(clippy::should_implement_trait)]
    pub fn next<'a, V>(
        &mut self,
        map: &'a ChainMap<V>,
    ) -> Result<Option<(&'a [u8], &'a V)>, IterError> {
        self.check(map)?;
        Ok(step(map, &mut self.bucket, &mut self.pending).map(|e| (&*e.key, &e.value)))
    }

    /// Whether `next` would be allowed on `map` right now.
    pub fn is_valid_for<V>(&self, map: &ChainMap<V>) -> bool {
        self.check(map).is_ok()
    }

    /// Release the cursor. Equivalent to dropping it.
    pub fn end(self) {}

    fn check<V>(&self, map: &ChainMap<V>) -> Result<(), IterError> {
        if self.table_id != map.id() {
            return Err(IterError::ForeignTable);
        }
        if self.generation != map.generation() {
            return Err(IterError::Invalidated);
        }
        Ok(())
    }
}

//! ChainMap: separate-chaining table over slot-allocated entries.

use crate::config::{TableConfig, GROW_FACTOR, MIN_CAPACITY};
use crate::error::TableError;
use crate::hash::{bucket_index, HashMode};
use crate::iter::{Cursor, Iter};
use slotmap::{DefaultKey, SlotMap};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: Box<[u8]>,
    pub(crate) value: V,
    pub(crate) hash: u32,
    pub(crate) next: Option<DefaultKey>,
}

/// Outcome of [`ChainMap::insert`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Insert<V> {
    /// The key was new; the table grew by one entry.
    Inserted,
    /// The key was present; carries the value it held before.
    Replaced(V),
}

impl<V> Insert<V> {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Insert::Inserted)
    }
}

/// Hash table mapping byte-string keys to values of type `V`.
///
/// Buckets hold the slot key of their chain head; each entry links to its
/// successor. New entries go to the head of their chain. The table doubles
/// its bucket count when a new key arrives while the load is already above
/// `max_load_percent`, and never shrinks.
///
/// Mutation needs `&mut self`, so sharing across threads requires the
/// caller to synchronize externally.
pub struct ChainMap<V> {
    config: TableConfig,
    buckets: Vec<Option<DefaultKey>>,
    slots: SlotMap<DefaultKey, Entry<V>>, // entries keep their slot across rehashes
    id: u64,
    generation: u64,
}

impl<V> ChainMap<V> {
    pub fn new() -> Self {
        Self::with_hash_mode(HashMode::default())
    }

    pub fn with_hash_mode(mode: HashMode) -> Self {
        let config = TableConfig::default().with_hash_mode(mode);
        Self::from_parts(config, vec![None; MIN_CAPACITY])
    }

    /// Build a table from `config`, reporting allocation failure instead of aborting.
    pub fn try_with_config(config: TableConfig) -> Result<Self, TableError> {
        let config = config.validated()?;
        let buckets = alloc_buckets(config.initial_capacity)?;
        Ok(Self::from_parts(config, buckets))
    }

    fn from_parts(config: TableConfig, buckets: Vec<Option<DefaultKey>>) -> Self {
        let id = NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(id, capacity = buckets.len(), mode = ?config.hash_mode, "created chain map");
        Self {
            config,
            buckets,
            slots: SlotMap::with_key(),
            id,
            generation: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }
    pub fn hash_mode(&self) -> HashMode {
        self.config.hash_mode
    }
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Integer load percentage, `len * 100 / capacity`.
    pub fn load_percent(&self) -> usize {
        self.len().saturating_mul(100) / self.capacity()
    }

    /// Insert or overwrite `key`. The key bytes are copied into the table.
    ///
    /// Growth is only considered for new keys and uses the load before the
    /// new entry is counted. If growing fails the table is left unchanged
    /// and `value` is dropped.
    pub fn insert<K: AsRef<[u8]>>(&mut self, key: K, value: V) -> Result<Insert<V>, TableError> {
        let key = key.as_ref();
        let hash = self.config.hash_mode.hash(key);
        let mut idx = bucket_index(hash, self.capacity());
        if let Some(k) = self.find_in_chain(idx, hash, key) {
            let old = std::mem::replace(&mut self.slots[k].value, value);
            return Ok(Insert::Replaced(old));
        }

        if self.load_percent() > self.config.max_load_percent {
            self.grow()?;
            idx = bucket_index(hash, self.capacity());
        }
        let next = self.buckets[idx];
        let k = self.slots.insert(Entry {
            key: key.into(),
            value,
            hash,
            next,
        });
        self.buckets[idx] = Some(k);
        Ok(Insert::Inserted)
    }

    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<&V> {
        let k = self.locate(key.as_ref())?;
        self.slots.get(k).map(|e| &e.value)
    }

    pub fn get_mut<K: AsRef<[u8]>>(&mut self, key: K) -> Option<&mut V> {
        let k = self.locate(key.as_ref())?;
        self.slots.get_mut(k).map(|e| &mut e.value)
    }

    pub fn contains_key<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.locate(key.as_ref()).is_some()
    }

    /// Unlink and drop the entry for `key`, returning its value.
    pub fn remove<K: AsRef<[u8]>>(&mut self, key: K) -> Option<V> {
        let key = key.as_ref();
        let hash = self.config.hash_mode.hash(key);
        let idx = bucket_index(hash, self.capacity());

        let mut prev = None;
        let mut found = None;
        for (k, e) in self.chain(idx) {
            if e.hash == hash && *e.key == *key {
                found = Some((k, e.next));
                break;
            }
            prev = Some(k);
        }
        let (k, next) = found?;
        match prev {
            None => self.buckets[idx] = next,
            Some(p) => self.slots[p].next = next,
        }
        let entry = self.slots.remove(k)?;
        self.bump_generation();
        Some(entry.value)
    }

    /// Drop every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.buckets.fill(None);
        self.bump_generation();
    }

    /// Switch to `mode`, re-placing every entry under the new hash function.
    pub fn rebuild(&mut self, mode: HashMode) -> Result<(), TableError> {
        if mode == self.config.hash_mode {
            return Ok(());
        }
        let buckets = alloc_buckets(self.capacity())?;
        let from = self.config.hash_mode;
        self.config.hash_mode = mode;
        self.relink(buckets, Some(mode));
        tracing::debug!(id = self.id, ?from, to = ?mode, len = self.len(), "rebuilt chain map");
        Ok(())
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self)
    }

    /// Detached cursor over this table; see [`Cursor`].
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self)
    }

    fn grow(&mut self) -> Result<(), TableError> {
        let old = self.capacity();
        let new_cap = old
            .checked_mul(GROW_FACTOR)
            .ok_or(TableError::CapacityOverflow)?;
        let buckets = alloc_buckets(new_cap)?;
        self.relink(buckets, None);
        tracing::debug!(
            id = self.id,
            old_capacity = old,
            new_capacity = new_cap,
            len = self.len(),
            "rehashed chain map"
        );
        Ok(())
    }

    /// Move every entry into `new_buckets`, walking old buckets low to high
    /// and each chain head to tail. With `rehash`, cached hashes are
    /// recomputed under that mode first.
    fn relink(&mut self, mut new_buckets: Vec<Option<DefaultKey>>, rehash: Option<HashMode>) {
        let cap = new_buckets.len();
        let mut moved = 0usize;
        for head in std::mem::take(&mut self.buckets) {
            let mut cur = head;
            while let Some(k) = cur {
                let e = &mut self.slots[k];
                cur = e.next;
                if let Some(mode) = rehash {
                    e.hash = mode.hash(&e.key);
                }
                let idx = bucket_index(e.hash, cap);
                e.next = new_buckets[idx];
                new_buckets[idx] = Some(k);
                moved += 1;
            }
        }
        assert_eq!(moved, self.slots.len(), "rehash lost or duplicated entries");
        self.buckets = new_buckets;
        self.bump_generation();
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn locate(&self, key: &[u8]) -> Option<DefaultKey> {
        let hash = self.config.hash_mode.hash(key);
        self.find_in_chain(bucket_index(hash, self.capacity()), hash, key)
    }

    fn find_in_chain(&self, idx: usize, hash: u32, key: &[u8]) -> Option<DefaultKey> {
        self.chain(idx)
            .find(|(_, e)| e.hash == hash && *e.key == *key)
            .map(|(k, _)| k)
    }

    pub(crate) fn chain(&self, idx: usize) -> Chain<'_, V> {
        Chain {
            slots: &self.slots,
            cur: self.buckets[idx],
        }
    }

    pub(crate) fn buckets(&self) -> &[Option<DefaultKey>] {
        &self.buckets
    }

    pub(crate) fn entry(&self, k: DefaultKey) -> Option<&Entry<V>> {
        self.slots.get(k)
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

impl<V> Default for ChainMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: core::fmt::Debug> core::fmt::Debug for ChainMap<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (String::from_utf8_lossy(k), v)))
            .finish()
    }
}

impl<'a, V> IntoIterator for &'a ChainMap<V> {
    type Item = (&'a [u8], &'a V);
    type IntoIter = Iter<'a, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Walks one bucket's chain from head to tail.
pub(crate) struct Chain<'a, V> {
    slots: &'a SlotMap<DefaultKey, Entry<V>>,
    cur: Option<DefaultKey>,
}

impl<'a, V> Iterator for Chain<'a, V> {
    type Item = (DefaultKey, &'a Entry<V>);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let e = self.slots.get(k)?;
        self.cur = e.next;
        Some((k, e))
    }
}

fn alloc_buckets(n: usize) -> Result<Vec<Option<DefaultKey>>, TableError> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(n)
        .map_err(|_| TableError::OutOfMemory { buckets: n })?;
    buckets.resize(n, None);
    Ok(buckets)
}

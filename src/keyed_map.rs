//! KeyedMap: buckets of entries indexed by strategy-supplied hash codes.

use crate::entry::Entry;
use crate::error::KeyedMapError;
use crate::frozen::FrozenKeyedMap;
use crate::iter::{Iter, Keys, Values};
use crate::key_set::KeySet;
use crate::strategy::{Delegating, EqualityStrategy, Equivalence, Identity};
use crate::value::{HashCode, HashedValueType};
use core::fmt;
use core::hash::BuildHasher;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;
use tracing::trace;

/// All entries sharing one hash code, in insertion order minus removals.
#[derive(Clone, Debug)]
pub(crate) struct Bucket<K, V> {
    pub(crate) hash: HashCode,
    pub(crate) entries: Vec<Entry<K, V>>,
}

/// Outcome of [`KeyedMap::locate`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Located {
    /// The key is stored at `entries[slot]` of `bucket`.
    Found { bucket: DefaultKey, slot: usize },
    /// The key is absent. `bucket` is the existing bucket for `hash`, if any.
    Vacant {
        hash: HashCode,
        bucket: Option<DefaultKey>,
    },
}

/// A map whose keys are hashed and compared by an [`EqualityStrategy`], and
/// whose values are compared by an [`Equivalence`].
///
/// By default keys use their own `PartialEq` + [`HashedValueType`]
/// ([`Delegating`]) and values are compared by address ([`Identity`]).
///
/// Keys with equal hash codes share a bucket and are told apart by a linear
/// scan in insertion order. Removing an entry shifts the later entries of its
/// bucket down; there are no tombstones.
///
/// Cursors returned by [`iter`](Self::iter), [`keys`](Self::keys) and
/// [`values`](Self::values) borrow the map, so it cannot be mutated while
/// one is alive.
pub struct KeyedMap<K, V, KS = Delegating, VS = Identity> {
    index_hasher: RandomState,
    index: HashTable<DefaultKey>,
    buckets: SlotMap<DefaultKey, Bucket<K, V>>,
    len: usize,
    key_strategy: KS,
    value_strategy: VS,
}

impl<K, V> KeyedMap<K, V>
where
    K: HashedValueType,
{
    /// Create an empty map keyed by the keys' own equality and hash codes.
    pub fn new() -> Self {
        Self::with_strategies(Delegating, Identity)
    }
}

impl<K, V> Default for KeyedMap<K, V>
where
    K: HashedValueType,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, KS> KeyedMap<K, V, KS, Identity>
where
    KS: EqualityStrategy<K>,
{
    /// Create an empty map with a custom key strategy and identity values.
    pub fn with_key_strategy(key_strategy: KS) -> Self {
        Self::with_strategies(key_strategy, Identity)
    }
}

impl<K, V, KS, VS> KeyedMap<K, V, KS, VS>
where
    KS: EqualityStrategy<K>,
    VS: Equivalence<V>,
{
    /// Create an empty map with explicit key and value strategies.
    pub fn with_strategies(key_strategy: KS, value_strategy: VS) -> Self {
        Self {
            index_hasher: RandomState::new(),
            index: HashTable::new(),
            buckets: SlotMap::with_key(),
            len: 0,
            key_strategy,
            value_strategy,
        }
    }

    pub fn key_strategy(&self) -> &KS {
        &self.key_strategy
    }

    pub fn value_strategy(&self) -> &VS {
        &self.value_strategy
    }

    #[inline]
    fn index_hash(&self, hash: HashCode) -> u64 {
        self.index_hasher.hash_one(hash)
    }

    /// Number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct hash codes currently in use.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entries stored under `hash`, in scan order.
    pub fn bucket(&self, hash: HashCode) -> Option<&[Entry<K, V>]> {
        let &b = self
            .index
            .find(self.index_hash(hash), |&b| self.bucket_has_hash(b, hash))?;
        self.buckets.get(b).map(|b| b.entries.as_slice())
    }

    fn bucket_has_hash(&self, bucket: DefaultKey, hash: HashCode) -> bool {
        self.buckets
            .get(bucket)
            .map(|b| b.hash == hash)
            .unwrap_or(false)
    }

    /// Hash `key`, find its bucket and scan it for the first equal key.
    ///
    /// Every lookup and mutation goes through here. Fails only when the key
    /// strategy cannot hash `key`.
    pub(crate) fn locate(&self, key: &K) -> Result<Located, KeyedMapError> {
        let hash = self.key_strategy.hash_code(key)?;
        let Some(&bucket) = self
            .index
            .find(self.index_hash(hash), |&b| self.bucket_has_hash(b, hash))
        else {
            return Ok(Located::Vacant { hash, bucket: None });
        };
        let slot = self.buckets.get(bucket).and_then(|b| {
            b.entries
                .iter()
                .position(|e| self.key_strategy.equals(key, e.key()))
        });
        Ok(match slot {
            Some(slot) => Located::Found { bucket, slot },
            None => Located::Vacant {
                hash,
                bucket: Some(bucket),
            },
        })
    }

    // A key the strategy cannot hash was never stored, so it reads as absent.
    fn found(&self, key: &K) -> Option<(DefaultKey, usize)> {
        match self.locate(key) {
            Ok(Located::Found { bucket, slot }) => Some((bucket, slot)),
            _ => None,
        }
    }

    fn entry(&self, key: &K) -> Option<&Entry<K, V>> {
        let (bucket, slot) = self.found(key)?;
        self.buckets.get(bucket)?.entries.get(slot)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entry(key).map(Entry::value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let (bucket, slot) = self.found(key)?;
        self.buckets
            .get_mut(bucket)?
            .entries
            .get_mut(slot)
            .map(Entry::value_mut)
    }

    /// The stored key (not `key` itself) together with its value.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.entry(key).map(|e| (e.key(), e.value()))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.found(key).is_some()
    }

    #[inline]
    pub fn has(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    /// Map `key` to `value`. An existing entry keeps its stored key and only
    /// has its value replaced.
    ///
    /// Returns the previous value, or `None` for a new key. Unlike Java's
    /// `put`, the inserted value is not handed back: it has been moved into
    /// the map. Use [`set`](Self::set) to chain insertions.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>, KeyedMapError> {
        match self.locate(&key)? {
            Located::Found { bucket, slot } => {
                Ok(Some(self.buckets[bucket].entries[slot].replace_value(value)))
            }
            Located::Vacant {
                bucket: Some(bucket),
                ..
            } => {
                self.buckets[bucket].entries.push(Entry::new(key, value));
                self.len += 1;
                Ok(None)
            }
            Located::Vacant { hash, bucket: None } => {
                self.push_bucket(hash, vec![Entry::new(key, value)]);
                Ok(None)
            }
        }
    }

    /// Same as [`put`](Self::put) but returns the map for chaining.
    pub fn set(&mut self, key: K, value: V) -> Result<&mut Self, KeyedMapError> {
        self.put(key, value)?;
        Ok(self)
    }

    // Caller guarantees no bucket exists for `hash` yet.
    fn push_bucket(&mut self, hash: HashCode, entries: Vec<Entry<K, V>>) {
        self.len += entries.len();
        let bucket = self.buckets.insert(Bucket { hash, entries });
        let buckets = &self.buckets;
        let hasher = &self.index_hasher;
        let _ = self.index.insert_unique(hasher.hash_one(hash), bucket, |&b| {
            buckets.get(b).map(|b| hasher.hash_one(b.hash)).unwrap_or(0)
        });
        trace!(hash, "created bucket");
    }

    fn release_bucket(&mut self, bucket: DefaultKey) {
        if let Some(b) = self.buckets.remove(bucket) {
            let h = self.index_hash(b.hash);
            if let Ok(occupied) = self.index.find_entry(h, |&k| k == bucket) {
                let _ = occupied.remove();
            }
            trace!(hash = b.hash, "released empty bucket");
        }
    }

    /// Excise the entry for `key`, returning the stored key and its value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let (bucket, slot) = self.found(key)?;
        let b = &mut self.buckets[bucket];
        let entry = b.entries.remove(slot);
        let emptied = b.entries.is_empty();
        self.len -= 1;
        if emptied {
            self.release_bucket(bucket);
        }
        Some(entry.into_pair())
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Like [`remove`](Self::remove) but only reports whether anything was
    /// removed.
    pub fn delete(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    pub fn clear(&mut self) {
        trace!(len = self.len, buckets = self.buckets.len(), "clearing map");
        self.index.clear();
        self.buckets.clear();
        self.len = 0;
    }

    /// Linear scan comparing every value with the value strategy.
    pub fn contains_value(&self, value: &V) -> bool {
        self.values().any(|v| self.value_strategy.equals(v, value))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.buckets.values(), self.len)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Call `f(value, key, map)` for every entry, in [`iter`](Self::iter)
    /// order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&V, &K, &Self),
    {
        for (k, v) in self.iter() {
            f(v, k, self);
        }
    }

    /// Snapshot of the current keys, deduplicated by the key strategy.
    pub fn key_set(&self) -> KeySet<K, KS>
    where
        K: Clone,
        KS: Clone,
    {
        let mut set = KeyedMap::with_strategies(self.key_strategy.clone(), Identity);
        for b in self.buckets.values() {
            let entries = b
                .entries
                .iter()
                .map(|e| Entry::new(e.key().clone(), ()))
                .collect();
            set.push_bucket(b.hash, entries);
        }
        KeySet::from_map(set)
    }

    /// `set` every pair yielded by `pairs`. Stops at the first failure;
    /// pairs applied before it stay applied.
    pub fn try_extend<I>(&mut self, pairs: I) -> Result<(), KeyedMapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in pairs {
            self.set(k, v)?;
        }
        Ok(())
    }

    /// Copy every pair of `other` into this map, overwriting existing keys.
    pub fn put_all<KS2, VS2>(
        &mut self,
        other: &KeyedMap<K, V, KS2, VS2>,
    ) -> Result<(), KeyedMapError>
    where
        K: Clone,
        V: Clone,
        KS2: EqualityStrategy<K>,
        VS2: Equivalence<V>,
    {
        trace!(incoming = other.len(), len = self.len, "put_all");
        self.try_extend(other.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    /// A map is equal to itself. Maps whose key or value strategies differ
    /// (see [`Equivalence::same_strategy`]) are never equal. Comparing the
    /// contents of two distinct maps with the same strategies is not
    /// supported.
    pub fn equals(&self, other: &Self) -> Result<bool, KeyedMapError> {
        if core::ptr::eq(self, other) {
            return Ok(true);
        }
        if !self.key_strategy.same_strategy(&other.key_strategy)
            || !self.value_strategy.same_strategy(&other.value_strategy)
        {
            return Ok(false);
        }
        Err(KeyedMapError::Unsupported("structural equality of keyed maps"))
    }

    /// A mutable map has no stable hash code. See
    /// [`FrozenKeyedMap::hash_code`].
    pub fn hash_code(&self) -> Result<HashCode, KeyedMapError> {
        Err(KeyedMapError::InvalidState(
            "hash_code of a mutable map is unstable",
        ))
    }

    pub fn entry_set(&self) -> Result<Vec<(&K, &V)>, KeyedMapError> {
        Err(KeyedMapError::Unsupported("entry_set"))
    }

    /// Mark the map read-only.
    pub fn freeze(self) -> FrozenKeyedMap<K, V, KS, VS> {
        trace!(len = self.len, "freezing map");
        FrozenKeyedMap::new(self)
    }
}

impl<K: Clone, V: Clone, KS: Clone, VS: Clone> Clone for KeyedMap<K, V, KS, VS> {
    fn clone(&self) -> Self {
        Self {
            index_hasher: self.index_hasher.clone(),
            index: self.index.clone(),
            buckets: self.buckets.clone(),
            len: self.len,
            key_strategy: self.key_strategy.clone(),
            value_strategy: self.value_strategy.clone(),
        }
    }
}

impl<K, V, KS, VS> fmt::Display for KeyedMap<K, V, KS, VS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{KeyedMap}")
    }
}

impl<K: fmt::Debug, V: fmt::Debug, KS, VS> fmt::Debug for KeyedMap<K, V, KS, VS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.buckets
                    .values()
                    .flat_map(|b| b.entries.iter().map(|e| (e.key(), e.value()))),
            )
            .finish()
    }
}

impl<'a, K, V, KS, VS> IntoIterator for &'a KeyedMap<K, V, KS, VS>
where
    KS: EqualityStrategy<K>,
    VS: Equivalence<V>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

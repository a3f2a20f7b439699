//! Snapshot of a map's keys.

use crate::iter::Keys;
use crate::keyed_map::KeyedMap;
use crate::strategy::{EqualityStrategy, Identity};
use core::fmt;

/// Keys copied out of a `KeyedMap` at one point in time. Membership uses the
/// same key strategy as the map it came from. Later changes to the map are
/// not reflected.
pub struct KeySet<K, KS> {
    map: KeyedMap<K, (), KS, Identity>,
}

impl<K, KS> KeySet<K, KS>
where
    KS: EqualityStrategy<K>,
{
    pub(crate) fn from_map(map: KeyedMap<K, (), KS, Identity>) -> Self {
        Self { map }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn iter(&self) -> Keys<'_, K, ()> {
        self.map.keys()
    }
}

impl<K: Clone, KS: Clone> Clone for KeySet<K, KS> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<K: fmt::Debug, KS> fmt::Debug for KeySet<K, KS>
where
    KS: EqualityStrategy<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, K, KS> IntoIterator for &'a KeySet<K, KS>
where
    KS: EqualityStrategy<K>,
{
    type Item = &'a K;
    type IntoIter = Keys<'a, K, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

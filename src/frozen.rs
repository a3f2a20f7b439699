//! Read-only form of a `KeyedMap`.

use crate::error::KeyedMapError;
use crate::keyed_map::KeyedMap;
use crate::strategy::{EqualityStrategy, Equivalence};
use crate::value::HashCode;
use core::fmt;
use core::ops::Deref;
use tracing::trace;

/// A map that can no longer be mutated. Reads go through `Deref`.
///
/// Being frozen is the precondition for a map hash code; computing it is not
/// implemented, so [`hash_code`](Self::hash_code) still fails, but with
/// `Unsupported` rather than the `InvalidState` of a mutable map.
pub struct FrozenKeyedMap<K, V, KS, VS> {
    map: KeyedMap<K, V, KS, VS>,
}

impl<K, V, KS, VS> FrozenKeyedMap<K, V, KS, VS>
where
    KS: EqualityStrategy<K>,
    VS: Equivalence<V>,
{
    pub(crate) fn new(map: KeyedMap<K, V, KS, VS>) -> Self {
        Self { map }
    }

    pub fn hash_code(&self) -> Result<HashCode, KeyedMapError> {
        Err(KeyedMapError::Unsupported("hash_code of a keyed map"))
    }

    /// Give the map back in mutable form.
    pub fn thaw(self) -> KeyedMap<K, V, KS, VS> {
        trace!(len = self.map.len(), "thawing map");
        self.map
    }
}

impl<K, V, KS, VS> Deref for FrozenKeyedMap<K, V, KS, VS> {
    type Target = KeyedMap<K, V, KS, VS>;

    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

impl<K: Clone, V: Clone, KS: Clone, VS: Clone> Clone for FrozenKeyedMap<K, V, KS, VS> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<K, V, KS, VS> fmt::Display for FrozenKeyedMap<K, V, KS, VS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.map, f)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, KS, VS> fmt::Debug for FrozenKeyedMap<K, V, KS, VS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.map, f)
    }
}

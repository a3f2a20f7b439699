//! keyed-map: a single-threaded hash map whose keys and values bring their
//! own notion of equality and hash code.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: key a map by caller-defined equality rather than `Eq + Hash`,
//!   the way Java collections defer to `equals`/`hashCode`.
//! - Pieces:
//!   - `EqualityStrategy<T>` / `Equivalence<T>`: the pluggable comparator.
//!     `Delegating` forwards to the value (`PartialEq` + `HashedValueType`),
//!     `Identity` compares addresses, `FnStrategy` wraps two closures.
//!   - `KeyedMap<K, V, KS, VS>`: buckets of `Entry` values indexed by the
//!     key strategy's hash code. `VS` only ever compares values.
//!   - `Iter` / `Keys` / `Values`: single-pass cursors over the buckets.
//!   - `KeySet`: snapshot of the keys; `FrozenKeyedMap`: read-only form.
//!
//! Storage
//! - A `hashbrown::HashTable` maps each hash code to a `slotmap` arena key;
//!   the arena slot holds the bucket, a `Vec<Entry<K, V>>` in insertion
//!   order. Distinct keys with equal hash codes share a bucket.
//! - Lookups hash once, then scan the bucket linearly; first match wins.
//! - Removal shifts later entries down (order of survivors is kept). A
//!   bucket that becomes empty is released from both index and arena.
//! - There is no resizing policy of our own; the index grows as hashbrown
//!   decides.
//!
//! Locate
//! - `KeyedMap::locate` is the only place keys are hashed and compared. It
//!   returns a `Located` value (found slot, or vacant with the bucket to
//!   append to), so no state is carried between calls and a strategy may
//!   read the map while a lookup is running.
//!
//! Constraints
//! - Single-threaded use: no internal locking. The borrow checker keeps
//!   cursors from outliving a mutation.
//! - Strategies are trusted: `equals(a, b)` must imply equal hash codes.
//!   Violations make keys unreachable; they are not detected.
//! - A key whose hash code is undefined is rejected on insertion
//!   (`KeyedMapError::IneligibleKey`) and reads as absent on lookup.
//!
//! Notes and non-goals
//! - `hash_code` of a map and `entry_set` are not implemented and always
//!   return an error. `equals` between two distinct maps is `false` when
//!   their strategies differ and an error otherwise.
//! - No persistence and no concurrency control.

mod entry;
mod error;
mod frozen;
mod iter;
mod key_set;
mod keyed_map;
mod keyed_map_proptest;
mod strategy;
mod value;

// Public surface
pub use entry::Entry;
pub use error::KeyedMapError;
pub use frozen::FrozenKeyedMap;
pub use iter::{Iter, Keys, Values};
pub use key_set::KeySet;
pub use keyed_map::KeyedMap;
pub use strategy::{Delegating, EqualityStrategy, Equivalence, FnStrategy, Identity};
pub use value::{HashCode, HashedValueType};

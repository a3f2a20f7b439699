#![cfg(test)]

// Property tests for KeyedMap kept inside the crate so they can look at
// bucket layout through crate-private paths.

use crate::keyed_map::{KeyedMap, Located};
use crate::strategy::Delegating;
use crate::value::{HashCode, HashedValueType};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fmt;

// Key whose hash code is deliberately weak so most operations run against
// multi-entry buckets: length mod 3, or 0 for every key when `constant`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd)]
struct Key {
    name: String,
    constant: bool,
}
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}
impl HashedValueType for Key {
    fn hash_code(&self) -> Option<HashCode> {
        if self.constant {
            Some(0)
        } else {
            Some((self.name.len() % 3) as HashCode)
        }
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Set(usize, i32),
    Remove(usize),
    Delete(usize),
    Get(usize),
    Contains(String),
    ContainsValue(i32),
    Mutate(usize, i32),
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize, constant: bool) -> Key {
    Key {
        name: pool[i].clone(),
        constant,
    }
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), -50i32..50).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => (idx.clone(), -50i32..50).prop_map(|(i, v)| OpI::Set(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Delete),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (-50i32..50).prop_map(OpI::ContainsValue),
            1 => (idx.clone(), -5i32..5).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Insertion-ordered association list: re-insert updates in place, removal
// keeps the order of the rest. Filtering it by hash gives the expected
// content of each bucket.
#[derive(Default)]
struct Model(Vec<(Key, i32)>);

impl Model {
    fn position(&self, k: &Key) -> Option<usize> {
        self.0.iter().position(|(mk, _)| mk == k)
    }
    fn put(&mut self, k: Key, v: i32) -> Option<i32> {
        match self.position(&k) {
            Some(i) => Some(std::mem::replace(&mut self.0[i].1, v)),
            None => {
                self.0.push((k, v));
                None
            }
        }
    }
    fn remove(&mut self, k: &Key) -> Option<i32> {
        self.position(k).map(|i| self.0.remove(i).1)
    }
    fn get(&self, k: &Key) -> Option<i32> {
        self.position(k).map(|i| self.0[i].1)
    }
    fn bucket(&self, hash: HashCode) -> Vec<Key> {
        self.0
            .iter()
            .filter(|(k, _)| k.hash_code() == Some(hash))
            .map(|(k, _)| k.clone())
            .collect()
    }
}

// Property: State-machine equivalence against an insertion-ordered model.
// Invariants exercised across random operation sequences:
// - `put` returns the previous value; `set` chains; `len` only grows on new keys.
// - `remove`/`delete` agree with the model and never change `len` when absent.
// - `get`/`contains_key` agree with `locate`.
// - Each bucket holds exactly the model keys of that hash, in insertion order.
// - Cursors yield `len` items and agree with each other.
// Runs once with the mod-3 hash and once with every key in one bucket.
fn run_scenario(
    pool: &[String],
    ops: Vec<OpI>,
    constant: bool,
) -> Result<(), TestCaseError> {
    let mut sut: KeyedMap<Key, i32, Delegating, Delegating> =
        KeyedMap::with_strategies(Delegating, Delegating);
    let mut model = Model::default();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = key_from(pool, i, constant);
                let before = sut.len();
                let prev = sut.put(k.clone(), v).expect("keys are always hashable");
                prop_assert_eq!(prev, model.put(k, v));
                prop_assert_eq!(sut.len(), before + usize::from(prev.is_none()));
            }
            OpI::Set(i, v) => {
                let k = key_from(pool, i, constant);
                let m = sut.set(k.clone(), v).expect("keys are always hashable");
                prop_assert_eq!(m.get(&k), Some(&v));
                model.put(k, v);
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i, constant);
                let before = sut.len();
                let removed = sut.remove(&k);
                prop_assert_eq!(removed, model.remove(&k));
                prop_assert_eq!(sut.len() + usize::from(removed.is_some()), before);
            }
            OpI::Delete(i) => {
                let k = key_from(pool, i, constant);
                prop_assert_eq!(sut.delete(&k), model.remove(&k).is_some());
            }
            OpI::Get(i) => {
                let k = key_from(pool, i, constant);
                let got = sut.get(&k).copied();
                prop_assert_eq!(got, model.get(&k));
                let found = matches!(sut.locate(&k), Ok(Located::Found { .. }));
                prop_assert_eq!(found, got.is_some());
            }
            OpI::Contains(s) => {
                let k = Key { name: s, constant };
                prop_assert_eq!(sut.contains_key(&k), model.position(&k).is_some());
                prop_assert_eq!(sut.has(&k), sut.contains_key(&k));
            }
            OpI::ContainsValue(v) => {
                let expected = model.0.iter().any(|(_, mv)| *mv == v);
                prop_assert_eq!(sut.contains_value(&v), expected);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i, constant);
                if let Some(v) = sut.get_mut(&k) {
                    *v = v.saturating_add(d);
                    let mv = model.get(&k).expect("model agrees on presence");
                    model.put(k, mv.saturating_add(d));
                } else {
                    prop_assert!(model.get(&k).is_none());
                }
            }
            OpI::Clear => {
                sut.clear();
                model.0.clear();
            }
            OpI::Iterate => {
                let pairs: Vec<(Key, i32)> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let keys: Vec<Key> = sut.keys().cloned().collect();
                let values: Vec<i32> = sut.values().copied().collect();
                prop_assert_eq!(pairs.len(), sut.len());
                prop_assert_eq!(
                    pairs.iter().map(|(k, _)| k.clone()).collect::<Vec<_>>(),
                    keys
                );
                prop_assert_eq!(
                    pairs.iter().map(|(_, v)| *v).collect::<Vec<_>>(),
                    values
                );
                let s_keys: BTreeSet<_> = pairs.into_iter().collect();
                let m_keys: BTreeSet<_> = model.0.iter().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        for hash in 0..3 {
            let stored: Vec<Key> = sut
                .bucket(hash)
                .map(|b| b.iter().map(|e| e.key().clone()).collect())
                .unwrap_or_default();
            prop_assert_eq!(stored, model.bucket(hash));
        }
        if constant {
            prop_assert!(sut.bucket_count() <= 1);
        }
        prop_assert_eq!(sut.len(), model.0.len());
        prop_assert_eq!(sut.is_empty(), model.0.is_empty());
        prop_assert_eq!(sut.iter().count(), sut.len());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(&pool, ops, false)?;
    }

    #[test]
    fn prop_state_machine_constant_hash((pool, ops) in arb_scenario()) {
        run_scenario(&pool, ops, true)?;
    }
}

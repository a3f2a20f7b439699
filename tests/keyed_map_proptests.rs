// KeyedMap property tests (consolidated).
//
// Property 1: accounting and presence match a std HashMap model.
//  - Model: HashMap<String, i32>.
//  - Invariant: len() == model.len(); has(k) iff model has k.
//  - Operations: put, delete.
//
// Property 2: clone isolation.
//  - After clone, both maps hold the same pairs; edits applied to the clone
//    leave the source equal to its snapshot.
//
// Property 3: put_all overwrite law.
//  - Every key of `other` maps to `other`'s value afterwards; keys only in
//    the target keep their value.
//
// Property 4: cursor consistency under heavy collisions.
//  - keys(), values() and iter() yield len() items and line up index by index.
use keyed_map::{HashCode, HashedValueType, KeyedMap};
use proptest::prelude::*;
use std::collections::HashMap;

fn entries() -> impl Strategy<Value = Vec<(String, i32)>> {
    proptest::collection::vec(("[a-d]{1,3}", any::<i32>()), 0..40)
}

fn build(pairs: &[(String, i32)]) -> KeyedMap<String, i32> {
    let mut m = KeyedMap::new();
    for (k, v) in pairs {
        m.put(k.clone(), *v).unwrap();
    }
    m
}

// Property 1: presence and len follow insert/delete.
proptest! {
    #[test]
    fn prop_insert_delete_accounting(
        ops in proptest::collection::vec((any::<bool>(), "[a-c]{1,2}", any::<i32>()), 1..100)
    ) {
        let mut m: KeyedMap<String, i32> = KeyedMap::new();
        let mut model: HashMap<String, i32> = HashMap::new();
        for (insert, k, v) in ops {
            if insert {
                let prev = m.put(k.clone(), v).unwrap();
                prop_assert_eq!(prev, model.insert(k.clone(), v));
                prop_assert_eq!(m.get(&k), Some(&v));
            } else {
                prop_assert_eq!(m.delete(&k), model.remove(&k).is_some());
                prop_assert!(!m.has(&k));
            }
            prop_assert_eq!(m.len(), model.len());
        }
        for (k, v) in &model {
            prop_assert_eq!(m.get(k), Some(v));
        }
    }
}

// Property 2: clone isolation.
proptest! {
    #[test]
    fn prop_clone_is_isolated(pairs in entries(), edits in entries()) {
        let source = build(&pairs);
        let snapshot: HashMap<String, i32> =
            source.iter().map(|(k, v)| (k.clone(), *v)).collect();

        let mut copy = source.clone();
        prop_assert_eq!(copy.len(), source.len());
        for (k, v) in &edits {
            if *v % 2 == 0 {
                copy.put(k.clone(), *v).unwrap();
            } else {
                copy.delete(k);
            }
        }

        prop_assert_eq!(source.len(), snapshot.len());
        for (k, v) in &snapshot {
            prop_assert_eq!(source.get(k), Some(v));
        }
    }
}

// Property 3: put_all overwrite law.
proptest! {
    #[test]
    fn prop_put_all_overwrites(base in entries(), other in entries()) {
        let mut target = build(&base);
        let before: HashMap<String, i32> =
            target.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let other = build(&other);

        target.put_all(&other).unwrap();

        for (k, v) in other.iter() {
            prop_assert_eq!(target.get(k), Some(v));
        }
        for (k, v) in &before {
            if !other.has(k) {
                prop_assert_eq!(target.get(k), Some(v));
            }
        }
        let union = before.keys().filter(|k| !other.has(k)).count() + other.len();
        prop_assert_eq!(target.len(), union);
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Coarse(u16);

impl HashedValueType for Coarse {
    fn hash_code(&self) -> Option<HashCode> {
        Some((self.0 % 4) as HashCode)
    }
}

// Property 4: cursors agree under collisions.
proptest! {
    #[test]
    fn prop_cursors_line_up(
        ids in proptest::collection::vec(0u16..64, 0..60),
        drop_every in 2usize..5
    ) {
        let mut m: KeyedMap<Coarse, u16> = KeyedMap::new();
        for id in &ids {
            m.put(Coarse(*id), id * 2).unwrap();
        }
        for (i, id) in ids.iter().enumerate() {
            if i % drop_every == 0 {
                m.delete(&Coarse(*id));
            }
        }

        let keys: Vec<&Coarse> = m.keys().collect();
        let values: Vec<&u16> = m.values().collect();
        let pairs: Vec<(&Coarse, &u16)> = m.iter().collect();
        prop_assert_eq!(keys.len(), m.len());
        prop_assert_eq!(values.len(), m.len());
        prop_assert_eq!(pairs.len(), m.len());
        for i in 0..pairs.len() {
            prop_assert!(std::ptr::eq(pairs[i].0, keys[i]));
            prop_assert!(std::ptr::eq(pairs[i].1, values[i]));
            prop_assert_eq!(*pairs[i].1, pairs[i].0 .0 * 2);
        }
        prop_assert!(m.bucket_count() <= 4);
    }
}

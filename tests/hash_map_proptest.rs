// HashMap model-based property tests.
//
// Property 1: any sequence of insert/erase/clear/rehash/get_or_default
// leaves the map holding exactly the pairs of a BTreeMap driven by the
// same sequence.
//  - Invariant after each step: len(), is_empty(), contains_key() and
//    at() agree with the model; bucket_count() only moves on rehash.
//  - Final check: a cursor walk from begin() to end() yields every
//    model pair exactly once.
//
// Property 2: erasing through a cursor never disturbs other cursors.
//
// Property 3: equality depends only on the stored pairs, not on bucket
// count, insertion order or the hash function.
use std::collections::{BTreeMap, BTreeSet};

use chained_hashmap::{Error, HashMap};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, i32),
    Erase(u8),
    EraseAt(u8),
    Clear,
    Rehash(usize),
    Bump(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (any::<u8>(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k % 32, v)),
        3 => any::<u8>().prop_map(|k| Op::Erase(k % 32)),
        2 => any::<u8>().prop_map(|k| Op::EraseAt(k % 32)),
        1 => Just(Op::Clear),
        1 => (0usize..40).prop_map(Op::Rehash),
        2 => any::<u8>().prop_map(|k| Op::Bump(k % 32)),
    ]
}

fn walk(map: &HashMap<u8, i32>) -> BTreeMap<u8, i32> {
    let mut seen = BTreeMap::new();
    let mut cursor = map.begin();
    while cursor != map.end() {
        let (k, v) = map.entry_at(cursor);
        assert!(seen.insert(*k, *v).is_none(), "key {} visited twice", k);
        cursor = map.advance(cursor);
    }
    seen
}

proptest! {
    #[test]
    fn prop_matches_reference_model(
        buckets in 1usize..16,
        ops in proptest::collection::vec(op(), 1..200),
    ) {
        let mut map: HashMap<u8, i32> = HashMap::with_bucket_count(buckets);
        let mut model: BTreeMap<u8, i32> = BTreeMap::new();
        let mut bucket_count = buckets;

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let (cursor, inserted) = map.insert(k, v);
                    prop_assert_eq!(inserted, !model.contains_key(&k));
                    model.entry(k).or_insert(v);
                    prop_assert_eq!(map.entry_at(cursor), (&k, &model[&k]));
                }
                Op::Erase(k) => {
                    prop_assert_eq!(map.erase(&k), model.remove(&k).is_some());
                }
                Op::EraseAt(k) => {
                    let cursor = map.find(&k);
                    if model.remove(&k).is_some() {
                        map.erase_at(cursor);
                    } else {
                        prop_assert!(cursor.is_end());
                    }
                }
                Op::Clear => {
                    map.clear();
                    model.clear();
                }
                Op::Rehash(n) => {
                    let result = map.rehash(n);
                    if n == 0 {
                        prop_assert!(matches!(result, Err(Error::InvalidArgument(_))));
                    } else {
                        prop_assert!(result.is_ok());
                        bucket_count = n;
                    }
                }
                Op::Bump(k) => {
                    *map.get_or_default(k) += 1;
                    *model.entry(k).or_default() += 1;
                }
            }

            prop_assert_eq!(map.len(), model.len());
            prop_assert_eq!(map.is_empty(), map.len() == 0);
            prop_assert_eq!(map.bucket_count(), bucket_count);
            for k in 0..32u8 {
                prop_assert_eq!(map.contains_key(&k), model.contains_key(&k));
                match model.get(&k) {
                    Some(v) => prop_assert_eq!(map.at(&k), Ok(v)),
                    None => prop_assert_eq!(map.at(&k), Err(Error::KeyNotFound)),
                }
            }
        }

        prop_assert_eq!(walk(&map), model);
    }
}

proptest! {
    #[test]
    fn prop_erase_at_keeps_other_cursors(
        buckets in 1usize..8,
        keys in proptest::collection::btree_set(any::<u8>(), 1..40),
        victims in proptest::collection::vec(any::<prop::sample::Index>(), 1..10),
    ) {
        let mut map: HashMap<u8, i32> = HashMap::with_bucket_count(buckets);
        for k in &keys {
            map.insert(*k, -(*k as i32));
        }
        let cursors: Vec<_> = keys.iter().map(|k| (*k, map.find(k))).collect();
        let mut erased = BTreeSet::new();
        for victim in victims {
            let (k, cursor) = cursors[victim.index(cursors.len())];
            if erased.insert(k) {
                map.erase_at(cursor);
            }
        }

        prop_assert_eq!(map.len(), keys.len() - erased.len());
        for (k, cursor) in cursors.iter().filter(|(k, _)| !erased.contains(k)) {
            prop_assert_eq!(map.entry_at(*cursor), (k, &-(*k as i32)));
        }
    }
}

proptest! {
    #[test]
    fn prop_equality_ignores_bucket_count_and_order(
        pairs in proptest::collection::btree_map(any::<u16>(), any::<i64>(), 0..60),
        left_buckets in 1usize..50,
        right_buckets in 1usize..50,
    ) {
        let left = HashMap::from_entries(
            pairs.iter().map(|(k, v)| (*k, *v)),
            left_buckets,
            chained_hashmap::DefaultHash::<u16>::new(),
        );
        let right = HashMap::from_entries(
            pairs.iter().rev().map(|(k, v)| (*k, *v)),
            right_buckets,
            |k: &u16| (*k as usize) * 7 + 3,
        );
        prop_assert!(left == right);

        let copy = right.clone();
        prop_assert!(copy == left);
        prop_assert_eq!(copy.bucket_count(), right_buckets);
    }
}

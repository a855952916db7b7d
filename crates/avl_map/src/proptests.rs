use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::AvlMap;

const OPS_PER_CASE: usize = 2_000;

fn key_strategy() -> impl Strategy<Value = i32> {
    // Narrower than OPS_PER_CASE so duplicates and misses are frequent.
    -500..500
}

#[derive(Clone, Debug)]
enum MapOp {
    Insert(i32, i32),
    Erase(i32),
    EqualRange(i32),
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        3 => (key_strategy(), any::<i32>()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        2 => key_strategy().prop_map(MapOp::Erase),
        1 => key_strategy().prop_map(MapOp::EqualRange),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Order, balance, cached heights and the element count hold after every step.
    #[test]
    fn structure_holds_after_every_op(ops in prop::collection::vec(map_op_strategy(), OPS_PER_CASE)) {
        let mut map = AvlMap::new();
        let mut oracle = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::Insert(k, v) => {
                    let before = map.get(&k).copied();
                    let (pos, inserted) = map.insert(k, v);
                    prop_assert_eq!(inserted, before.is_none());
                    let held = map.entry_at(pos).map(|(_, held)| *held);
                    prop_assert_eq!(held, Some(before.unwrap_or(v)));
                    oracle.entry(k).or_insert(v);
                }
                MapOp::Erase(k) => {
                    let expect = usize::from(oracle.remove(&k).is_some());
                    prop_assert_eq!(map.erase(&k), expect);
                }
                MapOp::EqualRange(k) => {
                    let (lo, hi) = map.equal_range(&k);
                    let mut steps = 0;
                    let mut pos = lo;
                    while pos != hi {
                        pos = map.next_position(pos);
                        steps += 1;
                    }
                    prop_assert_eq!(steps, usize::from(oracle.contains_key(&k)));
                }
            }
            map.check();
            prop_assert_eq!(map.len(), map.iter().count());
        }

        prop_assert!(map.iter().eq(oracle.iter()));
    }

    /// Any insertion order of the same entries gives equal maps; erasing in any order empties them.
    #[test]
    fn insertion_order_is_irrelevant(
        entries in prop::collection::btree_map(key_strategy(), any::<i32>(), 0..300),
        seed in any::<u64>(),
    ) {
        use rand::SeedableRng;
        use rand::rngs::StdRng;
        use rand::seq::SliceRandom;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut shuffled: Vec<_> = entries.iter().map(|(&k, &v)| (k, v)).collect();
        let ascending: AvlMap<i32, i32> = shuffled.iter().copied().collect();
        shuffled.shuffle(&mut rng);
        let mut map: AvlMap<i32, i32> = shuffled.iter().copied().collect();

        prop_assert_eq!(&map, &ascending);
        prop_assert!(map.keys().is_sorted());

        shuffled.shuffle(&mut rng);
        for (k, _) in &shuffled {
            prop_assert_eq!(map.erase(k), 1);
            map.check();
        }
        prop_assert!(map.is_empty());
        prop_assert_eq!(map.root_key(), None);
        prop_assert_eq!(map.begin(), map.end());
    }
}

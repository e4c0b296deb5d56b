use std::collections::BTreeSet;

use ordered_forest::AvlTree;
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;

/// Fisher-Yates driven by a tiny LCG, so removal orders are arbitrary
/// but reproducible from the proptest seed.
fn shuffled(keys: &BTreeSet<i32>, mut seed: u64) -> Vec<i32> {
    let mut out: Vec<i32> = keys.iter().copied().collect();
    for i in (1..out.len()).rev() {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let j = (seed >> 33) as usize % (i + 1);
        out.swap(i, j);
    }
    out
}

proptest! {
    #[test]
    fn in_order_is_strictly_ascending(keys in btree_set(any::<i32>(), 0..200)) {
        let mut tree = AvlTree::new();
        for &k in &keys {
            tree.insert(k).unwrap();
        }
        tree.assert_valid().unwrap();
        prop_assert_eq!(tree.len(), keys.len());

        let inorder: Vec<i32> = tree.iter().copied().collect();
        let expected: Vec<i32> = keys.iter().copied().collect();
        prop_assert_eq!(inorder, expected);
    }

    #[test]
    fn insert_remove_round_trip_leaves_an_empty_tree(
        keys in btree_set(any::<i32>(), 1..120),
        seed in any::<u64>(),
    ) {
        let mut tree = AvlTree::new();
        for &k in &keys {
            tree.insert(k).unwrap();
        }

        for k in shuffled(&keys, seed) {
            prop_assert!(tree.remove(&k));
            tree.assert_valid().unwrap();
        }

        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.root(), None);
        prop_assert_eq!(tree.first(), None);
    }

    #[test]
    fn interleaved_ops_match_a_model(ops in vec((any::<bool>(), any::<i8>()), 0..120)) {
        let mut tree = AvlTree::new();
        let mut model = BTreeSet::new();

        for (insert, k) in ops {
            if insert {
                prop_assert_eq!(tree.insert(k).is_ok(), model.insert(k));
            } else {
                prop_assert_eq!(tree.remove(&k), model.remove(&k));
            }
            tree.assert_valid().unwrap();
            prop_assert_eq!(tree.len(), model.len());
            prop_assert_eq!(tree.min(), model.first());
            prop_assert_eq!(tree.max(), model.last());
        }

        let inorder: Vec<i8> = tree.iter().copied().collect();
        let expected: Vec<i8> = model.into_iter().collect();
        prop_assert_eq!(inorder, expected);
    }

    #[test]
    fn cursor_sweep_agrees_with_the_iterator(keys in btree_set(any::<i16>(), 0..80)) {
        let mut tree = AvlTree::new();
        for &k in &keys {
            tree.insert(k).unwrap();
        }

        let mut via_cursor = Vec::new();
        let mut c = tree.front_cursor();
        while let Some(v) = tree.get_at(&c) {
            via_cursor.push(*v);
            tree.advance(&mut c);
        }

        let via_iter: Vec<i16> = tree.iter().copied().collect();
        prop_assert_eq!(via_cursor, via_iter);
        prop_assert_eq!(c, tree.end_cursor());
    }
}

use crate::btree::BTree;
use crate::types::Order;
use proptest::collection::btree_set as pset;
use proptest::collection::vec as pvec;
use proptest::prelude::*;
use std::collections::BTreeMap as StdBTreeMap;
use test_strategy::proptest;

// A compact key space so that random operations regularly hit existing keys.
const KEY_SPACE: u64 = 1024;

// Fan-outs worth exercising: the smallest legal one, the smallest even one,
// and a couple of realistic sizes.
const ORDERS: [usize; 4] = [3, 4, 6, 10];

#[derive(Debug, Clone)]
enum Operation {
    Insert { key: u64, value: u64 },
    Update { key: u64, value: u64 },
    Get(u64),
    Remove(u64),
}

// A custom strategy that gives unequal weights to the different operations.
// `Insert` has a higher weight than `Remove` so that, on average, trees grow
// in size the more operations are executed.
fn op_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => (0..KEY_SPACE, any::<u64>())
            .prop_map(|(key, value)| Operation::Insert { key, value }),
        1 => (0..KEY_SPACE, any::<u64>())
            .prop_map(|(key, value)| Operation::Update { key, value }),
        2 => (0..KEY_SPACE).prop_map(Operation::Get),
        2 => (0..KEY_SPACE).prop_map(Operation::Remove),
    ]
}

// Runs a comprehensive test for the major tree operations at several
// fan-outs. Results are validated against a standard BTreeMap.
#[proptest(cases = 10)]
fn comprehensive(#[strategy(pvec(op_strategy(), 100..1_000))] ops: Vec<Operation>) {
    for max_children in ORDERS {
        let mut tree = BTree::new(Order::new(max_children));
        let mut model = StdBTreeMap::new();

        for (i, op) in ops.iter().enumerate() {
            execute_operation(&mut model, &mut tree, op);
            if i % 64 == 0 {
                tree.check_invariants();
            }
        }

        tree.check_invariants();
        for (key, value) in &model {
            assert_eq!(tree.get(*key), Some(value));
        }
    }
}

#[proptest(cases = 10)]
fn insert_then_remove_all_leaves_an_empty_tree(
    #[strategy(pset(any::<u64>(), 1..500))] keys: std::collections::BTreeSet<u64>,
) {
    for max_children in ORDERS {
        let mut tree = BTree::new(Order::new(max_children));
        for &key in &keys {
            assert_eq!(tree.insert(key, key).unwrap(), None);
        }
        tree.check_invariants();

        for &key in &keys {
            assert_eq!(tree.remove(key), Some(key));
            assert_eq!(tree.get(key), None);
            assert_eq!(tree.remove(key), None);
        }

        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);
        tree.check_invariants();
    }
}

#[proptest]
fn min_and_max_track_the_model(#[strategy(pvec(any::<u64>(), 10..100))] keys: Vec<u64>) {
    let mut tree = BTree::new(Order::default());
    for (n, key) in keys.iter().enumerate() {
        tree.insert(*key, *key).unwrap();

        let min = keys[0..=n].iter().min().unwrap();
        let max = keys[0..=n].iter().max().unwrap();

        assert_eq!(tree.first_key_value(), Some((*min, min)));
        assert_eq!(tree.last_key_value(), Some((*max, max)));
    }
}

#[proptest(cases = 10)]
fn pop_first_drains_in_ascending_order(
    #[strategy(pset(any::<u64>(), 1..300))] keys: std::collections::BTreeSet<u64>,
) {
    let mut tree = BTree::new(Order::new(4));
    for &key in &keys {
        tree.insert(key, key).unwrap();
    }

    let mut drained = Vec::new();
    while let Some((key, _)) = tree.pop_first() {
        drained.push(key);
    }

    assert!(tree.is_empty());
    assert_eq!(drained, keys.iter().copied().collect::<Vec<_>>());
}

// A tree at its node capacity must refuse growth without disturbing the
// entries it already holds.
#[proptest(cases = 10)]
fn a_bounded_arena_refuses_growth_without_losing_entries(
    #[strategy(pvec((0u64..256, any::<u64>()), 1..500))] entries: Vec<(u64, u64)>,
) {
    let mut tree = BTree::with_node_capacity(Order::new(4), 8).unwrap();
    let mut model = StdBTreeMap::new();

    for (key, value) in entries {
        match tree.insert(key, value) {
            Ok(previous) => {
                assert_eq!(model.insert(key, value), previous);
            }
            Err(_) => {
                // The refused insert must not have changed any entry.
                assert_eq!(tree.get(key), model.get(&key));
            }
        }
        assert_eq!(tree.len(), model.len() as u64);
    }

    tree.check_invariants();
    for (key, value) in &model {
        assert_eq!(tree.get(*key), Some(value));
    }
}

fn execute_operation(
    model: &mut StdBTreeMap<u64, u64>,
    tree: &mut BTree<u64>,
    op: &Operation,
) {
    match *op {
        Operation::Insert { key, value } => {
            let expected = model.insert(key, value);
            let actual = tree
                .insert(key, value)
                .expect("an unbounded tree does not fail to allocate");
            assert_eq!(expected, actual);
        }
        Operation::Update { key, value } => {
            let expected = if model.contains_key(&key) {
                model.insert(key, value)
            } else {
                None
            };
            assert_eq!(tree.update(key, value), expected);
        }
        Operation::Get(key) => {
            assert_eq!(tree.get(key), model.get(&key));
        }
        Operation::Remove(key) => {
            assert_eq!(tree.remove(key), model.remove(&key));
        }
    }
    assert_eq!(tree.len(), model.len() as u64);
}

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rbtree_map::{Comparator, RBTreeSet};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn value_strategy() -> impl Strategy<Value = i32> {
    -500i32..500i32
}

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i32),
    Replace(i32),
    Remove(i32),
    Take(i32),
    Contains(i32),
    Get(i32),
    PopMin,
    PopMax,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        1 => value_strategy().prop_map(SetOp::Replace),
        3 => value_strategy().prop_map(SetOp::Remove),
        1 => value_strategy().prop_map(SetOp::Take),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => value_strategy().prop_map(SetOp::Get),
        1 => Just(SetOp::PopMin),
        1 => Just(SetOp::PopMax),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both RBTreeSet and BTreeSet.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut rb_set = RBTreeSet::new();
        let mut bt_set = BTreeSet::new();

        for op in &ops {
            match *op {
                SetOp::Insert(v) => prop_assert_eq!(rb_set.insert(v), bt_set.insert(v), "insert({})", v),
                SetOp::Replace(v) => prop_assert_eq!(rb_set.replace(v), bt_set.replace(v), "replace({})", v),
                SetOp::Remove(v) => prop_assert_eq!(rb_set.remove(&v), bt_set.remove(&v), "remove({})", v),
                SetOp::Take(v) => prop_assert_eq!(rb_set.take(&v), bt_set.take(&v), "take({})", v),
                SetOp::Contains(v) => prop_assert_eq!(rb_set.contains(&v), bt_set.contains(&v), "contains({})", v),
                SetOp::Get(v) => prop_assert_eq!(rb_set.get(&v), bt_set.get(&v), "get({})", v),
                SetOp::PopMin => prop_assert_eq!(rb_set.pop_min(), bt_set.pop_first(), "pop_min"),
                SetOp::PopMax => prop_assert_eq!(rb_set.pop_max(), bt_set.pop_last(), "pop_max"),
            }
            prop_assert_eq!(rb_set.validate(), Ok(()), "invariants broken after {:?}", op);
            prop_assert_eq!(rb_set.len(), bt_set.len(), "len mismatch after {:?}", op);
        }

        let rb_items: Vec<_> = rb_set.iter().copied().collect();
        let bt_items: Vec<_> = bt_set.iter().copied().collect();
        prop_assert_eq!(&rb_items, &bt_items);
        prop_assert_eq!(rb_set.min(), bt_set.first());
        prop_assert_eq!(rb_set.max(), bt_set.last());
    }

    /// Tests range iteration and the visitor walks against BTreeSet.
    #[test]
    fn range_matches_btreeset(
        values in proptest::collection::vec(value_strategy(), TEST_SIZE),
        lo in value_strategy(),
        hi in value_strategy(),
    ) {
        let rb_set: RBTreeSet<i32> = values.iter().copied().collect();
        let bt_set: BTreeSet<i32> = values.iter().copied().collect();
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

        let rb_range: Vec<_> = rb_set.range(lo..hi).copied().collect();
        let bt_range: Vec<_> = bt_set.range(lo..hi).copied().collect();
        prop_assert_eq!(&rb_range, &bt_range, "range({}..{})", lo, hi);

        let rb_rev: Vec<_> = rb_set.range(lo..=hi).rev().copied().collect();
        let bt_rev: Vec<_> = bt_set.range(lo..=hi).rev().copied().collect();
        prop_assert_eq!(&rb_rev, &bt_rev, "range({}..={}).rev()", lo, hi);

        let mut ascended = Vec::new();
        rb_set.ascend(lo.., |&v| {
            ascended.push(v);
            true
        });
        let bt_from: Vec<_> = bt_set.range(lo..).copied().collect();
        prop_assert_eq!(&ascended, &bt_from);

        let mut descended = Vec::new();
        rb_set.descend(..hi, |&v| {
            descended.push(v);
            true
        });
        let bt_to: Vec<_> = bt_set.range(..hi).rev().copied().collect();
        prop_assert_eq!(&descended, &bt_to);

        let into: Vec<_> = rb_set.clone().into_iter().collect();
        let bt_all: Vec<_> = bt_set.into_iter().collect();
        prop_assert_eq!(into, bt_all);
    }
}

#[test]
fn insert_always_keeps_duplicates() {
    let mut set = RBTreeSet::new();
    assert!(set.insert_always(5));
    assert!(set.insert_always(3));
    assert!(!set.insert_always(5));
    assert_eq!(set.len(), 3);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 5, 5]);
    assert!(set.remove(&5));
    assert!(set.remove(&5));
    assert!(!set.remove(&5));
    assert_eq!(set.validate(), Ok(()));
}

#[test]
fn walk_stops_early_and_counts_all() {
    let set: RBTreeSet<u32> = (0..64).collect();
    let mut calls = 0;
    set.walk(|_| {
        calls += 1;
        calls < 5
    });
    assert_eq!(calls, 5);

    let mut total = 0;
    set.walk(|_| {
        total += 1;
        true
    });
    assert_eq!(total, set.len());
}

fn sentinel_collect<C: Comparator<i32>>(set: &RBTreeSet<i32, C>, from: i32, to: i32, descending: bool) -> Vec<i32> {
    let mut seen = Vec::new();
    let visit = |x: &i32| {
        seen.push(*x);
        true
    };
    if descending {
        set.descend_from_to(&from, &to, visit);
    } else {
        set.ascend_from_to(&from, &to, visit);
    }
    seen
}

#[test]
fn sentinel_bounds_on_set() {
    let mut set = RBTreeSet::with_predicates(|a: &i32, b: &i32| a < b, |a: &i32, b: &i32| a == b, |x: &i32| *x == -1);
    set.extend(0..=20);

    assert_eq!(sentinel_collect(&set, 15, -1, false), (15..=20).collect::<Vec<_>>());
    assert_eq!(sentinel_collect(&set, -1, 2, false), [0, 1, 2]);
    assert_eq!(sentinel_collect(&set, -1, -1, false).len(), 21);
    assert_eq!(sentinel_collect(&set, -1, 3, true), [3, 2, 1, 0]);
    assert_eq!(sentinel_collect(&set, 18, -1, true), [20, 19, 18]);
    assert_eq!(sentinel_collect(&set, 5, 7, true), [7, 6, 5]);

    let mut calls = 0;
    set.ascend_from_to(&-1, &-1, |_| {
        calls += 1;
        calls < 3
    });
    assert_eq!(calls, 3);
}

#[test]
fn capacity_and_clear() {
    let mut set: RBTreeSet<u8> = RBTreeSet::with_capacity(16);
    assert!(set.capacity() >= 16);
    set.extend(&[1, 2, 3]);
    set.reserve(8);
    assert_eq!(set.try_reserve(8), Ok(()));
    assert_eq!(set.len(), 3);
    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.min(), None);
}

#[test]
fn string_set_lookup_by_str() {
    let mut set = RBTreeSet::new();
    set.insert(String::from("b"));
    set.insert(String::from("a"));
    assert!(set.contains("a"));
    assert_eq!(set.get("b").map(String::as_str), Some("b"));
    assert_eq!(set.take("a"), Some(String::from("a")));
    assert_eq!(set.len(), 1);
}

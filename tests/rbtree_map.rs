use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, Mutex};
use std::thread;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rbtree_map::{Color, Comparator, InvariantViolation, Position, RBTreeMap, TryInsertError};
use simplelog::{Config, LevelFilter, TestLogger};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn init_logger() {
    // Another test may already have installed it.
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

/// Keys drawn from a range smaller than `TEST_SIZE` so that operations collide.
fn key_strategy() -> impl Strategy<Value = i64> {
    -500i64..500i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

/// Builds a map holding `keys`, each mapped to itself.
fn identity_map(keys: impl IntoIterator<Item = i64>) -> RBTreeMap<i64, i64> {
    keys.into_iter().map(|k| (k, k)).collect()
}

fn collect_ascend(map: &RBTreeMap<i64, i64>, range: (Bound<i64>, Bound<i64>)) -> Vec<i64> {
    let mut seen = Vec::new();
    map.ascend(range, |k, _| {
        seen.push(*k);
        true
    });
    seen
}

fn collect_descend(map: &RBTreeMap<i64, i64>, range: (Bound<i64>, Bound<i64>)) -> Vec<i64> {
    let mut seen = Vec::new();
    map.descend(range, |k, _| {
        seen.push(*k);
        true
    });
    seen
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    InsertOrUpdate(i64, i64),
    InsertIfAbsent(i64, i64),
    UpdateIfPresent(i64, i64),
    Remove(i64),
    Get(i64),
    ContainsKey(i64),
    GetKeyValue(i64),
    Min,
    Max,
    PopMin,
    PopMax,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::InsertOrUpdate(k, v)),
        2 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::InsertIfAbsent(k, v)),
        2 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::UpdateIfPresent(k, v)),
        4 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::GetKeyValue),
        1 => Just(MapOp::Min),
        1 => Just(MapOp::Max),
        1 => Just(MapOp::PopMin),
        1 => Just(MapOp::PopMax),
    ]
}

fn bound_strategy() -> impl Strategy<Value = Bound<i64>> {
    prop_oneof![
        key_strategy().prop_map(Bound::Included),
        key_strategy().prop_map(Bound::Excluded),
        Just(Bound::Unbounded),
    ]
}

fn range_strategy() -> impl Strategy<Value = (Bound<i64>, Bound<i64>)> {
    (bound_strategy(), bound_strategy())
}

// ─── Core operations against a BTreeMap model ───────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both RBTreeMap and BTreeMap, asserting
    /// identical results and intact invariants at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        init_logger();
        let mut rb_map: RBTreeMap<i64, i64> = RBTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::InsertOrUpdate(k, v) => {
                    prop_assert_eq!(rb_map.insert_or_update(k, v), bt_map.insert(k, v), "insert_or_update({})", k);
                }
                MapOp::InsertIfAbsent(k, v) => {
                    let rb_result = rb_map.insert_if_absent(k, v).copied();
                    let bt_result = bt_map.get(&k).copied();
                    bt_map.entry(k).or_insert(v);
                    prop_assert_eq!(rb_result, bt_result, "insert_if_absent({})", k);
                }
                MapOp::UpdateIfPresent(k, v) => {
                    let rb_result = rb_map.update_if_present(&k, v);
                    let bt_result = bt_map.get_mut(&k).map(|slot| std::mem::replace(slot, v));
                    prop_assert_eq!(rb_result, bt_result, "update_if_present({})", k);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(rb_map.remove(&k), bt_map.remove(&k), "remove({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(rb_map.get(&k), bt_map.get(&k), "get({})", k);
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(rb_map.contains_key(&k), bt_map.contains_key(&k), "contains_key({})", k);
                }
                MapOp::GetKeyValue(k) => {
                    prop_assert_eq!(rb_map.get_key_value(&k), bt_map.get_key_value(&k), "get_key_value({})", k);
                }
                MapOp::Min => prop_assert_eq!(rb_map.min(), bt_map.first_key_value(), "min"),
                MapOp::Max => prop_assert_eq!(rb_map.max(), bt_map.last_key_value(), "max"),
                MapOp::PopMin => prop_assert_eq!(rb_map.pop_min(), bt_map.pop_first(), "pop_min"),
                MapOp::PopMax => prop_assert_eq!(rb_map.pop_max(), bt_map.pop_last(), "pop_max"),
            }
            prop_assert_eq!(rb_map.validate(), Ok(()), "invariants broken after {:?}", op);
            prop_assert_eq!(rb_map.len(), bt_map.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(rb_map.is_empty(), bt_map.is_empty(), "is_empty mismatch after {:?}", op);
        }
    }

    /// Tests that iteration order matches BTreeMap after random insertions.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let rb_map: RBTreeMap<i64, i64> = entries.iter().copied().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        let rb_items: Vec<_> = rb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_items, &bt_items, "iter() mismatch");

        let rb_rev: Vec<_> = rb_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        let bt_rev: Vec<_> = bt_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_rev, &bt_rev, "iter().rev() mismatch");

        let rb_keys: Vec<_> = rb_map.keys().copied().collect();
        let bt_keys: Vec<_> = bt_map.keys().copied().collect();
        prop_assert_eq!(&rb_keys, &bt_keys, "keys() mismatch");

        let rb_vals: Vec<_> = rb_map.values().copied().collect();
        let bt_vals: Vec<_> = bt_map.values().copied().collect();
        prop_assert_eq!(&rb_vals, &bt_vals, "values() mismatch");

        prop_assert_eq!(rb_map.iter().len(), bt_map.len());

        let rb_into: Vec<_> = rb_map.clone().into_iter().collect();
        prop_assert_eq!(&rb_into, &bt_items, "into_iter() mismatch");
    }

    /// Alternating front/back iteration yields every entry exactly once.
    #[test]
    fn iter_double_ended(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let rb_map: RBTreeMap<i64, i64> = entries.iter().copied().collect();

        let mut from_front = Vec::new();
        let mut from_back = Vec::new();
        let mut iter = rb_map.iter();
        let mut toggle = true;
        loop {
            let item = if toggle { iter.next() } else { iter.next_back() };
            let Some((&k, _)) = item else { break };
            if toggle { from_front.push(k) } else { from_back.push(k) }
            toggle = !toggle;
        }
        from_back.reverse();
        from_front.extend(from_back);
        let expected: Vec<_> = rb_map.keys().copied().collect();
        prop_assert_eq!(from_front, expected);
    }

    /// Tests range queries, ascend and descend against BTreeMap, including inverted and
    /// exclusive ranges.
    #[test]
    fn range_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        range in range_strategy(),
    ) {
        let rb_map: RBTreeMap<i64, i64> = entries.iter().copied().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        let expected: Vec<i64> = bt_map
            .keys()
            .copied()
            .filter(|k| std::ops::RangeBounds::contains(&range, k))
            .collect();

        let rb_range: Vec<_> = rb_map.range(range).map(|(&k, _)| k).collect();
        prop_assert_eq!(&rb_range, &expected, "range({:?}) mismatch", range);

        let mut rb_rev: Vec<_> = rb_map.range(range).rev().map(|(&k, _)| k).collect();
        rb_rev.reverse();
        prop_assert_eq!(&rb_rev, &expected, "range({:?}).rev() mismatch", range);

        prop_assert_eq!(&collect_ascend(&rb_map, range), &expected, "ascend({:?})", range);
        let mut descended = collect_descend(&rb_map, range);
        descended.reverse();
        prop_assert_eq!(&descended, &expected, "descend({:?})", range);
    }

    /// Inserts a random permutation of 0..1000, then removes the keys in another random
    /// permutation, checking every invariant after each step.
    #[test]
    fn permutation_insert_then_delete(
        inserts in Just((0..1000i64).collect::<Vec<_>>()).prop_shuffle(),
        deletes in Just((0..1000i64).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        init_logger();
        let mut map = RBTreeMap::new();
        for (n, &k) in inserts.iter().enumerate() {
            prop_assert_eq!(map.insert_or_update(k, k), None);
            prop_assert_eq!(map.len(), n + 1);
            prop_assert_eq!(map.validate(), Ok(()));
        }
        for (n, &k) in deletes.iter().enumerate() {
            prop_assert_eq!(map.remove(&k), Some(k));
            prop_assert_eq!(map.len(), inserts.len() - n - 1);
            prop_assert_eq!(map.validate(), Ok(()));
        }
        prop_assert!(map.is_empty());
        prop_assert_eq!(map.nodes().count(), 0);
    }

    /// Duplicate-admitting inserts keep a multiset's worth of entries, grouped by key.
    #[test]
    fn insert_always_matches_multiset(
        keys in proptest::collection::vec(-50i64..50, 0..TEST_SIZE / 2),
        removals in proptest::collection::vec(-50i64..50, 0..TEST_SIZE / 4),
    ) {
        let mut map = RBTreeMap::new();
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();

        for (n, &k) in keys.iter().enumerate() {
            let first = map.insert_always(k, n);
            prop_assert_eq!(first, !counts.contains_key(&k));
            *counts.entry(k).or_insert(0) += 1;
        }
        prop_assert_eq!(map.validate(), Ok(()));

        for &k in &removals {
            let removed = map.remove(&k).is_some();
            let count = counts.get_mut(&k);
            prop_assert_eq!(removed, count.is_some());
            if let Some(count) = count {
                *count -= 1;
                if *count == 0 {
                    counts.remove(&k);
                }
            }
            prop_assert_eq!(map.validate(), Ok(()));
        }

        let expected: Vec<i64> = counts.iter().flat_map(|(&k, &n)| std::iter::repeat_n(k, n)).collect();
        let actual: Vec<i64> = map.keys().copied().collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(map.len(), counts.values().sum::<usize>());
    }

    /// The number of entries visited by a full walk always equals `len()`.
    #[test]
    fn walk_visits_len_entries(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE / 4)) {
        let mut map = RBTreeMap::new();
        for op in ops {
            match op {
                MapOp::InsertOrUpdate(k, v) | MapOp::InsertIfAbsent(k, v) => {
                    map.insert_or_update(k, v);
                }
                MapOp::Remove(k) => {
                    map.remove(&k);
                }
                _ => {}
            }
            let mut visited = 0;
            map.walk(|_, _| {
                visited += 1;
                true
            });
            prop_assert_eq!(visited, map.len());
        }
    }

    /// Tests that a clone is independent of its source.
    #[test]
    fn clone_is_independent(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let original: RBTreeMap<i64, i64> = entries.iter().copied().collect();
        let mut cloned = original.clone();
        prop_assert_eq!(&cloned, &original);

        let (k, _) = entries[0];
        cloned.remove(&k);
        prop_assert!(original.contains_key(&k));
        prop_assert_eq!(cloned.validate(), Ok(()));
        prop_assert_eq!(cloned.len() + 1, original.len());
    }
}

// ─── Deterministic scenarios ─────────────────────────────────────────────────

#[test]
fn range_walks_over_hundred_keys() {
    let map = identity_map(0..=100);

    assert_eq!(collect_ascend(&map, (Bound::Included(50), Bound::Unbounded)), (50..=100).collect::<Vec<_>>());
    assert_eq!(collect_descend(&map, (Bound::Unbounded, Bound::Included(50))), (0..=50).rev().collect::<Vec<_>>());
    assert_eq!(collect_ascend(&map, (Bound::Included(45), Bound::Included(55))), (45..=55).collect::<Vec<_>>());
    assert_eq!(collect_ascend(&map, (Bound::Unbounded, Bound::Unbounded)), (0..=100).collect::<Vec<_>>());
    assert_eq!(collect_ascend(&map, (Bound::Included(55), Bound::Included(45))), Vec::<i64>::new());
}

fn sentinel_walk<C: Comparator<i64>>(map: &RBTreeMap<i64, (), C>, from: i64, to: i64, descending: bool) -> Vec<i64> {
    let mut seen = Vec::new();
    let visit = |k: &i64, _: &()| {
        seen.push(*k);
        true
    };
    if descending {
        map.descend_from_to(&from, &to, visit);
    } else {
        map.ascend_from_to(&from, &to, visit);
    }
    seen
}

#[test]
fn sentinel_bounds_open_the_range() {
    let mut map = RBTreeMap::with_predicates(|a: &i64, b: &i64| a < b, |a: &i64, b: &i64| a == b, |k: &i64| *k == -1);
    for k in 0..=100 {
        map.insert_or_update(k, ());
    }

    assert_eq!(sentinel_walk(&map, 50, -1, false), (50..=100).collect::<Vec<_>>());
    assert_eq!(sentinel_walk(&map, -1, 3, false), [0, 1, 2, 3]);
    assert_eq!(sentinel_walk(&map, -1, -1, false).len(), 101);
    assert_eq!(sentinel_walk(&map, 45, 55, false), (45..=55).collect::<Vec<_>>());
    assert_eq!(sentinel_walk(&map, -1, 50, true), (0..=50).rev().collect::<Vec<_>>());
    assert_eq!(sentinel_walk(&map, 98, -1, true), [100, 99, 98]);

    // A start key between stored keys begins at the next one up.
    map.remove(&50);
    assert_eq!(sentinel_walk(&map, 50, 52, false), [51, 52]);
}

#[test]
fn visitors_stop_early() {
    let map = identity_map(0..100);
    let mut calls = 0;
    map.walk(|_, _| {
        calls += 1;
        false
    });
    assert_eq!(calls, 1);

    let mut seen = Vec::new();
    map.ascend(10.., |k, _| {
        seen.push(*k);
        false
    });
    assert_eq!(seen, [10]);

    seen.clear();
    map.descend(..=10, |k, _| {
        seen.push(*k);
        false
    });
    assert_eq!(seen, [10]);
}

#[test]
fn remove_twice_reports_absence() {
    let mut map = identity_map(0..10);
    assert_eq!(map.remove(&4), Some(4));
    assert_eq!(map.len(), 9);
    assert_eq!(map.remove(&4), None);
    assert_eq!(map.len(), 9);
    assert_eq!(map.remove_entry(&5), Some((5, 5)));
}

#[test]
fn inserted_values_read_back() {
    let mut map = RBTreeMap::new();
    for k in 0..500i64 {
        map.insert_or_update(k * 7 % 500, k);
    }
    for k in 0..500i64 {
        assert_eq!(map.get(&(k * 7 % 500)), Some(&k));
    }
}

#[test]
fn insert_flavours() {
    let mut map = RBTreeMap::new();
    assert_eq!(map.update_if_present(&1, "x"), None);
    assert!(map.is_empty());

    assert_eq!(map.insert_if_absent(1, "a"), None);
    assert_eq!(map.insert_if_absent(1, "b"), Some(&"a"));
    assert_eq!(map.insert_or_update(1, "c"), Some("a"));
    assert_eq!(map.update_if_present(&1, "d"), Some("c"));
    assert_eq!(map[&1], "d");

    assert!(!map.insert_always(1, "e"));
    assert!(map.insert_always(2, "f"));
    assert_eq!(map.len(), 3);
    assert_eq!(map.validate(), Ok(()));
}

#[test]
fn insert_always_twice_grows_by_two() {
    let mut map = identity_map(0..10);
    let before = map.len();
    assert!(!map.insert_always(5, 50));
    assert!(!map.insert_always(5, 51));
    assert_eq!(map.len(), before + 2);
    assert_eq!(map.range(5..=5).count(), 3);

    let mut fives: Vec<_> = map.range(5..=5).map(|(_, &v)| v).collect();
    fives.sort_unstable();
    assert_eq!(fives, [5, 50, 51]);
}

#[test]
fn clear_then_reuse() {
    init_logger();
    let mut map = identity_map(0..100);
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.min(), None);
    assert_eq!(map.nodes().count(), 0);
    map.insert_or_update(3, 3);
    assert_eq!(map.iter().collect::<Vec<_>>(), [(&3, &3)]);
    assert_eq!(map.validate(), Ok(()));
}

#[test]
fn node_view_satisfies_colour_rules() {
    let map = identity_map(0..256);
    let views: Vec<_> = map.nodes().collect();
    assert_eq!(views.len(), 256);
    assert_eq!(views[0].position, Position::Root);
    assert_eq!(views[0].color, Color::Black);
    assert_eq!(views[0].depth, 0);
    assert!(views[1..].iter().all(|v| v.position != Position::Root && v.depth > 0));

    // Pre-order: a red node's successor in the list is either a child (depth + 1, must be
    // black) or belongs to another subtree.
    for pair in views.windows(2) {
        if pair[0].color == Color::Red && pair[1].depth == pair[0].depth + 1 {
            assert_eq!(pair[1].color, Color::Black);
        }
    }
    // The tree stays logarithmically shallow.
    let height = views.iter().map(|v| v.depth).max().unwrap_or(0);
    assert!(height < 2 * 9);
}

#[test]
fn reserve_and_try_reserve() {
    let mut map: RBTreeMap<i64, i64> = RBTreeMap::with_capacity(4);
    assert!(map.capacity() >= 4);
    map.reserve(100);
    assert!(map.capacity() >= 100);
    assert_eq!(map.try_reserve(10), Ok(()));
    assert_eq!(map.try_reserve(usize::MAX), Err(TryInsertError::CapacityOverflow));
    assert!(map.is_empty());
    assert_eq!(map.try_insert_or_update(1, 1), Ok(None));
    assert_eq!(map.try_insert_always(1, 2), Ok(false));
    assert_eq!(map.try_insert_if_absent(2, 2), Ok(None));
    assert_eq!(map.len(), 3);
}

#[test]
fn inconsistent_comparator_is_caught_by_validate() {
    // An ordering that disagrees with itself after the fact.
    let flipped = std::cell::Cell::new(false);
    let mut map = RBTreeMap::with_predicates(
        |a: &i32, b: &i32| if flipped.get() { a > b } else { a < b },
        |a: &i32, b: &i32| a == b,
        |_: &i32| false,
    );
    for k in 0..8 {
        map.insert_or_update(k, ());
    }
    assert_eq!(map.validate(), Ok(()));
    flipped.set(true);
    assert!(matches!(map.validate(), Err(InvariantViolation::OutOfOrder { .. })));
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key_panics() {
    let map = identity_map(0..3);
    let _ = map[&7];
}

#[test]
fn shared_behind_mutex() {
    let map = Arc::new(Mutex::new(RBTreeMap::new()));
    let handles: Vec<_> = (0..4i64)
        .map(|t| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for k in 0..250 {
                    map.lock().unwrap().insert_or_update(t * 250 + k, t);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    let map = map.lock().unwrap();
    assert_eq!(map.len(), 1000);
    assert_eq!(map.validate(), Ok(()));
}

#[test]
fn string_keys_borrow_as_str() {
    let mut map = RBTreeMap::new();
    map.insert_or_update(String::from("pear"), 3);
    map.insert_or_update(String::from("apple"), 1);
    assert_eq!(map.get("apple"), Some(&1));
    assert_eq!(map.update_if_present("pear", 4), Some(3));
    assert_eq!(map.remove("pear"), Some(4));
    assert!(!map.contains_key("pear"));
    assert_eq!(map.keys().collect::<Vec<_>>(), ["apple"]);
}

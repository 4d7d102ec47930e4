#![cfg(feature = "persistent")]
//! Integration tests for PersistentIntMap.

use patmap::persistent::PersistentIntMap;
use patmap::typeclass::Foldable;
use rstest::rstest;

// =============================================================================
// Basic Construction Tests
// =============================================================================

#[rstest]
fn test_new_creates_empty_map() {
    let map: PersistentIntMap<String> = PersistentIntMap::new();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
}

#[rstest]
fn test_default_creates_empty_map() {
    let map: PersistentIntMap<String> = PersistentIntMap::default();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
}

#[rstest]
fn test_singleton_creates_map_with_one_entry() {
    let map = PersistentIntMap::singleton(42, "answer".to_string());
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(42), Some(&"answer".to_string()));
}

// =============================================================================
// Insert and Get Tests
// =============================================================================

#[rstest]
fn test_insert_single_entry() {
    let map = PersistentIntMap::new().insert(1, "one".to_string());
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(1), Some(&"one".to_string()));
}

#[rstest]
fn test_insert_multiple_entries() {
    let map = PersistentIntMap::new()
        .insert(2, "two".to_string())
        .insert(1, "one".to_string())
        .insert(3, "three".to_string());

    assert_eq!(map.len(), 3);
    assert_eq!(map.get(1), Some(&"one".to_string()));
    assert_eq!(map.get(2), Some(&"two".to_string()));
    assert_eq!(map.get(3), Some(&"three".to_string()));
}

#[rstest]
fn test_insert_replaces_existing_value() {
    let map = PersistentIntMap::new()
        .insert(1, "one".to_string())
        .insert(1, "uno".to_string());

    assert_eq!(map.len(), 1);
    assert_eq!(map.get(1), Some(&"uno".to_string()));
}

#[rstest]
fn test_insert_preserves_original_map() {
    let original = PersistentIntMap::new().insert(1, "one".to_string());
    let updated = original.insert(2, "two".to_string());

    assert_eq!(original.len(), 1);
    assert_eq!(original.get(2), None);
    assert_eq!(updated.len(), 2);
    assert_eq!(updated.get(2), Some(&"two".to_string()));
}

#[rstest]
fn test_get_missing_key_returns_none() {
    let map = PersistentIntMap::new().insert(1, "one".to_string());
    assert_eq!(map.get(2), None);
}

#[rstest]
fn test_insert_with_combines_on_collision() {
    let counts: PersistentIntMap<usize> = PersistentIntMap::new();
    let counts = [3_i64, 1, 3, 3, 1]
        .into_iter()
        .fold(counts, |accumulated, key| {
            accumulated.insert_with(key, 1, |incoming, existing| incoming + existing)
        });

    assert_eq!(counts.get(3), Some(&3));
    assert_eq!(counts.get(1), Some(&2));
}

// =============================================================================
// Negative Key and Boundary Tests
// =============================================================================

#[rstest]
fn test_negative_keys() {
    let map = PersistentIntMap::new()
        .insert(-1, "minus one".to_string())
        .insert(-100, "minus hundred".to_string());

    assert_eq!(map.get(-1), Some(&"minus one".to_string()));
    assert_eq!(map.get(-100), Some(&"minus hundred".to_string()));
    assert_eq!(map.get(1), None);
}

#[rstest]
fn test_extreme_keys() {
    let map = PersistentIntMap::new()
        .insert(i64::MIN, "min")
        .insert(i64::MAX, "max")
        .insert(0, "zero");

    assert_eq!(map.get(i64::MIN), Some(&"min"));
    assert_eq!(map.get(i64::MAX), Some(&"max"));
    assert_eq!(map.len(), 3);

    let removed = map.remove(i64::MIN);
    assert_eq!(removed.get(i64::MIN), None);
    assert_eq!(removed.len(), 2);
}

#[rstest]
fn test_iteration_order_with_mixed_signs() {
    let map = PersistentIntMap::new()
        .insert(-3, "a")
        .insert(5, "b")
        .insert(0, "c");

    let entries: Vec<(i64, &str)> = map.iter().map(|(key, value)| (key, *value)).collect();
    assert_eq!(entries, vec![(-3, "a"), (0, "c"), (5, "b")]);
}

// =============================================================================
// Remove Tests
// =============================================================================

#[rstest]
fn test_remove_existing_key() {
    let map = PersistentIntMap::new()
        .insert(1, "one".to_string())
        .insert(2, "two".to_string());
    let removed = map.remove(1);

    assert_eq!(removed.len(), 1);
    assert_eq!(removed.get(1), None);
    assert_eq!(removed.get(2), Some(&"two".to_string()));
}

#[rstest]
fn test_remove_missing_key_returns_equal_map() {
    let map = PersistentIntMap::new().insert(1, "one".to_string());
    let removed = map.remove(2);
    assert_eq!(removed, map);
}

#[rstest]
fn test_remove_preserves_original_map() {
    let original = PersistentIntMap::new()
        .insert(1, "one".to_string())
        .insert(2, "two".to_string());
    let removed = original.remove(1);

    assert_eq!(original.len(), 2);
    assert_eq!(original.get(1), Some(&"one".to_string()));
    assert_eq!(removed.len(), 1);
}

#[rstest]
fn test_remove_all_entries_yields_empty_map() {
    let map = PersistentIntMap::new().insert(1, "a").insert(2, "b");
    let emptied = map.remove(1).remove(2);

    assert!(emptied.is_empty());
    assert_eq!(emptied, PersistentIntMap::new());
}

// =============================================================================
// Find Tests
// =============================================================================

#[rstest]
fn test_find_present_key() {
    let map = PersistentIntMap::singleton(7, "seven");
    assert_eq!(map.find(7), Ok(&"seven"));
}

#[rstest]
fn test_find_absent_key_reports_which_key() {
    let map = PersistentIntMap::singleton(7, "seven");
    let error = map.find(-7).unwrap_err();
    assert_eq!(error.key(), -7);
}

// =============================================================================
// Update and Adjust Tests
// =============================================================================

#[rstest]
fn test_update_existing_key() {
    let map = PersistentIntMap::singleton(1, 10);
    assert_eq!(map.update(1, |value| Some(value + 1)).get(1), Some(&11));
}

#[rstest]
fn test_update_returning_none_removes() {
    let map = PersistentIntMap::new().insert(1, 10).insert(2, 20);
    let shrunk = map.update(2, |_| None);
    assert_eq!(shrunk.len(), 1);
    assert!(!shrunk.contains_key(2));
}

#[rstest]
fn test_adjust_missing_key_is_noop() {
    let map = PersistentIntMap::singleton(1, 10);
    assert_eq!(map.adjust(5, |value| value * 2), map);
}

// =============================================================================
// Set Algebra Tests
// =============================================================================

#[rstest]
fn test_union_prefers_left_values() {
    let map1 = PersistentIntMap::new().insert(1, "a").insert(2, "b");
    let map2 = PersistentIntMap::new().insert(2, "B").insert(3, "c");

    let union = map1.union(&map2);
    assert_eq!(union.len(), 3);
    assert_eq!(union.get(2), Some(&"b"));
}

#[rstest]
fn test_union_with_combines_duplicates() {
    let map1 = PersistentIntMap::new().insert(1, 100).insert(2, 200);
    let map2 = PersistentIntMap::new().insert(2, 50).insert(3, 300);

    let merged = map1.union_with(&map2, |left, right| left + right);
    assert_eq!(merged.get(1), Some(&100));
    assert_eq!(merged.get(2), Some(&250));
    assert_eq!(merged.get(3), Some(&300));
}

#[rstest]
fn test_intersection_keeps_left_values() {
    let map1 = PersistentIntMap::new().insert(1, "a").insert(2, "b");
    let map2 = PersistentIntMap::new().insert(2, "B").insert(3, "c");

    let common = map1.intersection(&map2);
    assert_eq!(common.len(), 1);
    assert_eq!(common.get(2), Some(&"b"));
}

#[rstest]
fn test_difference_removes_shared_keys() {
    let map1 = PersistentIntMap::new().insert(1, "a").insert(2, "b");
    let map2 = PersistentIntMap::new().insert(2, "B").insert(3, "c");

    let rest = map1.difference(&map2);
    assert_eq!(rest.len(), 1);
    assert_eq!(rest.get(1), Some(&"a"));
}

#[rstest]
fn test_set_algebra_with_empty_operands() {
    let map = PersistentIntMap::new().insert(1, "a");
    let empty: PersistentIntMap<&str> = PersistentIntMap::new();

    assert_eq!(map.union(&empty), map);
    assert_eq!(empty.union(&map), map);
    assert!(map.intersection(&empty).is_empty());
    assert!(empty.difference(&map).is_empty());
    assert_eq!(map.difference(&empty), map);
}

#[rstest]
fn test_set_algebra_across_sign_boundary() {
    let negatives: PersistentIntMap<i32> = [(-8, 1), (-2, 2)].into_iter().collect();
    let mixed: PersistentIntMap<i32> = [(-2, 20), (4, 3)].into_iter().collect();

    let union = negatives.union(&mixed);
    assert_eq!(union.keys().collect::<Vec<_>>(), vec![-8, -2, 4]);
    assert_eq!(union.get(-2), Some(&2)); // Left bias

    let common = negatives.intersection(&mixed);
    assert_eq!(common.keys().collect::<Vec<_>>(), vec![-2]);

    let rest = negatives.difference(&mixed);
    assert_eq!(rest.keys().collect::<Vec<_>>(), vec![-8]);
}

// =============================================================================
// Traversal Tests
// =============================================================================

#[rstest]
fn test_keys_values_entries_agree() {
    let map: PersistentIntMap<i64> = [(3, 30), (-1, -10), (7, 70)].into_iter().collect();

    let keys: Vec<i64> = map.keys().collect();
    let values: Vec<i64> = map.values().copied().collect();
    let entries: Vec<(i64, i64)> = map.entries().map(|(key, value)| (key, *value)).collect();

    assert_eq!(keys, vec![-1, 3, 7]);
    assert_eq!(values, vec![-10, 30, 70]);
    assert_eq!(entries, vec![(-1, -10), (3, 30), (7, 70)]);
}

#[rstest]
fn test_fold_with_key_visits_ascending() {
    let map: PersistentIntMap<i64> = [(-5, 0), (2, 0), (9, 0)].into_iter().collect();
    let visited = map.fold_with_key(Vec::new(), |mut visited, key, _| {
        visited.push(key);
        visited
    });
    assert_eq!(visited, vec![-5, 2, 9]);
}

#[rstest]
fn test_fold_back_with_key_visits_descending() {
    let map: PersistentIntMap<i64> = [(-5, 0), (2, 0), (9, 0)].into_iter().collect();
    let visited = map.fold_back_with_key(Vec::new(), |key, _, mut visited| {
        visited.push(key);
        visited
    });
    assert_eq!(visited, vec![9, 2, -5]);
}

#[rstest]
fn test_extract_min_and_max() {
    let map: PersistentIntMap<&str> = [(4, "d"), (-6, "a"), (0, "b")].into_iter().collect();

    let (min_key, min_value, after_min) = map.extract_min().unwrap();
    assert_eq!((min_key, min_value), (-6, "a"));
    assert_eq!(after_min.len(), 2);

    let (max_key, max_value, after_max) = map.extract_max().unwrap();
    assert_eq!((max_key, max_value), (4, "d"));
    assert_eq!(after_max.len(), 2);

    let empty: PersistentIntMap<&str> = PersistentIntMap::new();
    assert!(empty.extract_min().is_none());
    assert!(empty.extract_max().is_none());
}

// =============================================================================
// Transform Tests
// =============================================================================

#[rstest]
fn test_map_values_changes_value_type() {
    let map = PersistentIntMap::new().insert(1, 10).insert(2, 20);
    let rendered = map.map_values(|value| format!("<{value}>"));

    assert_eq!(rendered.get(1), Some(&"<10>".to_string()));
    assert_eq!(rendered.get(2), Some(&"<20>".to_string()));
}

#[rstest]
fn test_filter_map_drops_and_transforms() {
    let map: PersistentIntMap<i64> = (0..10).map(|key| (key, key)).collect();
    let selected = map.filter_map(|key, value| (key % 3 == 0).then(|| value * 100));

    assert_eq!(selected.keys().collect::<Vec<_>>(), vec![0, 3, 6, 9]);
    assert_eq!(selected.get(6), Some(&600));
}

#[rstest]
fn test_keep_if_delete_if_partition_consistency() {
    let map: PersistentIntMap<i64> = (-5..6).map(|key| (key, key * key)).collect();
    let predicate = |key: i64, _: &i64| key % 2 == 0;

    let kept = map.keep_if(predicate);
    let dropped = map.delete_if(predicate);
    let (matching, rest) = map.partition(predicate);

    assert_eq!(kept, matching);
    assert_eq!(dropped, rest);
    assert_eq!(kept.len() + dropped.len(), map.len());
}

// =============================================================================
// Collection Trait Tests
// =============================================================================

#[rstest]
fn test_from_iterator_last_duplicate_wins() {
    let map: PersistentIntMap<&str> = [(1, "first"), (2, "two"), (1, "second")]
        .into_iter()
        .collect();

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(1), Some(&"second"));
}

#[rstest]
fn test_into_iterator_yields_ascending_owned_entries() {
    let map: PersistentIntMap<String> = [(2, "b"), (-1, "a")]
        .into_iter()
        .map(|(key, value)| (key, value.to_string()))
        .collect();

    let entries: Vec<(i64, String)> = map.into_iter().collect();
    assert_eq!(entries, vec![(-1, "a".to_string()), (2, "b".to_string())]);
}

#[rstest]
fn test_borrowing_into_iterator() {
    let map: PersistentIntMap<i64> = [(1, 10), (2, 20)].into_iter().collect();
    let mut total = 0;
    for (_, value) in &map {
        total += value;
    }
    assert_eq!(total, 30);
    assert_eq!(map.len(), 2); // Still usable
}

// =============================================================================
// Foldable Tests
// =============================================================================

#[rstest]
fn test_foldable_fold_left() {
    let map: PersistentIntMap<i64> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
    let sum = map.fold_left(0, |accumulator, value| accumulator + value);
    assert_eq!(sum, 6);
}

#[rstest]
fn test_foldable_to_list_is_ascending_values() {
    let map: PersistentIntMap<&str> = [(3, "c"), (-1, "a"), (2, "b")].into_iter().collect();
    assert_eq!(map.to_list(), vec!["a", "b", "c"]);
}

#[rstest]
fn test_foldable_exists_and_for_all() {
    let map: PersistentIntMap<i64> = [(1, 10), (2, 20)].into_iter().collect();
    assert!(map.exists(|value| *value > 15));
    assert!(map.for_all(|value| *value >= 10));
    assert!(!map.for_all(|value| *value > 15));
}

// =============================================================================
// Equality and Hash Tests
// =============================================================================

#[rstest]
fn test_maps_with_same_entries_are_equal() {
    let map1: PersistentIntMap<&str> = [(1, "a"), (2, "b")].into_iter().collect();
    let map2: PersistentIntMap<&str> = [(2, "b"), (1, "a")].into_iter().collect();
    assert_eq!(map1, map2);
}

#[rstest]
fn test_maps_with_different_entries_are_not_equal() {
    let map1: PersistentIntMap<&str> = [(1, "a")].into_iter().collect();
    let map2: PersistentIntMap<&str> = [(1, "b")].into_iter().collect();
    let map3: PersistentIntMap<&str> = [(2, "a")].into_iter().collect();

    assert_ne!(map1, map2);
    assert_ne!(map1, map3);
}

// =============================================================================
// Display Tests
// =============================================================================

#[rstest]
fn test_display_renders_sorted_entries() {
    let map = PersistentIntMap::new().insert(2, "two").insert(-1, "minus");
    assert_eq!(format!("{map}"), "{-1: minus, 2: two}");
}

// =============================================================================
// Stress Tests
// =============================================================================

#[rstest]
fn test_large_map_operations() {
    let mut map = PersistentIntMap::new();
    for index in 0..1000_i64 {
        map = map.insert(index * 7 - 3500, index);
    }

    assert_eq!(map.len(), 1000);
    assert_eq!(map.get(-3500), Some(&0));

    let mut previous = None;
    for (key, _) in map.iter() {
        if let Some(previous_key) = previous {
            assert!(previous_key < key);
        }
        previous = Some(key);
    }
}

#[rstest]
fn test_versions_are_independent() {
    let base: PersistentIntMap<i64> = (0..100).map(|key| (key, key)).collect();
    let mut versions = vec![base.clone()];
    for index in 0..100_i64 {
        let previous = versions.last().unwrap();
        versions.push(previous.insert(index, index * 1000));
    }

    // Every version still sees its own state
    assert_eq!(versions[0].get(0), Some(&0));
    assert_eq!(versions[1].get(0), Some(&0));
    assert_eq!(versions[2].get(0), Some(&0));
    assert_eq!(versions[101].get(99), Some(&99_000));
    assert_eq!(versions[100].get(99), Some(&99));
}

#![cfg(all(feature = "serde", feature = "persistent"))]
//! Serialization tests for the persistent collections.
//!
//! Maps serialize as JSON objects (keys become strings, per JSON's object
//! model) and sets as JSON arrays, both in ascending key order.

use patmap::persistent::{PersistentIntMap, PersistentIntSet};
use rstest::rstest;

// =============================================================================
// PersistentIntMap Serialization Tests
// =============================================================================

#[rstest]
fn test_map_serializes_in_ascending_order() {
    let map = PersistentIntMap::new()
        .insert(2, "two")
        .insert(-1, "minus one")
        .insert(10, "ten");

    let serialized = serde_json::to_string(&map).unwrap();
    assert_eq!(serialized, r#"{"-1":"minus one","2":"two","10":"ten"}"#);
}

#[rstest]
fn test_map_round_trip() {
    let map = PersistentIntMap::new()
        .insert(1, "one".to_string())
        .insert(-5, "minus five".to_string())
        .insert(i64::MAX, "max".to_string());

    let serialized = serde_json::to_string(&map).unwrap();
    let deserialized: PersistentIntMap<String> = serde_json::from_str(&serialized).unwrap();

    assert_eq!(deserialized, map);
}

#[rstest]
fn test_empty_map_round_trip() {
    let map: PersistentIntMap<i32> = PersistentIntMap::new();
    let serialized = serde_json::to_string(&map).unwrap();
    assert_eq!(serialized, "{}");

    let deserialized: PersistentIntMap<i32> = serde_json::from_str(&serialized).unwrap();
    assert!(deserialized.is_empty());
}

#[rstest]
fn test_map_deserialization_last_duplicate_wins() {
    let deserialized: PersistentIntMap<i32> =
        serde_json::from_str(r#"{"1":10,"2":20,"1":99}"#).unwrap();

    assert_eq!(deserialized.len(), 2);
    assert_eq!(deserialized.get(1), Some(&99));
}

#[rstest]
fn test_map_with_structured_values() {
    #[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    let map = PersistentIntMap::new()
        .insert(0, Point { x: 1, y: 2 })
        .insert(-1, Point { x: -3, y: 4 });

    let serialized = serde_json::to_string(&map).unwrap();
    let deserialized: PersistentIntMap<Point> = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, map);
}

// =============================================================================
// PersistentIntSet Serialization Tests
// =============================================================================

#[rstest]
fn test_set_serializes_as_sorted_array() {
    let set: PersistentIntSet = [5, -3, 0].into_iter().collect();
    let serialized = serde_json::to_string(&set).unwrap();
    assert_eq!(serialized, "[-3,0,5]");
}

#[rstest]
fn test_set_round_trip() {
    let set: PersistentIntSet = [i64::MIN, -1, 0, 7, i64::MAX].into_iter().collect();

    let serialized = serde_json::to_string(&set).unwrap();
    let deserialized: PersistentIntSet = serde_json::from_str(&serialized).unwrap();

    assert_eq!(deserialized, set);
}

#[rstest]
fn test_set_deserialization_deduplicates() {
    let deserialized: PersistentIntSet = serde_json::from_str("[1,2,2,3]").unwrap();
    assert_eq!(deserialized.len(), 3);
}

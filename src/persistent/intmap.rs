//! Persistent (immutable) integer-keyed map based on a big-endian Patricia trie.
//!
//! This module provides [`PersistentIntMap`], an immutable `i64 -> V` map
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! `PersistentIntMap` stores keys by their two's-complement bit pattern in a
//! binary radix tree with path compression. Every branch records the bit at
//! which its two subtrees first diverge, so the depth is bounded by the key
//! width rather than the element count.
//!
//! - O(min(n, W)) get, insert, remove (W = 64 key bits)
//! - O(n + m) union, intersection, difference
//! - O(1) `len` and `is_empty`
//! - Ascending iteration in numeric key order, negative keys first
//!
//! All operations return new maps without modifying the original, and
//! structural sharing ensures memory efficiency.
//!
//! # Examples
//!
//! ```rust
//! use patmap::persistent::PersistentIntMap;
//!
//! let map = PersistentIntMap::new()
//!     .insert(5, "b")
//!     .insert(-3, "a")
//!     .insert(0, "c");
//!
//! // Entries are always in ascending numeric order
//! let keys: Vec<i64> = map.keys().collect();
//! assert_eq!(keys, vec![-3, 0, 5]);
//! ```
//!
//! # Internal Structure
//!
//! The trie maintains the following invariants:
//! 1. Every branch mask has exactly one bit set
//! 2. Every key below a branch agrees with its prefix on all bits above the
//!    mask; keys with the mask bit clear sit left, keys with it set sit right
//! 3. Masks strictly shrink while descending (ranked on the unsigned bit
//!    pattern, so the sign bit forms the topmost branch of a mixed-sign map)
//! 4. Both children of a branch are non-empty
//!
//! Invariants 1-3 make the shape canonical: it depends only on the key set,
//! never on the order of insertions. Invariant 4 holds by construction, since
//! branch children are not optional. Violations of the others are internal
//! defects and are guarded by debug assertions in the branch constructor.

use super::ReferenceCounter;
use super::bits::{branching_bit, is_valid_mask, mask_prefix, match_prefix, shorter, test_bit};
use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use crate::typeclass::{Foldable, TypeConstructor};

// =============================================================================
// Node Definition
// =============================================================================

/// Internal node structure for the Patricia trie.
///
/// There is no variant for the empty map; the map handle holds
/// `Option<ReferenceCounter<Node<V>>>` instead, which also makes it
/// impossible to build a branch with an empty child.
#[derive(Clone)]
enum Node<V> {
    /// Exactly one key/value pair.
    Leaf { key: i64, value: V },
    /// An internal node splitting on a single bit.
    ///
    /// `mask` has exactly one bit set; `prefix` is the bit pattern shared by
    /// every key underneath, with the mask bit and everything below it
    /// cleared. `size` caches the entry count of the subtree.
    Branch {
        prefix: i64,
        mask: i64,
        size: usize,
        left: ReferenceCounter<Node<V>>,
        right: ReferenceCounter<Node<V>>,
    },
}

/// Returns the number of entries in a subtree. O(1) via the cached size.
fn node_size<V>(node: &Node<V>) -> usize {
    match node {
        Node::Leaf { .. } => 1,
        Node::Branch { size, .. } => *size,
    }
}

/// Returns the prefix a node presents to its parent: the key of a leaf, the
/// stored prefix of a branch. Used for routing and for debug assertions.
fn node_prefix<V>(node: &Node<V>) -> i64 {
    match node {
        Node::Leaf { key, .. } => *key,
        Node::Branch { prefix, .. } => *prefix,
    }
}

/// Allocates a leaf node.
fn leaf<V>(key: i64, value: V) -> ReferenceCounter<Node<V>> {
    ReferenceCounter::new(Node::Leaf { key, value })
}

/// Checks that a child's branch point sits strictly below `mask`.
fn mask_shrinks<V>(mask: i64, child: &Node<V>) -> bool {
    match child {
        Node::Leaf { .. } => true,
        Node::Branch {
            mask: child_mask, ..
        } => shorter(mask, *child_mask),
    }
}

/// Allocates a branch node, computing its cached size.
///
/// Guards the structural invariants in debug builds; reaching these
/// assertions indicates a defect in the construction logic, never a
/// condition normal library use can trigger.
fn branch<V>(
    prefix: i64,
    mask: i64,
    left: ReferenceCounter<Node<V>>,
    right: ReferenceCounter<Node<V>>,
) -> ReferenceCounter<Node<V>> {
    debug_assert!(is_valid_mask(mask), "branch mask must be a power of two");
    debug_assert_eq!(
        mask_prefix(prefix, mask),
        prefix,
        "branch prefix must be clear at and below its mask"
    );
    debug_assert!(!test_bit(node_prefix(&left), mask));
    debug_assert!(test_bit(node_prefix(&right), mask));
    debug_assert!(mask_shrinks(mask, &left));
    debug_assert!(mask_shrinks(mask, &right));

    let size = node_size(&left) + node_size(&right);
    ReferenceCounter::new(Node::Branch {
        prefix,
        mask,
        size,
        left,
        right,
    })
}

/// Rebuilds a branch whose children may have emptied, collapsing a branch
/// with one surviving child into that child. This is the contraction step
/// shared by `remove`, `keep_if`, `partition`, and `difference`.
fn branch_maybe<V>(
    prefix: i64,
    mask: i64,
    left: Option<ReferenceCounter<Node<V>>>,
    right: Option<ReferenceCounter<Node<V>>>,
) -> Option<ReferenceCounter<Node<V>>> {
    match (left, right) {
        (None, None) => None,
        (Some(survivor), None) | (None, Some(survivor)) => Some(survivor),
        (Some(left), Some(right)) => Some(branch(prefix, mask, left, right)),
    }
}

/// Merges two subtrees that have no common branch point yet.
///
/// Computes the branching bit from the diverging prefixes and assigns the
/// subtree with that bit set to the right side. When the trees differ in
/// sign this bit is the sign bit, so negative keys land on the right of the
/// topmost branch; traversal code compensates to keep iteration ascending.
fn join<V>(
    prefix1: i64,
    tree1: ReferenceCounter<Node<V>>,
    prefix2: i64,
    tree2: ReferenceCounter<Node<V>>,
) -> ReferenceCounter<Node<V>> {
    let mask = branching_bit(prefix1, prefix2);
    let prefix = mask_prefix(prefix1, mask);

    if test_bit(prefix1, mask) {
        branch(prefix, mask, tree2, tree1)
    } else {
        branch(prefix, mask, tree1, tree2)
    }
}

// =============================================================================
// Core Walks
// =============================================================================

/// Looks up a key, short-circuiting when the prefix stops matching.
fn lookup_node<V>(node: &Node<V>, key: i64) -> Option<&V> {
    match node {
        Node::Leaf {
            key: existing_key,
            value,
        } => (*existing_key == key).then_some(value),
        Node::Branch {
            prefix,
            mask,
            left,
            right,
            ..
        } => {
            if !match_prefix(key, *prefix, *mask) {
                None
            } else if test_bit(key, *mask) {
                lookup_node(right, key)
            } else {
                lookup_node(left, key)
            }
        }
    }
}

/// Inserts a key/value pair, resolving a collision with `combine`.
///
/// `combine` receives the incoming value and a reference to the stored one
/// and returns the value to keep. Only the spine from the root to the
/// touched leaf is reallocated; sibling subtrees are shared by reference.
fn insert_with_node<V: Clone, F>(
    node: &ReferenceCounter<Node<V>>,
    key: i64,
    value: V,
    combine: F,
) -> ReferenceCounter<Node<V>>
where
    F: FnOnce(V, &V) -> V,
{
    match node.as_ref() {
        Node::Leaf {
            key: existing_key,
            value: existing,
        } => {
            if *existing_key == key {
                leaf(key, combine(value, existing))
            } else {
                join(key, leaf(key, value), *existing_key, node.clone())
            }
        }
        Node::Branch {
            prefix,
            mask,
            left,
            right,
            ..
        } => {
            if !match_prefix(key, *prefix, *mask) {
                join(key, leaf(key, value), *prefix, node.clone())
            } else if test_bit(key, *mask) {
                branch(
                    *prefix,
                    *mask,
                    left.clone(),
                    insert_with_node(right, key, value, combine),
                )
            } else {
                branch(
                    *prefix,
                    *mask,
                    insert_with_node(left, key, value, combine),
                    right.clone(),
                )
            }
        }
    }
}

/// Inserts a key/value pair, overwriting any existing binding.
fn insert_node<V: Clone>(
    node: &ReferenceCounter<Node<V>>,
    key: i64,
    value: V,
) -> ReferenceCounter<Node<V>> {
    insert_with_node(node, key, value, |incoming, _existing| incoming)
}

/// Removes a key, contracting any branch left with a single child.
fn remove_node<V: Clone>(
    node: &ReferenceCounter<Node<V>>,
    key: i64,
) -> Option<ReferenceCounter<Node<V>>> {
    match node.as_ref() {
        Node::Leaf {
            key: existing_key, ..
        } => (*existing_key != key).then(|| node.clone()),
        Node::Branch {
            prefix,
            mask,
            left,
            right,
            ..
        } => {
            if !match_prefix(key, *prefix, *mask) {
                Some(node.clone())
            } else if test_bit(key, *mask) {
                branch_maybe(*prefix, *mask, Some(left.clone()), remove_node(right, key))
            } else {
                branch_maybe(*prefix, *mask, remove_node(left, key), Some(right.clone()))
            }
        }
    }
}

// =============================================================================
// Set-Algebraic Walks
// =============================================================================

/// Left-biased union: on duplicate keys the value from `node1` wins.
///
/// Physically shared subtrees are returned unchanged without descending,
/// which makes unions of closely related map versions nearly free.
fn union_node<V: Clone>(
    node1: &ReferenceCounter<Node<V>>,
    node2: &ReferenceCounter<Node<V>>,
) -> ReferenceCounter<Node<V>> {
    if ReferenceCounter::ptr_eq(node1, node2) {
        return node1.clone();
    }

    match (node1.as_ref(), node2.as_ref()) {
        (Node::Leaf { key, value }, _) => insert_node(node2, *key, value.clone()),
        (_, Node::Leaf { key, value }) => {
            insert_with_node(node1, *key, value.clone(), |_incoming, existing| {
                existing.clone()
            })
        }
        (
            Node::Branch {
                prefix: prefix1,
                mask: mask1,
                left: left1,
                right: right1,
                ..
            },
            Node::Branch {
                prefix: prefix2,
                mask: mask2,
                left: left2,
                right: right2,
                ..
            },
        ) => {
            if mask1 == mask2 && prefix1 == prefix2 {
                branch(
                    *prefix1,
                    *mask1,
                    union_node(left1, left2),
                    union_node(right1, right2),
                )
            } else if shorter(*mask1, *mask2) && match_prefix(*prefix2, *prefix1, *mask1) {
                if test_bit(*prefix2, *mask1) {
                    branch(*prefix1, *mask1, left1.clone(), union_node(right1, node2))
                } else {
                    branch(*prefix1, *mask1, union_node(left1, node2), right1.clone())
                }
            } else if shorter(*mask2, *mask1) && match_prefix(*prefix1, *prefix2, *mask2) {
                if test_bit(*prefix1, *mask2) {
                    branch(*prefix2, *mask2, left2.clone(), union_node(node1, right2))
                } else {
                    branch(*prefix2, *mask2, union_node(node1, left2), right2.clone())
                }
            } else {
                // Disjoint subtrees
                join(*prefix1, node1.clone(), *prefix2, node2.clone())
            }
        }
    }
}

/// Union resolving duplicate keys with `combine(left_value, right_value)`.
///
/// No shared-subtree shortcut here: the combiner must observe both values
/// even when the subtrees are physically identical.
fn union_with_node<V: Clone, F>(
    node1: &ReferenceCounter<Node<V>>,
    node2: &ReferenceCounter<Node<V>>,
    combine: &F,
) -> ReferenceCounter<Node<V>>
where
    F: Fn(&V, &V) -> V,
{
    match (node1.as_ref(), node2.as_ref()) {
        (Node::Leaf { key, value }, _) => {
            insert_with_node(node2, *key, value.clone(), |incoming, existing| {
                combine(&incoming, existing)
            })
        }
        (_, Node::Leaf { key, value }) => {
            insert_with_node(node1, *key, value.clone(), |incoming, existing| {
                combine(existing, &incoming)
            })
        }
        (
            Node::Branch {
                prefix: prefix1,
                mask: mask1,
                left: left1,
                right: right1,
                ..
            },
            Node::Branch {
                prefix: prefix2,
                mask: mask2,
                left: left2,
                right: right2,
                ..
            },
        ) => {
            if mask1 == mask2 && prefix1 == prefix2 {
                branch(
                    *prefix1,
                    *mask1,
                    union_with_node(left1, left2, combine),
                    union_with_node(right1, right2, combine),
                )
            } else if shorter(*mask1, *mask2) && match_prefix(*prefix2, *prefix1, *mask1) {
                if test_bit(*prefix2, *mask1) {
                    branch(
                        *prefix1,
                        *mask1,
                        left1.clone(),
                        union_with_node(right1, node2, combine),
                    )
                } else {
                    branch(
                        *prefix1,
                        *mask1,
                        union_with_node(left1, node2, combine),
                        right1.clone(),
                    )
                }
            } else if shorter(*mask2, *mask1) && match_prefix(*prefix1, *prefix2, *mask2) {
                if test_bit(*prefix1, *mask2) {
                    branch(
                        *prefix2,
                        *mask2,
                        left2.clone(),
                        union_with_node(node1, right2, combine),
                    )
                } else {
                    branch(
                        *prefix2,
                        *mask2,
                        union_with_node(node1, left2, combine),
                        right2.clone(),
                    )
                }
            } else {
                join(*prefix1, node1.clone(), *prefix2, node2.clone())
            }
        }
    }
}

/// Left-biased intersection: keys present in both sides, values from `node1`.
fn intersection_node<V: Clone>(
    node1: &ReferenceCounter<Node<V>>,
    node2: &ReferenceCounter<Node<V>>,
) -> Option<ReferenceCounter<Node<V>>> {
    if ReferenceCounter::ptr_eq(node1, node2) {
        return Some(node1.clone());
    }

    match (node1.as_ref(), node2.as_ref()) {
        (Node::Leaf { key, .. }, _) => lookup_node(node2, *key).map(|_| node1.clone()),
        (_, Node::Leaf { key, .. }) => {
            lookup_node(node1, *key).map(|value| leaf(*key, value.clone()))
        }
        (
            Node::Branch {
                prefix: prefix1,
                mask: mask1,
                left: left1,
                right: right1,
                ..
            },
            Node::Branch {
                prefix: prefix2,
                mask: mask2,
                left: left2,
                right: right2,
                ..
            },
        ) => {
            if mask1 == mask2 && prefix1 == prefix2 {
                branch_maybe(
                    *prefix1,
                    *mask1,
                    intersection_node(left1, left2),
                    intersection_node(right1, right2),
                )
            } else if shorter(*mask1, *mask2) && match_prefix(*prefix2, *prefix1, *mask1) {
                if test_bit(*prefix2, *mask1) {
                    intersection_node(right1, node2)
                } else {
                    intersection_node(left1, node2)
                }
            } else if shorter(*mask2, *mask1) && match_prefix(*prefix1, *prefix2, *mask2) {
                if test_bit(*prefix1, *mask2) {
                    intersection_node(node1, right2)
                } else {
                    intersection_node(node1, left2)
                }
            } else {
                None
            }
        }
    }
}

/// Intersection combining both values with `combine(left_value, right_value)`.
fn intersection_with_node<V: Clone, F>(
    node1: &ReferenceCounter<Node<V>>,
    node2: &ReferenceCounter<Node<V>>,
    combine: &F,
) -> Option<ReferenceCounter<Node<V>>>
where
    F: Fn(&V, &V) -> V,
{
    match (node1.as_ref(), node2.as_ref()) {
        (Node::Leaf { key, value }, _) => {
            lookup_node(node2, *key).map(|other| leaf(*key, combine(value, other)))
        }
        (_, Node::Leaf { key, value }) => {
            lookup_node(node1, *key).map(|mine| leaf(*key, combine(mine, value)))
        }
        (
            Node::Branch {
                prefix: prefix1,
                mask: mask1,
                left: left1,
                right: right1,
                ..
            },
            Node::Branch {
                prefix: prefix2,
                mask: mask2,
                left: left2,
                right: right2,
                ..
            },
        ) => {
            if mask1 == mask2 && prefix1 == prefix2 {
                branch_maybe(
                    *prefix1,
                    *mask1,
                    intersection_with_node(left1, left2, combine),
                    intersection_with_node(right1, right2, combine),
                )
            } else if shorter(*mask1, *mask2) && match_prefix(*prefix2, *prefix1, *mask1) {
                if test_bit(*prefix2, *mask1) {
                    intersection_with_node(right1, node2, combine)
                } else {
                    intersection_with_node(left1, node2, combine)
                }
            } else if shorter(*mask2, *mask1) && match_prefix(*prefix1, *prefix2, *mask2) {
                if test_bit(*prefix1, *mask2) {
                    intersection_with_node(node1, right2, combine)
                } else {
                    intersection_with_node(node1, left2, combine)
                }
            } else {
                None
            }
        }
    }
}

/// Difference: keys of `node1` not present in `node2`.
fn difference_node<V: Clone>(
    node1: &ReferenceCounter<Node<V>>,
    node2: &ReferenceCounter<Node<V>>,
) -> Option<ReferenceCounter<Node<V>>> {
    if ReferenceCounter::ptr_eq(node1, node2) {
        return None;
    }

    match (node1.as_ref(), node2.as_ref()) {
        (Node::Leaf { key, .. }, _) => {
            if lookup_node(node2, *key).is_some() {
                None
            } else {
                Some(node1.clone())
            }
        }
        (_, Node::Leaf { key, .. }) => remove_node(node1, *key),
        (
            Node::Branch {
                prefix: prefix1,
                mask: mask1,
                left: left1,
                right: right1,
                ..
            },
            Node::Branch {
                prefix: prefix2,
                mask: mask2,
                left: left2,
                right: right2,
                ..
            },
        ) => {
            if mask1 == mask2 && prefix1 == prefix2 {
                branch_maybe(
                    *prefix1,
                    *mask1,
                    difference_node(left1, left2),
                    difference_node(right1, right2),
                )
            } else if shorter(*mask1, *mask2) && match_prefix(*prefix2, *prefix1, *mask1) {
                if test_bit(*prefix2, *mask1) {
                    branch_maybe(
                        *prefix1,
                        *mask1,
                        Some(left1.clone()),
                        difference_node(right1, node2),
                    )
                } else {
                    branch_maybe(
                        *prefix1,
                        *mask1,
                        difference_node(left1, node2),
                        Some(right1.clone()),
                    )
                }
            } else if shorter(*mask2, *mask1) && match_prefix(*prefix1, *prefix2, *mask2) {
                if test_bit(*prefix1, *mask2) {
                    difference_node(node1, right2)
                } else {
                    difference_node(node1, left2)
                }
            } else {
                // Disjoint subtrees: nothing to subtract
                Some(node1.clone())
            }
        }
    }
}

// =============================================================================
// Traversal Walks
// =============================================================================

/// Ascending fold over a subtree. The sign-bit branch never occurs below the
/// root, so within a subtree left-before-right is always ascending.
fn fold_node<'a, V, B, F>(node: &'a Node<V>, accumulator: B, function: &mut F) -> B
where
    F: FnMut(B, i64, &'a V) -> B,
{
    match node {
        Node::Leaf { key, value } => function(accumulator, *key, value),
        Node::Branch { left, right, .. } => {
            let accumulator = fold_node(left, accumulator, function);
            fold_node(right, accumulator, function)
        }
    }
}

/// Descending fold over a subtree.
fn fold_back_node<'a, V, B, F>(node: &'a Node<V>, accumulator: B, function: &mut F) -> B
where
    F: FnMut(i64, &'a V, B) -> B,
{
    match node {
        Node::Leaf { key, value } => function(*key, value, accumulator),
        Node::Branch { left, right, .. } => {
            let accumulator = fold_back_node(right, accumulator, function);
            fold_back_node(left, accumulator, function)
        }
    }
}

/// Minimum entry of a subtree: the leftmost leaf.
fn min_node<V>(node: &Node<V>) -> (i64, &V) {
    match node {
        Node::Leaf { key, value } => (*key, value),
        Node::Branch { left, .. } => min_node(left),
    }
}

/// Maximum entry of a subtree: the rightmost leaf.
fn max_node<V>(node: &Node<V>) -> (i64, &V) {
    match node {
        Node::Leaf { key, value } => (*key, value),
        Node::Branch { right, .. } => max_node(right),
    }
}

/// Removes the leftmost leaf of a subtree in a single walk, returning the
/// extracted entry and the contracted remainder.
fn extract_min_node<V: Clone>(
    node: &ReferenceCounter<Node<V>>,
) -> (i64, V, Option<ReferenceCounter<Node<V>>>) {
    match node.as_ref() {
        Node::Leaf { key, value } => (*key, value.clone(), None),
        Node::Branch {
            prefix,
            mask,
            left,
            right,
            ..
        } => {
            let (key, value, rest) = extract_min_node(left);
            (
                key,
                value,
                branch_maybe(*prefix, *mask, rest, Some(right.clone())),
            )
        }
    }
}

/// Removes the rightmost leaf of a subtree in a single walk.
fn extract_max_node<V: Clone>(
    node: &ReferenceCounter<Node<V>>,
) -> (i64, V, Option<ReferenceCounter<Node<V>>>) {
    match node.as_ref() {
        Node::Leaf { key, value } => (*key, value.clone(), None),
        Node::Branch {
            prefix,
            mask,
            left,
            right,
            ..
        } => {
            let (key, value, rest) = extract_max_node(right);
            (
                key,
                value,
                branch_maybe(*prefix, *mask, Some(left.clone()), rest),
            )
        }
    }
}

// =============================================================================
// Transform Walks
// =============================================================================

/// Shape-preserving value transform; sizes and routing bits are unchanged.
fn map_node<V, W, F>(node: &Node<V>, transform: &mut F) -> ReferenceCounter<Node<W>>
where
    F: FnMut(i64, &V) -> W,
{
    match node {
        Node::Leaf { key, value } => leaf(*key, transform(*key, value)),
        Node::Branch {
            prefix,
            mask,
            size,
            left,
            right,
        } => ReferenceCounter::new(Node::Branch {
            prefix: *prefix,
            mask: *mask,
            size: *size,
            left: map_node(left, transform),
            right: map_node(right, transform),
        }),
    }
}

/// Shape-contracting filter, re-contracting branches whose children empty.
fn filter_node<V, F>(
    node: &ReferenceCounter<Node<V>>,
    predicate: &mut F,
) -> Option<ReferenceCounter<Node<V>>>
where
    F: FnMut(i64, &V) -> bool,
{
    match node.as_ref() {
        Node::Leaf { key, value } => predicate(*key, value).then(|| node.clone()),
        Node::Branch {
            prefix,
            mask,
            left,
            right,
            ..
        } => {
            let kept_left = filter_node(left, predicate);
            let kept_right = filter_node(right, predicate);
            branch_maybe(*prefix, *mask, kept_left, kept_right)
        }
    }
}

/// Combined filter and transform.
fn filter_map_node<V, W, F>(node: &Node<V>, transform: &mut F) -> Option<ReferenceCounter<Node<W>>>
where
    F: FnMut(i64, &V) -> Option<W>,
{
    match node {
        Node::Leaf { key, value } => transform(*key, value).map(|new_value| leaf(*key, new_value)),
        Node::Branch {
            prefix,
            mask,
            left,
            right,
            ..
        } => {
            let kept_left = filter_map_node(left, transform);
            let kept_right = filter_map_node(right, transform);
            branch_maybe(*prefix, *mask, kept_left, kept_right)
        }
    }
}

/// Splits a subtree by a predicate into (matching, not matching).
fn partition_node<V, F>(
    node: &ReferenceCounter<Node<V>>,
    predicate: &mut F,
) -> (
    Option<ReferenceCounter<Node<V>>>,
    Option<ReferenceCounter<Node<V>>>,
)
where
    F: FnMut(i64, &V) -> bool,
{
    match node.as_ref() {
        Node::Leaf { key, value } => {
            if predicate(*key, value) {
                (Some(node.clone()), None)
            } else {
                (None, Some(node.clone()))
            }
        }
        Node::Branch {
            prefix,
            mask,
            left,
            right,
            ..
        } => {
            let (left_matching, left_rest) = partition_node(left, predicate);
            let (right_matching, right_rest) = partition_node(right, predicate);
            (
                branch_maybe(*prefix, *mask, left_matching, right_matching),
                branch_maybe(*prefix, *mask, left_rest, right_rest),
            )
        }
    }
}

// =============================================================================
// KeyNotFoundError Definition
// =============================================================================

/// Error returned by [`PersistentIntMap::find`] when the key is absent.
///
/// Key-not-found is the only recoverable error in this module; it is carried
/// as a value so callers can never ignore it silently.
///
/// # Examples
///
/// ```rust
/// use patmap::persistent::PersistentIntMap;
///
/// let map = PersistentIntMap::singleton(1, "one");
/// let error = map.find(2).unwrap_err();
/// assert_eq!(error.key(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNotFoundError {
    key: i64,
}

impl KeyNotFoundError {
    /// Returns the key that was not found.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> i64 {
        self.key
    }
}

impl fmt::Display for KeyNotFoundError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "key {} not found in map", self.key)
    }
}

impl std::error::Error for KeyNotFoundError {}

// =============================================================================
// PersistentIntMap Definition
// =============================================================================

/// A persistent (immutable) map from `i64` keys to values, backed by a
/// big-endian Patricia trie.
///
/// `PersistentIntMap` is an immutable data structure that uses structural
/// sharing to efficiently support functional programming patterns. The trie
/// shape is canonical: two maps holding the same entries are deeply equal no
/// matter how they were built, and iteration is always in ascending numeric
/// key order (negative keys before non-negative ones).
///
/// # Time Complexity
///
/// | Operation      | Complexity               |
/// |----------------|--------------------------|
/// | `new`          | O(1)                     |
/// | `get`          | O(min(n, W))             |
/// | `insert`       | O(min(n, W))             |
/// | `remove`       | O(min(n, W))             |
/// | `contains_key` | O(min(n, W))             |
/// | `union`        | O(n + m)                 |
/// | `min`/`max`    | O(min(n, W))             |
/// | `len`          | O(1)                     |
/// | `is_empty`     | O(1)                     |
///
/// where W is the number of key bits (64).
///
/// # Examples
///
/// ```rust
/// use patmap::persistent::PersistentIntMap;
///
/// let map = PersistentIntMap::singleton(42, "answer");
/// assert_eq!(map.get(42), Some(&"answer"));
///
/// // Ordered iteration across the sign boundary
/// let map = PersistentIntMap::new()
///     .insert(5, "b")
///     .insert(-3, "a")
///     .insert(0, "c");
///
/// let keys: Vec<i64> = map.keys().collect();
/// assert_eq!(keys, vec![-3, 0, 5]);
/// ```
#[derive(Clone)]
pub struct PersistentIntMap<V> {
    /// Root node; `None` is the unique representation of the empty map.
    root: Option<ReferenceCounter<Node<V>>>,
}

impl<V> PersistentIntMap<V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map: PersistentIntMap<String> = PersistentIntMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    /// Creates a map containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::singleton(42, "answer");
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get(42), Some(&"answer"));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: i64, value: V) -> Self {
        Self {
            root: Some(leaf(key, value)),
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1); every branch caches its subtree size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new().insert(1, "one").insert(2, "two");
    /// assert_eq!(map.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |root| node_size(root))
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let empty: PersistentIntMap<i32> = PersistentIntMap::new();
    /// assert!(empty.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(min(n, W)): bounded by the trie depth, which never exceeds the key
    /// width, independent of the element count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new().insert(-7, "minus seven");
    /// assert_eq!(map.get(-7), Some(&"minus seven"));
    /// assert_eq!(map.get(7), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: i64) -> Option<&V> {
        self.root.as_ref().and_then(|root| lookup_node(root, key))
    }

    /// Returns `true` if the map contains the specified key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::singleton(1, "one");
    /// assert!(map.contains_key(1));
    /// assert!(!map.contains_key(2));
    /// ```
    #[must_use]
    pub fn contains_key(&self, key: i64) -> bool {
        self.get(key).is_some()
    }

    /// Returns the value for a key that must be present.
    ///
    /// Unlike [`get`](Self::get), an absent key is reported as a
    /// [`KeyNotFoundError`] rather than `None`, for call sites where absence
    /// is exceptional rather than expected.
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFoundError`] when the key has no binding.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::singleton(1, "one");
    /// assert_eq!(map.find(1), Ok(&"one"));
    /// assert!(map.find(2).is_err());
    /// ```
    pub fn find(&self, key: i64) -> Result<&V, KeyNotFoundError> {
        self.get(key).ok_or(KeyNotFoundError { key })
    }

    /// Returns the entry with the minimum key.
    ///
    /// At a mixed-sign root the minimum lives on the negative (right) side of
    /// the sign branch; below it, the leftmost leaf.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new()
    ///     .insert(3, "three")
    ///     .insert(-1, "minus one")
    ///     .insert(5, "five");
    ///
    /// assert_eq!(map.min(), Some((-1, &"minus one")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(i64, &V)> {
        let root = self.root.as_ref()?;
        Some(match root.as_ref() {
            Node::Branch { mask, right, .. } if *mask < 0 => min_node(right),
            _ => min_node(root),
        })
    }

    /// Returns the entry with the maximum key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new()
    ///     .insert(3, "three")
    ///     .insert(-1, "minus one")
    ///     .insert(5, "five");
    ///
    /// assert_eq!(map.max(), Some((5, &"five")));
    /// ```
    #[must_use]
    pub fn max(&self) -> Option<(i64, &V)> {
        let root = self.root.as_ref()?;
        Some(match root.as_ref() {
            Node::Branch { mask, left, .. } if *mask < 0 => max_node(left),
            _ => max_node(root),
        })
    }

    /// Returns an iterator over entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new()
    ///     .insert(3, "three")
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{}: {}", key, value);
    /// }
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentIntMapIterator<'_, V> {
        let mut stack = SmallVec::new();
        if let Some(root) = &self.root {
            match root.as_ref() {
                // Negative keys sit on the right of the sign branch but sort
                // first; seed the stack so they are popped first.
                Node::Branch {
                    mask, left, right, ..
                } if *mask < 0 => {
                    stack.push(left.as_ref());
                    stack.push(right.as_ref());
                }
                _ => stack.push(root.as_ref()),
            }
        }
        PersistentIntMapIterator {
            stack,
            remaining: self.len(),
        }
    }

    /// Returns an iterator over keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new().insert(2, "b").insert(-2, "a");
    /// let keys: Vec<i64> = map.keys().collect();
    /// assert_eq!(keys, vec![-2, 2]);
    /// ```
    pub fn keys(&self) -> impl Iterator<Item = i64> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new().insert(1, 10).insert(2, 20);
    /// let sum: i32 = map.values().sum();
    /// assert_eq!(sum, 30);
    /// ```
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns an iterator over key-value pairs in ascending key order.
    ///
    /// This is an alias for [`iter`](Self::iter).
    #[inline]
    #[must_use]
    pub fn entries(&self) -> PersistentIntMapIterator<'_, V> {
        self.iter()
    }

    /// Folds entries in ascending key order.
    ///
    /// The combining function receives the accumulator, the key, and a
    /// reference to the value. Negative keys are visited before non-negative
    /// ones, so the traversal order is deterministic and fully ascending.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new().insert(2, "b").insert(-1, "a");
    /// let order = map.fold_with_key(String::new(), |mut order, key, _| {
    ///     order.push_str(&key.to_string());
    ///     order.push(' ');
    ///     order
    /// });
    /// assert_eq!(order, "-1 2 ");
    /// ```
    pub fn fold_with_key<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, i64, &V) -> B,
    {
        match &self.root {
            None => init,
            Some(root) => match root.as_ref() {
                Node::Branch {
                    mask, left, right, ..
                } if *mask < 0 => {
                    let accumulator = fold_node(right, init, &mut function);
                    fold_node(left, accumulator, &mut function)
                }
                _ => fold_node(root, init, &mut function),
            },
        }
    }

    /// Folds entries in descending key order.
    ///
    /// The combining function receives the key, a reference to the value, and
    /// the accumulator, mirroring [`fold_with_key`](Self::fold_with_key).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new().insert(2, "b").insert(-1, "a");
    /// let order = map.fold_back_with_key(String::new(), |key, _, mut order| {
    ///     order.push_str(&key.to_string());
    ///     order.push(' ');
    ///     order
    /// });
    /// assert_eq!(order, "2 -1 ");
    /// ```
    pub fn fold_back_with_key<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(i64, &V, B) -> B,
    {
        match &self.root {
            None => init,
            Some(root) => match root.as_ref() {
                Node::Branch {
                    mask, left, right, ..
                } if *mask < 0 => {
                    let accumulator = fold_back_node(left, init, &mut function);
                    fold_back_node(right, accumulator, &mut function)
                }
                _ => fold_back_node(root, init, &mut function),
            },
        }
    }
}

impl<V: Clone> PersistentIntMap<V> {
    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contains the key, the value is replaced.
    ///
    /// # Complexity
    ///
    /// O(min(n, W)); allocates only the path from the root to the touched
    /// leaf and shares every sibling subtree with the original map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map1 = PersistentIntMap::new().insert(1, "one");
    /// let map2 = map1.insert(1, "ONE");
    ///
    /// assert_eq!(map1.get(1), Some(&"one")); // Original unchanged
    /// assert_eq!(map2.get(1), Some(&"ONE")); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, key: i64, value: V) -> Self {
        let new_root = match &self.root {
            None => leaf(key, value),
            Some(root) => insert_node(root, key, value),
        };
        Self {
            root: Some(new_root),
        }
    }

    /// Inserts a key-value pair, resolving a collision with `combine`.
    ///
    /// If the key is absent the value is inserted as-is. If it is present,
    /// the stored value becomes `combine(value, &existing)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::singleton(1, 10);
    /// let merged = map.insert_with(1, 5, |incoming, existing| incoming + existing);
    /// assert_eq!(merged.get(1), Some(&15));
    /// ```
    #[must_use]
    pub fn insert_with<F>(&self, key: i64, value: V, combine: F) -> Self
    where
        F: FnOnce(V, &V) -> V,
    {
        let new_root = match &self.root {
            None => leaf(key, value),
            Some(root) => insert_with_node(root, key, value, combine),
        };
        Self {
            root: Some(new_root),
        }
    }

    /// Removes a key from the map.
    ///
    /// Returns a new map without the key. Removing an absent key returns a
    /// handle sharing the original root unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new().insert(1, "one").insert(2, "two");
    /// let removed = map.remove(1);
    ///
    /// assert_eq!(map.len(), 2);     // Original unchanged
    /// assert_eq!(removed.len(), 1); // New version
    /// assert_eq!(removed.get(1), None);
    /// ```
    #[must_use]
    pub fn remove(&self, key: i64) -> Self {
        if !self.contains_key(key) {
            return self.clone();
        }
        match &self.root {
            None => Self::new(),
            Some(root) => Self {
                root: remove_node(root, key),
            },
        }
    }

    /// Updates the value at a key.
    ///
    /// If the key is absent the map is returned unchanged. If `function`
    /// returns `None`, the key is removed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::singleton(1, 10);
    /// assert_eq!(map.update(1, |value| Some(value * 2)).get(1), Some(&20));
    /// assert_eq!(map.update(1, |_| None).get(1), None);
    /// ```
    #[must_use]
    pub fn update<F>(&self, key: i64, function: F) -> Self
    where
        F: FnOnce(&V) -> Option<V>,
    {
        match self.get(key) {
            None => self.clone(),
            Some(value) => match function(value) {
                None => self.remove(key),
                Some(new_value) => self.insert(key, new_value),
            },
        }
    }

    /// Adjusts the value at a key with a pure function.
    ///
    /// A no-op when the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::singleton(1, 10);
    /// assert_eq!(map.adjust(1, |value| value + 5).get(1), Some(&15));
    /// ```
    #[must_use]
    pub fn adjust<F>(&self, key: i64, function: F) -> Self
    where
        F: FnOnce(&V) -> V,
    {
        self.update(key, |value| Some(function(value)))
    }

    /// Left-biased union of two maps.
    ///
    /// Returns a new map containing every key of either operand; on duplicate
    /// keys the value from `self` wins. Runs in O(n + m) by recursing over
    /// both tries simultaneously, and returns physically shared subtrees
    /// without descending into them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map1 = PersistentIntMap::new().insert(1, "a").insert(2, "b");
    /// let map2 = PersistentIntMap::new().insert(2, "B").insert(3, "c");
    ///
    /// let union = map1.union(&map2);
    /// assert_eq!(union.len(), 3);
    /// assert_eq!(union.get(2), Some(&"b")); // From map1
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        match (&self.root, &other.root) {
            (None, _) => other.clone(),
            (_, None) => self.clone(),
            (Some(node1), Some(node2)) => Self {
                root: Some(union_node(node1, node2)),
            },
        }
    }

    /// Union of two maps with a combining function for duplicate keys.
    ///
    /// `combine` receives the value from `self` first and the value from
    /// `other` second.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map1 = PersistentIntMap::new().insert(1, 100).insert(2, 200);
    /// let map2 = PersistentIntMap::new().insert(2, 50).insert(3, 300);
    ///
    /// let merged = map1.union_with(&map2, |left, right| left + right);
    /// assert_eq!(merged.get(2), Some(&250));
    /// assert_eq!(merged.get(3), Some(&300));
    /// ```
    #[must_use]
    pub fn union_with<F>(&self, other: &Self, combine: F) -> Self
    where
        F: Fn(&V, &V) -> V,
    {
        match (&self.root, &other.root) {
            (None, _) => other.clone(),
            (_, None) => self.clone(),
            (Some(node1), Some(node2)) => Self {
                root: Some(union_with_node(node1, node2, &combine)),
            },
        }
    }

    /// Left-biased intersection of two maps.
    ///
    /// Returns a new map containing the keys present in both operands, with
    /// values taken from `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map1 = PersistentIntMap::new().insert(1, "a").insert(2, "b");
    /// let map2 = PersistentIntMap::new().insert(2, "B").insert(3, "c");
    ///
    /// let common = map1.intersection(&map2);
    /// assert_eq!(common.len(), 1);
    /// assert_eq!(common.get(2), Some(&"b"));
    /// ```
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        match (&self.root, &other.root) {
            (None, _) | (_, None) => Self::new(),
            (Some(node1), Some(node2)) => Self {
                root: intersection_node(node1, node2),
            },
        }
    }

    /// Intersection of two maps with a combining function.
    ///
    /// Each shared key maps to `combine(&self_value, &other_value)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map1 = PersistentIntMap::new().insert(1, 10).insert(2, 20);
    /// let map2 = PersistentIntMap::new().insert(2, 5).insert(3, 30);
    ///
    /// let combined = map1.intersection_with(&map2, |left, right| left - right);
    /// assert_eq!(combined.get(2), Some(&15));
    /// assert_eq!(combined.len(), 1);
    /// ```
    #[must_use]
    pub fn intersection_with<F>(&self, other: &Self, combine: F) -> Self
    where
        F: Fn(&V, &V) -> V,
    {
        match (&self.root, &other.root) {
            (None, _) | (_, None) => Self::new(),
            (Some(node1), Some(node2)) => Self {
                root: intersection_with_node(node1, node2, &combine),
            },
        }
    }

    /// Difference of two maps: entries of `self` whose keys are absent from
    /// `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map1 = PersistentIntMap::new().insert(1, "a").insert(2, "b");
    /// let map2 = PersistentIntMap::new().insert(2, "B").insert(3, "c");
    ///
    /// let rest = map1.difference(&map2);
    /// assert_eq!(rest.len(), 1);
    /// assert_eq!(rest.get(1), Some(&"a"));
    /// ```
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        match (&self.root, &other.root) {
            (None, _) => Self::new(),
            (_, None) => self.clone(),
            (Some(node1), Some(node2)) => Self {
                root: difference_node(node1, node2),
            },
        }
    }

    /// Removes and returns the entry with the minimum key in a single walk.
    ///
    /// Returns the key, its value, and the map without that entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new().insert(3, "c").insert(-1, "a").insert(2, "b");
    /// let (key, value, rest) = map.extract_min().unwrap();
    ///
    /// assert_eq!((key, value), (-1, "a"));
    /// assert_eq!(rest.len(), 2);
    /// assert_eq!(map.len(), 3); // Original unchanged
    /// ```
    #[must_use]
    pub fn extract_min(&self) -> Option<(i64, V, Self)> {
        let root = self.root.as_ref()?;
        let (key, value, rest) = match root.as_ref() {
            Node::Branch {
                prefix,
                mask,
                left,
                right,
                ..
            } if *mask < 0 => {
                let (key, value, rest) = extract_min_node(right);
                (
                    key,
                    value,
                    branch_maybe(*prefix, *mask, Some(left.clone()), rest),
                )
            }
            _ => extract_min_node(root),
        };
        Some((key, value, Self { root: rest }))
    }

    /// Removes and returns the entry with the maximum key in a single walk.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new().insert(3, "c").insert(-1, "a");
    /// let (key, value, rest) = map.extract_max().unwrap();
    ///
    /// assert_eq!((key, value), (3, "c"));
    /// assert_eq!(rest.len(), 1);
    /// ```
    #[must_use]
    pub fn extract_max(&self) -> Option<(i64, V, Self)> {
        let root = self.root.as_ref()?;
        let (key, value, rest) = match root.as_ref() {
            Node::Branch {
                prefix,
                mask,
                left,
                right,
                ..
            } if *mask < 0 => {
                let (key, value, rest) = extract_max_node(left);
                (
                    key,
                    value,
                    branch_maybe(*prefix, *mask, rest, Some(right.clone())),
                )
            }
            _ => extract_max_node(root),
        };
        Some((key, value, Self { root: rest }))
    }

    /// Applies a function to all values, keeping keys unchanged.
    ///
    /// The transform preserves the trie shape: the result shares no values
    /// with the original but has the same structure and length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new().insert(1, 10).insert(2, 20);
    /// let doubled = map.map_values(|value| value * 2);
    /// assert_eq!(doubled.get(1), Some(&20));
    /// assert_eq!(doubled.get(2), Some(&40));
    /// ```
    #[must_use]
    pub fn map_values<W, F>(&self, mut transform: F) -> PersistentIntMap<W>
    where
        F: FnMut(&V) -> W,
    {
        self.map_with_key(|_, value| transform(value))
    }

    /// Applies a function to all entries, keeping keys unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new().insert(2, 10).insert(3, 10);
    /// let scaled = map.map_with_key(|key, value| key * value);
    /// assert_eq!(scaled.get(2), Some(&20));
    /// assert_eq!(scaled.get(3), Some(&30));
    /// ```
    #[must_use]
    pub fn map_with_key<W, F>(&self, mut transform: F) -> PersistentIntMap<W>
    where
        F: FnMut(i64, &V) -> W,
    {
        PersistentIntMap {
            root: self
                .root
                .as_ref()
                .map(|root| map_node(root, &mut transform)),
        }
    }

    /// Applies a function to each entry, keeping only those that return
    /// `Some`.
    ///
    /// This combines filtering and mapping in a single structural pass;
    /// branches whose children empty are contracted away.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new()
    ///     .insert(1, "1")
    ///     .insert(2, "abc")
    ///     .insert(3, "42");
    /// let parsed = map.filter_map(|_, value| value.parse::<i32>().ok());
    /// assert_eq!(parsed.len(), 2);
    /// assert_eq!(parsed.get(3), Some(&42));
    /// ```
    #[must_use]
    pub fn filter_map<W, F>(&self, mut transform: F) -> PersistentIntMap<W>
    where
        F: FnMut(i64, &V) -> Option<W>,
    {
        PersistentIntMap {
            root: self
                .root
                .as_ref()
                .and_then(|root| filter_map_node(root, &mut transform)),
        }
    }

    /// Keeps only entries for which the predicate returns true.
    ///
    /// Retained subtrees are shared with the original map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new().insert(1, 10).insert(2, 20).insert(3, 30);
    /// let even_keys = map.keep_if(|key, _| key % 2 == 0);
    /// assert_eq!(even_keys.len(), 1);
    /// assert_eq!(even_keys.get(2), Some(&20));
    /// ```
    #[must_use]
    pub fn keep_if<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(i64, &V) -> bool,
    {
        Self {
            root: self
                .root
                .as_ref()
                .and_then(|root| filter_node(root, &mut predicate)),
        }
    }

    /// Removes entries for which the predicate returns true.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new().insert(1, 10).insert(2, 20).insert(3, 30);
    /// let small = map.delete_if(|_, value| *value >= 20);
    /// assert_eq!(small.len(), 1);
    /// assert_eq!(small.get(1), Some(&10));
    /// ```
    #[must_use]
    pub fn delete_if<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(i64, &V) -> bool,
    {
        self.keep_if(|key, value| !predicate(key, value))
    }

    /// Partitions the map into two maps based on a predicate.
    ///
    /// The first map contains entries for which the predicate returns true,
    /// the second the rest. Both are produced in one structural pass.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntMap;
    ///
    /// let map = PersistentIntMap::new()
    ///     .insert(1, 10)
    ///     .insert(2, 20)
    ///     .insert(3, 30)
    ///     .insert(4, 40);
    /// let (even_keys, odd_keys) = map.partition(|key, _| key % 2 == 0);
    /// assert_eq!(even_keys.len(), 2);
    /// assert_eq!(odd_keys.len(), 2);
    /// ```
    #[must_use]
    pub fn partition<F>(&self, mut predicate: F) -> (Self, Self)
    where
        F: FnMut(i64, &V) -> bool,
    {
        match &self.root {
            None => (Self::new(), Self::new()),
            Some(root) => {
                let (matching, rest) = partition_node(root, &mut predicate);
                (Self { root: matching }, Self { root: rest })
            }
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over key-value pairs of a [`PersistentIntMap`] in ascending
/// key order.
pub struct PersistentIntMapIterator<'a, V> {
    /// Explicit traversal stack; depth is bounded by the key width, so the
    /// inline capacity covers typical maps without heap allocation.
    stack: SmallVec<[&'a Node<V>; 16]>,
    remaining: usize,
}

impl<'a, V> Iterator for PersistentIntMapIterator<'a, V> {
    type Item = (i64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Leaf { key, value } => {
                    self.remaining -= 1;
                    return Some((*key, value));
                }
                Node::Branch { left, right, .. } => {
                    // Push right first so left is yielded first
                    self.stack.push(right.as_ref());
                    self.stack.push(left.as_ref());
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for PersistentIntMapIterator<'_, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// An owning iterator over key-value pairs of a [`PersistentIntMap`].
pub struct PersistentIntMapIntoIterator<V> {
    entries: Vec<(i64, V)>,
    current_index: usize,
}

impl<V: Clone> Iterator for PersistentIntMapIntoIterator<V> {
    type Item = (i64, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.entries.len() {
            None
        } else {
            let entry = self.entries[self.current_index].clone();
            self.current_index += 1;
            Some(entry)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len().saturating_sub(self.current_index);
        (remaining, Some(remaining))
    }
}

impl<V: Clone> ExactSizeIterator for PersistentIntMapIntoIterator<V> {
    fn len(&self) -> usize {
        self.entries.len().saturating_sub(self.current_index)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<V> Default for PersistentIntMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> FromIterator<(i64, V)> for PersistentIntMap<V> {
    /// Builds a map by folding `insert` over the sequence; on duplicate keys
    /// the last occurrence wins.
    fn from_iter<I: IntoIterator<Item = (i64, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map = map.insert(key, value);
        }
        map
    }
}

impl<V: Clone> IntoIterator for PersistentIntMap<V> {
    type Item = (i64, V);
    type IntoIter = PersistentIntMapIntoIterator<V>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<(i64, V)> = self
            .iter()
            .map(|(key, value)| (key, value.clone()))
            .collect();
        PersistentIntMapIntoIterator {
            entries,
            current_index: 0,
        }
    }
}

impl<'a, V> IntoIterator for &'a PersistentIntMap<V> {
    type Item = (i64, &'a V);
    type IntoIter = PersistentIntMapIterator<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: PartialEq> PartialEq for PersistentIntMap<V> {
    /// Deep structural equality.
    ///
    /// Because the trie shape is canonical, comparing the ascending entry
    /// sequences is equivalent to comparing the structures themselves.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<V: Eq> Eq for PersistentIntMap<V> {}

/// Computes a hash value for this map.
///
/// The hash covers the length and then every entry in ascending key order,
/// so equal maps hash equally regardless of how they were built.
impl<V: Hash> Hash for PersistentIntMap<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for PersistentIntMap<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_map()
            .entries(self.iter().map(|(key, value)| (key, value)))
            .finish()
    }
}

impl<V: fmt::Display> fmt::Display for PersistentIntMap<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

/// Wrapper to make `PersistentIntMap` implement `TypeConstructor` for values.
///
/// The key type is fixed, so the map is treated as a container of `V` values.
impl<V> TypeConstructor for PersistentIntMap<V> {
    type Inner = V;
    type WithType<B> = PersistentIntMap<B>;
}

impl<V: Clone> Foldable for PersistentIntMap<V> {
    fn fold_left<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(B, V) -> B,
    {
        self.into_iter()
            .fold(init, |accumulator, (_, value)| function(accumulator, value))
    }

    fn fold_right<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(V, B) -> B,
    {
        self.fold_back_with_key(init, |_, value, accumulator| {
            function(value.clone(), accumulator)
        })
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[inline]
    fn length(&self) -> usize {
        self.len()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<V> serde::Serialize for PersistentIntMap<V>
where
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(&key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentIntMapVisitor<V> {
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<V> PersistentIntMapVisitor<V> {
    const fn new() -> Self {
        Self {
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, V> serde::de::Visitor<'de> for PersistentIntMapVisitor<V>
where
    V: serde::Deserialize<'de> + Clone,
{
    type Value = PersistentIntMap<V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map with integer keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        // Sequential insert keeps last-occurrence-wins semantics for
        // duplicate keys in the input.
        let mut map = PersistentIntMap::new();
        while let Some((key, value)) = access.next_entry::<i64, V>()? {
            map = map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, V> serde::Deserialize<'de> for PersistentIntMap<V>
where
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentIntMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================

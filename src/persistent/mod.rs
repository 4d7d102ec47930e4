//! Persistent (immutable) integer-keyed data structures.
//!
//! This module provides efficient immutable collections keyed by `i64` that
//! use structural sharing to minimize copying:
//!
//! - [`PersistentIntMap`]: Persistent map (big-endian Patricia trie)
//! - [`PersistentIntSet`]: Persistent set (based on the same trie)
//!
//! # Structural Sharing
//!
//! All write-like operations (`insert`, `remove`, `union`, ...) return a new
//! handle and leave the original untouched. An `insert` that changes one leaf
//! allocates only the nodes on the path from the root to that leaf (at most
//! one per key bit), reusing every sibling subtree by reference.
//!
//! # Canonical Shape
//!
//! The trie shape depends only on the key set, never on the order of
//! insertions. Two maps holding the same entries are therefore deeply
//! structurally equal, and iteration is always in ascending numeric key
//! order, including across the sign boundary.
//!
//! # Examples
//!
//! ## `PersistentIntMap`
//!
//! ```rust
//! use patmap::persistent::PersistentIntMap;
//!
//! let map = PersistentIntMap::new()
//!     .insert(2, "two")
//!     .insert(-1, "minus one");
//!
//! assert_eq!(map.get(2), Some(&"two"));
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.insert(2, "TWO");
//! assert_eq!(map.get(2), Some(&"two"));      // Original unchanged
//! assert_eq!(updated.get(2), Some(&"TWO"));  // New version
//! ```
//!
//! ## `PersistentIntSet`
//!
//! ```rust
//! use patmap::persistent::PersistentIntSet;
//!
//! let set: PersistentIntSet = [1, 2, 3].into_iter().collect();
//! let other: PersistentIntSet = [2, 3, 4].into_iter().collect();
//!
//! assert_eq!(set.union(&other).len(), 4);        // {1, 2, 3, 4}
//! assert_eq!(set.intersection(&other).len(), 2); // {2, 3}
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod bits;
mod intmap;
mod intset;

pub use intmap::KeyNotFoundError;
pub use intmap::PersistentIntMap;
pub use intmap::PersistentIntMapIntoIterator;
pub use intmap::PersistentIntMapIterator;
pub use intset::PersistentIntSet;
pub use intset::PersistentIntSetIntoIterator;
pub use intset::PersistentIntSetIterator;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_clone() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(*reference_counter, *reference_counter_clone);
    }

    #[rstest]
    fn test_reference_counter_strong_count() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 2);
        drop(reference_counter_clone);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
    }

    #[cfg(feature = "arc")]
    mod thread_safety {
        use crate::persistent::{PersistentIntMap, PersistentIntSet};
        use static_assertions::assert_impl_all;

        assert_impl_all!(PersistentIntMap<i32>: Send, Sync);
        assert_impl_all!(PersistentIntSet: Send, Sync);
    }
}

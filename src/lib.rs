//! # patmap
//!
//! Persistent integer-keyed maps and sets based on big-endian Patricia tries.
//!
//! ## Overview
//!
//! This library provides immutable collections keyed by `i64`, built on a
//! Patricia trie (a binary radix tree with path compression) over the
//! two's-complement bit pattern of the key:
//!
//! - [`persistent::PersistentIntMap`]: an immutable `i64 -> V` map
//! - [`persistent::PersistentIntSet`]: an immutable `i64` set
//!
//! All operations are pure: they return a new handle and leave the original
//! untouched, sharing unmodified subtrees by reference. Because the trie
//! shape is canonical (it depends only on the key set, never on insertion
//! order), equal maps are structurally equal and iteration is always in
//! ascending numeric key order, including across the sign boundary.
//!
//! ## Feature Flags
//!
//! - `typeclass`: Type class traits (`TypeConstructor`, `Foldable`)
//! - `persistent`: Persistent data structures (enabled by default)
//! - `arc`: Use `Arc` instead of `Rc` for node sharing (thread-safe handles)
//! - `serde`: Serialization support
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use patmap::persistent::PersistentIntMap;
//!
//! let map = PersistentIntMap::new()
//!     .insert(5, "b")
//!     .insert(-3, "a")
//!     .insert(0, "c");
//!
//! // Ascending across the sign boundary
//! let keys: Vec<i64> = map.keys().collect();
//! assert_eq!(keys, vec![-3, 0, 5]);
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.insert(5, "x");
//! assert_eq!(map.get(5), Some(&"b"));
//! assert_eq!(updated.get(5), Some(&"x"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use patmap::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

#[cfg(feature = "typeclass")]
pub mod typeclass;

#[cfg(feature = "persistent")]
pub mod persistent;

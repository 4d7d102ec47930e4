//! Persistent (immutable) integer set based on the same Patricia trie as
//! [`PersistentIntMap`].
//!
//! [`PersistentIntSet`] is a thin wrapper around a `PersistentIntMap<()>`,
//! inheriting its structural sharing, canonical shape, and ascending
//! iteration order (negative members first).
//!
//! # Examples
//!
//! ```rust
//! use patmap::persistent::PersistentIntSet;
//!
//! let set: PersistentIntSet = [3, -1, 7].into_iter().collect();
//!
//! assert!(set.contains(-1));
//! assert_eq!(set.iter().collect::<Vec<_>>(), vec![-1, 3, 7]);
//! ```

use super::intmap::{PersistentIntMap, PersistentIntMapIntoIterator, PersistentIntMapIterator};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

// =============================================================================
// PersistentIntSet Definition
// =============================================================================

/// A persistent (immutable) set of `i64` values.
///
/// Implemented as a [`PersistentIntMap`] with unit values, so every
/// complexity bound of the map carries over: O(min(n, W)) membership and
/// insertion, O(n + m) set algebra, O(1) `len`, and iteration in ascending
/// numeric order.
///
/// # Examples
///
/// ```rust
/// use patmap::persistent::PersistentIntSet;
///
/// let set = PersistentIntSet::new().insert(1).insert(2);
/// let other = set.insert(3);
///
/// assert_eq!(set.len(), 2);   // Original unchanged
/// assert_eq!(other.len(), 3); // New version
/// ```
#[derive(Clone)]
pub struct PersistentIntSet {
    inner: PersistentIntMap<()>,
}

impl PersistentIntSet {
    /// Creates a new empty set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set = PersistentIntSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: PersistentIntMap::new(),
        }
    }

    /// Creates a set containing a single member.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set = PersistentIntSet::singleton(42);
    /// assert!(set.contains(42));
    /// assert_eq!(set.len(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(member: i64) -> Self {
        Self {
            inner: PersistentIntMap::singleton(member, ()),
        }
    }

    /// Returns the number of members in the set. O(1).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set contains no members.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if the set contains the specified member.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set = PersistentIntSet::singleton(-5);
    /// assert!(set.contains(-5));
    /// assert!(!set.contains(5));
    /// ```
    #[must_use]
    pub fn contains(&self, member: i64) -> bool {
        self.inner.contains_key(member)
    }

    /// Adds a member to the set.
    ///
    /// Inserting a present member returns a set equal to the original.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set = PersistentIntSet::new().insert(1);
    /// assert!(set.contains(1));
    /// ```
    #[must_use]
    pub fn insert(&self, member: i64) -> Self {
        Self {
            inner: self.inner.insert(member, ()),
        }
    }

    /// Removes a member from the set.
    ///
    /// Removing an absent member returns a handle sharing the original root.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set = PersistentIntSet::new().insert(1).insert(2);
    /// let removed = set.remove(1);
    ///
    /// assert!(set.contains(1));      // Original unchanged
    /// assert!(!removed.contains(1)); // New version
    /// ```
    #[must_use]
    pub fn remove(&self, member: i64) -> Self {
        Self {
            inner: self.inner.remove(member),
        }
    }

    /// Union of two sets.
    ///
    /// Runs in O(n + m) by merging the tries structurally.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set1: PersistentIntSet = [1, 2].into_iter().collect();
    /// let set2: PersistentIntSet = [2, 3].into_iter().collect();
    ///
    /// let union = set1.union(&set2);
    /// assert_eq!(union.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            inner: self.inner.union(&other.inner),
        }
    }

    /// Intersection of two sets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set1: PersistentIntSet = [1, 2].into_iter().collect();
    /// let set2: PersistentIntSet = [2, 3].into_iter().collect();
    ///
    /// assert_eq!(set1.intersection(&set2).iter().collect::<Vec<_>>(), vec![2]);
    /// ```
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            inner: self.inner.intersection(&other.inner),
        }
    }

    /// Difference of two sets: members of `self` absent from `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set1: PersistentIntSet = [1, 2].into_iter().collect();
    /// let set2: PersistentIntSet = [2, 3].into_iter().collect();
    ///
    /// assert_eq!(set1.difference(&set2).iter().collect::<Vec<_>>(), vec![1]);
    /// ```
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            inner: self.inner.difference(&other.inner),
        }
    }

    /// Symmetric difference: members in exactly one of the two sets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set1: PersistentIntSet = [1, 2].into_iter().collect();
    /// let set2: PersistentIntSet = [2, 3].into_iter().collect();
    ///
    /// let exclusive = set1.symmetric_difference(&set2);
    /// assert_eq!(exclusive.iter().collect::<Vec<_>>(), vec![1, 3]);
    /// ```
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.difference(other).union(&other.difference(self))
    }

    /// Returns `true` if every member of `self` is also in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let small: PersistentIntSet = [1, 2].into_iter().collect();
    /// let large: PersistentIntSet = [1, 2, 3].into_iter().collect();
    ///
    /// assert!(small.is_subset(&large));
    /// assert!(!large.is_subset(&small));
    /// ```
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|member| other.contains(member))
    }

    /// Returns `true` if every member of `other` is also in `self`.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Returns `true` if the two sets share no members.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let odds: PersistentIntSet = [1, 3].into_iter().collect();
    /// let evens: PersistentIntSet = [2, 4].into_iter().collect();
    ///
    /// assert!(odds.is_disjoint(&evens));
    /// ```
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.intersection(other).is_empty()
    }

    /// Returns the minimum member.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set: PersistentIntSet = [3, -1, 7].into_iter().collect();
    /// assert_eq!(set.min(), Some(-1));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<i64> {
        self.inner.min().map(|(member, ())| member)
    }

    /// Returns the maximum member.
    #[must_use]
    pub fn max(&self) -> Option<i64> {
        self.inner.max().map(|(member, ())| member)
    }

    /// Removes and returns the minimum member in a single walk.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set: PersistentIntSet = [3, -1, 7].into_iter().collect();
    /// let (member, rest) = set.extract_min().unwrap();
    ///
    /// assert_eq!(member, -1);
    /// assert_eq!(rest.len(), 2);
    /// ```
    #[must_use]
    pub fn extract_min(&self) -> Option<(i64, Self)> {
        self.inner
            .extract_min()
            .map(|(member, (), rest)| (member, Self { inner: rest }))
    }

    /// Removes and returns the maximum member in a single walk.
    #[must_use]
    pub fn extract_max(&self) -> Option<(i64, Self)> {
        self.inner
            .extract_max()
            .map(|(member, (), rest)| (member, Self { inner: rest }))
    }

    /// Keeps only members for which the predicate returns true.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set: PersistentIntSet = (0..10).collect();
    /// let evens = set.keep_if(|member| member % 2 == 0);
    /// assert_eq!(evens.iter().collect::<Vec<_>>(), vec![0, 2, 4, 6, 8]);
    /// ```
    #[must_use]
    pub fn keep_if<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(i64) -> bool,
    {
        Self {
            inner: self.inner.keep_if(|member, ()| predicate(member)),
        }
    }

    /// Partitions the set by a predicate into (matching, not matching).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set: PersistentIntSet = (-2..3).collect();
    /// let (negative, rest) = set.partition(|member| member < 0);
    ///
    /// assert_eq!(negative.iter().collect::<Vec<_>>(), vec![-2, -1]);
    /// assert_eq!(rest.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    /// ```
    #[must_use]
    pub fn partition<F>(&self, mut predicate: F) -> (Self, Self)
    where
        F: FnMut(i64) -> bool,
    {
        let (matching, rest) = self.inner.partition(|member, ()| predicate(member));
        (Self { inner: matching }, Self { inner: rest })
    }

    /// Returns an iterator over members in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::persistent::PersistentIntSet;
    ///
    /// let set: PersistentIntSet = [5, -3, 0].into_iter().collect();
    /// assert_eq!(set.iter().collect::<Vec<_>>(), vec![-3, 0, 5]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentIntSetIterator<'_> {
        PersistentIntSetIterator {
            inner: self.inner.iter(),
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over members of a [`PersistentIntSet`] in ascending order.
pub struct PersistentIntSetIterator<'a> {
    inner: PersistentIntMapIterator<'a, ()>,
}

impl Iterator for PersistentIntSetIterator<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(member, ())| member)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for PersistentIntSetIterator<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// An owning iterator over members of a [`PersistentIntSet`].
pub struct PersistentIntSetIntoIterator {
    inner: PersistentIntMapIntoIterator<()>,
}

impl Iterator for PersistentIntSetIntoIterator {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(member, ())| member)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for PersistentIntSetIntoIterator {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl Default for PersistentIntSet {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<i64> for PersistentIntSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut set = Self::new();
        for member in iter {
            set = set.insert(member);
        }
        set
    }
}

impl IntoIterator for PersistentIntSet {
    type Item = i64;
    type IntoIter = PersistentIntSetIntoIterator;

    fn into_iter(self) -> Self::IntoIter {
        PersistentIntSetIntoIterator {
            inner: self.inner.into_iter(),
        }
    }
}

impl<'a> IntoIterator for &'a PersistentIntSet {
    type Item = i64;
    type IntoIter = PersistentIntSetIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for PersistentIntSet {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for PersistentIntSet {}

impl Hash for PersistentIntSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for member in self {
            member.hash(state);
        }
    }
}

impl fmt::Debug for PersistentIntSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for PersistentIntSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for member in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{member}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for PersistentIntSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.len()))?;
        for member in self {
            sequence.serialize_element(&member)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentIntSetVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for PersistentIntSetVisitor {
    type Value = PersistentIntSet;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence of integers")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = PersistentIntSet::new();
        while let Some(member) = access.next_element::<i64>()? {
            set = set.insert(member);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PersistentIntSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentIntSetVisitor)
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Foldable type class - folding over data structures.
//!
//! This module provides the `Foldable` trait, which represents types that can
//! have their elements reduced (folded) into a single value.
//!
//! # Laws
//!
//! While `Foldable` does not have formal laws as strict as other type classes,
//! implementations should satisfy these properties:
//!
//! ## Consistency between `fold_left` and `fold_right`
//!
//! For associative operations, `fold_left` and `fold_right` should produce the
//! same result:
//!
//! ```text
//! fa.fold_left(init, f) == fa.fold_right(init, flip(f))  // when f is associative
//! ```
//!
//! ## Consistency with `to_list`
//!
//! ```text
//! fa.fold_left(init, f) == fa.to_list().fold_left(init, f)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use patmap::typeclass::Foldable;
//!
//! // Folding a Vec
//! let numbers = vec![1, 2, 3, 4, 5];
//! let sum = numbers.fold_left(0, |accumulator, element| accumulator + element);
//! assert_eq!(sum, 15);
//!
//! // Folding an Option
//! let some_value = Some(10);
//! let result = some_value.fold_left(5, |accumulator, element| accumulator + element);
//! assert_eq!(result, 15);
//! ```

use super::higher::TypeConstructor;

/// A type class for data structures that can be folded to a summary value.
///
/// `Foldable` provides a unified interface for traversing data structures
/// and accumulating their elements into a single result.
///
/// # Required Methods
///
/// - `fold_left`: Left-associative fold
/// - `fold_right`: Right-associative fold
///
/// # Provided Methods
///
/// All other methods have default implementations based on `fold_left`:
///
/// - `is_empty`: Check if the structure has no elements
/// - `length`: Count the number of elements
/// - `to_list`: Convert to a `Vec`
/// - `exists`: Check if any element matches a predicate
/// - `for_all`: Check if all elements match a predicate
///
/// For ordered structures, `fold_left` visits elements in ascending order and
/// `fold_right` in descending order.
pub trait Foldable: TypeConstructor {
    /// Folds the structure from left to right with an accumulator.
    ///
    /// This is equivalent to Rust's `Iterator::fold` method.
    ///
    /// # Arguments
    ///
    /// * `init` - The initial accumulator value
    /// * `function` - A function that takes the accumulator and an element,
    ///   returning a new accumulator value
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::typeclass::Foldable;
    ///
    /// let values = vec![1, 2, 3];
    /// let sum = values.fold_left(0, |accumulator, element| accumulator + element);
    /// assert_eq!(sum, 6);
    /// ```
    fn fold_left<B, F>(self, init: B, function: F) -> B
    where
        F: FnMut(B, Self::Inner) -> B;

    /// Folds the structure from right to left with an accumulator.
    ///
    /// In languages with lazy evaluation, this can be more efficient for
    /// certain operations. In Rust, this is typically implemented by
    /// reversing the iteration order.
    ///
    /// # Arguments
    ///
    /// * `init` - The initial accumulator value
    /// * `function` - A function that takes an element and the accumulator,
    ///   returning a new accumulator value
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::typeclass::Foldable;
    ///
    /// let values = vec![1, 2, 3];
    /// // Builds "123" by folding from the right: f(1, f(2, f(3, "")))
    /// let result = values.fold_right(String::new(), |element, accumulator| {
    ///     format!("{}{}", element, accumulator)
    /// });
    /// assert_eq!(result, "123");
    /// ```
    fn fold_right<B, F>(self, init: B, function: F) -> B
    where
        F: FnMut(Self::Inner, B) -> B;

    /// Returns whether the structure contains no elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::typeclass::Foldable;
    ///
    /// assert!(!Some(5).is_empty());
    /// assert!(None::<i32>.is_empty());
    /// ```
    fn is_empty(&self) -> bool
    where
        Self: Clone,
    {
        self.clone().fold_left(true, |_, _| false)
    }

    /// Returns the number of elements in the structure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::typeclass::Foldable;
    ///
    /// assert_eq!(vec![1, 2, 3].length(), 3);
    /// assert_eq!(None::<i32>.length(), 0);
    /// ```
    fn length(&self) -> usize
    where
        Self: Clone,
    {
        self.clone().fold_left(0, |count, _| count + 1)
    }

    /// Converts the structure to a `Vec` containing all elements.
    ///
    /// The order of elements is determined by the fold order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::typeclass::Foldable;
    ///
    /// let option_value = Some(42);
    /// assert_eq!(option_value.to_list(), vec![42]);
    /// ```
    fn to_list(self) -> Vec<Self::Inner>
    where
        Self: Sized,
    {
        self.fold_left(Vec::new(), |mut accumulator, element| {
            accumulator.push(element);
            accumulator
        })
    }

    /// Checks whether any element satisfies a predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::typeclass::Foldable;
    ///
    /// let values = vec![1, 2, 3];
    /// assert!(values.exists(|element| *element > 2));
    /// assert!(!values.exists(|element| *element > 10));
    /// ```
    fn exists<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&Self::Inner) -> bool,
        Self: Clone,
    {
        self.clone()
            .fold_left(false, |found, element| found || predicate(&element))
    }

    /// Checks whether all elements satisfy a predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patmap::typeclass::Foldable;
    ///
    /// let values = vec![1, 2, 3];
    /// assert!(values.for_all(|element| *element > 0));
    /// assert!(!values.for_all(|element| *element > 1));
    /// ```
    fn for_all<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&Self::Inner) -> bool,
        Self: Clone,
    {
        self.clone()
            .fold_left(true, |all, element| all && predicate(&element))
    }
}

// =============================================================================
// Standard Library Type Implementations
// =============================================================================

impl<A> Foldable for Option<A> {
    fn fold_left<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(B, A) -> B,
    {
        match self {
            Some(value) => function(init, value),
            None => init,
        }
    }

    fn fold_right<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(A, B) -> B,
    {
        match self {
            Some(value) => function(value, init),
            None => init,
        }
    }

    fn is_empty(&self) -> bool {
        self.is_none()
    }

    fn length(&self) -> usize {
        usize::from(self.is_some())
    }
}

impl<A> Foldable for Vec<A> {
    fn fold_left<B, F>(self, init: B, function: F) -> B
    where
        F: FnMut(B, A) -> B,
    {
        self.into_iter().fold(init, function)
    }

    fn fold_right<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(A, B) -> B,
    {
        self.into_iter()
            .rev()
            .fold(init, |accumulator, element| function(element, accumulator))
    }

    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    fn length(&self) -> usize {
        self.len()
    }
}

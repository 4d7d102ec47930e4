//! Higher-Kinded Type emulation through Generic Associated Types.
//!
//! This module provides the foundation for emulating Higher-Kinded Types (HKT)
//! in Rust using Generic Associated Types (GAT). Rust cannot natively abstract
//! over `Option<_>` or `PersistentIntMap<_>` as type constructors; the
//! [`TypeConstructor`] trait works around this limitation and lets traits like
//! [`Foldable`](super::Foldable) speak about "the same container holding a
//! different element type".
//!
//! # Example
//!
//! ```rust
//! use patmap::typeclass::TypeConstructor;
//!
//! fn swap_element_type<T: TypeConstructor>() -> T::WithType<String>
//! where
//!     T::WithType<String>: Default,
//! {
//!     Default::default()
//! }
//!
//! let none_string: Option<String> = swap_element_type::<Option<i32>>();
//! assert_eq!(none_string, None);
//! ```

/// A trait representing a type constructor.
///
/// This trait emulates Higher-Kinded Types (HKT) using Generic Associated
/// Types. It allows abstracting over type constructors like `Option<_>`,
/// `Vec<_>`, or `PersistentIntMap<_>`.
///
/// # Associated Types
///
/// - `Inner`: The type parameter that this type constructor is currently applied to.
/// - `WithType<B>`: The same type constructor applied to a different type `B`.
///
/// # Laws
///
/// For any `F: TypeConstructor`:
///
/// 1. **Consistency**: `<F as TypeConstructor>::WithType<F::Inner>` should be
///    equivalent to `F` (up to type equality).
pub trait TypeConstructor {
    /// The inner type that this type constructor is applied to.
    ///
    /// For example, for `Option<i32>`, this would be `i32`.
    type Inner;

    /// The same type constructor applied to a different type `B`.
    ///
    /// For example, for `Option<i32>`, `WithType<String>` would be `Option<String>`.
    ///
    /// The constraint `TypeConstructor<Inner = B>` ensures that the resulting
    /// type is also a valid type constructor, maintaining the ability to
    /// chain transformations.
    type WithType<B>: TypeConstructor<Inner = B>;
}

// =============================================================================
// Standard Library Type Implementations
// =============================================================================

impl<A> TypeConstructor for Option<A> {
    type Inner = A;
    type WithType<B> = Option<B>;
}

impl<T, E> TypeConstructor for Result<T, E> {
    type Inner = T;
    type WithType<B> = Result<B, E>;
}

impl<T> TypeConstructor for Vec<T> {
    type Inner = T;
    type WithType<B> = Vec<B>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn same_constructor<T: TypeConstructor>(_: &T) -> T::WithType<String>
    where
        T::WithType<String>: Default,
    {
        Default::default()
    }

    #[rstest]
    fn test_option_type_constructor() {
        let some_int: Option<i32> = Some(42);
        let none_string = same_constructor(&some_int);
        assert_eq!(none_string, None::<String>);
    }

    #[rstest]
    fn test_vec_type_constructor() {
        let numbers = vec![1, 2, 3];
        let empty_strings = same_constructor(&numbers);
        assert_eq!(empty_strings, Vec::<String>::new());
    }
}

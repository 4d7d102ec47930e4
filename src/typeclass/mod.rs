//! Type class traits for functional programming abstractions.
//!
//! This module provides the small set of type classes the persistent
//! collections in this crate implement:
//!
//! - [`TypeConstructor`]: Trait for emulating higher-kinded types via GAT
//! - [`Foldable`]: Folding over structures to produce summary values
//!
//! ## Higher-Kinded Types Emulation
//!
//! Rust does not have native support for higher-kinded types (HKT).
//! This library uses Generic Associated Types (GAT) to emulate HKT
//! behavior, allowing traits like `Foldable` to be defined generically
//! over the container rather than over a concrete element type.
//!
//! # Examples
//!
//! ```rust
//! use patmap::typeclass::Foldable;
//!
//! let values = vec![1, 2, 3, 4, 5];
//! let sum = values.fold_left(0, |accumulator, element| accumulator + element);
//! assert_eq!(sum, 15);
//! ```

mod foldable;
mod higher;

pub use foldable::Foldable;
pub use higher::TypeConstructor;

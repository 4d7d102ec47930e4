//! Bit-level helpers for the big-endian Patricia trie.
//!
//! Keys are `i64` values and the trie branches on their two's-complement bit
//! pattern, most significant bit first. A branch is described by a `mask`
//! with exactly one bit set (the branching bit) and a `prefix` holding the
//! bits shared by every key in the subtree strictly above that bit, with the
//! branching bit and everything below it cleared.
//!
//! Branch ranks are compared on the *unsigned* bit pattern of the mask, which
//! places the sign bit above every value bit. A trie holding both negative
//! and non-negative keys therefore always splits on the sign bit at its
//! topmost branch; traversal code special-cases that branch (negative keys
//! sort first) and nothing below it ever branches on the sign bit again.
//! This is the single place where two's-complement representation leaks into
//! the algorithms, and it is the most bug-prone part of the design: any
//! change here must be tested against mixed-sign key sets and `i64::MIN`.

/// Tests the branching bit of `key` selected by `mask`.
///
/// Returns `true` when the bit is set, i.e. the key belongs on the right
/// side of a branch carrying this mask.
#[inline]
pub(crate) const fn test_bit(key: i64, mask: i64) -> bool {
    key & mask != 0
}

/// Returns a mask with only the highest set bit of `bits` retained.
///
/// `bits` must be non-zero; callers only reach this with the XOR of two
/// distinct prefixes.
#[inline]
pub(crate) fn highest_bit_mask(bits: i64) -> i64 {
    debug_assert_ne!(bits, 0, "highest_bit_mask requires diverging prefixes");
    1_i64 << (63 - bits.leading_zeros())
}

/// Computes the branching bit for two diverging prefixes.
///
/// This is the most significant bit at which `prefix1` and `prefix2` differ.
/// When the keys differ in sign this is the sign bit itself (`i64::MIN` as a
/// bit pattern), which ranks above every other mask and so forms the topmost
/// branch of the trie.
#[inline]
pub(crate) fn branching_bit(prefix1: i64, prefix2: i64) -> i64 {
    highest_bit_mask(prefix1 ^ prefix2)
}

/// Keeps the bits of `key` strictly above `mask`, clearing the branching bit
/// and everything below it.
///
/// For the sign-bit mask this yields `0`: the topmost branch of a mixed-sign
/// trie has the all-clear prefix.
#[inline]
pub(crate) const fn mask_prefix(key: i64, mask: i64) -> i64 {
    key & (mask.wrapping_neg() ^ mask)
}

/// Checks whether `key` agrees with `prefix` on every bit above `mask`.
///
/// A failed match means the key cannot occur anywhere in the subtree carrying
/// this prefix, so lookups short-circuit to "not found".
#[inline]
pub(crate) const fn match_prefix(key: i64, prefix: i64, mask: i64) -> bool {
    mask_prefix(key, mask) == prefix
}

/// Compares two branch masks by rank.
///
/// Returns `true` when `mask1` sits strictly closer to the root than `mask2`.
/// The comparison is on the unsigned bit pattern so that the sign bit ranks
/// above every value bit.
#[inline]
#[allow(clippy::cast_sign_loss)]
pub(crate) const fn shorter(mask1: i64, mask2: i64) -> bool {
    (mask1 as u64) > (mask2 as u64)
}

/// Checks that `mask` is a well-formed branching bit: exactly one bit set.
///
/// Used only in debug assertions; a violation is an internal defect, never a
/// recoverable condition.
#[inline]
pub(crate) const fn is_valid_mask(mask: i64) -> bool {
    mask != 0 && mask & mask.wrapping_sub(1) == 0
}

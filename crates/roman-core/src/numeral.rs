//! Integer to Roman numeral conversion.
//!
//! Greedy walk over a fixed table. The table is strictly descending and lists
//! every subtractive pair ahead of its additive neighbour (900 before 500,
//! 4 before 1, ...); reordering it produces non-canonical output.

use crate::error::{Result, RomanError};

/// Smallest convertible value.
pub const MIN_VALUE: i64 = 1;
/// Largest convertible value.
pub const MAX_VALUE: i64 = 255;

const NUMERALS: [(u16, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Returns true when `n` lies in the convertible domain.
pub fn in_domain(n: i64) -> bool {
    (MIN_VALUE..=MAX_VALUE).contains(&n)
}

/// Convert `n` to its canonical Roman numeral.
///
/// Fails with [`RomanError::OutOfRange`] outside `[MIN_VALUE, MAX_VALUE]`.
pub fn convert(n: i64) -> Result<String> {
    if !in_domain(n) {
        return Err(RomanError::OutOfRange(n));
    }

    let mut remaining = u16::try_from(n).map_err(|_| RomanError::OutOfRange(n))?;
    let mut out = String::with_capacity(12);
    for &(value, symbol) in NUMERALS.iter() {
        while remaining >= value {
            out.push_str(symbol);
            remaining -= value;
        }
    }
    Ok(out)
}

//! Bloom filter sizing
//!
//! Formulas:
//! - m = -n*ln(fpp) / (ln(2)^2)  -- bitmap length, truncated toward zero
//! - k = round((m/n) * ln(2))    -- hash functions, at least 1
//!
//! The truncating cast (instead of `ceil`) keeps the bitmap layout identical
//! to filters already written by Guava-based services, so writers and readers
//! on either side agree on every offset.

use std::f64::consts::LN_2;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Largest bitmap a Redis string can address (512 MiB of bits).
pub const MAX_BITMAP_LENGTH: u64 = 1 << 32;

/// Stand-in for a zero false-positive probability: the smallest positive
/// subnormal `f64`, so `ln` stays finite.
const MIN_FPP: f64 = 5e-324;

/// Optimal number of bits for `n` elements at false-positive probability `fpp`.
///
/// Returns a non-positive value for degenerate inputs (`fpp >= 1`, or a NaN
/// probability); `FilterParameters::new` rejects those.
pub fn optimal_bitmap_length(n: u64, fpp: f64) -> i64 {
    let fpp = if fpp == 0.0 { MIN_FPP } else { fpp };
    (-(n as f64) * fpp.ln() / (LN_2 * LN_2)) as i64
}

/// Optimal number of hash functions for `n` elements in `m` bits.
pub fn optimal_hash_function_count(n: u64, m: u64) -> u32 {
    if n == 0 {
        return 1;
    }
    ((m as f64 / n as f64) * LN_2).round().max(1.0) as u32
}

/// Expected false positive rate once `n` elements are in an `m`-bit filter
/// probed with `k` hashes.
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn estimated_false_positive_rate(m: u64, n: u64, k: u32) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

/// Immutable sizing of one filter.
///
/// Two instances built from the same inputs always carry the same
/// `bitmap_length` and `hash_functions`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterParameters {
    expected_elements: u64,
    false_positive_probability: f64,
    bitmap_length: u64,
    hash_functions: u32,
}

impl FilterParameters {
    /// Size a filter for `expected_elements` at `fpp`.
    ///
    /// # Errors
    /// `FilterError::Sizing` when `expected_elements` is zero, `fpp` lies
    /// outside `[0, 1]`, or the resulting bitmap is empty or larger than
    /// [`MAX_BITMAP_LENGTH`].
    pub fn new(expected_elements: u64, fpp: f64) -> Result<Self, FilterError> {
        if expected_elements == 0 {
            return Err(FilterError::sizing(
                expected_elements,
                fpp,
                "expected element count must be positive",
            ));
        }
        if fpp.is_nan() || !(0.0..=1.0).contains(&fpp) {
            return Err(FilterError::sizing(
                expected_elements,
                fpp,
                "false positive probability must be within [0, 1]",
            ));
        }

        let m = optimal_bitmap_length(expected_elements, fpp);
        if m <= 0 {
            return Err(FilterError::sizing(
                expected_elements,
                fpp,
                format!("computed bitmap length {m} is not positive"),
            ));
        }
        let m = m as u64;
        if m > MAX_BITMAP_LENGTH {
            return Err(FilterError::sizing(
                expected_elements,
                fpp,
                format!("computed bitmap length {m} exceeds {MAX_BITMAP_LENGTH} bits"),
            ));
        }

        Ok(Self {
            expected_elements,
            false_positive_probability: fpp,
            bitmap_length: m,
            hash_functions: optimal_hash_function_count(expected_elements, m),
        })
    }

    pub fn expected_elements(&self) -> u64 {
        self.expected_elements
    }

    pub fn false_positive_probability(&self) -> f64 {
        self.false_positive_probability
    }

    /// Number of addressable bits (m)
    pub fn bitmap_length(&self) -> u64 {
        self.bitmap_length
    }

    /// Number of hash functions (k)
    pub fn hash_functions(&self) -> u32 {
        self.hash_functions
    }

    /// FPR predicted at exactly `expected_elements` insertions
    pub fn estimated_false_positive_rate(&self) -> f64 {
        estimated_false_positive_rate(
            self.bitmap_length,
            self.expected_elements,
            self.hash_functions,
        )
    }
}

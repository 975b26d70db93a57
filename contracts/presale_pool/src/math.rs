//! Fixed-point helpers. Every division rounds toward zero, which is floor for
//! the non-negative amounts the pool works with; the dust stays in the pool.

use crate::Error;

/// Fixed-point scale of fee rates.
pub const ONE_UNIT: i128 = 1_000_000_000_000_000_000;

/// `a * b / c`, rounded down. A zero denominator yields zero.
pub fn mul_div_floor(a: i128, b: i128, c: i128) -> Result<i128, Error> {
    if a < 0 || b < 0 || c < 0 {
        return Err(Error::InvalidAmount);
    }
    if c == 0 {
        return Ok(0);
    }
    a.checked_mul(b)
        .map(|product| product / c)
        .ok_or(Error::MathOverflow)
}

/// Fee owed on `amount` at `rate`.
pub fn apply_rate(amount: i128, rate: i128) -> Result<i128, Error> {
    mul_div_floor(amount, rate, ONE_UNIT)
}

/// Share of `total` owed to a holder of `part` out of `whole`.
pub fn pro_rata(total: i128, part: i128, whole: i128) -> Result<i128, Error> {
    mul_div_floor(total, part, whole)
}

pub fn checked_sum(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_add(b).ok_or(Error::MathOverflow)
}

//! Monetary tolerance and canonical formatting.

use rust_decimal::{Decimal, RoundingStrategy};

/// Half a cent: the largest difference two-decimal rounding can introduce.
pub const EPSILON: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// `true` when `a` and `b` differ by at most [`EPSILON`].
///
/// Values too far apart to subtract are not equal.
pub fn approx_eq(a: Decimal, b: Decimal) -> bool {
    a.checked_sub(b).is_some_and(|d| d.abs() <= EPSILON)
}

/// Sum of `values`, or `None` once the total leaves the decimal range.
pub fn checked_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Option<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Two decimals, half away from zero, `.` separator, no grouping.
pub fn format_money(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

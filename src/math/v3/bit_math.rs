use crate::errors::TickLensError;
use alloy_primitives::U256;

/// Returns the index of the least significant set bit of `x`.
///
/// The lowest set bit is isolated with `x & (!x + 1)` and its position is then
/// narrowed down by testing 128, 64, ..., 1 bit thresholds, so the cost is a
/// fixed eight comparisons regardless of where the bit sits.
///
/// Fails with [`TickLensError::InvalidArgument`] when `x` is zero.
pub fn least_significant_bit(x: U256) -> Result<u8, TickLensError> {
    if x.is_zero() {
        return Err(TickLensError::InvalidArgument(
            "least_significant_bit of zero".to_string(),
        ));
    }

    let mut isolated = x & (!x).wrapping_add(U256::from(1));
    let mut index: u8 = 0;
    for shift in [128usize, 64, 32, 16, 8, 4, 2, 1] {
        if isolated >= U256::from(1) << shift {
            isolated >>= shift;
            index += shift as u8;
        }
    }
    Ok(index)
}

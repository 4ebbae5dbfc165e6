use super::constants::{MAX_TICK, MIN_TICK};
use alloy_primitives::{U160, U256};

/// Full per-tick state as stored by the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickRecord {
    /// The total position liquidity that references this tick.
    pub liquidity_gross: u128,
    /// Net liquidity added (subtracted) when the tick is crossed left to right (right to left).
    pub liquidity_net: i128,
    /// Fee growth per unit of liquidity on the other side of this tick, token0.
    pub fee_growth_outside_0_x128: U256,
    /// Fee growth per unit of liquidity on the other side of this tick, token1.
    pub fee_growth_outside_1_x128: U256,
    /// The cumulative tick value on the other side of the tick.
    pub tick_cumulative_outside: i64,
    /// The seconds per unit of liquidity on the other side of this tick.
    pub seconds_per_liquidity_outside_x128: U160,
    /// The seconds spent on the other side of the tick.
    pub seconds_outside: u32,
    /// True iff `liquidity_gross != 0`.
    pub initialized: bool,
}

/// Lowest tick that is a multiple of `tick_spacing` (ceiling division).
///
/// # Panics
///
/// Panics if `tick_spacing` is zero.
pub fn min_usable_tick(tick_spacing: i32) -> i32 {
    (MIN_TICK + tick_spacing - 1).div_euclid(tick_spacing) * tick_spacing
}

/// Highest tick that is a multiple of `tick_spacing` (floor division).
///
/// # Panics
///
/// Panics if `tick_spacing` is zero.
pub fn max_usable_tick(tick_spacing: i32) -> i32 {
    MAX_TICK.div_euclid(tick_spacing) * tick_spacing
}

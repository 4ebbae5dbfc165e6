use super::bit_math;
use super::tick::{max_usable_tick, min_usable_tick};
use crate::errors::TickLensError;
use alloy_primitives::U256;

/// Splits a compressed tick (`tick / tick_spacing`) into its bitmap word and bit.
pub fn position(compressed: i32) -> (i16, u8) {
    let word_pos = (compressed >> 8) as i16;
    let bit_pos = (compressed & 0xff) as u8;
    (word_pos, bit_pos)
}

/// Bitmap word holding `tick`. `tick` is expected to sit on the spacing grid.
pub fn word_position(tick: i32, tick_spacing: i32) -> i16 {
    position(tick / tick_spacing).0
}

/// The tick addressed by `bit_pos` of word `word_pos`.
pub fn tick_at(word_pos: i16, bit_pos: u8, tick_spacing: i32) -> i64 {
    (((word_pos as i64) << 8) | bit_pos as i64) * tick_spacing as i64
}

/// A spacing-aligned, clamped tick window and the bitmap words covering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRange {
    pub from_tick: i32,
    pub to_tick: i32,
    pub from_word: i16,
    pub to_word: i16,
}

impl TickRange {
    /// Resolves the window of `|range_multiplier|` tick spacings on each side of
    /// `pivot_tick`.
    ///
    /// `from_tick` is the first grid tick at or above `pivot_tick - half_width`
    /// and `to_tick` the last one at or below `pivot_tick + half_width`, both
    /// clamped to the usable ticks for `tick_spacing`. When no grid tick fits
    /// (a zero multiplier on an unaligned pivot) the range is the single tick
    /// at or below the pivot. Either way `from_tick <= to_tick` and both are
    /// multiples of the spacing.
    ///
    /// # Panics
    ///
    /// Panics if `tick_spacing` is zero.
    pub fn resolve(pivot_tick: i32, range_multiplier: i32, tick_spacing: i32) -> Self {
        let spacing = tick_spacing as i64;
        let min_tick = min_usable_tick(tick_spacing) as i64;
        let max_tick = max_usable_tick(tick_spacing) as i64;

        let pivot = pivot_tick as i64;
        let half_width = range_multiplier.unsigned_abs() as i64 * spacing;

        // ceiling onto the grid
        let from_tick = (-(-(pivot - half_width)).div_euclid(spacing) * spacing).max(min_tick);
        let to_tick = ((pivot + half_width).div_euclid(spacing) * spacing).min(max_tick);

        let (from_tick, to_tick) = if from_tick > to_tick {
            let floored = (pivot.div_euclid(spacing) * spacing).clamp(min_tick, max_tick);
            (floored as i32, floored as i32)
        } else {
            (from_tick as i32, to_tick as i32)
        };

        Self {
            from_tick,
            to_tick,
            from_word: word_position(from_tick, tick_spacing),
            to_word: word_position(to_tick, tick_spacing),
        }
    }

    pub fn contains(&self, tick: i64) -> bool {
        (self.from_tick as i64..=self.to_tick as i64).contains(&tick)
    }

    pub fn word_positions(&self) -> impl Iterator<Item = i16> {
        self.from_word..=self.to_word
    }
}

/// Enumerates every initialized tick inside `range`, in ascending order.
///
/// `word_at` supplies the bitmap word for each position from `range.from_word`
/// to `range.to_word`. Edge words may carry bits outside the clamped window;
/// those are filtered out.
pub fn scan_initialized_ticks<F>(
    mut word_at: F,
    range: &TickRange,
    tick_spacing: i32,
) -> Result<Vec<i32>, TickLensError>
where
    F: FnMut(i16) -> U256,
{
    let mut ticks = Vec::new();
    for word_pos in range.word_positions() {
        let mut word = word_at(word_pos);
        while !word.is_zero() {
            let bit_pos = bit_math::least_significant_bit(word)?;
            word.set_bit(bit_pos as usize, false);

            let tick = tick_at(word_pos, bit_pos, tick_spacing);
            if range.contains(tick) {
                ticks.push(tick as i32);
            }
        }
    }
    Ok(ticks)
}

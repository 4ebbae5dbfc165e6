use crate::errors::TickLensError;
use crate::math::v3::constants::{MAX_TICK, MIN_TICK};
use crate::math::v3::tick::TickRecord;
use crate::math::v3::tick_bitmap::position;
use crate::pool::{PoolGlobalState, TickSource};
use alloy_primitives::U256;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// An in-memory copy of a pool's tick index.
///
/// Bits are kept consistent with the records: inserting a record sets its bit
/// and removing it clears the bit.
#[derive(Debug, Clone)]
pub struct TickSnapshot {
    pub global_state: PoolGlobalState,
    tick_spacing: i32,
    tick_bitmap: BTreeMap<i16, U256>,
    tick_data: BTreeMap<i32, TickRecord>,
}

impl TickSnapshot {
    pub fn new(global_state: PoolGlobalState, tick_spacing: i32) -> Result<Self, TickLensError> {
        if tick_spacing <= 0 {
            return Err(TickLensError::InvalidArgument(format!(
                "tick spacing must be positive, got {tick_spacing}"
            )));
        }
        Ok(Self {
            global_state,
            tick_spacing,
            tick_bitmap: BTreeMap::new(),
            tick_data: BTreeMap::new(),
        })
    }

    pub fn with_tick(mut self, tick: i32, record: TickRecord) -> Result<Self, TickLensError> {
        self.insert_tick(tick, record)?;
        Ok(self)
    }

    /// Stores `record` for `tick` and marks the tick initialized.
    pub fn insert_tick(&mut self, tick: i32, record: TickRecord) -> Result<(), TickLensError> {
        if !(MIN_TICK..=MAX_TICK).contains(&tick) || tick % self.tick_spacing != 0 {
            return Err(TickLensError::InvalidArgument(format!(
                "tick {tick} is not addressable with spacing {}",
                self.tick_spacing
            )));
        }
        let (word_pos, bit_pos) = position(tick / self.tick_spacing);
        self.tick_bitmap
            .entry(word_pos)
            .or_default()
            .set_bit(bit_pos as usize, true);
        self.tick_data.insert(tick, record);
        Ok(())
    }

    pub fn remove_tick(&mut self, tick: i32) -> Option<TickRecord> {
        let record = self.tick_data.remove(&tick)?;
        let (word_pos, bit_pos) = position(tick / self.tick_spacing);
        if let Some(word) = self.tick_bitmap.get_mut(&word_pos) {
            word.set_bit(bit_pos as usize, false);
            if word.is_zero() {
                self.tick_bitmap.remove(&word_pos);
            }
        }
        Some(record)
    }

    /// Overwrites a raw bitmap word without touching the records.
    pub fn set_word(&mut self, word_pos: i16, word: U256) {
        if word.is_zero() {
            self.tick_bitmap.remove(&word_pos);
        } else {
            self.tick_bitmap.insert(word_pos, word);
        }
    }

    pub fn ticks(&self) -> impl Iterator<Item = (&i32, &TickRecord)> {
        self.tick_data.iter()
    }

    pub fn len(&self) -> usize {
        self.tick_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tick_data.is_empty()
    }
}

#[async_trait]
impl TickSource for TickSnapshot {
    async fn global_state(&self) -> Result<PoolGlobalState, TickLensError> {
        Ok(self.global_state)
    }

    async fn tick_spacing(&self) -> Result<i32, TickLensError> {
        Ok(self.tick_spacing)
    }

    async fn tick_bitmap(&self, word_pos: i16) -> Result<U256, TickLensError> {
        Ok(self.tick_bitmap.get(&word_pos).copied().unwrap_or_default())
    }

    async fn tick_record(&self, tick: i32) -> Result<TickRecord, TickLensError> {
        self.tick_data
            .get(&tick)
            .copied()
            .ok_or(TickLensError::MissingTickRecord(tick))
    }
}

use crate::errors::TickLensError;
use crate::math::v3::constants::TICK_SPACING;
use crate::math::v3::tick::TickRecord;
use alloy_primitives::U256;
use async_trait::async_trait;

pub mod snapshot;
pub mod uniswap_v3;

/// Pool-global state. Only `tick` is used to pivot a query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolGlobalState {
    pub sqrt_price_x96: U256,
    /// The current tick.
    pub tick: i32,
    pub observation_index: u16,
    pub observation_cardinality: u16,
    pub observation_cardinality_next: u16,
    pub fee_protocol: u8,
    pub unlocked: bool,
}

/// Read-only access to a pool's tick index.
///
/// Implementations are expected to return a consistent view across calls made
/// for one query: a bit set in `tick_bitmap` must have a record behind it in
/// `tick_record`.
#[async_trait]
pub trait TickSource: Send + Sync {
    /// Returns the pool's global state, whose `tick` is the current tick.
    async fn global_state(&self) -> Result<PoolGlobalState, TickLensError>;

    async fn tick_spacing(&self) -> Result<i32, TickLensError> {
        Ok(TICK_SPACING)
    }

    /// Returns the 256-bit bitmap word at `word_pos`.
    async fn tick_bitmap(&self, word_pos: i16) -> Result<U256, TickLensError>;

    /// Returns the full state record of `tick`.
    async fn tick_record(&self, tick: i32) -> Result<TickRecord, TickLensError>;
}

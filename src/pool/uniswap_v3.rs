use crate::errors::TickLensError;
use crate::math::v3::tick::TickRecord;
use crate::pool::{PoolGlobalState, TickSource};
use alloy_primitives::aliases::I24;
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{BlockId, TransactionRequest};
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

// ABI definitions for the pool's tick index accessors
sol! {
    function slot0() external view returns (uint160 sqrtPriceX96, int24 tick, uint16 observationIndex, uint16 observationCardinality, uint16 observationCardinalityNext, uint8 feeProtocol, bool unlocked);
    function tickSpacing() external view returns (int24);
    function tickBitmap(int16 wordPosition) external view returns (uint256);
    function ticks(int24 tick) external view returns (uint128 liquidityGross, int128 liquidityNet, uint256 feeGrowthOutside0X128, uint256 feeGrowthOutside1X128, int56 tickCumulativeOutside, uint160 secondsPerLiquidityOutsideX128, uint32 secondsOutside, bool initialized);
}

/// Reads a Uniswap V3 style pool's tick index over `eth_call`.
pub struct UniswapV3TickSource<P: ?Sized> {
    address: Address,
    provider: Arc<P>,
    block: Option<BlockId>,
}

impl<P: Provider + Send + Sync + 'static + ?Sized> UniswapV3TickSource<P> {
    pub fn new(address: Address, provider: Arc<P>) -> Self {
        Self {
            address,
            provider,
            block: None,
        }
    }

    /// Pins every read to `block` so one query sees a single consistent state.
    pub fn at_block(mut self, block: impl Into<BlockId>) -> Self {
        self.block = Some(block.into());
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    async fn call<C: SolCall + Send>(&self, call: C) -> Result<C::Return, TickLensError> {
        let request = TransactionRequest {
            to: Some(self.address.into()),
            input: Some(Bytes::from(call.abi_encode())).into(),
            ..Default::default()
        };

        let result = match self.block {
            Some(block_id) => self.provider.call(request).block(block_id).await,
            None => self.provider.call(request).await,
        };
        let bytes = result.map_err(|e| TickLensError::ProviderError(e.to_string()))?;

        C::abi_decode_returns(&bytes).map_err(|e| TickLensError::AbiDecodeError(e.to_string()))
    }
}

#[async_trait]
impl<P: Provider + Send + Sync + 'static + ?Sized> TickSource for UniswapV3TickSource<P> {
    async fn global_state(&self) -> Result<PoolGlobalState, TickLensError> {
        let slot0 = self.call(slot0Call {}).await?;
        tracing::trace!(pool = ?self.address, tick = slot0.tick.as_i32(), "Fetched slot0");

        Ok(PoolGlobalState {
            sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
            tick: slot0.tick.as_i32(),
            observation_index: slot0.observationIndex,
            observation_cardinality: slot0.observationCardinality,
            observation_cardinality_next: slot0.observationCardinalityNext,
            fee_protocol: slot0.feeProtocol,
            unlocked: slot0.unlocked,
        })
    }

    async fn tick_spacing(&self) -> Result<i32, TickLensError> {
        let tick_spacing = self.call(tickSpacingCall {}).await?;
        Ok(tick_spacing.as_i32())
    }

    async fn tick_bitmap(&self, word_pos: i16) -> Result<U256, TickLensError> {
        tracing::trace!(pool = ?self.address, word_pos, "Fetching tick bitmap word");
        self.call(tickBitmapCall {
            wordPosition: word_pos,
        })
        .await
    }

    async fn tick_record(&self, tick: i32) -> Result<TickRecord, TickLensError> {
        tracing::trace!(pool = ?self.address, tick, "Fetching tick record");
        let tick_arg = I24::try_from(tick).map_err(|_| TickLensError::TickOutOfBounds(tick))?;
        let decoded = self.call(ticksCall { tick: tick_arg }).await?;

        Ok(TickRecord {
            liquidity_gross: decoded.liquidityGross,
            liquidity_net: decoded.liquidityNet,
            fee_growth_outside_0_x128: decoded.feeGrowthOutside0X128,
            fee_growth_outside_1_x128: decoded.feeGrowthOutside1X128,
            tick_cumulative_outside: decoded.tickCumulativeOutside.as_i64(),
            seconds_per_liquidity_outside_x128: decoded.secondsPerLiquidityOutsideX128,
            seconds_outside: decoded.secondsOutside,
            initialized: decoded.initialized,
        })
    }
}

impl<P: ?Sized> Debug for UniswapV3TickSource<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("UniswapV3TickSource")
            .field("address", &self.address)
            .field("block", &self.block)
            .finish_non_exhaustive()
    }
}

use crate::errors::TickLensError;
use crate::math::v3::constants::{MAX_TICK, MIN_TICK};
use crate::math::v3::tick::TickRecord;
use alloy_primitives::{Bytes, U256, hex};
use serde::Serialize;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

const LIQUIDITY_GROSS_LEN: usize = 16;
const LIQUIDITY_NET_LEN: usize = 16;
const FEE_GROWTH_LEN: usize = 32;
const TICK_LEN: usize = 3;

const LIQUIDITY_NET_OFFSET: usize = LIQUIDITY_GROSS_LEN;
const FEE_GROWTH_0_OFFSET: usize = LIQUIDITY_NET_OFFSET + LIQUIDITY_NET_LEN;
const FEE_GROWTH_1_OFFSET: usize = FEE_GROWTH_0_OFFSET + FEE_GROWTH_LEN;
const TICK_OFFSET: usize = FEE_GROWTH_1_OFFSET + FEE_GROWTH_LEN;

/// Size of one packed tick: `uint128 | int128 | uint256 | uint256 | int24`.
pub const PACKED_TICK_LEN: usize = TICK_OFFSET + TICK_LEN;

/// The subset of a tick's state carried by a [`PackedTick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickInfo {
    pub tick: i32,
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
    pub fee_growth_outside_0_x128: U256,
    pub fee_growth_outside_1_x128: U256,
}

/// A tick's liquidity and fee-growth state, tightly packed big-endian with no padding.
///
/// Layout:
///
/// | bytes   | field                       |
/// |---------|-----------------------------|
/// | 0..16   | `liquidity_gross` (uint128) |
/// | 16..32  | `liquidity_net` (int128)    |
/// | 32..64  | `fee_growth_outside_0_x128` |
/// | 64..96  | `fee_growth_outside_1_x128` |
/// | 96..99  | `tick` (int24)              |
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedTick([u8; PACKED_TICK_LEN]);

impl PackedTick {
    pub fn pack(tick: i32, record: &TickRecord) -> Result<Self, TickLensError> {
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(TickLensError::TickOutOfBounds(tick));
        }

        let mut buf = [0u8; PACKED_TICK_LEN];
        buf[..LIQUIDITY_NET_OFFSET].copy_from_slice(&record.liquidity_gross.to_be_bytes());
        buf[LIQUIDITY_NET_OFFSET..FEE_GROWTH_0_OFFSET]
            .copy_from_slice(&record.liquidity_net.to_be_bytes());
        buf[FEE_GROWTH_0_OFFSET..FEE_GROWTH_1_OFFSET]
            .copy_from_slice(&record.fee_growth_outside_0_x128.to_be_bytes::<32>());
        buf[FEE_GROWTH_1_OFFSET..TICK_OFFSET]
            .copy_from_slice(&record.fee_growth_outside_1_x128.to_be_bytes::<32>());
        // low three bytes of the two's complement i32 are the int24
        buf[TICK_OFFSET..].copy_from_slice(&tick.to_be_bytes()[1..]);

        Ok(Self(buf))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TickLensError> {
        let buf: [u8; PACKED_TICK_LEN] =
            bytes.try_into().map_err(|_| TickLensError::InvalidBlobLength {
                expected: PACKED_TICK_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(buf))
    }

    pub fn unpack(&self) -> TickInfo {
        let b = &self.0;

        let mut liquidity_gross = [0u8; LIQUIDITY_GROSS_LEN];
        liquidity_gross.copy_from_slice(&b[..LIQUIDITY_NET_OFFSET]);
        let mut liquidity_net = [0u8; LIQUIDITY_NET_LEN];
        liquidity_net.copy_from_slice(&b[LIQUIDITY_NET_OFFSET..FEE_GROWTH_0_OFFSET]);

        // sign-extend the int24
        let fill = if b[TICK_OFFSET] & 0x80 != 0 { 0xff } else { 0x00 };
        let tick = i32::from_be_bytes([
            fill,
            b[TICK_OFFSET],
            b[TICK_OFFSET + 1],
            b[TICK_OFFSET + 2],
        ]);

        TickInfo {
            tick,
            liquidity_gross: u128::from_be_bytes(liquidity_gross),
            liquidity_net: i128::from_be_bytes(liquidity_net),
            fee_growth_outside_0_x128: U256::from_be_slice(
                &b[FEE_GROWTH_0_OFFSET..FEE_GROWTH_1_OFFSET],
            ),
            fee_growth_outside_1_x128: U256::from_be_slice(&b[FEE_GROWTH_1_OFFSET..TICK_OFFSET]),
        }
    }

    pub fn tick(&self) -> i32 {
        self.unpack().tick
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for PackedTick {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<PackedTick> for Bytes {
    fn from(packed: PackedTick) -> Self {
        Bytes::copy_from_slice(&packed.0)
    }
}

impl Display for PackedTick {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", hex::encode_prefixed(self.0))
    }
}

impl Debug for PackedTick {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("PackedTick").field(&self.to_string()).finish()
    }
}

//! Range queries over a pool's tick index.
//!
//! [`get_ticks`] resolves a window around the pool's current tick, scans the
//! bitmap words covering it and returns one [`PackedTick`] per initialized tick,
//! in ascending tick order.

use crate::errors::TickLensError;
use crate::math::v3::tick::TickRecord;
use crate::math::v3::tick_bitmap::{TickRange, scan_initialized_ticks};
use crate::pool::TickSource;
use alloy_primitives::U256;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::BTreeMap;

pub mod packed;

pub use packed::{PACKED_TICK_LEN, PackedTick, TickInfo};

/// Upper bound on reads in flight against a source during one query.
pub const DEFAULT_MAX_CONCURRENT_READS: usize = 64;

/// Returns every initialized tick within `range_multiplier` tick spacings of the
/// pool's current tick, packed, ascending by tick.
pub async fn get_ticks<S>(
    source: &S,
    range_multiplier: i32,
) -> Result<Vec<PackedTick>, TickLensError>
where
    S: TickSource + ?Sized,
{
    get_ticks_with_concurrency(source, range_multiplier, DEFAULT_MAX_CONCURRENT_READS).await
}

/// [`get_ticks`] with an explicit bound on concurrent reads.
pub async fn get_ticks_with_concurrency<S>(
    source: &S,
    range_multiplier: i32,
    max_concurrent_reads: usize,
) -> Result<Vec<PackedTick>, TickLensError>
where
    S: TickSource + ?Sized,
{
    let ticks = find_initialized_ticks(source, range_multiplier, max_concurrent_reads).await?;
    fetch_and_pack(source, &ticks, max_concurrent_reads).await
}

/// Like [`get_ticks`] but returns the full record of each tick instead of a blob.
pub async fn get_populated_ticks<S>(
    source: &S,
    range_multiplier: i32,
) -> Result<Vec<(i32, TickRecord)>, TickLensError>
where
    S: TickSource + ?Sized,
{
    let ticks =
        find_initialized_ticks(source, range_multiplier, DEFAULT_MAX_CONCURRENT_READS).await?;
    let records = fetch_records(source, &ticks, DEFAULT_MAX_CONCURRENT_READS).await?;
    Ok(ticks.into_iter().zip(records).collect())
}

/// Resolves the query window around the current tick and lists the initialized
/// ticks inside it.
pub async fn find_initialized_ticks<S>(
    source: &S,
    range_multiplier: i32,
    max_concurrent_reads: usize,
) -> Result<Vec<i32>, TickLensError>
where
    S: TickSource + ?Sized,
{
    let (global_state, tick_spacing) =
        futures::try_join!(source.global_state(), source.tick_spacing())?;
    if tick_spacing <= 0 {
        return Err(TickLensError::InvalidArgument(format!(
            "tick spacing must be positive, got {tick_spacing}"
        )));
    }

    let range = TickRange::resolve(global_state.tick, range_multiplier, tick_spacing);
    tracing::debug!(
        pivot = global_state.tick,
        tick_spacing,
        from_tick = range.from_tick,
        to_tick = range.to_tick,
        from_word = range.from_word,
        to_word = range.to_word,
        "Resolved tick range"
    );

    let words: BTreeMap<i16, U256> = stream::iter(range.word_positions())
        .map(|word_pos| async move { source.tick_bitmap(word_pos).await.map(|w| (word_pos, w)) })
        .buffered(max_concurrent_reads.max(1))
        .try_collect()
        .await?;

    let ticks = scan_initialized_ticks(
        |word_pos| words.get(&word_pos).copied().unwrap_or_default(),
        &range,
        tick_spacing,
    )?;
    tracing::debug!(words = words.len(), ticks = ticks.len(), "Scanned tick bitmap");

    Ok(ticks)
}

/// Fetches the record of each tick and packs it, preserving the input order.
pub async fn fetch_and_pack<S>(
    source: &S,
    ticks: &[i32],
    max_concurrent_reads: usize,
) -> Result<Vec<PackedTick>, TickLensError>
where
    S: TickSource + ?Sized,
{
    let records = fetch_records(source, ticks, max_concurrent_reads).await?;
    ticks
        .iter()
        .zip(records.iter())
        .map(|(&tick, record)| PackedTick::pack(tick, record))
        .collect()
}

async fn fetch_records<S>(
    source: &S,
    ticks: &[i32],
    max_concurrent_reads: usize,
) -> Result<Vec<TickRecord>, TickLensError>
where
    S: TickSource + ?Sized,
{
    stream::iter(ticks.iter().copied())
        .map(|tick| source.tick_record(tick))
        .buffered(max_concurrent_reads.max(1))
        .try_collect()
        .await
}

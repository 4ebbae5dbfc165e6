use alloy_primitives::{U160, U256};
use async_trait::async_trait;
use std::sync::Mutex;
use ticklens::lens::{
    PACKED_TICK_LEN, fetch_and_pack, find_initialized_ticks, get_populated_ticks,
    get_ticks_with_concurrency,
};
use ticklens::math::v3::constants::{MAX_TICK, MIN_TICK, TICK_SPACING};
use ticklens::math::v3::tick::{TickRecord, max_usable_tick, min_usable_tick};
use ticklens::math::v3::tick_bitmap::word_position;
use ticklens::pool::snapshot::TickSnapshot;
use ticklens::{PoolGlobalState, TickLensError, TickSource, get_ticks};

fn pool_at(tick: i32) -> PoolGlobalState {
    PoolGlobalState {
        tick,
        unlocked: true,
        ..Default::default()
    }
}

fn record(seed: u64) -> TickRecord {
    TickRecord {
        liquidity_gross: seed as u128 * 1_000,
        liquidity_net: -(seed as i128) * 500,
        fee_growth_outside_0_x128: U256::from(seed) << 128,
        fee_growth_outside_1_x128: U256::from(seed * 3),
        tick_cumulative_outside: seed as i64,
        seconds_per_liquidity_outside_x128: U160::from(seed),
        seconds_outside: seed as u32,
        initialized: true,
    }
}

/// Wraps a snapshot and records every bitmap word that gets read.
struct RecordingSource {
    inner: TickSnapshot,
    words_read: Mutex<Vec<i16>>,
}

impl RecordingSource {
    fn new(inner: TickSnapshot) -> Self {
        Self {
            inner,
            words_read: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TickSource for RecordingSource {
    async fn global_state(&self) -> Result<PoolGlobalState, TickLensError> {
        self.inner.global_state().await
    }

    async fn tick_spacing(&self) -> Result<i32, TickLensError> {
        self.inner.tick_spacing().await
    }

    async fn tick_bitmap(&self, word_pos: i16) -> Result<U256, TickLensError> {
        self.words_read.lock().unwrap().push(word_pos);
        self.inner.tick_bitmap(word_pos).await
    }

    async fn tick_record(&self, tick: i32) -> Result<TickRecord, TickLensError> {
        self.inner.tick_record(tick).await
    }
}

/// Only implements the required accessors, relying on the default tick spacing.
struct FixedSpacingSource {
    word: U256,
}

#[async_trait]
impl TickSource for FixedSpacingSource {
    async fn global_state(&self) -> Result<PoolGlobalState, TickLensError> {
        Ok(pool_at(0))
    }

    async fn tick_bitmap(&self, word_pos: i16) -> Result<U256, TickLensError> {
        Ok(if word_pos == 0 { self.word } else { U256::ZERO })
    }

    async fn tick_record(&self, tick: i32) -> Result<TickRecord, TickLensError> {
        Ok(record(tick.unsigned_abs() as u64))
    }
}

#[tokio::test]
async fn test_single_word_scenario() {
    let snapshot = TickSnapshot::new(pool_at(0), TICK_SPACING)
        .unwrap()
        .with_tick(0, record(1))
        .unwrap()
        .with_tick(300, record(2))
        .unwrap()
        .with_tick(12000, record(3))
        .unwrap();

    let packed = get_ticks(&snapshot, 256).await.unwrap();
    let infos: Vec<_> = packed.iter().map(|p| p.unpack()).collect();

    assert_eq!(infos.iter().map(|i| i.tick).collect::<Vec<_>>(), vec![0, 300, 12000]);
    for (info, seed) in infos.iter().zip([1u64, 2, 3]) {
        let expected = record(seed);
        assert_eq!(info.liquidity_gross, expected.liquidity_gross);
        assert_eq!(info.liquidity_net, expected.liquidity_net);
        assert_eq!(info.fee_growth_outside_0_x128, expected.fee_growth_outside_0_x128);
        assert_eq!(info.fee_growth_outside_1_x128, expected.fee_growth_outside_1_x128);
    }
    assert!(packed.iter().all(|p| p.as_bytes().len() == PACKED_TICK_LEN));
}

#[tokio::test]
async fn test_default_tick_spacing() {
    let source = FixedSpacingSource {
        word: (U256::from(1) << 0) | (U256::from(1) << 5) | (U256::from(1) << 200),
    };
    let ticks = find_initialized_ticks(&source, 256, 4).await.unwrap();
    assert_eq!(ticks, vec![0, 300, 12000]);
}

#[tokio::test]
async fn test_empty_words_return_nothing() {
    let snapshot = TickSnapshot::new(pool_at(-12345), TICK_SPACING).unwrap();
    let source = RecordingSource::new(snapshot);

    let packed = get_ticks(&source, 1_000).await.unwrap();
    assert!(packed.is_empty());
    assert!(!source.words_read.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_range_excludes_ticks_outside_window() {
    let mut snapshot = TickSnapshot::new(pool_at(600), TICK_SPACING).unwrap();
    for (seed, tick) in [-600, 0, 240, 600, 900, 960, 15360].into_iter().enumerate() {
        snapshot.insert_tick(tick, record(seed as u64)).unwrap();
    }

    let packed = get_ticks(&snapshot, 6).await.unwrap();
    let ticks: Vec<i32> = packed.iter().map(|p| p.tick()).collect();
    assert_eq!(ticks, vec![240, 600, 900, 960]);

    let packed = get_ticks(&snapshot, 0).await.unwrap();
    let ticks: Vec<i32> = packed.iter().map(|p| p.tick()).collect();
    assert_eq!(ticks, vec![600]);
}

#[tokio::test]
async fn test_unaligned_pivot_keeps_ticks_within_half_width() {
    let snapshot = TickSnapshot::new(pool_at(119), TICK_SPACING)
        .unwrap()
        .with_tick(0, record(1))
        .unwrap()
        .with_tick(120, record(2))
        .unwrap()
        .with_tick(180, record(3))
        .unwrap();

    let packed = get_ticks(&snapshot, 1).await.unwrap();
    let ticks: Vec<i32> = packed.iter().map(|p| p.tick()).collect();
    assert_eq!(ticks, vec![120]);
    assert!(ticks.iter().all(|t| (t - 119).abs() <= TICK_SPACING));

    let ticks = find_initialized_ticks(&snapshot, 2, 4).await.unwrap();
    assert_eq!(ticks, vec![0, 120, 180]);
    assert!(ticks.iter().all(|t| (t - 119).abs() <= 2 * TICK_SPACING));
}

#[tokio::test]
async fn test_output_ascending_across_words() {
    let mut snapshot = TickSnapshot::new(pool_at(-30), TICK_SPACING).unwrap();
    let ticks = [-46080, -15420, -15360, -60, 0, 15300, 15360, 30720, 61440];
    // insert out of order; output order must not depend on insertion
    for (seed, tick) in ticks.iter().rev().enumerate() {
        snapshot.insert_tick(*tick, record(seed as u64 + 1)).unwrap();
    }

    let packed = get_ticks_with_concurrency(&snapshot, 2_000, 3).await.unwrap();
    let found: Vec<i32> = packed.iter().map(|p| p.tick()).collect();
    assert_eq!(found, ticks.to_vec());
    assert!(found.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_pivot_at_max_tick_clamps() {
    let upper = max_usable_tick(TICK_SPACING);
    let snapshot = TickSnapshot::new(pool_at(MAX_TICK), TICK_SPACING)
        .unwrap()
        .with_tick(upper, record(7))
        .unwrap()
        .with_tick(upper - 540, record(8))
        .unwrap()
        .with_tick(upper - 600, record(9))
        .unwrap();
    let source = RecordingSource::new(snapshot);

    // the window is measured from MAX_TICK itself, which lies 52 above `upper`
    let packed = get_ticks(&source, 10).await.unwrap();
    let ticks: Vec<i32> = packed.iter().map(|p| p.tick()).collect();
    assert_eq!(ticks, vec![upper - 540, upper]);

    let last_word = word_position(MAX_TICK, TICK_SPACING);
    let words_read = source.words_read.lock().unwrap();
    assert!(words_read.iter().all(|&w| w <= last_word));
}

#[tokio::test]
async fn test_pivot_at_min_tick_clamps() {
    let lower = min_usable_tick(TICK_SPACING);
    let snapshot = TickSnapshot::new(pool_at(MIN_TICK), TICK_SPACING)
        .unwrap()
        .with_tick(lower, record(1))
        .unwrap();
    let source = RecordingSource::new(snapshot);

    let packed = get_ticks(&source, 5).await.unwrap();
    assert_eq!(packed.len(), 1);
    assert_eq!(packed[0].tick(), lower);

    let first_word = word_position(lower, TICK_SPACING);
    assert!(source.words_read.lock().unwrap().iter().all(|&w| w >= first_word));
}

#[tokio::test]
async fn test_edge_word_bits_are_filtered() {
    let mut snapshot = TickSnapshot::new(pool_at(0), TICK_SPACING).unwrap();
    // every bit of word 0 is set, but only ticks 0..=600 are in range
    snapshot.set_word(0, U256::MAX);
    for tick in (0..=600).step_by(60) {
        snapshot.insert_tick(tick, record(tick as u64)).unwrap();
    }

    let packed = get_ticks(&snapshot, 10).await.unwrap();
    let ticks: Vec<i32> = packed.iter().map(|p| p.tick()).collect();
    assert_eq!(ticks, (0..=600).step_by(60).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_missing_record_is_reported() {
    let mut snapshot = TickSnapshot::new(pool_at(0), TICK_SPACING).unwrap();
    snapshot.set_word(0, U256::from(1) << 3);

    let result = get_ticks(&snapshot, 10).await;
    assert!(matches!(result, Err(TickLensError::MissingTickRecord(180))));
}

#[tokio::test]
async fn test_non_positive_spacing_is_rejected() {
    struct BadSpacing;

    #[async_trait]
    impl TickSource for BadSpacing {
        async fn global_state(&self) -> Result<PoolGlobalState, TickLensError> {
            Ok(pool_at(0))
        }
        async fn tick_spacing(&self) -> Result<i32, TickLensError> {
            Ok(0)
        }
        async fn tick_bitmap(&self, _: i16) -> Result<U256, TickLensError> {
            Ok(U256::ZERO)
        }
        async fn tick_record(&self, _: i32) -> Result<TickRecord, TickLensError> {
            Ok(TickRecord::default())
        }
    }

    assert!(matches!(
        get_ticks(&BadSpacing, 1).await,
        Err(TickLensError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_fetch_and_pack_preserves_input_order() {
    let snapshot = TickSnapshot::new(pool_at(0), TICK_SPACING)
        .unwrap()
        .with_tick(-120, record(1))
        .unwrap()
        .with_tick(60, record(2))
        .unwrap();

    let packed = fetch_and_pack(&snapshot, &[60, -120], 1).await.unwrap();
    assert_eq!(packed[0].tick(), 60);
    assert_eq!(packed[1].tick(), -120);
    assert_eq!(packed[1].unpack().liquidity_gross, record(1).liquidity_gross);
}

#[tokio::test]
async fn test_populated_ticks_carry_full_record() {
    let snapshot = TickSnapshot::new(pool_at(0), TICK_SPACING)
        .unwrap()
        .with_tick(-60, record(4))
        .unwrap()
        .with_tick(120, record(5))
        .unwrap();

    let populated = get_populated_ticks(&snapshot, 5).await.unwrap();
    assert_eq!(populated, vec![(-60, record(4)), (120, record(5))]);
}

#[tokio::test]
async fn test_spacing_one_pool() {
    let mut snapshot = TickSnapshot::new(pool_at(78), 1).unwrap();
    for (seed, tick) in [-200, -55, -4, 70, 78, 84, 139, 240, 535].into_iter().enumerate() {
        snapshot.insert_tick(tick, record(seed as u64)).unwrap();
    }

    let ticks = find_initialized_ticks(&snapshot, 100, 16).await.unwrap();
    assert_eq!(ticks, vec![-4, 70, 78, 84, 139]);
}

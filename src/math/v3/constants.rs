pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = -MIN_TICK;

/// Tick spacing assumed when a source does not report its own.
pub const TICK_SPACING: i32 = 60;

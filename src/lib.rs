pub mod config;
pub mod errors;
pub mod lens;
pub mod math;
pub mod pool;

pub use errors::TickLensError;

pub use lens::{PackedTick, TickInfo, get_ticks};
pub use pool::{PoolGlobalState, TickSource};

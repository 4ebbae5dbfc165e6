pub mod bit_math;
pub mod constants;
pub mod tick;
pub mod tick_bitmap;

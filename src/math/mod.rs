pub mod clamp;
pub mod redistribute;

pub use clamp::{clamp, clamp_unit};
pub use redistribute::{is_balanced, redistribute, redistribute_in_place, SUM_TOLERANCE};

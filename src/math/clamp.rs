/// Bounds `value` to `[lo, hi]`.
///
/// NaN fails both comparisons and comes back unchanged.
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

pub fn clamp_unit(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

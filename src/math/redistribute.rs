use crate::math::clamp::clamp_unit;

/// Tolerance used when checking that a vector is at rest.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Re-levels `values` so they sum to one after a single entry was set directly.
///
/// The outstanding difference is split evenly over every entry except
/// `pinned`. Entries pushed past `[0, 1]` are clamped, and whatever the clamps
/// refused is taken back in another pass over the entries no pass has touched
/// yet. The first pass skips the pinned entry without retiring it, so it is
/// the entry that gives way when its neighbours bottom out or saturate. Mass
/// that no remaining entry can absorb is dropped.
pub fn redistribute(values: &[f64], pinned: Option<usize>) -> Vec<f64> {
    let mut out = values.to_vec();
    redistribute_in_place(&mut out, pinned);
    out
}

pub fn redistribute_in_place(values: &mut [f64], pinned: Option<usize>) {
    let n = values.len();
    if n == 0 {
        return;
    }
    if n == 1 {
        values[0] = 1.0;
        return;
    }

    let pinned = pinned.filter(|&i| i < n);
    let mut retired = vec![false; n];

    let diff = 1.0 - values.iter().sum::<f64>();
    let mut correcting = level_pass(values, &mut retired, pinned, diff);

    // A positive residual means the clamps kept mass that should have left.
    while correcting != 0.0 {
        correcting = level_pass(values, &mut retired, None, -correcting);
    }
}

/// One sweep splitting `amount` over the entries not yet retired. Returns the
/// clamping residual, `clamped - unclamped` summed over the sweep.
fn level_pass(values: &mut [f64], retired: &mut [bool], skip: Option<usize>, amount: f64) -> f64 {
    let eligible = (0..values.len())
        .filter(|&i| !retired[i] && skip != Some(i))
        .count();
    if eligible == 0 {
        return 0.0;
    }

    let share = amount / eligible as f64;
    let mut residual = 0.0;

    for (i, value) in values.iter_mut().enumerate() {
        if retired[i] || skip == Some(i) {
            continue;
        }
        let adjusted = *value + share;
        let bounded = clamp_unit(adjusted);
        residual += bounded - adjusted;
        retired[i] = true;
        *value = bounded;
    }

    residual
}

pub fn is_balanced(values: &[f64]) -> bool {
    !values.is_empty()
        && values.iter().all(|v| (0.0..=1.0).contains(v))
        && (values.iter().sum::<f64>() - 1.0).abs() <= SUM_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::{is_balanced, redistribute, redistribute_in_place};
    use approx::assert_abs_diff_eq;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_abs_diff_eq!(*a, *e, epsilon = 1e-12);
        }
    }

    fn total(values: &[f64]) -> f64 {
        values.iter().sum()
    }

    #[test]
    fn dragged_entry_is_held_and_partner_absorbs() {
        let out = redistribute(&[0.8, 0.5], Some(0));
        assert_close(&out, &[0.8, 0.2]);
    }

    #[test]
    fn saturated_entry_drives_others_to_zero() {
        let out = redistribute(&[1.0, 0.05, 0.05], Some(0));
        assert_close(&out, &[1.0, 0.0, 0.0]);
        assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn appended_zero_entry_is_left_alone() {
        let out = redistribute(&[0.5, 0.5, 0.0], Some(2));
        assert_eq!(out, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn no_pin_spreads_over_every_entry() {
        let out = redistribute(&[0.2, 0.2], None);
        assert_close(&out, &[0.5, 0.5]);
    }

    #[test]
    fn out_of_range_pin_acts_like_none() {
        let out = redistribute(&[0.2, 0.2], Some(7));
        assert_close(&out, &[0.5, 0.5]);
    }

    #[test]
    fn balanced_input_is_untouched() {
        let v = vec![0.25, 0.25, 0.5];
        for pin in [None, Some(0), Some(1), Some(2)] {
            assert_eq!(redistribute(&v, pin), v);
        }
    }

    #[test]
    fn pinned_entry_gives_back_what_a_zeroed_neighbour_cannot() {
        // The empty entry refuses its 0.05 share, so the pin gives it up instead.
        let out = redistribute(&[0.6, 0.5, 0.0], Some(0));
        assert_close(&out, &[0.55, 0.45, 0.0]);
        assert_abs_diff_eq!(total(&out), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn zeroed_neighbour_position_does_not_matter() {
        let out = redistribute(&[0.6, 0.0, 0.5], Some(0));
        assert_close(&out, &[0.55, 0.0, 0.45]);
        assert!(is_balanced(&out));
    }

    #[test]
    fn lowered_pin_spreads_evenly_without_correction() {
        let out = redistribute(&[0.0, 0.95, 0.0], Some(0));
        assert_close(&out, &[0.0, 0.975, 0.025]);
    }

    #[test]
    fn correction_never_moves_the_sum_away_from_one() {
        let input = [0.6, 0.0, 0.0, 0.9];
        let out = redistribute(&input, Some(0));
        assert!((total(&out) - 1.0).abs() <= (total(&input) - 1.0).abs());
        assert!(is_balanced(&out));
        assert_close(&out, &[0.6 - 1.0 / 3.0, 0.0, 0.0, 0.9 - 0.5 / 3.0]);
    }

    #[test]
    fn unabsorbable_mass_is_dropped() {
        // Nothing is pinned, so the first pass retires every entry.
        let out = redistribute(&[0.0, 0.9, 0.9], None);
        let share = 0.8 / 3.0;
        assert_close(&out, &[0.0, 0.9 - share, 0.9 - share]);
        assert!(!is_balanced(&out));
        assert!(total(&out) - 1.0 < 0.8);
    }

    #[test]
    fn single_entry_collapses_to_one() {
        let mut v = [0.3];
        redistribute_in_place(&mut v, Some(0));
        assert_eq!(v, [1.0]);
        assert!(redistribute(&[], None).is_empty());
    }

    #[test]
    fn nan_entries_terminate() {
        let out = redistribute(&[f64::NAN, 0.5], Some(1));
        assert_eq!(out.len(), 2);
        assert!(out[0].is_nan());
    }
}

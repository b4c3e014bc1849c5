use prob_editor::math::{clamp_unit, is_balanced, redistribute};
use prob_editor::ProbabilityVector;
use proptest::prelude::*;

/// Random balanced vectors of 2..8 entries.
fn balanced() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01f64..1.0, 2..8).prop_map(|raw| {
        let total: f64 = raw.iter().sum();
        let mut v: Vec<f64> = raw.iter().map(|x| x / total).collect();
        let head: f64 = v[..v.len() - 1].iter().sum();
        let last = v.len() - 1;
        v[last] = 1.0 - head;
        v
    })
}

proptest! {
    #[test]
    fn outputs_stay_in_unit_interval(
        values in prop::collection::vec(0.0f64..=1.0, 2..10),
        pin in prop::option::of(0usize..10),
    ) {
        let out = redistribute(&values, pin);
        prop_assert_eq!(out.len(), values.len());
        prop_assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn unclamped_edit_sums_to_one(v in balanced(), idx in 0usize..8, delta in -0.5f64..0.5) {
        let i = idx % v.len();
        let mut edited = v.clone();
        edited[i] = clamp_unit(v[i] + delta);

        let out = redistribute(&edited, Some(i));
        let others_clamped = out
            .iter()
            .enumerate()
            .any(|(j, x)| j != i && (*x == 0.0 || *x == 1.0));
        if !others_clamped {
            prop_assert!((out.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            prop_assert_eq!(out[i], edited[i]);
        }
    }

    #[test]
    fn leveling_never_moves_the_sum_away_from_one(
        values in prop::collection::vec(0.0f64..=1.0, 2..10),
        pin in prop::option::of(0usize..10),
    ) {
        let before = (values.iter().sum::<f64>() - 1.0).abs();
        let out = redistribute(&values, pin);
        let after = (out.iter().sum::<f64>() - 1.0).abs();
        prop_assert!(after <= before + 1e-12, "before {} after {}", before, after);
    }

    #[test]
    fn unsaturated_pin_absorbs_the_clamp_residual(
        values in prop::collection::vec(0.0f64..=1.0, 2..10),
        idx in 0usize..10,
    ) {
        let i = idx % values.len();
        let out = redistribute(&values, Some(i));
        if out[i] > 0.0 && out[i] < 1.0 {
            prop_assert!((out.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn even_shares_when_nothing_clamps(v in balanced(), idx in 0usize..8, delta in -0.05f64..0.05) {
        let i = idx % v.len();
        let mut edited = v.clone();
        edited[i] = clamp_unit(v[i] + delta);
        let out = redistribute(&edited, Some(i));

        let shifts: Vec<f64> = out
            .iter()
            .zip(&edited)
            .enumerate()
            .filter(|(j, (x, _))| *j != i && **x > 0.0 && **x < 1.0)
            .map(|(_, (x, e))| x - e)
            .collect();
        if shifts.len() == v.len() - 1 {
            for s in &shifts {
                prop_assert!((s - shifts[0]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn removal_keeps_balance(v in balanced(), idx in 0usize..8) {
        prop_assume!(v.len() >= 3);
        let mut pv = ProbabilityVector::from_values(v.clone()).unwrap();
        pv.remove(idx % v.len()).unwrap();
        prop_assert_eq!(pv.len(), v.len() - 1);
        prop_assert!(is_balanced(pv.as_slice()));
    }

    #[test]
    fn export_import_preserves_values(v in balanced()) {
        let pv = ProbabilityVector::from_values(v).unwrap();
        let back: ProbabilityVector = pv.to_text().parse().unwrap();
        for (a, b) in back.iter().zip(pv.iter()) {
            prop_assert!((a - b).abs() < 1e-12);
        }
    }
}

#[test]
fn leveling_a_balanced_vector_changes_nothing() {
    let v = vec![0.125, 0.375, 0.5];
    for pin in [None, Some(0), Some(1), Some(2)] {
        assert_eq!(redistribute(&v, pin), v);
    }
}

use crate::error::{EditorError, Result};
use crate::math::{clamp_unit, redistribute_in_place};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Ordered category probabilities kept in `[0, 1]` and summing to one.
///
/// Every mutation re-levels the vector before returning. Mass that no entry
/// can absorb once the clamps saturate is dropped, so the sum can fall short
/// of one in that case. The vector never drops below one entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProbabilityVector {
    values: Vec<f64>,
}

impl Default for ProbabilityVector {
    fn default() -> Self {
        Self {
            values: vec![0.5, 0.5],
        }
    }
}

impl ProbabilityVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a vector from raw values: each is clamped, then the whole set is
    /// re-levelled with the last entry held.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(EditorError::EmptyImport);
        }
        if let Some((position, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(EditorError::InvalidNumber {
                position,
                token: v.to_string(),
            });
        }

        let mut values: Vec<f64> = values.into_iter().map(clamp_unit).collect();
        let last = values.len() - 1;
        redistribute_in_place(&mut values, Some(last));
        Ok(Self { values })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Appends a zero-valued category and returns its index.
    pub fn push_zero(&mut self) -> usize {
        self.values.push(0.0);
        let index = self.values.len() - 1;
        redistribute_in_place(&mut self.values, Some(index));
        index
    }

    /// Removes the category at `index` and spreads its mass over the rest.
    pub fn remove(&mut self, index: usize) -> Result<f64> {
        self.check_index(index)?;
        if self.values.len() == 1 {
            return Err(EditorError::LastEntry);
        }
        let removed = self.values.remove(index);
        redistribute_in_place(&mut self.values, None);
        Ok(removed)
    }

    /// Sets one category directly; the others absorb the difference.
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        self.check_index(index)?;
        self.values[index] = clamp_unit(value);
        redistribute_in_place(&mut self.values, Some(index));
        Ok(())
    }

    /// Comma-separated export form.
    pub fn to_text(&self) -> String {
        format_values(&self.values)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.values.len() {
            return Err(EditorError::IndexOutOfRange {
                index,
                len: self.values.len(),
            });
        }
        Ok(())
    }
}

impl FromStr for ProbabilityVector {
    type Err = EditorError;

    fn from_str(text: &str) -> Result<Self> {
        Self::from_values(parse_values(text)?)
    }
}

impl fmt::Display for ProbabilityVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Parses comma-separated decimals. Blank tokens are skipped.
pub fn parse_values(text: &str) -> Result<Vec<f64>> {
    let mut out = Vec::new();
    for (position, token) in text
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .enumerate()
    {
        match token.parse::<f64>() {
            Ok(v) if v.is_finite() => out.push(v),
            _ => {
                return Err(EditorError::InvalidNumber {
                    position,
                    token: token.to_string(),
                })
            }
        }
    }

    if out.is_empty() {
        return Err(EditorError::EmptyImport);
    }
    Ok(out)
}

pub fn format_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::{format_values, parse_values, ProbabilityVector};
    use crate::error::EditorError;
    use crate::math::is_balanced;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_is_even_pair() {
        assert_eq!(ProbabilityVector::new().as_slice(), &[0.5, 0.5]);
    }

    #[test]
    fn import_round_trips_to_compact_text() {
        let v: ProbabilityVector = "0.2, 0.3, 0.5".parse().unwrap();
        assert_eq!(v.to_text(), "0.2,0.3,0.5");
        assert_eq!(v.to_string(), "0.2,0.3,0.5");
    }

    #[test]
    fn blank_tokens_are_skipped() {
        assert_eq!(parse_values(" 0.4,, 0.6 ,").unwrap(), vec![0.4, 0.6]);
    }

    #[test]
    fn non_numeric_tokens_are_rejected() {
        match parse_values("0.5,abc,0.5") {
            Err(EditorError::InvalidNumber { position, token }) => {
                assert_eq!(position, 1);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(parse_values("NaN"), Err(EditorError::InvalidNumber { .. })));
        assert!(matches!(parse_values(" , "), Err(EditorError::EmptyImport)));
    }

    #[test]
    fn import_clamps_then_levels_against_last_entry() {
        let v: ProbabilityVector = "1.5,0.5,0.4".parse().unwrap();
        // Clamped to [1, 0.5, 0.4]; the last entry holds, the first two absorb.
        let s = v.as_slice();
        assert_abs_diff_eq!(s[2], 0.4, epsilon = 1e-12);
        assert!(is_balanced(s));
    }

    #[test]
    fn single_value_import_is_one() {
        let v: ProbabilityVector = "0.3".parse().unwrap();
        assert_eq!(v.as_slice(), &[1.0]);
    }

    #[test]
    fn add_then_remove_keeps_sum() {
        let mut v = ProbabilityVector::new();
        assert_eq!(v.push_zero(), 2);
        assert_eq!(v.as_slice(), &[0.5, 0.5, 0.0]);

        v.set(2, 0.5).unwrap();
        assert!(is_balanced(v.as_slice()));

        v.remove(0).unwrap();
        assert_eq!(v.len(), 2);
        assert!(is_balanced(v.as_slice()));
    }

    #[test]
    fn removal_spreads_mass_over_survivors() {
        let mut v = ProbabilityVector::from_values(vec![0.2, 0.3, 0.5]).unwrap();
        assert_abs_diff_eq!(v.remove(0).unwrap(), 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(v.as_slice()[0], 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(v.as_slice()[1], 0.6, epsilon = 1e-12);
    }

    #[test]
    fn last_entry_cannot_be_removed() {
        let mut v = ProbabilityVector::from_values(vec![1.0]).unwrap();
        assert!(matches!(v.remove(0), Err(EditorError::LastEntry)));
        assert!(matches!(
            v.set(3, 0.1),
            Err(EditorError::IndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn set_clamps_at_bounds() {
        let mut v = ProbabilityVector::new();
        v.set(0, 1.4).unwrap();
        assert_eq!(v.as_slice()[0], 1.0);
        assert_abs_diff_eq!(v.as_slice()[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn raising_an_entry_past_a_zero_neighbour_stays_balanced() {
        let mut v = ProbabilityVector::new();
        v.push_zero();
        v.set(0, 0.6).unwrap();
        assert!(is_balanced(v.as_slice()));
        assert_abs_diff_eq!(v.as_slice()[0], 0.55, epsilon = 1e-12);
        assert_abs_diff_eq!(v.as_slice()[1], 0.45, epsilon = 1e-12);
        assert_eq!(v.as_slice()[2], 0.0);
    }

    #[test]
    fn serializes_as_json_array() {
        let v = ProbabilityVector::new();
        assert_eq!(serde_json::to_string(&v).unwrap(), "[0.5,0.5]");
        assert_eq!(format_values(&[1.0, 0.0]), "1,0");
    }
}

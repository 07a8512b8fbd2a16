/// Fractional change between consecutive values: `(v[i] - v[i-1]) / v[i-1]`.
///
/// Output is one shorter than the input. A zero previous value yields a
/// non-finite element, which later alignment drops.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_changes() {
        let r = pct_change(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.1).abs() < 1e-12);
        assert!((r[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn short_inputs_are_empty() {
        assert!(pct_change(&[]).is_empty());
        assert!(pct_change(&[5.0]).is_empty());
    }

    #[test]
    fn zero_base_is_not_finite() {
        let r = pct_change(&[0.0, 1.0]);
        assert!(!r[0].is_finite());
    }
}

/// Euclidean norm of a series.
pub fn l2_norm(values: &[f64]) -> f64 {
    values.iter().map(|value| value * value).sum::<f64>().sqrt()
}

/// Scales `values` to unit Euclidean norm. A zero-norm series (all zeros, or empty)
/// is returned unchanged.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let norm = l2_norm(values);
    if norm == 0.0 {
        return values.to_vec();
    }
    values.iter().map(|value| value / norm).collect()
}

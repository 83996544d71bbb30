//! Similarity Metric
//!
//! Normalized Euclidean closeness of two trait vectors.

/// Euclidean distance divided by sqrt(D), so values in [0, 1] give a
/// distance in [0, 1].
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "trait vectors differ in length");
    if a.is_empty() {
        return 0.0;
    }
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    sum.sqrt() / (a.len() as f64).sqrt()
}

/// `1 - d / threshold` when `d <= threshold`, otherwise 0.
pub fn similarity(a: &[f64], b: &[f64], threshold: f64) -> f64 {
    let d = distance(a, b);
    if d > threshold {
        0.0
    } else {
        1.0 - d / threshold
    }
}

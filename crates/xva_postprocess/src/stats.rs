//! Cross-sample statistics.

/// Rank of the `q`-quantile among `n` ascending values: `⌈q (n - 1)⌉`.
///
/// Products within 1e-12 of an integer are treated as that integer so the
/// rank does not depend on rounding noise in `q`.
#[inline]
pub fn quantile_rank(n: usize, q: f64) -> usize {
    if n == 0 {
        return 0;
    }
    let raw = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let rank = (raw - 1e-12).ceil().max(0.0) as usize;
    rank.min(n - 1)
}

/// Nearest-rank `q`-quantile of `values`; 0 for an empty slice.
///
/// ```
/// use xva_postprocess::stats::quantile;
///
/// // rank ⌈0.95 · 4⌉ = 4 of the sorted values
/// assert_eq!(quantile(&[3.0, -1.0, 7.0, 2.0, 5.0], 0.95), 7.0);
/// // rank ⌈0.5 · 4⌉ = 2
/// assert_eq!(quantile(&[3.0, -1.0, 7.0, 2.0, 5.0], 0.5), 3.0);
/// ```
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted[quantile_rank(sorted.len(), q)]
}

/// Arithmetic mean; 0 for an empty slice.
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0 for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

//! Numeric helpers shared by the aligner, the topology inferencer and the
//! link statistics. All functions are total: degenerate inputs produce `0.0`
//! instead of `NaN`.

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median with the two middle elements averaged for even lengths.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 { (sorted[mid - 1] + sorted[mid]) / 2.0 } else { sorted[mid] }
}

/// Largest value, `0.0` for an empty slice.
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Percentile `q` in `[0, 100]` using linear interpolation between the
/// closest ranks.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Pearson correlation coefficient of two equally long vectors.
///
/// A non-finite result (constant input, fewer than two samples, length
/// mismatch) is reported as `0.0`.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }

    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 }
}

/// Piecewise linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` must be sorted ascending. Points outside `[xp[0], xp[last]]` read
/// as `0.0`.
pub fn interp_zero_fill(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let (Some(&first), Some(&last)) = (xp.first(), xp.last()) else {
        return 0.0;
    };
    if !x.is_finite() || x < first || x > last {
        return 0.0;
    }

    // First index with xp[j] > x.
    let j = xp.partition_point(|&t| t <= x);
    if j == 0 {
        return 0.0;
    }
    if j == xp.len() {
        return fp[xp.len() - 1];
    }
    let i = j - 1;
    let span = xp[j] - xp[i];
    fp[i] + (fp[j] - fp[i]) * (x - xp[i]) / span
}

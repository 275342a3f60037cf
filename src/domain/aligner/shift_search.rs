use crate::domain::utils::statistics::{interp_zero_fill, pearson};

/// Winning candidate of the cross-correlation search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftEstimate {
    pub shift_sec: f64,
    pub correlation: f64,
}

/// Samples the loss trace at `target + shift` for every target timestamp.
/// Targets falling outside the loss trace read as zero loss.
pub fn resample_loss(targets: &[f64], loss_timestamps: &[f64], loss: &[f64], shift_sec: f64) -> Vec<f64> {
    targets.iter().map(|t| interp_zero_fill(t + shift_sec, loss_timestamps, loss)).collect()
}

/// Tries every shift of `grid` in order and keeps the one whose resampled
/// loss correlates best with the throughput. Ties go to the earlier
/// candidate.
pub fn estimate_shift(throughput_timestamps: &[f64], throughput: &[f64], loss_timestamps: &[f64], loss: &[f64], grid: &[f64]) -> ShiftEstimate {
    let mut best: Option<ShiftEstimate> = None;

    for &shift_sec in grid {
        let resampled = resample_loss(throughput_timestamps, loss_timestamps, loss, shift_sec);
        let correlation = pearson(throughput, &resampled);

        if best.is_none_or(|b| correlation > b.correlation) {
            best = Some(ShiftEstimate { shift_sec, correlation });
        }
    }

    best.unwrap_or(ShiftEstimate { shift_sec: 0.0, correlation: 0.0 })
}

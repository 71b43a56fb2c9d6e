//! Empirical percentiles and band positions.

use chargepilot_scoring_models::BandPercentiles;
use serde::{Deserialize, Serialize};

/// Linearly interpolated percentile of an ascending slice.
///
/// `p` is clamped to `[0, 1]`. The index is `(len - 1) * p`; the result
/// interpolates between the order statistics either side of it. Returns 0
/// for an empty slice.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let idx = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }

    let t = idx - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * t
}

/// Position of `value` within the observed distribution, in `[0, 1]`.
///
/// 0 at or below `low`, 1 at or above `high`, a linear ramp to 0.5 between
/// `low` and `mid` and from 0.5 between `mid` and `high`. A zero-width
/// segment jumps straight to its upper end.
#[must_use]
pub fn to_band_position(value: f64, low: f64, mid: f64, high: f64) -> f64 {
    if value <= low {
        return 0.0;
    }
    if value >= high {
        return 1.0;
    }
    if value <= mid {
        let span = mid - low;
        if span <= 0.0 {
            return 0.5;
        }
        return 0.5 * (value - low) / span;
    }
    let span = high - mid;
    if span <= 0.0 {
        return 1.0;
    }
    0.5 + 0.5 * (value - mid) / span
}

/// Low, mid, and high percentiles of a score population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileBands {
    /// Score at the low percentile.
    pub low: f64,
    /// Score at the mid percentile.
    pub mid: f64,
    /// Score at the high percentile.
    pub high: f64,
    /// Number of scores the bands were computed from.
    pub population: usize,
}

impl PercentileBands {
    /// Computes bands at the default 10th/50th/90th percentiles.
    #[must_use]
    pub fn from_scores(scores: &[f64]) -> Self {
        Self::with_percentiles(scores, BandPercentiles::default())
    }

    /// Computes bands at the given percentiles. NaN scores are ignored.
    #[must_use]
    pub fn with_percentiles(scores: &[f64], percentiles: BandPercentiles) -> Self {
        let mut sorted: Vec<f64> = scores.iter().copied().filter(|s| !s.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);

        Self {
            low: percentile(&sorted, percentiles.low),
            mid: percentile(&sorted, percentiles.mid),
            high: percentile(&sorted, percentiles.high),
            population: sorted.len(),
        }
    }

    /// Whether the bands were computed from no scores.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.population == 0
    }

    /// Band position of `value` under these bands.
    #[must_use]
    pub fn position(&self, value: f64) -> f64 {
        to_band_position(value, self.low, self.mid, self.high)
    }
}

//! Composite score synthesis and status banding.

use chargepilot_scoring_models::BandingRule;
use chargepilot_station_models::StationStatus;

use crate::hash::{SCORE_HASH, clamp01};

/// Exponent applied to the positional noise. Values below 1 bias the base
/// toward the top of the range.
pub const BASE_EXPONENT: f64 = 0.35;

/// Weight of the positional base in the composite score.
pub const BASE_WEIGHT: f64 = 0.75;

/// Weight of the simulated traffic score.
pub const TRAFFIC_WEIGHT: f64 = 0.2;

/// Weight of the normalized capacity.
pub const CAPACITY_WEIGHT: f64 = 0.15;

/// A station's charger count relative to the largest in the dataset.
///
/// Returns 0 when the dataset maximum is 0.
#[must_use]
pub fn normalized_capacity(charger_count: u32, max_charger_count: u32) -> f64 {
    if max_charger_count == 0 {
        return 0.0;
    }
    f64::from(charger_count) / f64::from(max_charger_count)
}

/// Combines positional noise, traffic, and capacity into a score in
/// `[0, 1]`.
#[must_use]
pub fn synthesize_score(lat: f64, lng: f64, traffic_score: f64, normalized_capacity: f64) -> f64 {
    let base = SCORE_HASH.sample(lat, lng).powf(BASE_EXPONENT);
    let signal = TRAFFIC_WEIGHT * traffic_score + CAPACITY_WEIGHT * normalized_capacity;
    clamp01(base * BASE_WEIGHT + signal)
}

/// Derives a station's status under the configured banding rule.
///
/// [`BandingRule::ScoreThresholds`] reads only `score`.
/// [`BandingRule::RatioThresholds`] reads only `traffic_score` and
/// `charger_count`; a station with zero chargers is always overloaded.
#[must_use]
pub fn assign_status(
    rule: &BandingRule,
    score: f64,
    traffic_score: f64,
    charger_count: u32,
) -> StationStatus {
    match *rule {
        BandingRule::ScoreThresholds {
            overloaded_below,
            balanced_below,
        } => {
            if score < overloaded_below {
                StationStatus::Overloaded
            } else if score < balanced_below {
                StationStatus::Balanced
            } else {
                StationStatus::Underutilized
            }
        }
        BandingRule::RatioThresholds {
            underutilized_below_pct,
            overloaded_above_pct,
        } => {
            if charger_count == 0 {
                return StationStatus::Overloaded;
            }
            let ratio = traffic_score * 100.0 / f64::from(charger_count);
            if ratio > overloaded_above_pct {
                StationStatus::Overloaded
            } else if ratio < underutilized_below_pct {
                StationStatus::Underutilized
            } else {
                StationStatus::Balanced
            }
        }
    }
}

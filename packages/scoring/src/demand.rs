//! Demand simulation.
//!
//! Approximates traffic pressure at a coordinate from its distance to a
//! fixed table of weighted demand centers, squashed through a logistic and
//! perturbed by a positional hash so neighbouring stations do not collapse
//! onto the same value.

use chargepilot_scoring_models::{DemandCenter, ScoringConfig};

use crate::geo::haversine_km;
use crate::hash::{JITTER_HASH, clamp01};

/// Raw demand at which the logistic squash crosses 0.5.
pub const LOGISTIC_MIDPOINT: f64 = 0.7;

/// Logistic steepness.
pub const LOGISTIC_STEEPNESS: f64 = 2.2;

/// Peak-to-peak width of the positional jitter.
pub const JITTER_SPAN: f64 = 0.25;

/// Lowest simulated traffic score.
pub const TRAFFIC_FLOOR: f64 = 0.15;

/// Width of the traffic score range above [`TRAFFIC_FLOOR`].
pub const TRAFFIC_RANGE: f64 = 0.8;

/// Highest simulated traffic score.
pub const TRAFFIC_CEILING: f64 = 0.95;

/// Sum of distance-decayed center weights at a coordinate.
#[must_use]
pub fn raw_demand(lat: f64, lng: f64, centers: &[DemandCenter], decay_km: f64) -> f64 {
    centers.iter().fold(0.0, |acc, center| {
        let distance = haversine_km(lat, lng, center.latitude, center.longitude);
        acc + center.weight * (-distance / decay_km).exp()
    })
}

/// Logistic squash of raw demand into `(0, 1)`.
#[must_use]
pub fn squash(raw: f64) -> f64 {
    1.0 / (1.0 + (-LOGISTIC_STEEPNESS * (raw - LOGISTIC_MIDPOINT)).exp())
}

/// Deterministic jitter in `[-JITTER_SPAN / 2, JITTER_SPAN / 2)`.
#[must_use]
pub fn jitter(lat: f64, lng: f64) -> f64 {
    (JITTER_HASH.sample(lat, lng) - 0.5) * JITTER_SPAN
}

/// Simulated traffic pressure at a coordinate, in
/// `[TRAFFIC_FLOOR, TRAFFIC_CEILING]`.
///
/// Coordinates far from every demand center (or outside the service area
/// entirely) still score; they just land near the floor.
#[must_use]
pub fn simulate_traffic_score(lat: f64, lng: f64, config: &ScoringConfig) -> f64 {
    let raw = raw_demand(lat, lng, &config.demand_centers, config.decay_km);
    let normalized = squash(raw);
    let value = TRAFFIC_FLOOR + clamp01(normalized + jitter(lat, lng)) * TRAFFIC_RANGE;

    // 0.15 + 1.0 * 0.8 rounds to 0.9500000000000001.
    value.clamp(TRAFFIC_FLOOR, TRAFFIC_CEILING)
}

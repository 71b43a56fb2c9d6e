//! Sine-based coordinate hashing.
//!
//! `fract(sin(lat * a + lng * b) * c)` is the noise source for both the
//! traffic jitter and the score base. The operation order below must not
//! change: reassociating the multiply-adds changes the low bits, and the
//! `fract` of a large multiple amplifies them into a different value.

/// Coefficients for one sine hash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineHash {
    /// Latitude multiplier.
    pub lat_scale: f64,
    /// Longitude multiplier.
    pub lng_scale: f64,
    /// Amplitude applied before taking the fractional part.
    pub amplitude: f64,
}

/// Hash used for traffic jitter.
pub const JITTER_HASH: SineHash = SineHash {
    lat_scale: 12.9898,
    lng_scale: 78.233,
    amplitude: 43_758.545_3,
};

/// Hash used for the composite score base.
pub const SCORE_HASH: SineHash = SineHash {
    lat_scale: 93.9898,
    lng_scale: 67.345,
    amplitude: 24_634.634_5,
};

impl SineHash {
    /// Hashes a coordinate to a value in `[0, 1)`.
    #[must_use]
    pub fn sample(&self, lat: f64, lng: f64) -> f64 {
        let seed = (lat * self.lat_scale + lng * self.lng_scale).sin() * self.amplitude;
        fract(seed)
    }
}

/// `x - floor(x)`: always in `[0, 1)` for finite `x`, unlike [`f64::fract`]
/// which keeps the sign.
#[must_use]
pub fn fract(x: f64) -> f64 {
    x - x.floor()
}

/// Clamps to `[0, 1]`.
#[must_use]
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fract_of_negative_is_positive() {
        assert!((fract(-0.25) - 0.75).abs() < f64::EPSILON);
        assert!((fract(2.5) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn samples_lie_in_unit_interval() {
        for i in -50..50 {
            let lat = f64::from(i) * 1.7;
            let lng = f64::from(i) * -3.1;
            for hash in [JITTER_HASH, SCORE_HASH] {
                let v = hash.sample(lat, lng);
                assert!((0.0..1.0).contains(&v), "{v} out of range");
            }
        }
    }

    #[test]
    fn samples_are_deterministic() {
        let a = JITTER_HASH.sample(30.2672, -97.7431);
        let _ = SCORE_HASH.sample(0.0, 0.0);
        let b = JITTER_HASH.sample(30.2672, -97.7431);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn clamps() {
        assert!(clamp01(-0.5).abs() < f64::EPSILON);
        assert!((clamp01(1.5) - 1.0).abs() < f64::EPSILON);
        assert!((clamp01(0.4) - 0.4).abs() < f64::EPSILON);
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scoring configuration shared by every consumer of station scores.
//!
//! The interactive map and the offline video renderer must agree on every
//! score they draw, so all tunable constants live in one [`ScoringConfig`]
//! that both load (from the same TOML file, or from [`Default`]). Nothing
//! here computes a score; see `chargepilot_scoring` for that.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Canonical exponential decay distance for demand centers, in kilometers.
///
/// The interactive map historically used 2.6 and the video renderer 3.0.
/// 2.6 is the canonical value; set `decay_km` explicitly to reproduce the
/// other.
pub const DEFAULT_DECAY_KM: f64 = 2.6;

/// Scores below this are [`overloaded`](BandingRule::ScoreThresholds).
pub const DEFAULT_OVERLOADED_BELOW: f64 = 0.33;

/// Scores below this (and not overloaded) are balanced.
pub const DEFAULT_BALANCED_BELOW: f64 = 0.66;

/// Ratio rule: utilization percentages below this are underutilized.
pub const DEFAULT_UNDERUTILIZED_BELOW_PCT: f64 = 60.0;

/// Ratio rule: utilization percentages above this are overloaded.
pub const DEFAULT_OVERLOADED_ABOVE_PCT: f64 = 150.0;

/// Errors from loading or validating a [`ScoringConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML document did not match the config schema.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The config parsed but its values are unusable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// A fixed reference point of regional charging demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandCenter {
    /// Human-readable area name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Relative demand weight in `[0, 1]`.
    pub weight: f64,
}

impl DemandCenter {
    fn new(name: &str, latitude: f64, longitude: f64, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            weight,
        }
    }
}

/// The eight Austin high-demand areas used by default.
#[must_use]
pub fn default_demand_centers() -> Vec<DemandCenter> {
    vec![
        DemandCenter::new("Downtown", 30.2659, -97.7442, 1.0),
        DemandCenter::new("UT Campus", 30.2849, -97.7341, 0.9),
        DemandCenter::new("The Domain", 30.4021, -97.7253, 0.85),
        DemandCenter::new("South Congress", 30.2500, -97.7494, 0.75),
        DemandCenter::new("Austin-Bergstrom Airport", 30.1975, -97.6664, 0.7),
        DemandCenter::new("Mueller", 30.2984, -97.7048, 0.6),
        DemandCenter::new("East Riverside", 30.2380, -97.7220, 0.55),
        DemandCenter::new("Arboretum", 30.3916, -97.7481, 0.5),
    ]
}

/// How a station's status band is derived.
///
/// The two rules are not interchangeable: a deployment picks one and every
/// consumer of the scores must use the same one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum BandingRule {
    /// Band on the composite score.
    ScoreThresholds {
        /// Scores strictly below this are overloaded.
        overloaded_below: f64,
        /// Scores strictly below this (and not overloaded) are balanced.
        balanced_below: f64,
    },
    /// Band on `traffic_score * 100 / charger_count`.
    RatioThresholds {
        /// Ratios strictly below this are underutilized.
        underutilized_below_pct: f64,
        /// Ratios strictly above this are overloaded.
        overloaded_above_pct: f64,
    },
}

impl BandingRule {
    /// The alternate ratio-based rule with its historical thresholds.
    #[must_use]
    pub const fn ratio() -> Self {
        Self::RatioThresholds {
            underutilized_below_pct: DEFAULT_UNDERUTILIZED_BELOW_PCT,
            overloaded_above_pct: DEFAULT_OVERLOADED_ABOVE_PCT,
        }
    }
}

impl Default for BandingRule {
    fn default() -> Self {
        Self::ScoreThresholds {
            overloaded_below: DEFAULT_OVERLOADED_BELOW,
            balanced_below: DEFAULT_BALANCED_BELOW,
        }
    }
}

/// Population percentiles used to spread the color gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandPercentiles {
    /// Percentile mapped to the "bad" stop.
    pub low: f64,
    /// Percentile mapped to the "mid" stop.
    pub mid: f64,
    /// Percentile mapped to the "good" stop.
    pub high: f64,
}

impl Default for BandPercentiles {
    fn default() -> Self {
        Self {
            low: 0.1,
            mid: 0.5,
            high: 0.9,
        }
    }
}

/// Every tunable constant of the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Exponential decay distance for demand centers, in kilometers.
    pub decay_km: f64,
    /// Status banding rule.
    pub banding: BandingRule,
    /// Percentiles for color banding.
    pub bands: BandPercentiles,
    /// Demand-center table.
    pub demand_centers: Vec<DemandCenter>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            decay_km: DEFAULT_DECAY_KM,
            banding: BandingRule::default(),
            bands: BandPercentiles::default(),
            demand_centers: default_demand_centers(),
        }
    }
}

impl ScoringConfig {
    /// Checks that the configured values can produce bounded scores.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the decay is not a positive finite
    /// number, thresholds or percentiles are out of order, the demand-center
    /// table is empty, or a center weight lies outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.decay_km.is_finite() || self.decay_km <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "decay_km must be positive, got {}",
                self.decay_km
            )));
        }

        match self.banding {
            BandingRule::ScoreThresholds {
                overloaded_below,
                balanced_below,
            } => {
                if !(0.0..=1.0).contains(&overloaded_below)
                    || !(0.0..=1.0).contains(&balanced_below)
                    || overloaded_below > balanced_below
                {
                    return Err(ConfigError::Invalid(format!(
                        "score thresholds must satisfy 0 <= {overloaded_below} <= {balanced_below} <= 1"
                    )));
                }
            }
            BandingRule::RatioThresholds {
                underutilized_below_pct,
                overloaded_above_pct,
            } => {
                if underutilized_below_pct < 0.0 || underutilized_below_pct > overloaded_above_pct
                {
                    return Err(ConfigError::Invalid(format!(
                        "ratio thresholds must satisfy 0 <= {underutilized_below_pct} <= {overloaded_above_pct}"
                    )));
                }
            }
        }

        let BandPercentiles { low, mid, high } = self.bands;
        if !(0.0 <= low && low <= mid && mid <= high && high <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "band percentiles must satisfy 0 <= {low} <= {mid} <= {high} <= 1"
            )));
        }

        if self.demand_centers.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one demand center is required".to_string(),
            ));
        }

        if let Some(center) = self
            .demand_centers
            .iter()
            .find(|c| !(0.0..=1.0).contains(&c.weight))
        {
            return Err(ConfigError::Invalid(format!(
                "demand center {} has weight {} outside [0, 1]",
                center.name, center.weight
            )));
        }

        Ok(())
    }
}

/// Bundled parameter sets, embedded at compile time.
const PRESET_TOMLS: &[(&str, &str)] = &[
    ("canonical", include_str!("../config/canonical.toml")),
    ("video_legacy", include_str!("../config/video_legacy.toml")),
];

/// Returns the names of the bundled presets.
#[must_use]
pub fn preset_names() -> Vec<&'static str> {
    PRESET_TOMLS.iter().map(|(name, _)| *name).collect()
}

/// Loads a bundled preset by name.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for an unknown name, or a parse error if
/// the embedded TOML is broken.
pub fn preset(name: &str) -> Result<ScoringConfig, ConfigError> {
    let (_, toml_str) = PRESET_TOMLS
        .iter()
        .find(|(preset, _)| *preset == name)
        .ok_or_else(|| ConfigError::Invalid(format!("unknown preset {name:?}")))?;
    parse_config_toml(toml_str)
}

/// Parses and validates a [`ScoringConfig`] from a TOML string.
///
/// Omitted fields take their canonical defaults, so an empty document is
/// the default config.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or the values fail
/// [`ScoringConfig::validate`].
pub fn parse_config_toml(toml_str: &str) -> Result<ScoringConfig, ConfigError> {
    let config: ScoringConfig = toml::de::from_str(toml_str)?;
    config.validate()?;
    Ok(config)
}

/// Reads a TOML config file from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to parse.
pub fn load_config(path: &Path) -> Result<ScoringConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    parse_config_toml(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = parse_config_toml("").unwrap();
        assert_eq!(config, ScoringConfig::default());
        assert_eq!(config.demand_centers.len(), 8);
    }

    #[test]
    fn default_config_is_valid() {
        ScoringConfig::default().validate().unwrap();
    }

    #[test]
    fn parses_video_renderer_parameters() {
        let toml_str = r#"
decay_km = 3.0

[banding]
rule = "ratio_thresholds"
underutilized_below_pct = 60.0
overloaded_above_pct = 150.0
"#;
        let config = parse_config_toml(toml_str).unwrap();
        assert!((config.decay_km - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.banding, BandingRule::ratio());
        assert_eq!(config.demand_centers, default_demand_centers());
    }

    #[test]
    fn parses_custom_demand_centers() {
        let toml_str = r#"
[[demand_centers]]
name = "Depot"
latitude = 30.0
longitude = -97.0
weight = 0.4
"#;
        let config = parse_config_toml(toml_str).unwrap();
        assert_eq!(config.demand_centers.len(), 1);
        assert_eq!(config.demand_centers[0].name, "Depot");
    }

    #[test]
    fn rejects_non_positive_decay() {
        let err = parse_config_toml("decay_km = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_inverted_score_thresholds() {
        let toml_str = r#"
[banding]
rule = "score_thresholds"
overloaded_below = 0.7
balanced_below = 0.3
"#;
        assert!(matches!(
            parse_config_toml(toml_str),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_unordered_percentiles() {
        let toml_str = r"
[bands]
low = 0.9
high = 0.1
";
        assert!(matches!(
            parse_config_toml(toml_str),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_empty_demand_table() {
        let config = ScoringConfig {
            demand_centers: Vec::new(),
            ..ScoringConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn canonical_preset_is_default() {
        assert_eq!(preset("canonical").unwrap(), ScoringConfig::default());
    }

    #[test]
    fn all_presets_parse() {
        for name in preset_names() {
            preset(name).unwrap_or_else(|e| panic!("{name}: {e}"));
        }
    }

    #[test]
    fn legacy_video_preset_diverges() {
        let legacy = preset("video_legacy").unwrap();
        assert!((legacy.decay_km - 3.0).abs() < f64::EPSILON);
        assert_eq!(legacy.banding, BandingRule::ratio());
    }

    #[test]
    fn unknown_preset_is_invalid() {
        assert!(matches!(preset("nope"), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            parse_config_toml("decay_km = ["),
            Err(ConfigError::Toml(_))
        ));
    }
}

//! Three-stop color gradient with hex output.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bands::PercentileBands;

/// Errors from parsing colors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaletteError {
    /// The string is not a `#RRGGBB` color.
    #[error("Invalid hex color: {0:?}")]
    InvalidHex(String),
}

/// Errors from loading a gradient definition.
#[derive(Debug, thiserror::Error)]
pub enum GradientError {
    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid TOML or holds a bad color.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// An 8-bit RGB color. Serializes as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` (the leading `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::InvalidHex`] if the string is not six hex
    /// digits.
    pub fn from_hex(hex: &str) -> Result<Self, PaletteError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PaletteError::InvalidHex(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| PaletteError::InvalidHex(hex.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Formats as uppercase `#RRGGBB`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Per-channel linear interpolation, `t` clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: lerp_channel(self.r, other.r, t),
            g: lerp_channel(self.g, other.g, t),
            b: lerp_channel(self.b, other.b, t),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    let a = f64::from(a);
    let b = f64::from(b);
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

impl TryFrom<String> for Rgb {
    type Error = PaletteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// `bad -> mid -> good` gradient.
///
/// Stops missing from a serialized gradient keep their default color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorGradient {
    /// Color at band position 0.
    pub bad: Rgb,
    /// Color at band position 0.5.
    pub mid: Rgb,
    /// Color at band position 1.
    pub good: Rgb,
}

impl Default for ColorGradient {
    /// Red -> amber -> green.
    fn default() -> Self {
        Self {
            bad: Rgb::new(0xEF, 0x44, 0x44),
            mid: Rgb::new(0xF5, 0x9E, 0x0B),
            good: Rgb::new(0x22, 0xC5, 0x5E),
        }
    }
}

impl ColorGradient {
    /// Color at a band position in `[0, 1]`.
    #[must_use]
    pub fn at(&self, position: f64) -> Rgb {
        let position = position.clamp(0.0, 1.0);
        if position <= 0.5 {
            self.bad.lerp(self.mid, position / 0.5)
        } else {
            self.mid.lerp(self.good, (position - 0.5) / 0.5)
        }
    }

    /// Color for `value` relative to an explicit low/mid/high triple.
    #[must_use]
    pub fn color(&self, value: f64, low: f64, mid: f64, high: f64) -> Rgb {
        self.at(crate::bands::to_band_position(value, low, mid, high))
    }

    /// Hex color for `value` relative to a score population.
    ///
    /// An empty population has no distribution to place `value` in, so it
    /// gets the "bad" stop.
    #[must_use]
    pub fn hex_for(&self, value: f64, bands: &PercentileBands) -> String {
        if bands.is_empty() {
            return self.bad.to_hex();
        }
        self.at(bands.position(value)).to_hex()
    }
}

/// Parses a gradient from a TOML string such as `good = "#16A34A"`.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or a stop is not `#RRGGBB`.
pub fn parse_gradient_toml(toml_str: &str) -> Result<ColorGradient, GradientError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Reads a gradient TOML file from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to parse.
pub fn load_gradient(path: &Path) -> Result<ColorGradient, GradientError> {
    let contents = std::fs::read_to_string(path)?;
    parse_gradient_toml(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_hex() {
        let c = Rgb::from_hex("#22c55e").unwrap();
        assert_eq!(c, Rgb::new(0x22, 0xC5, 0x5E));
        assert_eq!(c.to_hex(), "#22C55E");
        assert_eq!(Rgb::from_hex("EF4444").unwrap().to_string(), "#EF4444");
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#GGGGGG").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn gradient_stops() {
        let g = ColorGradient::default();
        assert_eq!(g.at(0.0).to_hex(), "#EF4444");
        assert_eq!(g.at(0.5).to_hex(), "#F59E0B");
        assert_eq!(g.at(1.0).to_hex(), "#22C55E");
    }

    #[test]
    fn interpolates_between_stops() {
        let g = ColorGradient::default();
        // Halfway from bad to mid: (242, 113, 39.5 -> 40)
        assert_eq!(g.at(0.25).to_hex(), "#F27128");
    }

    #[test]
    fn values_outside_bands_use_end_stops() {
        let g = ColorGradient::default();
        assert_eq!(g.color(0.1, 0.2, 0.5, 0.8).to_hex(), "#EF4444");
        assert_eq!(g.color(0.9, 0.2, 0.5, 0.8).to_hex(), "#22C55E");
        assert_eq!(g.color(0.5, 0.2, 0.5, 0.8).to_hex(), "#F59E0B");
    }

    #[test]
    fn empty_population_falls_back_to_bad() {
        let g = ColorGradient::default();
        let bands = PercentileBands::from_scores(&[]);
        assert_eq!(g.hex_for(0.9, &bands), "#EF4444");
    }

    #[test]
    fn green_never_decreases_with_score() {
        let g = ColorGradient::default();
        let scores: Vec<f64> = (0..50).map(|i| f64::from(i * 7 % 50) / 50.0).collect();
        let bands = PercentileBands::from_scores(&scores);

        let mut last_green = 0;
        for i in 0..=200 {
            let value = f64::from(i) / 200.0;
            let green = g.at(bands.position(value)).g;
            assert!(green >= last_green, "green dropped at {value}");
            last_green = green;
        }
    }

    #[test]
    fn gradient_round_trips_through_json() {
        let g = ColorGradient::default();
        let json = serde_json::to_value(g).unwrap();
        assert_eq!(json["good"], "#22C55E");
        let parsed: ColorGradient = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, g);
    }

    #[test]
    fn toml_overrides_only_named_stops() {
        let g = parse_gradient_toml(
            r##"
bad = "#B91C1C"
good = "#16A34A"
"##,
        )
        .unwrap();
        assert_eq!(g.bad.to_hex(), "#B91C1C");
        assert_eq!(g.mid, ColorGradient::default().mid);
        assert_eq!(g.good.to_hex(), "#16A34A");

        let bands = PercentileBands::from_scores(&[0.2, 0.5, 0.8]);
        assert_eq!(g.hex_for(0.95, &bands), "#16A34A");
    }

    #[test]
    fn empty_toml_is_default_gradient() {
        assert_eq!(parse_gradient_toml("").unwrap(), ColorGradient::default());
    }

    #[test]
    fn toml_with_bad_stop_is_rejected() {
        assert!(matches!(
            parse_gradient_toml(r##"mid = "amber""##),
            Err(GradientError::Toml(_))
        ));
    }

    #[test]
    fn missing_gradient_file_is_io_error() {
        let path = Path::new("/nonexistent/chargepilot/gradient.toml");
        assert!(matches!(load_gradient(path), Err(GradientError::Io(_))));
    }

    #[test]
    fn invalid_hex_fails_deserialization() {
        let json = serde_json::json!({ "bad": "#nope", "mid": "#000000", "good": "#FFFFFF" });
        assert!(serde_json::from_value::<ColorGradient>(json).is_err());
    }
}

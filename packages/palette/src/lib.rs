#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Score-to-color mapping relative to the visible population.
//!
//! Colors are spread across the distribution of scores currently in view
//! instead of a fixed absolute scale: the low percentile maps to the "bad"
//! stop, the median to "mid", and the high percentile to "good". Everything
//! here is a pure function; nothing draws.

pub mod bands;
pub mod color;

pub use bands::{PercentileBands, percentile, to_band_position};
pub use color::{
    ColorGradient, GradientError, PaletteError, Rgb, load_gradient, parse_gradient_toml,
};

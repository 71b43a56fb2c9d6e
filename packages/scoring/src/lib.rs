#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Deterministic pressure scoring for charging stations.
//!
//! Every function here is a pure function of its arguments and the
//! [`ScoringConfig`](chargepilot_scoring_models::ScoringConfig) it is given.
//! No call reads hidden state, so the map server and the video renderer
//! produce identical scores from identical input bytes regardless of call
//! order or threading.
//!
//! The only state on offer is [`cache::ScoreCache`], which callers own and
//! invalidate explicitly.

pub mod cache;
pub mod demand;
pub mod geo;
pub mod hash;
pub mod pipeline;
pub mod synthesize;

pub use cache::ScoreCache;
pub use demand::simulate_traffic_score;
pub use pipeline::{score_collection, score_stations};
pub use synthesize::{assign_status, normalized_capacity, synthesize_score};

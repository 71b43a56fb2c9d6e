#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Canonical record types for the charging station map.
//!
//! Every layer the map and the video renderer draw (existing stations,
//! ranked expansion sites, and community clusters) is normalized into one
//! of these value types. Records are built once from a feature collection
//! and never mutated afterwards.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Pressure classification derived from a station's composite score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StationStatus {
    /// Demand outstrips the installed capacity.
    Overloaded,
    /// Demand and capacity are roughly matched.
    Balanced,
    /// Installed capacity exceeds local demand.
    Underutilized,
}

impl StationStatus {
    /// Returns all variants of this enum, highest pressure first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Overloaded, Self::Balanced, Self::Underutilized]
    }
}

/// A scored existing charging station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    /// Source identifier (Open Charge Map `ID` when present).
    pub id: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Display title.
    pub title: String,
    /// Locality name.
    pub town: String,
    /// Resolved number of charging points.
    pub charger_count: u32,
    /// Simulated traffic pressure in `[0.15, 0.95]`.
    pub traffic_score: f64,
    /// Composite balance score in `[0, 1]`.
    pub score: f64,
    /// Status band derived under the configured banding rule.
    pub status: StationStatus,
}

/// A candidate expansion site produced by the network optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRecord {
    /// Candidate site identifier.
    pub site_id: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// 1-based selection order. `None` for unranked candidates.
    pub rank: Option<u32>,
    /// Optimizer node weight in `[0, 1]`.
    pub node_weight: f64,
    /// Demand newly covered by selecting this site.
    pub marginal_demand_gain: f64,
    /// Population proxy score, when the optimizer emitted one.
    pub population_score: Option<f64>,
    /// Running coverage ratio after this site was selected.
    pub cumulative_coverage: Option<f64>,
}

/// A node in the optimizer's community graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRecord {
    /// Site identifier.
    pub site_id: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Connected-component id. `-1` when the node was never assigned.
    pub community_id: i64,
    /// Whether this node is an existing station (vs. a candidate site).
    pub is_existing: bool,
    /// Distance to the nearest existing station in kilometers.
    pub distance_to_nearest_existing_km: Option<f64>,
    /// Optimizer node weight. Existing stations usually have none.
    pub node_weight: Option<f64>,
}

/// Per-community rollup of [`ClusterRecord`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunitySummary {
    /// Connected-component id.
    pub community_id: i64,
    /// Number of nodes in the community.
    pub node_count: u32,
    /// How many of those nodes are existing stations.
    pub existing_count: u32,
    /// Mean distance to the nearest existing station over nodes that carry
    /// one (0 when none do).
    pub avg_dist_to_existing_km: f64,
    /// Mean node weight over nodes that carry one (0 when none do).
    pub avg_node_weight: f64,
}

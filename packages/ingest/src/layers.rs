//! Layer extraction: feature collections to canonical records.

use std::collections::BTreeMap;

use chargepilot_station_models::{ClusterRecord, CommunitySummary, RecommendationRecord};
use geojson::{Feature, FeatureCollection, JsonObject};

use crate::charger::derive_charger_count;
use crate::parsing::{value_bool, value_f64, value_i64, value_id, value_rank};
use crate::properties::StationProperties;

/// Community id assigned to nodes the optimizer never placed in a component.
pub const UNASSIGNED_COMMUNITY: i64 = -1;

/// A station ready to be scored.
#[derive(Debug, Clone, PartialEq)]
pub struct StationInput {
    /// Source identifier, or the feature's position in the collection.
    pub id: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Display title (empty when unknown).
    pub title: String,
    /// Locality name (empty when unknown).
    pub town: String,
    /// Resolved charger count.
    pub charger_count: u32,
}

/// Which recommendations [`recommendations`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankMode {
    /// Only ranked entries, ordered by ascending rank.
    #[default]
    Ranked,
    /// Every entry with valid geometry, in file order.
    All,
}

/// Reads `(latitude, longitude)` from a point feature.
///
/// Coordinates are `[lng, lat]`. Anything other than a `Point` with exactly
/// two finite positions yields `None`.
#[must_use]
pub fn point_lat_lng(feature: &Feature) -> Option<(f64, f64)> {
    let geometry = feature.geometry.as_ref()?;
    let geojson::Value::Point(position) = &geometry.value else {
        return None;
    };
    let [lng, lat] = position.as_slice() else {
        return None;
    };
    (lat.is_finite() && lng.is_finite()).then_some((*lat, *lng))
}

/// Pairs each usable feature with its coordinates and property bag.
fn located<'a>(
    collection: &'a FeatureCollection,
    layer: &'static str,
) -> impl Iterator<Item = (usize, f64, f64, &'a JsonObject)> + 'a {
    static EMPTY: std::sync::LazyLock<JsonObject> = std::sync::LazyLock::new(JsonObject::new);

    collection
        .features
        .iter()
        .enumerate()
        .filter_map(move |(idx, feature)| {
            let Some((lat, lng)) = point_lat_lng(feature) else {
                log::trace!("Dropping {layer} feature {idx}: no usable point geometry");
                return None;
            };
            let props = feature.properties.as_ref().unwrap_or(&*EMPTY);
            Some((idx, lat, lng, props))
        })
}

/// Extracts stations with resolved charger counts.
#[must_use]
pub fn stations(collection: &FeatureCollection) -> Vec<StationInput> {
    let stations: Vec<StationInput> = located(collection, "station")
        .map(|(idx, latitude, longitude, props)| {
            let parsed = StationProperties::from_json(props);
            let charger_count = derive_charger_count(&parsed);
            StationInput {
                id: parsed.id.unwrap_or_else(|| idx.to_string()),
                latitude,
                longitude,
                title: parsed.title.unwrap_or_default(),
                town: parsed.town.unwrap_or_default(),
                charger_count,
            }
        })
        .collect();

    log::debug!(
        "Extracted {} stations from {} features",
        stations.len(),
        collection.features.len()
    );
    stations
}

/// Extracts optimizer recommendations.
///
/// With [`RankMode::Ranked`], entries without a rank are excluded and the
/// rest are sorted by rank (ties keep file order). [`RankMode::All`] keeps
/// unranked entries too.
#[must_use]
pub fn recommendations(collection: &FeatureCollection, mode: RankMode) -> Vec<RecommendationRecord> {
    let mut records: Vec<RecommendationRecord> = located(collection, "recommendation")
        .map(|(idx, latitude, longitude, props)| RecommendationRecord {
            site_id: value_id(props.get("site_id")).unwrap_or_else(|| idx.to_string()),
            latitude,
            longitude,
            rank: value_rank(props.get("rank")),
            node_weight: value_f64(props.get("node_weight")).unwrap_or(0.0),
            marginal_demand_gain: value_f64(props.get("marginal_demand_gain")).unwrap_or(0.0),
            population_score: value_f64(props.get("population_score")),
            cumulative_coverage: value_f64(props.get("cumulative_coverage")),
        })
        .collect();

    if mode == RankMode::Ranked {
        records.retain(|r| r.rank.is_some());
        records.sort_by_key(|r| r.rank);
    }

    records
}

/// Extracts community-cluster nodes.
#[must_use]
pub fn clusters(collection: &FeatureCollection) -> Vec<ClusterRecord> {
    located(collection, "cluster")
        .map(|(idx, latitude, longitude, props)| ClusterRecord {
            site_id: value_id(props.get("site_id")).unwrap_or_else(|| idx.to_string()),
            latitude,
            longitude,
            community_id: value_i64(props.get("community_id")).unwrap_or(UNASSIGNED_COMMUNITY),
            is_existing: value_bool(props.get("is_existing")).unwrap_or(false),
            distance_to_nearest_existing_km: value_f64(
                props.get("distance_to_nearest_existing_km"),
            ),
            node_weight: value_f64(props.get("node_weight")),
        })
        .collect()
}

/// Rolls cluster nodes up per community, ordered by community id.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize_communities(nodes: &[ClusterRecord]) -> Vec<CommunitySummary> {
    #[derive(Default)]
    struct Agg {
        node_count: u32,
        existing_count: u32,
        distances: Vec<f64>,
        weights: Vec<f64>,
    }

    fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    let mut by_community: BTreeMap<i64, Agg> = BTreeMap::new();
    for node in nodes {
        let agg = by_community.entry(node.community_id).or_default();
        agg.node_count += 1;
        if node.is_existing {
            agg.existing_count += 1;
        }
        if let Some(distance) = node.distance_to_nearest_existing_km {
            agg.distances.push(distance);
        }
        if let Some(weight) = node.node_weight {
            agg.weights.push(weight);
        }
    }

    by_community
        .into_iter()
        .map(|(community_id, agg)| CommunitySummary {
            community_id,
            node_count: agg.node_count,
            existing_count: agg.existing_count,
            avg_dist_to_existing_km: mean(&agg.distances),
            avg_node_weight: mean(&agg.weights),
        })
        .collect()
}

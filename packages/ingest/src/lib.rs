#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion boundary for the charging map's point layers.
//!
//! Parses `GeoJSON` feature collections (Open Charge Map stations, optimizer
//! recommendations, community clusters) into canonical records. The server
//! fetches these files over HTTP and the video renderer reads them from disk;
//! both hand the same bytes to [`parse_feature_collection`], which is what
//! keeps their scores identical.
//!
//! Individual features with missing or malformed geometry are dropped
//! silently. Only a document that is not a feature collection at all is an
//! error.

pub mod charger;
pub mod layers;
pub mod parsing;
pub mod properties;

use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, feature::Id};

pub use layers::{
    RankMode, StationInput, clusters, point_lat_lng, recommendations, stations,
    summarize_communities,
};

/// Errors that can occur while reading a feature collection.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is JSON but not a `FeatureCollection`.
    #[error("Not a feature collection: {0}")]
    NotACollection(String),
}

/// Parses a `GeoJSON` `FeatureCollection` document.
///
/// Each entry of `features` is converted on its own; entries that are not
/// `Feature` objects are skipped rather than failing the whole document.
/// Members are read leniently (see [`lenient_feature`]) so that a stray
/// `id` or `properties` value never hides a usable geometry.
///
/// # Errors
///
/// Returns an error if the input is not JSON, or if it lacks
/// `"type": "FeatureCollection"` and a `features` array.
pub fn parse_feature_collection(input: &str) -> Result<FeatureCollection, IngestError> {
    let value: serde_json::Value = serde_json::from_str(input)?;

    let serde_json::Value::Object(mut object) = value else {
        return Err(IngestError::NotACollection(
            "top-level value is not an object".to_string(),
        ));
    };

    match object.get("type").and_then(serde_json::Value::as_str) {
        Some("FeatureCollection") => {}
        other => {
            return Err(IngestError::NotACollection(format!(
                "unexpected type {other:?}"
            )));
        }
    }

    let Some(serde_json::Value::Array(raw_features)) = object.remove("features") else {
        return Err(IngestError::NotACollection(
            "missing features array".to_string(),
        ));
    };

    let total = raw_features.len();
    let features: Vec<Feature> = raw_features
        .into_iter()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let serde_json::Value::Object(obj) = raw else {
                log::trace!("Dropping feature {idx}: not an object");
                return None;
            };
            lenient_feature(idx, obj)
        })
        .collect();

    if features.len() < total {
        log::debug!(
            "Parsed {} of {total} features ({} malformed)",
            features.len(),
            total - features.len()
        );
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Builds a [`Feature`] member by member.
///
/// Only `"type": "Feature"` is required. A geometry that fails to parse
/// becomes `None`, a non-object `properties` becomes `None`, and an `id`
/// that is neither a string nor a number is discarded.
fn lenient_feature(idx: usize, mut obj: JsonObject) -> Option<Feature> {
    match obj.get("type").and_then(serde_json::Value::as_str) {
        Some("Feature") => {}
        other => {
            log::trace!("Dropping feature {idx}: unexpected type {other:?}");
            return None;
        }
    }

    let geometry = match obj.remove("geometry") {
        Some(serde_json::Value::Object(geometry)) => Geometry::try_from(geometry)
            .map_err(|e| log::trace!("Feature {idx} has unreadable geometry: {e}"))
            .ok(),
        _ => None,
    };

    let properties = match obj.remove("properties") {
        Some(serde_json::Value::Object(properties)) => Some(properties),
        _ => None,
    };

    let id = match obj.remove("id") {
        Some(serde_json::Value::String(s)) => Some(Id::String(s)),
        Some(serde_json::Value::Number(n)) => Some(Id::Number(n)),
        None | Some(serde_json::Value::Null) => None,
        Some(other) => {
            log::trace!("Feature {idx}: ignoring id {other}, not a string or number");
            None
        }
    };

    Some(Feature {
        bbox: None,
        geometry,
        id,
        properties,
        foreign_members: None,
    })
}

/// Reads and parses a feature collection file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a feature
/// collection.
pub fn load_feature_collection(path: &Path) -> Result<FeatureCollection, IngestError> {
    let contents = std::fs::read_to_string(path)?;
    let collection = parse_feature_collection(&contents)?;
    log::info!(
        "Loaded {} features from {}",
        collection.features.len(),
        path.display()
    );
    Ok(collection)
}

//! Station scoring pipeline.

use chargepilot_ingest::StationInput;
use chargepilot_scoring_models::ScoringConfig;
use chargepilot_station_models::{StationRecord, StationStatus};
use geojson::FeatureCollection;

use crate::demand::simulate_traffic_score;
use crate::synthesize::{assign_status, normalized_capacity, synthesize_score};

/// Scores every station against the dataset it belongs to.
///
/// Capacity is normalized by the largest charger count in `stations`, so the
/// same station can score differently in a different dataset. Output order
/// matches input order.
#[must_use]
pub fn score_stations(stations: &[StationInput], config: &ScoringConfig) -> Vec<StationRecord> {
    let max_charger_count = stations
        .iter()
        .map(|s| s.charger_count)
        .max()
        .unwrap_or(0);

    let records: Vec<StationRecord> = stations
        .iter()
        .map(|station| {
            let traffic_score =
                simulate_traffic_score(station.latitude, station.longitude, config);
            let capacity = normalized_capacity(station.charger_count, max_charger_count);
            let score =
                synthesize_score(station.latitude, station.longitude, traffic_score, capacity);
            let status = assign_status(
                &config.banding,
                score,
                traffic_score,
                station.charger_count,
            );

            StationRecord {
                id: station.id.clone(),
                latitude: station.latitude,
                longitude: station.longitude,
                title: station.title.clone(),
                town: station.town.clone(),
                charger_count: station.charger_count,
                traffic_score,
                score,
                status,
            }
        })
        .collect();

    if log::log_enabled!(log::Level::Debug) {
        for status in StationStatus::all() {
            let count = records.iter().filter(|r| r.status == *status).count();
            log::debug!("{count} stations {status}");
        }
    }

    records
}

/// Ingests and scores a station feature collection.
#[must_use]
pub fn score_collection(collection: &FeatureCollection, config: &ScoringConfig) -> Vec<StationRecord> {
    let stations = chargepilot_ingest::stations(collection);
    let records = score_stations(&stations, config);
    log::info!(
        "Scored {} stations (max {} chargers)",
        records.len(),
        records.iter().map(|r| r.charger_count).max().unwrap_or(0)
    );
    records
}

#[cfg(test)]
mod tests {
    use chargepilot_ingest::parse_feature_collection;
    use chargepilot_scoring_models::BandingRule;

    use super::*;

    fn fixture() -> FeatureCollection {
        let doc = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-97.7442, 30.2659] },
                    "properties": {
                        "ID": 1001,
                        "NumberOfPoints": 1,
                        "AddressInfo": { "Title": "Congress Ave Garage", "Town": "Austin" }
                    }
                },
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-97.9, 30.45] },
                    "properties": {
                        "ID": 1002,
                        "Connections": [{ "Quantity": 8 }, { "Quantity": 4 }],
                        "AddressInfo": { "Title": "Lakeway Park & Ride", "Town": "Lakeway" }
                    }
                },
                {
                    "type": "Feature",
                    "geometry": null,
                    "properties": { "ID": 1003, "NumberOfPoints": 50 }
                }
            ]
        });
        parse_feature_collection(&doc.to_string()).unwrap()
    }

    #[test]
    fn downtown_single_charger_is_overloaded() {
        let records = score_collection(&fixture(), &ScoringConfig::default());
        assert_eq!(records.len(), 2);

        let downtown = &records[0];
        assert_eq!(downtown.id, "1001");
        assert_eq!(downtown.charger_count, 1);
        assert!((downtown.traffic_score - 0.943_709_094_463_286_8).abs() < 1e-9);
        assert!((downtown.score - 0.230_218_343_531_466_97).abs() < 1e-9);
        assert_eq!(downtown.status, StationStatus::Overloaded);

        let lakeway = &records[1];
        assert_eq!(lakeway.charger_count, 12);
        assert!((lakeway.score - 0.778_681_623_705_548_8).abs() < 1e-9);
        assert_eq!(lakeway.status, StationStatus::Underutilized);
    }

    #[test]
    fn dropped_features_do_not_affect_capacity_normalization() {
        // The 50-charger feature has no geometry, so the max stays 12.
        let records = score_collection(&fixture(), &ScoringConfig::default());
        assert!(records.iter().all(|r| r.charger_count <= 12));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let config = ScoringConfig::default();
        let collection = fixture();
        let first = score_collection(&collection, &config);
        let second = score_collection(&collection, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn scoring_inputs_and_outputs_are_thread_safe() {
        const fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScoringConfig>();
        assert_send_sync::<StationInput>();
        assert_send_sync::<StationRecord>();
    }

    #[test]
    fn concurrent_scoring_matches_sequential_bits() {
        let config = ScoringConfig::default();
        let collection = fixture();
        let sequential = score_collection(&collection, &config);

        let results: Vec<Vec<StationRecord>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| score_collection(&collection, &config)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for records in &results {
            assert_eq!(records.len(), sequential.len());
            for (a, b) in records.iter().zip(&sequential) {
                assert_eq!(a.score.to_bits(), b.score.to_bits());
                assert_eq!(a.traffic_score.to_bits(), b.traffic_score.to_bits());
                assert_eq!(a.status, b.status);
            }
        }
    }

    #[test]
    fn ratio_rule_changes_only_status() {
        let score_config = ScoringConfig::default();
        let ratio_config = ScoringConfig {
            banding: BandingRule::ratio(),
            ..ScoringConfig::default()
        };
        let by_score = score_collection(&fixture(), &score_config);
        let by_ratio = score_collection(&fixture(), &ratio_config);

        for (a, b) in by_score.iter().zip(&by_ratio) {
            assert_eq!(a.score.to_bits(), b.score.to_bits());
            assert_eq!(a.traffic_score.to_bits(), b.traffic_score.to_bits());
        }
        // ~94% utilization on one charger sits inside the 60-150% band.
        assert_eq!(by_ratio[0].status, StationStatus::Balanced);
        // ~2.4% across twelve chargers.
        assert_eq!(by_ratio[1].status, StationStatus::Underutilized);
    }

    #[test]
    fn all_zero_chargers_normalize_to_zero_capacity() {
        let stations = [StationInput {
            id: "z".to_string(),
            latitude: 30.3,
            longitude: -97.7,
            title: String::new(),
            town: String::new(),
            charger_count: 0,
        }];
        let records = score_stations(&stations, &ScoringConfig::default());
        assert!((records[0].score - 0.236_864_697_304_997_1).abs() < 1e-9);
        assert_eq!(records[0].charger_count, 0);
    }

    #[test]
    fn empty_input_scores_nothing() {
        assert!(score_stations(&[], &ScoringConfig::default()).is_empty());
    }
}

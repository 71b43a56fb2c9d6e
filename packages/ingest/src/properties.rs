//! Typed views over station property bags.
//!
//! Station files follow the Open Charge Map POI shape:
//!
//! ```json
//! {
//!   "ID": 12345,
//!   "NumberOfPoints": 4,
//!   "Connections": [{ "Quantity": 2 }, { "Quantity": null }],
//!   "AddressInfo": { "Title": "Republic Square", "Town": "Austin" }
//! }
//! ```

use geojson::JsonObject;

use crate::parsing::{value_id, value_str, value_u32};

/// One connector group on a station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionProperties {
    /// Number of identical connectors. `None` when the source left it out.
    pub quantity: Option<u32>,
}

/// The station fields the scoring pipeline reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationProperties {
    /// Source identifier.
    pub id: Option<String>,
    /// Explicit total number of charging points. `Some(0)` is authoritative.
    pub number_of_points: Option<u32>,
    /// Per-connector breakdown, when the source provides one.
    pub connections: Option<Vec<ConnectionProperties>>,
    /// Display title from `AddressInfo.Title`.
    pub title: Option<String>,
    /// Locality from `AddressInfo.Town`.
    pub town: Option<String>,
}

impl StationProperties {
    /// Extracts station properties from a feature's property bag.
    #[must_use]
    pub fn from_json(props: &JsonObject) -> Self {
        let connections = props
            .get("Connections")
            .and_then(serde_json::Value::as_array)
            .map(|list| {
                list.iter()
                    .map(|conn| ConnectionProperties {
                        quantity: value_u32(conn.get("Quantity")),
                    })
                    .collect()
            });

        let address = props
            .get("AddressInfo")
            .and_then(serde_json::Value::as_object);

        Self {
            id: value_id(props.get("ID")),
            number_of_points: value_u32(props.get("NumberOfPoints")),
            connections,
            title: address.and_then(|a| value_str(a.get("Title"))),
            town: address.and_then(|a| value_str(a.get("Town"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn reads_open_charge_map_shape() {
        let props = object(serde_json::json!({
            "ID": 12345,
            "NumberOfPoints": 4,
            "Connections": [{ "Quantity": 2 }, { "Quantity": null }, {}],
            "AddressInfo": { "Title": "Republic Square", "Town": "Austin" }
        }));

        let parsed = StationProperties::from_json(&props);
        assert_eq!(parsed.id.as_deref(), Some("12345"));
        assert_eq!(parsed.number_of_points, Some(4));
        assert_eq!(
            parsed.connections,
            Some(vec![
                ConnectionProperties { quantity: Some(2) },
                ConnectionProperties { quantity: None },
                ConnectionProperties { quantity: None },
            ])
        );
        assert_eq!(parsed.title.as_deref(), Some("Republic Square"));
        assert_eq!(parsed.town.as_deref(), Some("Austin"));
    }

    #[test]
    fn missing_fields_are_none() {
        let parsed = StationProperties::from_json(&JsonObject::new());
        assert_eq!(parsed, StationProperties::default());
    }

    #[test]
    fn null_connections_are_none() {
        let props = object(serde_json::json!({ "NumberOfPoints": null, "Connections": null }));
        let parsed = StationProperties::from_json(&props);
        assert_eq!(parsed.number_of_points, None);
        assert_eq!(parsed.connections, None);
    }
}

//! Charger-count resolution.

use crate::properties::StationProperties;

/// Resolves how many charging points a station has.
///
/// 1. An explicit `NumberOfPoints` wins, including an explicit `0`.
/// 2. Otherwise the connector quantities are summed, counting a connector
///    with no quantity as 1. A list that sums to zero resolves to 1.
/// 3. Otherwise the station counts as a single charger.
#[must_use]
pub fn derive_charger_count(props: &StationProperties) -> u32 {
    if let Some(count) = props.number_of_points {
        return count;
    }

    props.connections.as_ref().map_or(1, |connections| {
        connections
            .iter()
            .map(|c| c.quantity.unwrap_or(1))
            .fold(0_u32, u32::saturating_add)
            .max(1)
    })
}

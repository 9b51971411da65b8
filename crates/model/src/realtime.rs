//! Normalized view of the realtime feed families. These are the types the
//! merger stores and handlers read; they are decoupled from the wire-level
//! protobuf messages.

use serde::{Deserialize, Serialize};

use crate::IdString;

/// A live deviation report for one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripUpdate {
    pub trip_id: IdString,
    pub route_id: Option<IdString>,
    pub vehicle_id: Option<IdString>,

    /// Feed-supplied moment this update was generated, epoch seconds.
    pub timestamp: Option<u64>,

    /// Overall delay in seconds; positive is late.
    pub delay: Option<i64>,

    pub stop_time_updates: Vec<StopTimeUpdate>,
}

/// Predicted arrival/departure adjustment for one stop of a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTimeUpdate {
    pub stop_sequence: Option<i64>,
    pub stop_id: Option<IdString>,
    pub arrival: Option<StopTimeEvent>,
    pub departure: Option<StopTimeEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTimeEvent {
    /// Delay in seconds relative to the schedule.
    pub delay: Option<i64>,
    /// Absolute predicted time, epoch seconds.
    pub time: Option<i64>,
    pub uncertainty: Option<i64>,
}

/// A live vehicle position report. Vehicles without a non-empty id are
/// filtered at ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: IdString,
    pub trip_id: Option<IdString>,
    pub route_id: Option<IdString>,

    /// Feed-supplied moment of the position fix, epoch seconds.
    pub timestamp: Option<u64>,

    pub position: Option<VehiclePosition>,
    pub current_stop_sequence: Option<i64>,
    pub stop_id: Option<IdString>,
    pub current_status: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Geographic degrees clockwise from north.
    pub bearing: Option<f64>,
    pub odometer: Option<f64>,
    pub speed: Option<f64>,
}

/// A service alert with the entities it informs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: IdString,
    pub cause: Option<i64>,
    pub effect: Option<i64>,
    pub url: Option<String>,
    pub header_text: Option<String>,
    pub description_text: Option<String>,
    pub active_windows: Vec<TimeRange>,
    pub informed_entities: Vec<InformedEntity>,
}

impl Alert {
    /// Whether any informed entity matches the given identifiers. Empty
    /// selectors never match.
    pub fn informs(
        &self,
        trip_id: Option<&str>,
        route_id: Option<&str>,
        agency_id: Option<&str>,
        stop_id: Option<&str>,
    ) -> bool {
        self.informed_entities.iter().any(|entity| {
            matches_selector(entity.trip_id.as_deref(), trip_id)
                || matches_selector(entity.route_id.as_deref(), route_id)
                || matches_selector(entity.agency_id.as_deref(), agency_id)
                || matches_selector(entity.stop_id.as_deref(), stop_id)
        })
    }
}

fn matches_selector(selector: Option<&str>, wanted: Option<&str>) -> bool {
    match (selector, wanted) {
        (Some(selector), Some(wanted)) => {
            !selector.is_empty() && selector == wanted
        }
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InformedEntity {
    pub agency_id: Option<IdString>,
    pub route_id: Option<IdString>,
    pub trip_id: Option<IdString>,
    pub stop_id: Option<IdString>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert_for_route(route_id: &str) -> Alert {
        Alert {
            id: "a1".to_owned(),
            cause: None,
            effect: None,
            url: None,
            header_text: None,
            description_text: None,
            active_windows: vec![],
            informed_entities: vec![InformedEntity {
                agency_id: None,
                route_id: Some(route_id.to_owned()),
                trip_id: None,
                stop_id: None,
            }],
        }
    }

    #[test]
    fn informs_matches_on_route() {
        let alert = alert_for_route("12");
        assert!(alert.informs(None, Some("12"), None, None));
        assert!(!alert.informs(None, Some("13"), None, None));
        assert!(!alert.informs(Some("12"), None, None, None));
    }

    #[test]
    fn empty_selectors_never_match() {
        let alert = alert_for_route("");
        assert!(!alert.informs(None, Some(""), None, None));
    }
}

//! Decoding and normalization of realtime payloads. The wire messages are
//! turned into the flat model types the merger stores; entities the core
//! cannot key (trip updates without a trip id, vehicles without a vehicle
//! id) are filtered here.

use std::{collections::HashMap, error::Error, fmt};

use prost::Message;
use tokio_util::sync::CancellationToken;

use model::realtime::{
    Alert, InformedEntity, StopTimeEvent, StopTimeUpdate, TimeRange, TripUpdate,
    Vehicle, VehiclePosition,
};

use crate::{
    fetch::{self, FetchError, REALTIME_BODY_LIMIT},
    transit_realtime,
};

#[derive(Debug)]
pub enum RealtimeError {
    Fetch(FetchError),
    /// The payload is not a parsable feed message.
    InvalidFeed(prost::DecodeError),
}

impl fmt::Display for RealtimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(why) => write!(f, "realtime fetch failed: {}", why),
            Self::InvalidFeed(why) => write!(f, "undecodable feed: {}", why),
        }
    }
}

impl Error for RealtimeError {}

impl From<FetchError> for RealtimeError {
    fn from(why: FetchError) -> Self {
        Self::Fetch(why)
    }
}

/// One decoded payload, already normalized.
#[derive(Debug, Clone, Default)]
pub struct RealtimePayload {
    pub trip_updates: Vec<TripUpdate>,
    pub vehicles: Vec<Vehicle>,
    pub alerts: Vec<Alert>,
}

/// Fetches one feed URL and normalizes whatever entity families it carries.
pub async fn fetch_payload(
    url: &str,
    headers: &HashMap<String, String>,
    cancel: &CancellationToken,
) -> Result<RealtimePayload, RealtimeError> {
    let bytes = fetch::fetch_bytes(
        fetch::realtime_client(),
        url,
        headers,
        REALTIME_BODY_LIMIT,
        cancel,
    )
    .await?;
    decode_payload(&bytes)
}

pub fn decode_payload(bytes: &[u8]) -> Result<RealtimePayload, RealtimeError> {
    let message = transit_realtime::FeedMessage::decode(bytes)
        .map_err(RealtimeError::InvalidFeed)?;
    Ok(normalize(message))
}

/// Flattens a feed message. Deleted entities are dropped, as are entities
/// the lookup maps could never address.
pub fn normalize(message: transit_realtime::FeedMessage) -> RealtimePayload {
    let mut payload = RealtimePayload::default();

    for entity in message.entity {
        if entity.is_deleted() {
            continue;
        }
        if let Some(trip_update) = entity.trip_update {
            if let Some(update) = normalize_trip_update(trip_update) {
                payload.trip_updates.push(update);
            }
        }
        if let Some(vehicle) = entity.vehicle {
            if let Some(vehicle) = normalize_vehicle(vehicle) {
                payload.vehicles.push(vehicle);
            }
        }
        if let Some(alert) = entity.alert {
            payload.alerts.push(normalize_alert(entity.id, alert));
        }
    }

    payload
}

fn normalize_trip_update(
    update: transit_realtime::TripUpdate,
) -> Option<TripUpdate> {
    // Updates are keyed by trip id; nothing to merge without one.
    let trip_id = update.trip.trip_id.clone().filter(|id| !id.is_empty())?;

    let stop_time_updates = update
        .stop_time_update
        .into_iter()
        .map(|stop| StopTimeUpdate {
            stop_sequence: stop.stop_sequence.map(i64::from),
            stop_id: stop.stop_id,
            arrival: stop.arrival.map(normalize_stop_time_event),
            departure: stop.departure.map(normalize_stop_time_event),
        })
        .collect();

    Some(TripUpdate {
        trip_id,
        route_id: update.trip.route_id,
        vehicle_id: update.vehicle.and_then(|vehicle| vehicle.id),
        timestamp: update.timestamp,
        delay: update.delay.map(i64::from),
        stop_time_updates,
    })
}

fn normalize_stop_time_event(
    event: transit_realtime::trip_update::StopTimeEvent,
) -> StopTimeEvent {
    StopTimeEvent {
        delay: event.delay.map(i64::from),
        time: event.time,
        uncertainty: event.uncertainty.map(i64::from),
    }
}

fn normalize_vehicle(position: transit_realtime::VehiclePosition) -> Option<Vehicle> {
    // Vehicles without an id cannot be tracked across polls; drop them.
    let id = position
        .vehicle
        .as_ref()
        .and_then(|descriptor| descriptor.id.clone())
        .filter(|id| !id.is_empty())?;

    Some(Vehicle {
        id,
        trip_id: position
            .trip
            .as_ref()
            .and_then(|trip| trip.trip_id.clone())
            .filter(|id| !id.is_empty()),
        route_id: position
            .trip
            .as_ref()
            .and_then(|trip| trip.route_id.clone())
            .filter(|id| !id.is_empty()),
        timestamp: position.timestamp,
        position: position.position.map(|point| VehiclePosition {
            latitude: point.latitude as f64,
            longitude: point.longitude as f64,
            bearing: point.bearing.map(f64::from),
            odometer: point.odometer,
            speed: point.speed.map(f64::from),
        }),
        current_stop_sequence: position.current_stop_sequence.map(i64::from),
        stop_id: position.stop_id,
        current_status: position.current_status.map(i64::from),
    })
}

/// The first translation wins; the core serves a single language.
fn first_translation(
    translated: Option<transit_realtime::TranslatedString>,
) -> Option<String> {
    translated?
        .translation
        .into_iter()
        .next()
        .map(|translation| translation.text)
}

fn normalize_alert(id: String, alert: transit_realtime::Alert) -> Alert {
    Alert {
        id,
        cause: alert.cause.map(i64::from),
        effect: alert.effect.map(i64::from),
        url: first_translation(alert.url),
        header_text: first_translation(alert.header_text),
        description_text: first_translation(alert.description_text),
        active_windows: alert
            .active_period
            .into_iter()
            .map(|period| TimeRange {
                start: period.start,
                end: period.end,
            })
            .collect(),
        informed_entities: alert
            .informed_entity
            .into_iter()
            .map(|selector| InformedEntity {
                agency_id: selector.agency_id,
                route_id: selector.route_id,
                trip_id: selector.trip.and_then(|trip| trip.trip_id),
                stop_id: selector.stop_id,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_payload, normalize, RealtimeError};
    use crate::transit_realtime::{self, *};
    use prost::Message;

    fn feed_with(entities: Vec<FeedEntity>) -> FeedMessage {
        FeedMessage {
            header: FeedHeader {
                gtfs_realtime_version: "2.0".to_owned(),
                incrementality: None,
                timestamp: Some(1_700_000_000),
            },
            entity: entities,
        }
    }

    fn vehicle_entity(entity_id: &str, vehicle_id: Option<&str>) -> FeedEntity {
        FeedEntity {
            id: entity_id.to_owned(),
            is_deleted: None,
            trip_update: None,
            vehicle: Some(transit_realtime::VehiclePosition {
                trip: Some(TripDescriptor {
                    trip_id: Some("t1".to_owned()),
                    route_id: Some("r1".to_owned()),
                    direction_id: None,
                    start_time: None,
                    start_date: None,
                    schedule_relationship: None,
                }),
                vehicle: vehicle_id.map(|id| VehicleDescriptor {
                    id: Some(id.to_owned()),
                    label: None,
                    license_plate: None,
                }),
                position: Some(Position {
                    latitude: 40.5,
                    longitude: -122.3,
                    bearing: Some(90.0),
                    odometer: None,
                    speed: None,
                }),
                current_stop_sequence: Some(3),
                stop_id: Some("s1".to_owned()),
                current_status: Some(2),
                timestamp: Some(1_700_000_100),
            }),
            alert: None,
        }
    }

    #[test]
    fn decode_round_trips_an_encoded_feed() {
        let message = feed_with(vec![vehicle_entity("e1", Some("bus-7"))]);
        let bytes = message.encode_to_vec();
        let payload = decode_payload(&bytes).unwrap();
        assert_eq!(payload.vehicles.len(), 1);
        assert_eq!(payload.vehicles[0].id, "bus-7");
        assert_eq!(payload.vehicles[0].trip_id.as_deref(), Some("t1"));
    }

    #[test]
    fn vehicles_without_an_id_are_filtered() {
        let message = feed_with(vec![
            vehicle_entity("e1", None),
            vehicle_entity("e2", Some("")),
            vehicle_entity("e3", Some("kept")),
        ]);
        let payload = normalize(message);
        assert_eq!(payload.vehicles.len(), 1);
        assert_eq!(payload.vehicles[0].id, "kept");
    }

    #[test]
    fn trip_updates_without_a_trip_id_are_filtered() {
        let mut entity = FeedEntity {
            id: "e1".to_owned(),
            is_deleted: None,
            trip_update: Some(TripUpdate {
                trip: TripDescriptor {
                    trip_id: None,
                    route_id: Some("r1".to_owned()),
                    direction_id: None,
                    start_time: None,
                    start_date: None,
                    schedule_relationship: None,
                },
                vehicle: None,
                stop_time_update: vec![],
                timestamp: None,
                delay: Some(120),
            }),
            vehicle: None,
            alert: None,
        };
        assert!(normalize(feed_with(vec![entity.clone()]))
            .trip_updates
            .is_empty());

        entity.trip_update.as_mut().unwrap().trip.trip_id = Some("t9".to_owned());
        let payload = normalize(feed_with(vec![entity]));
        assert_eq!(payload.trip_updates.len(), 1);
        assert_eq!(payload.trip_updates[0].trip_id, "t9");
        assert_eq!(payload.trip_updates[0].delay, Some(120));
    }

    #[test]
    fn alerts_keep_the_entity_id_and_selectors() {
        let entity = FeedEntity {
            id: "alert-1".to_owned(),
            is_deleted: None,
            trip_update: None,
            vehicle: None,
            alert: Some(Alert {
                active_period: vec![TimeRange {
                    start: Some(10),
                    end: Some(20),
                }],
                informed_entity: vec![EntitySelector {
                    agency_id: Some("25".to_owned()),
                    route_id: None,
                    route_type: None,
                    trip: None,
                    stop_id: None,
                    direction_id: None,
                }],
                cause: Some(8),
                effect: Some(4),
                url: None,
                header_text: Some(TranslatedString {
                    translation: vec![translated_string::Translation {
                        text: "Snow detour".to_owned(),
                        language: Some("en".to_owned()),
                    }],
                }),
                description_text: None,
            }),
        };
        let payload = normalize(feed_with(vec![entity]));
        assert_eq!(payload.alerts.len(), 1);
        let alert = &payload.alerts[0];
        assert_eq!(alert.id, "alert-1");
        assert_eq!(alert.header_text.as_deref(), Some("Snow detour"));
        assert_eq!(
            alert.informed_entities[0].agency_id.as_deref(),
            Some("25")
        );
    }

    #[test]
    fn deleted_entities_are_dropped() {
        let mut entity = vehicle_entity("e1", Some("gone"));
        entity.is_deleted = Some(true);
        assert!(normalize(feed_with(vec![entity])).vehicles.is_empty());
    }

    #[test]
    fn garbage_bytes_are_an_invalid_feed() {
        assert!(matches!(
            decode_payload(&[0xff, 0xff, 0xff]),
            Err(RealtimeError::InvalidFeed(_))
        ));
    }
}

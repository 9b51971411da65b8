//! Per-feed realtime shards and the merged read view (C5 of the core).
//!
//! Each configured feed owns a shard of trip updates, vehicles, and alerts
//! so one misbehaving feed can never disturb another's data. The merged
//! view plus its three lookup maps are rebuilt from scratch at the end of
//! every update; readers under the lock see either the previous or the next
//! view, never a mix.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use model::realtime::{Alert, TripUpdate, Vehicle};

/// How long a vehicle that vanished from its upstream feed keeps being
/// reported, to ride out transient feed gaps.
pub const STALE_VEHICLE_WINDOW_SECONDS: i64 = 15 * 60;

/// One poll's worth of normalized payloads for a feed. A `None` family
/// means that URL failed this tick and its shard must be left untouched;
/// `Some(vec![])` is a genuine empty result and replaces the shard.
#[derive(Debug, Clone, Default)]
pub struct FeedUpdate {
    pub trip_updates: Option<Vec<TripUpdate>>,
    pub vehicles: Option<Vec<Vehicle>>,
    pub alerts: Option<Vec<Alert>>,
}

#[derive(Debug, Default)]
pub struct RealtimeCache {
    // Per-feed shards. IndexMap keeps feed iteration order stable (first
    // registration wins a position for good), which keeps the merged view's
    // relative feed ordering deterministic.
    feed_trips: IndexMap<String, Vec<TripUpdate>>,
    feed_vehicles: IndexMap<String, Vec<Vehicle>>,
    feed_alerts: IndexMap<String, Vec<Alert>>,
    feed_vehicle_last_seen: IndexMap<String, HashMap<String, DateTime<Utc>>>,

    // Merged view, rebuilt wholesale after each feed update.
    trips: Vec<TripUpdate>,
    vehicles: Vec<Vehicle>,
    alerts: Vec<Alert>,
    trip_index_by_trip_id: HashMap<String, usize>,
    vehicle_index_by_trip_id: HashMap<String, usize>,
    vehicle_index_by_vehicle_id: HashMap<String, usize>,
}

impl RealtimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one feed's poll results. Callers hold the realtime write
    /// lock; everything below is plain single-threaded mutation.
    pub fn apply_feed_update(
        &mut self,
        feed_id: &str,
        update: FeedUpdate,
        now: DateTime<Utc>,
    ) {
        if let Some(vehicles) = update.vehicles {
            self.apply_vehicles(feed_id, vehicles, now);
        }
        if let Some(trip_updates) = update.trip_updates {
            self.feed_trips.insert(feed_id.to_owned(), trip_updates);
        }
        if let Some(alerts) = update.alerts {
            self.feed_alerts.insert(feed_id.to_owned(), alerts);
        }
        self.rebuild_merged_view();
    }

    /// Replaces a feed's vehicle shard, carrying forward recently-seen
    /// vehicles missing from the new payload and evicting ones beyond the
    /// grace window.
    fn apply_vehicles(
        &mut self,
        feed_id: &str,
        vehicles: Vec<Vehicle>,
        now: DateTime<Utc>,
    ) {
        let cutoff = now - Duration::seconds(STALE_VEHICLE_WINDOW_SECONDS);
        let previous = self
            .feed_vehicles
            .insert(feed_id.to_owned(), Vec::new())
            .unwrap_or_default();
        let last_seen = self
            .feed_vehicle_last_seen
            .entry(feed_id.to_owned())
            .or_default();

        let mut shard: Vec<Vehicle> =
            vehicles.into_iter().filter(|v| !v.id.is_empty()).collect();
        for vehicle in &shard {
            last_seen.insert(vehicle.id.clone(), now);
        }

        for vehicle in previous {
            if shard.iter().any(|current| current.id == vehicle.id) {
                continue;
            }
            match last_seen.get(&vehicle.id) {
                Some(seen) if *seen >= cutoff => shard.push(vehicle),
                _ => {
                    last_seen.remove(&vehicle.id);
                }
            }
        }

        self.feed_vehicles.insert(feed_id.to_owned(), shard);
    }

    /// Concatenates all feed shards in feed order and rebuilds the three
    /// lookup maps from scratch. Never mutates the previous maps in place.
    fn rebuild_merged_view(&mut self) {
        let mut trips = Vec::new();
        let mut vehicles = Vec::new();
        let mut alerts = Vec::new();
        for shard in self.feed_trips.values() {
            trips.extend(shard.iter().cloned());
        }
        for shard in self.feed_vehicles.values() {
            vehicles.extend(shard.iter().cloned());
        }
        for shard in self.feed_alerts.values() {
            alerts.extend(shard.iter().cloned());
        }

        let mut trip_index_by_trip_id = HashMap::with_capacity(trips.len());
        for (index, trip) in trips.iter().enumerate() {
            trip_index_by_trip_id.insert(trip.trip_id.clone(), index);
        }
        let mut vehicle_index_by_vehicle_id =
            HashMap::with_capacity(vehicles.len());
        let mut vehicle_index_by_trip_id = HashMap::with_capacity(vehicles.len());
        for (index, vehicle) in vehicles.iter().enumerate() {
            vehicle_index_by_vehicle_id.insert(vehicle.id.clone(), index);
            if let Some(trip_id) = &vehicle.trip_id {
                if !trip_id.is_empty() {
                    vehicle_index_by_trip_id.insert(trip_id.clone(), index);
                }
            }
        }

        self.trips = trips;
        self.vehicles = vehicles;
        self.alerts = alerts;
        self.trip_index_by_trip_id = trip_index_by_trip_id;
        self.vehicle_index_by_trip_id = vehicle_index_by_trip_id;
        self.vehicle_index_by_vehicle_id = vehicle_index_by_vehicle_id;
    }

    pub fn trips(&self) -> &[TripUpdate] {
        &self.trips
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn trip_update_by_id(&self, trip_id: &str) -> Option<&TripUpdate> {
        self.trip_index_by_trip_id
            .get(trip_id)
            .map(|index| &self.trips[*index])
    }

    /// All merged updates for the trip, across feeds.
    pub fn trip_updates_for_trip(&self, trip_id: &str) -> Vec<&TripUpdate> {
        self.trips
            .iter()
            .filter(|update| update.trip_id == trip_id)
            .collect()
    }

    pub fn vehicle_by_id(&self, vehicle_id: &str) -> Option<&Vehicle> {
        self.vehicle_index_by_vehicle_id
            .get(vehicle_id)
            .map(|index| &self.vehicles[*index])
    }

    pub fn vehicle_for_trip(&self, trip_id: &str) -> Option<&Vehicle> {
        self.vehicle_index_by_trip_id
            .get(trip_id)
            .map(|index| &self.vehicles[*index])
    }

    /// The most recent moment the vehicle was present in any feed.
    pub fn vehicle_last_seen(&self, vehicle_id: &str) -> Option<DateTime<Utc>> {
        self.feed_vehicle_last_seen
            .values()
            .filter_map(|per_feed| per_feed.get(vehicle_id))
            .max()
            .copied()
    }

    pub fn vehicle_count_for_feed(&self, feed_id: &str) -> usize {
        self.feed_vehicles
            .get(feed_id)
            .map(Vec::len)
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn wind_back_last_seen(&mut self, feed_id: &str, by: Duration) {
        if let Some(per_feed) = self.feed_vehicle_last_seen.get_mut(feed_id) {
            for seen in per_feed.values_mut() {
                *seen -= by;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(id: &str, trip_id: Option<&str>) -> Vehicle {
        Vehicle {
            id: id.to_owned(),
            trip_id: trip_id.map(str::to_owned),
            route_id: None,
            timestamp: Some(1_700_000_000),
            position: None,
            current_stop_sequence: None,
            stop_id: None,
            current_status: None,
        }
    }

    fn trip_update(trip_id: &str) -> TripUpdate {
        TripUpdate {
            trip_id: trip_id.to_owned(),
            route_id: None,
            vehicle_id: None,
            timestamp: None,
            delay: Some(60),
            stop_time_updates: vec![],
        }
    }

    fn vehicles_update(vehicles: Vec<Vehicle>) -> FeedUpdate {
        FeedUpdate {
            trip_updates: Some(vec![]),
            vehicles: Some(vehicles),
            alerts: Some(vec![]),
        }
    }

    #[test]
    fn merged_view_spans_all_feeds_with_consistent_lookup_maps() {
        let mut cache = RealtimeCache::new();
        let now = Utc::now();
        cache.apply_feed_update(
            "raba",
            vehicles_update(vec![
                vehicle("r1", Some("trip-a")),
                vehicle("r2", None),
            ]),
            now,
        );
        cache.apply_feed_update(
            "unitrans",
            vehicles_update(vec![vehicle("u1", Some("trip-b"))]),
            now,
        );

        assert_eq!(
            cache.vehicles().len(),
            cache.vehicle_count_for_feed("raba")
                + cache.vehicle_count_for_feed("unitrans")
        );

        // Every merged vehicle is reachable through both maps at its own
        // index.
        for (index, vehicle) in cache.vehicles().iter().enumerate() {
            assert_eq!(
                cache.vehicle_by_id(&vehicle.id).unwrap().id,
                cache.vehicles()[index].id
            );
            if let Some(trip_id) = &vehicle.trip_id {
                assert_eq!(cache.vehicle_for_trip(trip_id).unwrap().id, vehicle.id);
            }
        }
    }

    #[test]
    fn feed_order_in_the_merged_view_is_stable_across_updates() {
        let mut cache = RealtimeCache::new();
        let now = Utc::now();
        cache.apply_feed_update("a", vehicles_update(vec![vehicle("a1", None)]), now);
        cache.apply_feed_update("b", vehicles_update(vec![vehicle("b1", None)]), now);
        // Updating feed "a" again must not move it behind "b".
        cache.apply_feed_update("a", vehicles_update(vec![vehicle("a2", None)]), now);

        let order: Vec<&str> = cache
            .vehicles()
            .iter()
            .map(|vehicle| vehicle.id.as_str())
            .collect();
        assert_eq!(order, vec!["a2", "b1"]);
    }

    #[test]
    fn vehicles_within_grace_window_are_carried_forward() {
        let mut cache = RealtimeCache::new();
        let t0 = Utc::now();
        cache.apply_feed_update(
            "s",
            vehicles_update(vec![vehicle("v1", Some("t1"))]),
            t0,
        );

        // Five minutes later the feed comes back empty: retained.
        let t1 = t0 + Duration::minutes(5);
        cache.apply_feed_update("s", vehicles_update(vec![]), t1);
        assert_eq!(cache.vehicles().len(), 1);
        assert!(cache.vehicle_by_id("v1").is_some());

        // Beyond the window: evicted from the shard and the last-seen map.
        let t2 = t0 + Duration::minutes(16);
        cache.apply_feed_update("s", vehicles_update(vec![]), t2);
        assert!(cache.vehicles().is_empty());
        assert!(cache.vehicle_last_seen("v1").is_none());
    }

    #[test]
    fn wound_back_last_seen_expires_vehicles() {
        let mut cache = RealtimeCache::new();
        let now = Utc::now();
        cache.apply_feed_update(
            "s",
            vehicles_update(vec![vehicle("v1", None)]),
            now,
        );

        cache.wind_back_last_seen("s", Duration::minutes(20));
        cache.apply_feed_update("s", vehicles_update(vec![]), now);
        assert!(cache.vehicles().is_empty());
    }

    #[test]
    fn failed_families_leave_their_shard_untouched() {
        let mut cache = RealtimeCache::new();
        let now = Utc::now();
        cache.apply_feed_update(
            "s",
            FeedUpdate {
                trip_updates: Some(vec![trip_update("t1")]),
                vehicles: Some(vec![vehicle("v1", None)]),
                alerts: Some(vec![]),
            },
            now,
        );

        // This tick the trip-updates URL failed; vehicles refreshed.
        cache.apply_feed_update(
            "s",
            FeedUpdate {
                trip_updates: None,
                vehicles: Some(vec![vehicle("v2", None)]),
                alerts: Some(vec![]),
            },
            now,
        );

        assert!(cache.trip_update_by_id("t1").is_some());
        assert!(cache.vehicle_by_id("v2").is_some());
    }

    #[test]
    fn trip_updates_replace_wholesale_and_index_by_trip_id() {
        let mut cache = RealtimeCache::new();
        let now = Utc::now();
        cache.apply_feed_update(
            "s",
            FeedUpdate {
                trip_updates: Some(vec![trip_update("t1"), trip_update("t2")]),
                vehicles: Some(vec![]),
                alerts: Some(vec![]),
            },
            now,
        );
        cache.apply_feed_update(
            "s",
            FeedUpdate {
                trip_updates: Some(vec![trip_update("t3")]),
                vehicles: Some(vec![]),
                alerts: Some(vec![]),
            },
            now,
        );

        assert!(cache.trip_update_by_id("t1").is_none());
        assert_eq!(cache.trips().len(), 1);
        assert_eq!(cache.trip_updates_for_trip("t3").len(), 1);
    }
}

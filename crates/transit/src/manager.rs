//! The manager façade (C7): single owner of the store, the derived static
//! caches, and the realtime merger, behind the two reader-writer locks.
//!
//! Lock discipline: `static_state` guards everything derived from the
//! static bundle and is held for write only during the hot swap's brief
//! pointer exchange; `realtime` guards the merger. A caller needing both
//! acquires static first, then realtime. The separate `update_lock`
//! serializes whole swap attempts without blocking readers.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex as StdMutex,
    },
};

use chrono::{DateTime, NaiveDate, Utc};
use database::{queries, SqliteStore};
use model::{
    agency::Agency,
    block::BlockTripEntry,
    direction::CompassDirection,
    realtime::{Alert, TripUpdate, Vehicle},
    region::RegionBounds,
    route::Route,
    stop::Stop,
    trip::Trip,
};
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;
use utility::geo;

use crate::{
    config::Config,
    error::{CoreError, Result},
    poller,
    realtime_cache::{FeedUpdate, RealtimeCache},
    swap,
};

/// Daily cadence of the static refresh for remote bundle sources.
const STATIC_REFRESH_PERIOD: std::time::Duration =
    std::time::Duration::from_secs(24 * 60 * 60);

/// Everything a reader sees as one self-consistent static snapshot. The
/// spatial index lives inside the store (its R*Tree), so swapping the
/// store swaps it too.
pub struct StaticState {
    pub(crate) store: Option<SqliteStore>,
    pub(crate) agencies_by_id: HashMap<String, Agency>,
    pub(crate) routes_by_id: HashMap<String, Route>,
    pub(crate) routes_by_agency_id: HashMap<String, Vec<String>>,
    pub(crate) layover_index: HashMap<(String, String), Vec<BlockTripEntry>>,
    pub(crate) region_bounds: RegionBounds,
    pub(crate) directions: HashMap<String, CompassDirection>,
    pub(crate) last_updated: Option<DateTime<Utc>>,
}

impl StaticState {
    pub(crate) fn empty() -> Self {
        Self {
            store: None,
            agencies_by_id: HashMap::new(),
            routes_by_id: HashMap::new(),
            routes_by_agency_id: HashMap::new(),
            layover_index: HashMap::new(),
            region_bounds: RegionBounds::default(),
            directions: HashMap::new(),
            last_updated: None,
        }
    }
}

/// An explicit search box in degrees.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

/// Parameters of a stop search around a point. With `use_bounds` set the
/// search box is taken verbatim from `bounds` (or, absent one, centered on
/// the point using the spans); otherwise it derives from the radius and
/// results are refined by exact distance.
#[derive(Debug, Clone)]
pub struct StopsForLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    pub latitude_span: Option<f64>,
    pub longitude_span: Option<f64>,
    /// Case-insensitive filter against stop names and codes.
    pub query: Option<String>,
    /// Zero means unbounded.
    pub max_count: usize,
    pub use_bounds: bool,
    pub bounds: Option<BoundingBox>,
    /// Moment the request was issued; the box resolution does not depend on
    /// it, but handlers thread it through when assembling schedule-aware
    /// responses.
    pub now: DateTime<Utc>,
}

pub struct TransitManager {
    pub(crate) config: Config,
    pub(crate) static_state: RwLock<StaticState>,
    pub(crate) realtime: RwLock<RealtimeCache>,
    pub(crate) update_lock: Mutex<()>,
    healthy: AtomicBool,
    shutdown: CancellationToken,
    tasks: StdMutex<Vec<JoinHandle<()>>>,
}

impl TransitManager {
    /// Validates the configuration, performs the initial static load,
    /// builds the derived snapshot, and spawns the background loops.
    pub async fn start(config: Config) -> Result<Arc<Self>> {
        config.validate()?;
        if config.verbose {
            log::info!(
                "starting with bundle source {} and {} configured feeds",
                config.gtfs_url,
                config.rt_feeds.len()
            );
        }
        let shutdown = CancellationToken::new();

        let store = SqliteStore::open(config.resolved_store_location()).await?;
        if let Some(prepared) =
            crate::loader::acquire_and_parse(&config, Some(&store), &shutdown)
                .await?
        {
            crate::loader::import_prepared(
                &store,
                &prepared,
                &config.gtfs_url,
                &shutdown,
            )
            .await?;
        }
        let state = swap::build_static_state(store).await?;

        let manager = Arc::new(Self {
            config,
            static_state: RwLock::new(state),
            realtime: RwLock::new(RealtimeCache::new()),
            update_lock: Mutex::new(()),
            healthy: AtomicBool::new(true),
            shutdown,
            tasks: StdMutex::new(Vec::new()),
        });
        manager.spawn_background_tasks();
        Ok(manager)
    }

    fn spawn_background_tasks(self: &Arc<Self>) {
        let mut tasks = self.tasks.lock().expect("task registry poisoned");
        for feed in self.config.active_feeds() {
            tasks.push(poller::spawn_feed_poller(Arc::clone(self), feed.clone()));
        }
        if gtfs::fetch::is_remote_source(&self.config.gtfs_url) {
            tasks.push(self.spawn_static_refresh());
        }
    }

    fn spawn_static_refresh(self: &Arc<Self>) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            // The initial load already happened; wait a full period first.
            let start = tokio::time::Instant::now() + STATIC_REFRESH_PERIOD;
            let mut ticker = tokio::time::interval_at(start, STATIC_REFRESH_PERIOD);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = manager.shutdown.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                match swap::perform_update(&manager, &manager.shutdown).await {
                    Ok(()) => {}
                    Err(CoreError::Cancelled) => break,
                    Err(why) => {
                        log::error!("scheduled static refresh failed: {}", why)
                    }
                }
            }
            log::debug!("static refresh loop stopped");
        })
    }

    pub(crate) fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Cancels every background loop, waits for them, and closes the store.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let tasks: Vec<JoinHandle<()>> = {
            let mut tasks = self.tasks.lock().expect("task registry poisoned");
            tasks.drain(..).collect()
        };
        for task in tasks {
            if let Err(why) = task.await {
                log::warn!("background task ended abnormally: {}", why);
            }
        }
        let state = self.static_state.read().await;
        if let Some(store) = &state.store {
            store.close().await;
        }
    }

    // --- health -----------------------------------------------------------

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Acquire)
    }

    pub fn mark_healthy(&self) {
        self.healthy.store(true, Ordering::Release);
    }

    pub fn mark_unhealthy(&self) {
        self.healthy.store(false, Ordering::Release);
    }

    /// Runs the hot-swap protocol now instead of waiting for the ticker.
    pub async fn force_update(&self, cancel: &CancellationToken) -> Result<()> {
        swap::perform_update(self, cancel).await
    }

    // --- static reads -----------------------------------------------------

    pub async fn get_agencies(&self) -> Vec<Agency> {
        let state = self.static_state.read().await;
        let mut agencies: Vec<Agency> =
            state.agencies_by_id.values().cloned().collect();
        agencies.sort_by(|a, b| a.id.cmp(&b.id));
        agencies
    }

    pub async fn find_agency(&self, id: &str) -> Option<Agency> {
        self.static_state
            .read()
            .await
            .agencies_by_id
            .get(id)
            .cloned()
    }

    pub async fn find_route(&self, id: &str) -> Option<Route> {
        self.static_state.read().await.routes_by_id.get(id).cloned()
    }

    pub async fn routes_for_agency_id(&self, agency_id: &str) -> Vec<Route> {
        let state = self.static_state.read().await;
        state
            .routes_by_agency_id
            .get(agency_id)
            .map(|route_ids| {
                route_ids
                    .iter()
                    .filter_map(|route_id| state.routes_by_id.get(route_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Stops around a point, served from the store's spatial index and
    /// refined by exact distance when searching by radius.
    pub async fn get_stops_for_location(
        &self,
        request: StopsForLocationRequest,
    ) -> Result<Vec<Stop>> {
        let state = self.static_state.read().await;
        let store = required_store(&state)?;

        let explicit_box = if request.use_bounds {
            request.bounds.or_else(|| {
                match (request.latitude_span, request.longitude_span) {
                    (Some(latitude_span), Some(longitude_span)) => {
                        Some(BoundingBox {
                            min_latitude: request.latitude - latitude_span / 2.0,
                            max_latitude: request.latitude + latitude_span / 2.0,
                            min_longitude: request.longitude
                                - longitude_span / 2.0,
                            max_longitude: request.longitude
                                + longitude_span / 2.0,
                        })
                    }
                    _ => None,
                }
            })
        } else {
            None
        };
        let (min_lat, max_lat, min_lon, max_lon) = match explicit_box {
            Some(bounds) => (
                bounds.min_latitude,
                bounds.max_latitude,
                bounds.min_longitude,
                bounds.max_longitude,
            ),
            None => {
                let ((min_lat, min_lon), (max_lat, max_lon)) =
                    geo::calculate_bounding_box(
                        request.latitude,
                        request.longitude,
                        request.radius_meters / 1000.0,
                    );
                (min_lat, max_lat, min_lon, max_lon)
            }
        };

        let mut stops = queries::stop::within_bounding_box(
            store.pool(),
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        )
        .await?;

        if explicit_box.is_none() {
            let radius_km = request.radius_meters / 1000.0;
            stops.retain(|stop| {
                geo::haversine_distance_km(
                    request.latitude,
                    request.longitude,
                    stop.latitude,
                    stop.longitude,
                ) <= radius_km
            });
        }
        if let Some(query) = request
            .query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
        {
            let needle = query.to_lowercase();
            stops.retain(|stop| {
                stop.name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
                    || stop
                        .code
                        .as_deref()
                        .is_some_and(|code| code.to_lowercase().contains(&needle))
            });
        }
        if request.max_count > 0 {
            stops.truncate(request.max_count);
        }
        Ok(stops)
    }

    pub async fn get_trips(&self) -> Result<Vec<Trip>> {
        let state = self.static_state.read().await;
        let store = required_store(&state)?;
        Ok(queries::trip::get_all(store.pool()).await?)
    }

    pub async fn find_trip(&self, id: &str) -> Result<Option<Trip>> {
        let state = self.static_state.read().await;
        let store = required_store(&state)?;
        Ok(queries::trip::get(store.pool(), id).await?)
    }

    pub async fn is_service_active_on_date(
        &self,
        cancel: &CancellationToken,
        service_id: &str,
        date: NaiveDate,
    ) -> Result<bool> {
        ensure_not_cancelled(cancel)?;
        let state = self.static_state.read().await;
        let store = required_store(&state)?;
        Ok(queries::calendar::is_service_active_on(store.pool(), service_id, date)
            .await?)
    }

    /// Prefix-matching route search; a blank input yields an empty result
    /// and a `max_count` of zero means unbounded.
    pub async fn search_routes(
        &self,
        cancel: &CancellationToken,
        input: &str,
        max_count: usize,
    ) -> Result<Vec<Route>> {
        ensure_not_cancelled(cancel)?;
        let state = self.static_state.read().await;
        let store = required_store(&state)?;
        Ok(queries::route::search_full_text(store.pool(), input, max_count)
            .await?)
    }

    pub async fn get_region_bounds(&self) -> RegionBounds {
        self.static_state.read().await.region_bounds
    }

    /// The cached 8-point facing of a stop; unknown for unknown stops.
    pub async fn get_stop_direction(&self, stop_id: &str) -> CompassDirection {
        self.static_state
            .read()
            .await
            .directions
            .get(stop_id)
            .copied()
            .unwrap_or(CompassDirection::Unknown)
    }

    /// Trips departing from the same layover: the block-trip entries for
    /// `(service_id, first_stop_id)`, in their deterministic order.
    pub async fn get_layover_trips(
        &self,
        service_id: &str,
        first_stop_id: &str,
    ) -> Vec<BlockTripEntry> {
        self.static_state
            .read()
            .await
            .layover_index
            .get(&(service_id.to_owned(), first_stop_id.to_owned()))
            .cloned()
            .unwrap_or_default()
    }

    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.static_state.read().await.last_updated
    }

    // --- realtime reads ---------------------------------------------------

    pub async fn get_realtime_trips(&self) -> Vec<TripUpdate> {
        self.realtime.read().await.trips().to_vec()
    }

    pub async fn get_realtime_vehicles(&self) -> Vec<Vehicle> {
        self.realtime.read().await.vehicles().to_vec()
    }

    pub async fn get_trip_updates_for_trip(&self, trip_id: &str) -> Vec<TripUpdate> {
        self.realtime
            .read()
            .await
            .trip_updates_for_trip(trip_id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn get_trip_update_by_id(&self, trip_id: &str) -> Option<TripUpdate> {
        self.realtime.read().await.trip_update_by_id(trip_id).cloned()
    }

    pub async fn get_vehicle_by_id(&self, vehicle_id: &str) -> Option<Vehicle> {
        self.realtime.read().await.vehicle_by_id(vehicle_id).cloned()
    }

    pub async fn get_vehicle_for_trip(&self, trip_id: &str) -> Option<Vehicle> {
        self.realtime.read().await.vehicle_for_trip(trip_id).cloned()
    }

    /// The vehicle's own report timestamp when it carries one, otherwise
    /// the moment the merger last saw it in any feed.
    pub async fn get_vehicle_last_update_time(
        &self,
        vehicle: &Vehicle,
    ) -> Option<DateTime<Utc>> {
        if let Some(timestamp) = vehicle.timestamp {
            if let Some(moment) = DateTime::from_timestamp(timestamp as i64, 0) {
                return Some(moment);
            }
        }
        self.realtime.read().await.vehicle_last_seen(&vehicle.id)
    }

    pub async fn get_alerts_for_stop(&self, stop_id: &str) -> Vec<Alert> {
        let cache = self.realtime.read().await;
        dedupe_alerts(
            cache
                .alerts()
                .iter()
                .filter(|alert| alert.informs(None, None, None, Some(stop_id))),
        )
    }

    /// Alerts informing the route directly or its whole agency.
    pub async fn get_alerts_for_route(&self, route_id: &str) -> Vec<Alert> {
        let agency_id = {
            let state = self.static_state.read().await;
            state
                .routes_by_id
                .get(route_id)
                .map(|route| route.agency_id.clone())
        };
        let cache = self.realtime.read().await;
        dedupe_alerts(cache.alerts().iter().filter(|alert| {
            alert.informs(None, Some(route_id), agency_id.as_deref(), None)
        }))
    }

    /// Alerts informing the trip, its route, or its agency. The static and
    /// realtime snapshots are independent; a trip the schedule does not
    /// know yet still matches alerts by its bare trip id.
    pub async fn get_alerts_for_trip(
        &self,
        cancel: &CancellationToken,
        trip_id: &str,
    ) -> Result<Vec<Alert>> {
        ensure_not_cancelled(cancel)?;

        let (route_id, agency_id) = {
            let state = self.static_state.read().await;
            let trip = match &state.store {
                Some(store) => queries::trip::get(store.pool(), trip_id).await?,
                None => None,
            };
            match trip {
                Some(trip) => {
                    let agency_id = state
                        .routes_by_id
                        .get(&trip.route_id)
                        .map(|route| route.agency_id.clone());
                    (Some(trip.route_id), agency_id)
                }
                None => (None, None),
            }
        };

        let cache = self.realtime.read().await;
        Ok(dedupe_alerts(cache.alerts().iter().filter(|alert| {
            alert.informs(
                Some(trip_id),
                route_id.as_deref(),
                agency_id.as_deref(),
                None,
            )
        })))
    }

    /// Applies one feed's poll results under the realtime write lock.
    pub(crate) async fn apply_realtime_update(
        &self,
        feed_id: &str,
        update: FeedUpdate,
    ) {
        let mut cache = self.realtime.write().await;
        cache.apply_feed_update(feed_id, update, Utc::now());
    }
}

fn required_store<'a>(state: &'a StaticState) -> Result<&'a SqliteStore> {
    state
        .store
        .as_ref()
        .ok_or_else(|| CoreError::Fatal("static store unavailable".to_owned()))
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(CoreError::Cancelled)
    } else {
        Ok(())
    }
}

fn dedupe_alerts<'a, I: Iterator<Item = &'a Alert>>(alerts: I) -> Vec<Alert> {
    let mut seen = HashSet::new();
    alerts
        .filter(|alert| seen.insert(alert.id.clone()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use model::realtime::InformedEntity;
    use std::io::{Cursor, Write};
    use std::path::{Path, PathBuf};
    use zip::write::SimpleFileOptions;

    fn bundle_bytes(with_second_route: bool) -> Vec<u8> {
        let mut routes = String::from(
            "route_id,agency_id,route_short_name,route_long_name,route_type\n\
             1,25,1,Downtown Loop,3\n",
        );
        let mut trips = String::from(
            "trip_id,route_id,service_id,trip_headsign,shape_id\n\
             t1,1,WK,Downtown,sh1\n",
        );
        if with_second_route {
            routes.push_str("2,25,2,Airport Express,3\n");
            trips.push_str("t2,2,WK,Airport,sh1\n");
        }
        let files: Vec<(&str, String)> = vec![
            (
                "agency.txt",
                "agency_id,agency_name,agency_url,agency_timezone\n\
                 25,Redding Area Bus Authority,https://example.com,America/Los_Angeles\n"
                    .to_owned(),
            ),
            ("routes.txt", routes),
            (
                "stops.txt",
                "stop_id,stop_name,stop_code,stop_lat,stop_lon\n\
                 s1,Downtown Transit Center,DTC,40.589,-122.391\n\
                 s2,Market & Tehama,MKT,40.592,-122.388\n"
                    .to_owned(),
            ),
            (
                "calendar.txt",
                "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
                 WK,1,1,1,1,1,0,0,20240101,20241231\n"
                    .to_owned(),
            ),
            ("trips.txt", trips),
            (
                "stop_times.txt",
                "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
                 t1,08:00:00,08:00:00,s1,1\n\
                 t1,08:05:00,08:05:00,s2,2\n"
                    .to_owned(),
            ),
            (
                "shapes.txt",
                "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence\n\
                 sh1,40.589,-122.392,0\n\
                 sh1,40.589,-122.391,1\n\
                 sh1,40.589,-122.390,2\n\
                 sh1,40.589,-122.389,3\n"
                    .to_owned(),
            ),
        ];

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            writer
                .start_file(name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn write_bundle(dir: &Path, with_second_route: bool) -> PathBuf {
        let path = dir.join("gtfs.zip");
        std::fs::write(&path, bundle_bytes(with_second_route)).unwrap();
        path
    }

    fn test_config(bundle_path: &Path) -> Config {
        Config {
            gtfs_url: bundle_path.to_str().unwrap().to_owned(),
            static_auth_header_key: None,
            static_auth_header_value: None,
            rt_feeds: vec![],
            gtfs_data_path: ":memory:".to_owned(),
            env: Environment::Test,
            verbose: false,
            enable_gtfs_tidy: false,
        }
    }

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

    fn vehicles_update(vehicles: Vec<Vehicle>) -> FeedUpdate {
        FeedUpdate {
            trip_updates: Some(vec![]),
            vehicles: Some(vehicles),
            alerts: Some(vec![]),
        }
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[tokio::test]
    async fn boots_from_a_local_bundle_and_serves_static_queries() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_bundle(dir.path(), false);
        let manager = TransitManager::start(test_config(&bundle)).await.unwrap();

        assert!(manager.is_healthy());
        assert_eq!(manager.get_agencies().await.len(), 1);
        let agency = manager.find_agency("25").await.unwrap();
        assert_eq!(agency.name, "Redding Area Bus Authority");
        assert!(manager.find_agency("nope").await.is_none());

        let routes = manager.routes_for_agency_id("25").await;
        assert_eq!(routes.len(), 1);
        assert_eq!(manager.find_route("1").await.unwrap().route_type, 3);

        let trips = manager.get_trips().await.unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(
            manager.find_trip("t1").await.unwrap().unwrap().route_id,
            "1"
        );

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn full_text_route_search_is_prefix_matching_and_blank_safe() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_bundle(dir.path(), false);
        let manager = TransitManager::start(test_config(&bundle)).await.unwrap();
        let cancel = CancellationToken::new();

        let hits = manager.search_routes(&cancel, "down", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");

        let case_insensitive =
            manager.search_routes(&cancel, "DOWNTOWN LOOP", 10).await.unwrap();
        assert_eq!(case_insensitive.len(), 1);

        assert!(manager.search_routes(&cancel, "", 10).await.unwrap().is_empty());
        assert!(manager
            .search_routes(&cancel, "airport", 10)
            .await
            .unwrap()
            .is_empty());

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn stop_search_hits_nearby_and_misses_far_away() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_bundle(dir.path(), false);
        let manager = TransitManager::start(test_config(&bundle)).await.unwrap();

        let request = StopsForLocationRequest {
            latitude: 40.589123,
            longitude: -122.390830,
            radius_meters: 2000.0,
            latitude_span: None,
            longitude_span: None,
            query: None,
            max_count: 50,
            use_bounds: false,
            bounds: None,
            now: Utc::now(),
        };
        let nearby = manager.get_stops_for_location(request.clone()).await.unwrap();
        assert!(!nearby.is_empty());

        let far = manager
            .get_stops_for_location(StopsForLocationRequest {
                latitude: 47.589123,
                ..request.clone()
            })
            .await
            .unwrap();
        assert!(far.is_empty());

        let filtered = manager
            .get_stops_for_location(StopsForLocationRequest {
                query: Some("transit center".to_owned()),
                ..request.clone()
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "s1");

        // An explicit bounds box need not be centered on the query point:
        // this one only covers s2.
        let boxed = manager
            .get_stops_for_location(StopsForLocationRequest {
                use_bounds: true,
                bounds: Some(BoundingBox {
                    min_latitude: 40.5905,
                    max_latitude: 40.5935,
                    min_longitude: -122.389,
                    max_longitude: -122.387,
                }),
                ..request
            })
            .await
            .unwrap();
        assert_eq!(boxed.len(), 1);
        assert_eq!(boxed[0].id, "s2");

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn derived_products_cover_bounds_directions_and_layovers() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_bundle(dir.path(), false);
        let manager = TransitManager::start(test_config(&bundle)).await.unwrap();

        let bounds = manager.get_region_bounds().await;
        assert!(bounds.latitude_span > 0.0 || bounds.longitude_span > 0.0);
        assert!((bounds.center_latitude - 40.589).abs() < 0.01);

        // The only shape runs due east past both stops.
        assert_eq!(
            manager.get_stop_direction("s1").await,
            CompassDirection::East
        );
        assert_eq!(
            manager.get_stop_direction("missing").await,
            CompassDirection::Unknown
        );

        let layover = manager.get_layover_trips("WK", "s1").await;
        assert_eq!(layover.len(), 1);
        assert_eq!(layover[0].trip_id, "t1");
        assert!(manager.get_layover_trips("WK", "s2").await.is_empty());

        let cancel = CancellationToken::new();
        // 2024-06-03 is a Monday, 2024-06-08 a Saturday.
        assert!(manager
            .is_service_active_on_date(
                &cancel,
                "WK",
                NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
            )
            .await
            .unwrap());
        assert!(!manager
            .is_service_active_on_date(
                &cancel,
                "WK",
                NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()
            )
            .await
            .unwrap());

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn reloading_identical_bytes_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_bundle(dir.path(), false);
        let manager = TransitManager::start(test_config(&bundle)).await.unwrap();

        let metadata_before = {
            let state = manager.static_state.read().await;
            queries::metadata::get(state.store.as_ref().unwrap().pool())
                .await
                .unwrap()
                .unwrap()
        };

        manager
            .force_update(&CancellationToken::new())
            .await
            .unwrap();

        let metadata_after = {
            let state = manager.static_state.read().await;
            queries::metadata::get(state.store.as_ref().unwrap().pool())
                .await
                .unwrap()
                .unwrap()
        };
        assert_eq!(metadata_before.file_hash, metadata_after.file_hash);
        assert_eq!(metadata_before.import_time, metadata_after.import_time);
        assert_eq!(manager.get_trips().await.unwrap().len(), 1);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn hot_swap_on_a_file_store_keeps_readers_consistent() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_bundle(dir.path(), false);
        let mut config = test_config(&bundle);
        config.env = Environment::Development;
        config.gtfs_data_path = dir
            .path()
            .join("gtfs.db")
            .to_str()
            .unwrap()
            .to_owned();

        let manager = TransitManager::start(config).await.unwrap();
        assert!(manager.find_route("2").await.is_none());

        let reader = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move {
                let mut always_present = true;
                for _ in 0..300 {
                    always_present &= manager.find_agency("25").await.is_some();
                    tokio::task::yield_now().await;
                }
                always_present
            })
        };

        // Publish a new bundle revision and swap it in while the reader
        // keeps querying.
        std::fs::write(&bundle, bundle_bytes(true)).unwrap();
        manager
            .force_update(&CancellationToken::new())
            .await
            .unwrap();

        assert!(reader.await.unwrap());
        assert!(manager.is_healthy());
        let airport = manager.find_route("2").await.unwrap();
        assert_eq!(airport.long_name.as_deref(), Some("Airport Express"));
        assert_eq!(manager.get_trips().await.unwrap().len(), 2);
        // The temp store must be gone after a successful swap.
        assert!(!swap::temp_store_path(Path::new(
            manager.config.gtfs_data_path.as_str()
        ))
        .exists());

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn a_broken_bundle_leaves_the_live_data_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_bundle(dir.path(), false);
        let manager = TransitManager::start(test_config(&bundle)).await.unwrap();

        std::fs::write(&bundle, b"definitely not a zip").unwrap();
        let result = manager.force_update(&CancellationToken::new()).await;
        assert!(matches!(result, Err(CoreError::InvalidBundle(_))));

        assert!(manager.is_healthy());
        assert!(manager.find_agency("25").await.is_some());
        assert_eq!(manager.get_trips().await.unwrap().len(), 1);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn cancelled_force_update_returns_promptly() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_bundle(dir.path(), false);
        let manager = TransitManager::start(test_config(&bundle)).await.unwrap();

        // Change the bundle so the refresh would actually run, then cancel.
        std::fs::write(&bundle, bundle_bytes(true)).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = manager.force_update(&cancel).await;
        assert!(matches!(result, Err(CoreError::Cancelled)));
        // Old data still served.
        assert_eq!(manager.get_trips().await.unwrap().len(), 1);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn merged_realtime_view_spans_feeds_and_resolves_lookups() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_bundle(dir.path(), false);
        let manager = TransitManager::start(test_config(&bundle)).await.unwrap();

        manager
            .apply_realtime_update(
                "raba",
                vehicles_update(vec![vehicle("r1", Some("t1"))]),
            )
            .await;
        manager
            .apply_realtime_update(
                "unitrans",
                vehicles_update(vec![vehicle("u1", Some("ghost-trip"))]),
            )
            .await;

        let vehicles = manager.get_realtime_vehicles().await;
        assert_eq!(vehicles.len(), 2);
        assert!(manager.get_vehicle_by_id("r1").await.is_some());
        assert!(manager.get_vehicle_by_id("u1").await.is_some());
        assert_eq!(
            manager.get_vehicle_for_trip("t1").await.unwrap().id,
            "r1"
        );
        // Realtime may reference trips the static snapshot has never heard
        // of; lookups answer instead of erroring.
        assert_eq!(
            manager
                .get_vehicle_for_trip("ghost-trip")
                .await
                .unwrap()
                .id,
            "u1"
        );

        let last_update = manager
            .get_vehicle_last_update_time(&vehicle("r1", None))
            .await
            .unwrap();
        assert_eq!(last_update.timestamp(), 1_700_000_000);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn alerts_resolve_through_trip_route_and_agency() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_bundle(dir.path(), false);
        let manager = TransitManager::start(test_config(&bundle)).await.unwrap();

        let route_alert = Alert {
            id: "route-alert".to_owned(),
            cause: None,
            effect: None,
            url: None,
            header_text: Some("Detour".to_owned()),
            description_text: None,
            active_windows: vec![],
            informed_entities: vec![InformedEntity {
                agency_id: None,
                route_id: Some("1".to_owned()),
                trip_id: None,
                stop_id: None,
            }],
        };
        let stop_alert = Alert {
            id: "stop-alert".to_owned(),
            cause: None,
            effect: None,
            url: None,
            header_text: None,
            description_text: None,
            active_windows: vec![],
            informed_entities: vec![InformedEntity {
                agency_id: None,
                route_id: None,
                trip_id: None,
                stop_id: Some("s1".to_owned()),
            }],
        };
        manager
            .apply_realtime_update(
                "raba",
                FeedUpdate {
                    trip_updates: Some(vec![]),
                    vehicles: Some(vec![]),
                    alerts: Some(vec![route_alert, stop_alert]),
                },
            )
            .await;

        let cancel = CancellationToken::new();
        // Trip t1 runs on route 1, so the route alert applies to it.
        let trip_alerts =
            manager.get_alerts_for_trip(&cancel, "t1").await.unwrap();
        assert_eq!(trip_alerts.len(), 1);
        assert_eq!(trip_alerts[0].id, "route-alert");

        let route_alerts = manager.get_alerts_for_route("1").await;
        assert_eq!(route_alerts.len(), 1);

        let stop_alerts = manager.get_alerts_for_stop("s1").await;
        assert_eq!(stop_alerts.len(), 1);
        assert_eq!(stop_alerts[0].id, "stop-alert");

        assert!(manager.get_alerts_for_stop("s2").await.is_empty());

        manager.shutdown().await;
    }
}

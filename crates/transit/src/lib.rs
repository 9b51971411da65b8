//! The GTFS ingestion and merge core: static bundle loading with atomic
//! hot-swap, parallel realtime feed polling with a merged lookup view, and
//! geometry-derived stop directions, all owned by a single manager façade.

pub mod config;
pub mod direction;
pub mod error;
pub mod loader;
pub mod manager;
pub mod poller;
pub mod realtime_cache;
pub mod swap;

pub use config::{Config, Environment, FeedConfig};
pub use error::CoreError;
pub use manager::{BoundingBox, StopsForLocationRequest, TransitManager};
pub use realtime_cache::{FeedUpdate, RealtimeCache};

pub mod agency;
pub mod block;
pub mod calendar;
pub mod dataset;
pub mod direction;
pub mod import;
pub mod realtime;
pub mod region;
pub mod route;
pub mod shape;
pub mod stop;
pub mod stop_time;
pub mod trip;

/// An ID field value is an internal ID, not intended to be shown to riders, and
/// is a sequence of any UTF-8 characters. IDs defined in one table are often
/// referenced in another ("foreign ID").
pub type IdString = String;

/// WGS84 latitude in decimal degrees, in `[-90.0, 90.0]`.
pub type Latitude = f64;

/// WGS84 longitude in decimal degrees, in `[-180.0, 180.0]`.
pub type Longitude = f64;

/// Nanoseconds since noon-minus-12h of the service day. Values greater than
/// 24h are valid and describe times on the following calendar day.
pub type ServiceDayTime = i64;

//! Row types for the recognized tabular files of a static bundle, one
//! module per file. Field names follow the schedule reference; rows are
//! converted into the shared model types by [`crate::bundle`].

pub mod agency;
pub mod calendar;
pub mod calendar_dates;
pub mod routes;
pub mod shapes;
pub mod stop_times;
pub mod stops;
pub mod trips;

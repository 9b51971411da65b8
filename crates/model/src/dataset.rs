use serde::{Deserialize, Serialize};

use crate::{
    agency::Agency,
    calendar::{Calendar, CalendarException},
    route::Route,
    shape::ShapePoint,
    stop::Stop,
    stop_time::StopTime,
    trip::Trip,
};

/// A fully parsed static bundle, ready for import. Entities are created
/// exclusively by the static loader and replaced wholesale by the next
/// import cycle; nothing mutates a dataset incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticDataset {
    pub agencies: Vec<Agency>,
    pub routes: Vec<Route>,
    pub stops: Vec<Stop>,
    pub calendars: Vec<Calendar>,
    pub calendar_exceptions: Vec<CalendarException>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
    pub shape_points: Vec<ShapePoint>,
}

impl StaticDataset {
    pub fn is_empty(&self) -> bool {
        self.agencies.is_empty()
            && self.routes.is_empty()
            && self.stops.is_empty()
            && self.trips.is_empty()
    }
}

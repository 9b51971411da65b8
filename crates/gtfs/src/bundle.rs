//! In-memory decoding of a zipped static bundle into a [`StaticDataset`].
//!
//! Unknown files and unknown columns are ignored; everything surprising ends
//! up in the warning list rather than failing the import. Conversion also
//! enforces the referential invariants the store relies on: rows pointing at
//! missing parents are dropped with a warning instead of poisoning the
//! transaction.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    error::Error,
    fmt,
    io::{Cursor, Read},
};

use model::{
    agency::Agency,
    calendar::{Calendar, CalendarException, ExceptionKind},
    dataset::StaticDataset,
    route::Route,
    shape::ShapePoint,
    stop::Stop,
    stop_time::StopTime,
    trip::Trip,
};
use serde::de::DeserializeOwned;
use zip::ZipArchive;

use crate::data_model::{
    agency::AgencyRow, calendar::CalendarRow, calendar_dates::CalendarDateRow,
    calendar_dates::ExceptionType, routes::RouteRow, shapes::ShapeRow,
    stop_times::StopTimeRow, stops::StopRow, trips::TripRow,
};

const REQUIRED_FILES: &[&str] = &[
    "agency.txt",
    "routes.txt",
    "stops.txt",
    "trips.txt",
    "stop_times.txt",
];

const OPTIONAL_FILES: &[&str] =
    &["calendar.txt", "calendar_dates.txt", "shapes.txt"];

#[derive(Debug)]
pub enum BundleError {
    Archive(Box<dyn Error + Send + Sync>),
    MissingFile(&'static str),
    Table {
        file: &'static str,
        detail: String,
    },
}

impl fmt::Display for BundleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive(why) => write!(f, "unreadable bundle archive: {}", why),
            Self::MissingFile(file) => write!(f, "bundle is missing {}", file),
            Self::Table { file, detail } => {
                write!(f, "unparsable table {}: {}", file, detail)
            }
        }
    }
}

impl Error for BundleError {}

pub struct ParsedBundle {
    pub dataset: StaticDataset,
    pub warnings: Vec<String>,
}

/// Decodes a zipped bundle held in memory.
pub fn parse_bundle(bytes: &[u8]) -> Result<ParsedBundle, BundleError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|why| BundleError::Archive(Box::new(why)))?;

    let mut warnings = Vec::new();
    let entries = index_entries(&archive, &mut warnings);

    let agencies: Vec<AgencyRow> =
        read_table(&mut archive, &entries, "agency.txt", &mut warnings)?
            .ok_or(BundleError::MissingFile("agency.txt"))?;
    let routes: Vec<RouteRow> =
        read_table(&mut archive, &entries, "routes.txt", &mut warnings)?
            .ok_or(BundleError::MissingFile("routes.txt"))?;
    let stops: Vec<StopRow> =
        read_table(&mut archive, &entries, "stops.txt", &mut warnings)?
            .ok_or(BundleError::MissingFile("stops.txt"))?;
    let trips: Vec<TripRow> =
        read_table(&mut archive, &entries, "trips.txt", &mut warnings)?
            .ok_or(BundleError::MissingFile("trips.txt"))?;
    let stop_times: Vec<StopTimeRow> =
        read_table(&mut archive, &entries, "stop_times.txt", &mut warnings)?
            .ok_or(BundleError::MissingFile("stop_times.txt"))?;
    let calendar: Vec<CalendarRow> =
        read_table(&mut archive, &entries, "calendar.txt", &mut warnings)?
            .unwrap_or_default();
    let calendar_dates: Vec<CalendarDateRow> =
        read_table(&mut archive, &entries, "calendar_dates.txt", &mut warnings)?
            .unwrap_or_default();
    let shapes: Vec<ShapeRow> =
        read_table(&mut archive, &entries, "shapes.txt", &mut warnings)?
            .unwrap_or_default();

    if calendar.is_empty() && calendar_dates.is_empty() {
        warnings.push("bundle carries no calendar information".to_owned());
    }

    let dataset = convert(
        agencies,
        routes,
        stops,
        calendar,
        calendar_dates,
        trips,
        stop_times,
        shapes,
        &mut warnings,
    );

    Ok(ParsedBundle { dataset, warnings })
}

/// Maps recognized basenames to full entry names (bundles are sometimes
/// nested under a directory); warns about everything else.
fn index_entries<R: Read + std::io::Seek>(
    archive: &ZipArchive<R>,
    warnings: &mut Vec<String>,
) -> HashMap<&'static str, String> {
    let mut entries = HashMap::new();
    for name in archive.file_names() {
        if name.ends_with('/') {
            continue;
        }
        let basename = name.rsplit('/').next().unwrap_or(name);
        match REQUIRED_FILES
            .iter()
            .chain(OPTIONAL_FILES)
            .find(|known| **known == basename)
        {
            Some(known) => {
                entries.insert(*known, name.to_owned());
            }
            None => warnings.push(format!("ignoring unrecognized file {}", name)),
        }
    }
    entries
}

/// Reads and row-decodes one table; `Ok(None)` when the file is absent.
/// Malformed rows are skipped and surfaced as one aggregate warning; a file
/// yielding nothing but errors is treated as unparsable.
fn read_table<R, T>(
    archive: &mut ZipArchive<R>,
    entries: &HashMap<&'static str, String>,
    file: &'static str,
    warnings: &mut Vec<String>,
) -> Result<Option<Vec<T>>, BundleError>
where
    R: Read + std::io::Seek,
    T: DeserializeOwned,
{
    let Some(entry_name) = entries.get(file) else {
        return Ok(None);
    };

    let mut buffer = Vec::new();
    archive
        .by_name(entry_name)
        .map_err(|why| BundleError::Archive(Box::new(why)))?
        .read_to_end(&mut buffer)
        .map_err(|why| BundleError::Archive(Box::new(why)))?;

    // Producers occasionally prepend a UTF-8 BOM that would corrupt the
    // first header name.
    let content = buffer
        .strip_prefix("\u{feff}".as_bytes())
        .unwrap_or(&buffer);

    let mut reader = csv::Reader::from_reader(content);
    let mut rows = Vec::new();
    let mut skipped = 0usize;
    let mut first_error = None;
    for row in reader.deserialize() {
        match row {
            Ok(row) => rows.push(row),
            Err(why) => {
                skipped += 1;
                if first_error.is_none() {
                    first_error = Some(why.to_string());
                }
            }
        }
    }

    if rows.is_empty() && skipped > 0 {
        return Err(BundleError::Table {
            file,
            detail: first_error.unwrap_or_else(|| "no parsable rows".to_owned()),
        });
    }
    if skipped > 0 {
        warnings.push(format!("{}: skipped {} malformed rows", file, skipped));
    }
    Ok(Some(rows))
}

#[allow(clippy::too_many_arguments)]
fn convert(
    agency_rows: Vec<AgencyRow>,
    route_rows: Vec<RouteRow>,
    stop_rows: Vec<StopRow>,
    calendar_rows: Vec<CalendarRow>,
    calendar_date_rows: Vec<CalendarDateRow>,
    trip_rows: Vec<TripRow>,
    stop_time_rows: Vec<StopTimeRow>,
    shape_rows: Vec<ShapeRow>,
    warnings: &mut Vec<String>,
) -> StaticDataset {
    let mut dataset = StaticDataset::default();

    // Agencies. A missing agency_id is legal in single-agency bundles; the
    // agency name stands in as the id then.
    let mut agency_ids = HashSet::new();
    for row in agency_rows {
        let id = row.id.clone().unwrap_or_else(|| row.name.clone());
        if !agency_ids.insert(id.clone()) {
            warnings.push(format!("agency.txt: duplicate agency {}", id));
            continue;
        }
        dataset.agencies.push(Agency {
            id,
            name: row.name,
            url: row.url,
            timezone: row.timezone,
            language: row.language,
            phone: row.phone,
            fare_url: row.fare_url,
            email: row.email,
        });
    }
    let sole_agency_id = (dataset.agencies.len() == 1)
        .then(|| dataset.agencies[0].id.clone());

    // Routes.
    let mut skipped_routes = 0usize;
    let mut route_ids = HashSet::new();
    for row in route_rows {
        let agency_id = match row.agency_id.filter(|id| !id.is_empty()) {
            Some(id) if agency_ids.contains(&id) => id,
            Some(_) | None => match &sole_agency_id {
                Some(id) => id.clone(),
                None => {
                    skipped_routes += 1;
                    continue;
                }
            },
        };
        if !route_ids.insert(row.id.clone()) {
            skipped_routes += 1;
            continue;
        }
        dataset.routes.push(Route {
            id: row.id,
            agency_id,
            short_name: row.short_name,
            long_name: row.long_name,
            description: row.description,
            route_type: row.route_type.unwrap_or(3),
            url: row.url,
            color: row.color,
            text_color: row.text_color,
            continuous_pickup: row.continuous_pickup,
            continuous_drop_off: row.continuous_drop_off,
        });
    }
    if skipped_routes > 0 {
        warnings.push(format!(
            "routes.txt: skipped {} rows with unresolvable agency or duplicate id",
            skipped_routes
        ));
    }

    // Stops without coordinates cannot be indexed or served.
    let mut dropped_stops = 0usize;
    let mut stop_ids = HashSet::new();
    for row in stop_rows {
        let (Some(latitude), Some(longitude)) = (row.latitude, row.longitude)
        else {
            dropped_stops += 1;
            continue;
        };
        if !stop_ids.insert(row.id.clone()) {
            dropped_stops += 1;
            continue;
        }
        dataset.stops.push(Stop {
            id: row.id,
            code: row.code,
            name: row.name,
            description: row.description,
            latitude,
            longitude,
            zone_id: row.zone_id,
            url: row.url,
            location_type: row.location_type,
            timezone: row.timezone,
            wheelchair_boarding: row.wheelchair_boarding,
            platform_code: row.platform_code,
            direction: row.direction,
        });
    }
    if dropped_stops > 0 {
        warnings.push(format!(
            "stops.txt: dropped {} rows without coordinates or with duplicate ids",
            dropped_stops
        ));
    }

    // Calendars, plus synthesized all-off calendars for services that only
    // exist through single-date exceptions so trips can still reference
    // them.
    let mut service_ids = HashSet::new();
    for row in calendar_rows {
        if !service_ids.insert(row.service_id.clone()) {
            warnings.push(format!(
                "calendar.txt: duplicate service {}",
                row.service_id
            ));
            continue;
        }
        dataset.calendars.push(Calendar {
            service_id: row.service_id,
            monday: row.monday.is_available(),
            tuesday: row.tuesday.is_available(),
            wednesday: row.wednesday.is_available(),
            thursday: row.thursday.is_available(),
            friday: row.friday.is_available(),
            saturday: row.saturday.is_available(),
            sunday: row.sunday.is_available(),
            start_date: row.start_date,
            end_date: row.end_date,
        });
    }

    let mut exception_keys = HashSet::new();
    let mut exception_only: BTreeMap<String, (chrono::NaiveDate, chrono::NaiveDate)> =
        BTreeMap::new();
    for row in calendar_date_rows {
        if !exception_keys.insert((row.service_id.clone(), row.date)) {
            continue;
        }
        if !service_ids.contains(&row.service_id) {
            exception_only
                .entry(row.service_id.clone())
                .and_modify(|(first, last)| {
                    *first = (*first).min(row.date);
                    *last = (*last).max(row.date);
                })
                .or_insert((row.date, row.date));
        }
        dataset.calendar_exceptions.push(CalendarException {
            service_id: row.service_id,
            date: row.date,
            exception_kind: match row.exception_type {
                ExceptionType::Added => ExceptionKind::Added,
                ExceptionType::Removed => ExceptionKind::Removed,
            },
        });
    }
    for (service_id, (start_date, end_date)) in exception_only {
        warnings.push(format!(
            "calendar_dates.txt: service {} exists only through exceptions",
            service_id
        ));
        service_ids.insert(service_id.clone());
        dataset.calendars.push(Calendar {
            service_id,
            monday: false,
            tuesday: false,
            wednesday: false,
            thursday: false,
            friday: false,
            saturday: false,
            sunday: false,
            start_date,
            end_date,
        });
    }

    // Trips must land on an existing route and service.
    let mut skipped_trips = 0usize;
    let mut trip_ids = HashSet::new();
    for row in trip_rows {
        if !route_ids.contains(&row.route_id)
            || !service_ids.contains(&row.service_id)
            || !trip_ids.insert(row.id.clone())
        {
            skipped_trips += 1;
            continue;
        }
        dataset.trips.push(Trip {
            id: row.id,
            route_id: row.route_id,
            service_id: row.service_id,
            headsign: row.headsign,
            short_name: row.short_name,
            direction_id: row.direction_id,
            block_id: row.block_id,
            shape_id: row.shape_id,
            wheelchair_accessible: row.wheelchair_accessible,
            bikes_allowed: row.bikes_allowed,
        });
    }
    if skipped_trips > 0 {
        warnings.push(format!(
            "trips.txt: skipped {} rows with dangling references or duplicate ids",
            skipped_trips
        ));
    }

    // Stop times must land on an existing trip and stop and carry at least
    // one of the two times; a missing one mirrors the other.
    let mut skipped_stop_times = 0usize;
    let mut stop_time_keys = HashSet::new();
    for row in stop_time_rows {
        let time_pair = match (row.arrival_time, row.departure_time) {
            (Some(arrival), Some(departure)) => Some((arrival, departure)),
            (Some(arrival), None) => Some((arrival, arrival)),
            (None, Some(departure)) => Some((departure, departure)),
            (None, None) => None,
        };
        let Some((arrival_time, departure_time)) = time_pair else {
            skipped_stop_times += 1;
            continue;
        };
        if !trip_ids.contains(&row.trip_id)
            || !stop_ids.contains(&row.stop_id)
            || !stop_time_keys.insert((row.trip_id.clone(), row.stop_sequence))
        {
            skipped_stop_times += 1;
            continue;
        }
        dataset.stop_times.push(StopTime {
            trip_id: row.trip_id,
            stop_id: row.stop_id,
            stop_sequence: row.stop_sequence,
            arrival_time,
            departure_time,
            headsign: row.headsign,
            pickup_type: row.pickup_type,
            drop_off_type: row.drop_off_type,
            shape_dist_traveled: row.shape_dist_traveled,
            timepoint: row.timepoint,
        });
    }
    if skipped_stop_times > 0 {
        warnings.push(format!(
            "stop_times.txt: skipped {} rows (dangling references, missing times or duplicate sequences)",
            skipped_stop_times
        ));
    }

    // Shapes: group per shape id, order by the authored sequence, then
    // renumber densely from zero.
    let mut grouped: BTreeMap<String, Vec<ShapeRow>> = BTreeMap::new();
    for row in shape_rows {
        grouped.entry(row.shape_id.clone()).or_default().push(row);
    }
    for (shape_id, mut rows) in grouped {
        rows.sort_by_key(|row| row.point_sequence);
        rows.dedup_by_key(|row| row.point_sequence);
        for (sequence, row) in rows.into_iter().enumerate() {
            dataset.shape_points.push(ShapePoint {
                shape_id: shape_id.clone(),
                sequence: sequence as i64,
                latitude: row.point_latitude,
                longitude: row.point_longitude,
                dist_traveled: row.distance_traveled,
            });
        }
    }

    dataset
}

//! Derives the 8-point compass facing of every stop, once per static load.
//!
//! Authored directions from the bundle win. Everything else comes from
//! shape geometry: for each trip visiting a stop, the bearing of a small
//! window of shape points around the closest point approximates the travel
//! direction past the stop. Orientations of all visiting trips are combined
//! with a variance guard so opposing or scattered shapes produce `Unknown`
//! instead of a misleading arrow.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

use model::{
    direction::CompassDirection, shape::ShapePoint, stop::Stop,
};
use utility::geo;

use crate::error::CoreError;

/// Shape points taken on each side of the closest point when estimating the
/// travel bearing past a stop.
const BEARING_WINDOW: usize = 5;

/// Above this per-axis sample standard deviation of the orientation unit
/// vectors, the stop's facing is reported as unknown. Empirical; do not
/// expect stability across bundles.
const DEFAULT_VARIANCE_THRESHOLD: f64 = 0.7;

/// Pre-fetched geometry context: which shapes pass each stop (with the
/// stop-time's distance along the shape when the bundle provides one), and
/// the points of those shapes.
#[derive(Debug, Default, Clone)]
pub struct DirectionContext {
    /// stop id to `(shape_id, shape_dist_traveled)` of every trip visiting
    /// the stop.
    pub stop_shapes: HashMap<String, Vec<(String, Option<f64>)>>,
    /// shape id to its points ordered by sequence.
    pub shape_points: HashMap<String, Vec<ShapePoint>>,
}

/// Memoization key for the orientation of one shape as experienced at one
/// stop: either the distance along the shape (bit pattern, exact) or the
/// marker for geographic closest-point search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum OrientationKey {
    Distance(u64),
    Geographic,
}

pub struct DirectionCalculator {
    variance_threshold: f64,
    context: DirectionContext,
    /// Monotone guard: once any direction has been computed the context and
    /// threshold are frozen. The context is read lock-free, so late
    /// injection would race with readers.
    used: AtomicBool,
}

impl Default for DirectionCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectionCalculator {
    pub fn new() -> Self {
        Self {
            variance_threshold: DEFAULT_VARIANCE_THRESHOLD,
            context: DirectionContext::default(),
            used: AtomicBool::new(false),
        }
    }

    /// Injects the bulk pre-fetched context. Fails once any computation has
    /// run; the cache is one-shot configuration.
    pub fn preload(&mut self, context: DirectionContext) -> Result<(), CoreError> {
        if self.used.load(Ordering::Acquire) {
            return Err(CoreError::IllegalState(
                "direction context injected after first use",
            ));
        }
        self.context = context;
        Ok(())
    }

    pub fn set_variance_threshold(&mut self, threshold: f64) -> Result<(), CoreError> {
        if self.used.load(Ordering::Acquire) {
            return Err(CoreError::IllegalState(
                "variance threshold changed after first use",
            ));
        }
        self.variance_threshold = threshold;
        Ok(())
    }

    /// Computes the facing of every given stop, memoizing shape
    /// orientations across stops (trips sharing a shape are common).
    pub fn compute_all(&self, stops: &[Stop]) -> HashMap<String, CompassDirection> {
        let mut memo: HashMap<(String, OrientationKey), Option<f64>> = HashMap::new();
        stops
            .iter()
            .map(|stop| (stop.id.clone(), self.direction_for_stop(stop, &mut memo)))
            .collect()
    }

    pub fn direction_for_stop(
        &self,
        stop: &Stop,
        memo: &mut HashMap<(String, OrientationKey), Option<f64>>,
    ) -> CompassDirection {
        self.used.store(true, Ordering::Release);

        if let Some(authored) = stop
            .direction
            .as_deref()
            .and_then(translate_authored_direction)
        {
            return authored;
        }

        let Some(visits) = self.context.stop_shapes.get(&stop.id) else {
            return CompassDirection::Unknown;
        };

        let mut orientations = Vec::new();
        for (shape_id, stop_distance) in visits {
            let key = match stop_distance {
                Some(distance) => OrientationKey::Distance(distance.to_bits()),
                None => OrientationKey::Geographic,
            };
            let orientation = memo
                .entry((shape_id.clone(), key))
                .or_insert_with(|| {
                    self.shape_orientation(shape_id, *stop_distance, stop)
                });
            if let Some(orientation) = orientation {
                orientations.push(*orientation);
            }
        }

        combine_orientations(&orientations, self.variance_threshold)
    }

    /// The mathematical angle of travel along `shape_id` where it passes the
    /// stop, or `None` when the shape has too little geometry.
    fn shape_orientation(
        &self,
        shape_id: &str,
        stop_distance: Option<f64>,
        stop: &Stop,
    ) -> Option<f64> {
        let points = self.context.shape_points.get(shape_id)?;
        if points.len() < 2 {
            return None;
        }

        let closest = match stop_distance {
            // Minimize |point distance - stop distance| when both sides
            // carry distances.
            Some(stop_distance)
                if points.iter().any(|point| point.dist_traveled.is_some()) =>
            {
                index_of_min_by(points, |point| {
                    point
                        .dist_traveled
                        .map(|distance| (distance - stop_distance).abs())
                        .unwrap_or(f64::INFINITY)
                })
            }
            // Otherwise fall back to geographic distance to the stop.
            _ => index_of_min_by(points, |point| {
                geo::haversine_distance_km(
                    stop.latitude,
                    stop.longitude,
                    point.latitude,
                    point.longitude,
                )
            }),
        }?;

        let first = closest.saturating_sub(BEARING_WINDOW);
        let last = (closest + BEARING_WINDOW).min(points.len() - 1);
        if first == last {
            return None;
        }

        let bearing = geo::great_circle_bearing(
            points[first].latitude,
            points[first].longitude,
            points[last].latitude,
            points[last].longitude,
        );
        Some(geo::geographic_to_math_angle(bearing))
    }
}

fn index_of_min_by<T, F: Fn(&T) -> f64>(items: &[T], score: F) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, item) in items.iter().enumerate() {
        let value = score(item);
        if best.map_or(true, |(_, best_value)| value < best_value) {
            best = Some((index, value));
        }
    }
    best.map(|(index, _)| index)
}

/// Text or numeric authored directions. Numbers are geographic degrees; the
/// normalization happens after the bearing-to-math-angle transform, so
/// overflowing values like 720 wrap to north.
fn translate_authored_direction(raw: &str) -> Option<CompassDirection> {
    let normalized = raw.trim().to_lowercase();
    let direction = match normalized.as_str() {
        "n" | "north" => CompassDirection::North,
        "ne" | "northeast" => CompassDirection::NorthEast,
        "e" | "east" => CompassDirection::East,
        "se" | "southeast" => CompassDirection::SouthEast,
        "s" | "south" => CompassDirection::South,
        "sw" | "southwest" => CompassDirection::SouthWest,
        "w" | "west" => CompassDirection::West,
        "nw" | "northwest" => CompassDirection::NorthWest,
        _ => {
            let degrees: f64 = normalized.parse().ok()?;
            CompassDirection::from_math_angle(geo::geographic_to_math_angle(
                degrees,
            ))
        }
    };
    Some(direction)
}

/// Aggregates per-trip orientations into one compass direction with the
/// dispersion guards.
fn combine_orientations(
    orientations: &[f64],
    variance_threshold: f64,
) -> CompassDirection {
    match orientations {
        [] => CompassDirection::Unknown,
        [only] => CompassDirection::from_math_angle(*only),
        _ => {
            let samples_x: Vec<f64> =
                orientations.iter().map(|theta| theta.cos()).collect();
            let samples_y: Vec<f64> =
                orientations.iter().map(|theta| theta.sin()).collect();
            let mean_x = mean(&samples_x);
            let mean_y = mean(&samples_y);
            if mean_x == 0.0 && mean_y == 0.0 {
                // Perfectly opposing directions.
                return CompassDirection::Unknown;
            }
            if sample_std_dev(&samples_x, mean_x) > variance_threshold
                || sample_std_dev(&samples_y, mean_y) > variance_threshold
            {
                return CompassDirection::Unknown;
            }

            let mean_angle = mean_y.atan2(mean_x);
            let mut aligned: Vec<f64> = orientations
                .iter()
                .map(|theta| align_within_pi(*theta, mean_angle))
                .collect();
            aligned.sort_by(|a, b| a.total_cmp(b));
            let median = if aligned.len() % 2 == 1 {
                aligned[aligned.len() / 2]
            } else {
                (aligned[aligned.len() / 2 - 1] + aligned[aligned.len() / 2]) / 2.0
            };
            CompassDirection::from_math_angle(median)
        }
    }
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

fn sample_std_dev(samples: &[f64], mean: f64) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let sum_of_squares: f64 = samples
        .iter()
        .map(|sample| (sample - mean) * (sample - mean))
        .sum();
    (sum_of_squares / (samples.len() - 1) as f64).sqrt()
}

/// Shifts `theta` by whole turns until it lies within half a turn of
/// `reference`.
fn align_within_pi(theta: f64, reference: f64) -> f64 {
    use std::f64::consts::PI;
    let mut aligned = theta;
    while aligned - reference > PI {
        aligned -= 2.0 * PI;
    }
    while reference - aligned > PI {
        aligned += 2.0 * PI;
    }
    aligned
}

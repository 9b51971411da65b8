use std::f64::consts::PI;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Bounding box of the circle around `(lat, lon)` with the given radius,
/// returned as `((min_lat, min_lon), (max_lat, max_lon))` in degrees.
pub fn calculate_bounding_box(
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> ((f64, f64), (f64, f64)) {
    let lat_rad = to_radians(lat);
    let lon_rad = to_radians(lon);

    // Latitude bounds
    let min_lat = lat_rad - radius_km / EARTH_RADIUS_KM;
    let max_lat = lat_rad + radius_km / EARTH_RADIUS_KM;

    // Longitude bounds (adjusted by latitude)
    let min_lon = lon_rad - radius_km / (EARTH_RADIUS_KM * lat_rad.cos());
    let max_lon = lon_rad + radius_km / (EARTH_RADIUS_KM * lat_rad.cos());

    (
        (to_degrees(min_lat), to_degrees(min_lon)),
        (to_degrees(max_lat), to_degrees(max_lon)),
    )
}

pub fn haversine_distance_km(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Initial great-circle bearing from the first to the second point, in
/// geographic degrees `[0, 360)` where 0 is north and 90 is east.
pub fn great_circle_bearing(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1 = to_radians(latitude_1);
    let lat2 = to_radians(latitude_2);
    let dlon = to_radians(longitude_2 - longitude_1);

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let bearing = to_degrees(y.atan2(x));
    (bearing + 360.0) % 360.0
}

/// Wraps an angle in radians into `[-PI, PI)`.
pub fn normalize_math_angle(theta: f64) -> f64 {
    let two_pi = 2.0 * PI;
    let mut wrapped = (theta + PI) % two_pi;
    if wrapped < 0.0 {
        wrapped += two_pi;
    }
    wrapped - PI
}

/// Converts a geographic bearing (degrees clockwise from north) into a
/// mathematical angle (radians counterclockwise from east) in `[-PI, PI)`.
/// Out-of-range bearings are normalized only after the transform, so inputs
/// like 720 wrap around.
pub fn geographic_to_math_angle(bearing_degrees: f64) -> f64 {
    normalize_math_angle(to_radians(90.0 - bearing_degrees))
}

/// Sector index of the 8-point compass for a mathematical angle:
/// `floor((theta + PI/8) / (PI/4))` over the normalized angle, yielding
/// `{0: E, 1: NE, 2: N, 3: NW, 4/-4: W, -1: SE, -2: S, -3: SW}`.
pub fn compass_sector(theta: f64) -> i32 {
    let theta = normalize_math_angle(theta);
    ((theta + PI / 8.0) / (PI / 4.0)).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert_eq!(normalize_math_angle(PI), -PI);
        assert_eq!(normalize_math_angle(-PI), -PI);
        assert!((normalize_math_angle(3.0 * PI) - (-PI)).abs() < 1e-12);
        assert!((normalize_math_angle(PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert!((normalize_math_angle(5.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn bearing_of_cardinal_moves() {
        let north = great_circle_bearing(40.0, -122.0, 41.0, -122.0);
        assert!(north.abs() < 1e-6);
        let east = great_circle_bearing(0.0, -122.0, 0.0, -121.0);
        assert!((east - 90.0).abs() < 1e-6);
        let south = great_circle_bearing(41.0, -122.0, 40.0, -122.0);
        assert!((south - 180.0).abs() < 1e-6);
    }

    #[test]
    fn geographic_bearing_round_trip_to_sectors() {
        // 0 degrees = north = sector 2.
        assert_eq!(compass_sector(geographic_to_math_angle(0.0)), 2);
        assert_eq!(compass_sector(geographic_to_math_angle(90.0)), 0);
        assert_eq!(compass_sector(geographic_to_math_angle(180.0)), -2);
        assert_eq!(compass_sector(geographic_to_math_angle(270.0)).abs(), 4);
        // Overflowing bearings wrap after the transform.
        assert_eq!(compass_sector(geographic_to_math_angle(720.0)), 2);
        assert_eq!(compass_sector(geographic_to_math_angle(-90.0)).abs(), 4);
    }

    #[test]
    fn bounding_box_encloses_radius() {
        let ((min_lat, min_lon), (max_lat, max_lon)) =
            calculate_bounding_box(40.0, -122.0, 10.0);
        assert!(min_lat < 40.0 && 40.0 < max_lat);
        assert!(min_lon < -122.0 && -122.0 < max_lon);
        // Corners of the box are at least the radius away from the center.
        assert!(haversine_distance_km(40.0, -122.0, max_lat, -122.0) >= 9.99);
        assert!(haversine_distance_km(40.0, -122.0, 40.0, max_lon) >= 9.99);
    }

    #[test]
    fn haversine_of_identical_points_is_zero() {
        assert_eq!(haversine_distance_km(40.0, -122.0, 40.0, -122.0), 0.0);
    }
}

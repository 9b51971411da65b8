use serde::{Deserialize, Serialize};

/// Bounding box over the service area, derived from shape points with a
/// fallback to stop coordinates for bundles that ship no shapes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionBounds {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub latitude_span: f64,
    pub longitude_span: f64,
}

impl RegionBounds {
    /// Bounds from precomputed coordinate extremes.
    pub fn from_extremes(
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
    ) -> Self {
        Self {
            center_latitude: (min_lat + max_lat) / 2.0,
            center_longitude: (min_lon + max_lon) / 2.0,
            latitude_span: max_lat - min_lat,
            longitude_span: max_lon - min_lon,
        }
    }

    /// Bounds enclosing the given coordinates. Returns the zero bounds when
    /// the iterator is empty.
    pub fn enclosing<I>(coordinates: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut min_lon = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        let mut any = false;
        for (latitude, longitude) in coordinates {
            any = true;
            min_lat = min_lat.min(latitude);
            max_lat = max_lat.max(latitude);
            min_lon = min_lon.min(longitude);
            max_lon = max_lon.max(longitude);
        }
        if !any {
            return Self::default();
        }
        Self {
            center_latitude: (min_lat + max_lat) / 2.0,
            center_longitude: (min_lon + max_lon) / 2.0,
            latitude_span: max_lat - min_lat,
            longitude_span: max_lon - min_lon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enclosing_centers_the_box() {
        let bounds =
            RegionBounds::enclosing(vec![(40.0, -122.0), (41.0, -121.0)]);
        assert_eq!(bounds.center_latitude, 40.5);
        assert_eq!(bounds.center_longitude, -121.5);
        assert_eq!(bounds.latitude_span, 1.0);
        assert_eq!(bounds.longitude_span, 1.0);
    }

    #[test]
    fn enclosing_empty_is_zeroed() {
        assert_eq!(RegionBounds::enclosing(vec![]), RegionBounds::default());
    }
}

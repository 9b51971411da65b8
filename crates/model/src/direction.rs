use serde::{Deserialize, Serialize};
use utility::geo;

/// An 8-point compass direction, plus `Unknown` for stops whose facing could
/// not be determined (no geometry, opposing shapes, or too much dispersion).
///
/// Serialized as the rider-facing abbreviation (`"N"`, `"NE"`, ...); `Unknown`
/// serializes as the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "NE")]
    NorthEast,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "SE")]
    SouthEast,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "SW")]
    SouthWest,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "NW")]
    NorthWest,
    #[serde(rename = "")]
    Unknown,
}

impl CompassDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
            Self::Unknown => "",
        }
    }

    /// Buckets a mathematical angle (counterclockwise from east, radians)
    /// into one of the eight 45-degree sectors.
    pub fn from_math_angle(theta: f64) -> Self {
        match geo::compass_sector(theta) {
            0 => Self::East,
            1 => Self::NorthEast,
            2 => Self::North,
            3 => Self::NorthWest,
            4 | -4 => Self::West,
            -1 => Self::SouthEast,
            -2 => Self::South,
            -3 => Self::SouthWest,
            _ => Self::Unknown,
        }
    }
}

impl Default for CompassDirection {
    fn default() -> Self {
        Self::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn cardinal_angles_map_to_cardinal_directions() {
        assert_eq!(CompassDirection::from_math_angle(0.0), CompassDirection::East);
        assert_eq!(
            CompassDirection::from_math_angle(PI / 2.0),
            CompassDirection::North
        );
        assert_eq!(
            CompassDirection::from_math_angle(-PI / 2.0),
            CompassDirection::South
        );
        assert_eq!(CompassDirection::from_math_angle(PI), CompassDirection::West);
        assert_eq!(
            CompassDirection::from_math_angle(-PI),
            CompassDirection::West
        );
    }

    #[test]
    fn intercardinal_angles_map_to_intercardinal_directions() {
        assert_eq!(
            CompassDirection::from_math_angle(PI / 4.0),
            CompassDirection::NorthEast
        );
        assert_eq!(
            CompassDirection::from_math_angle(3.0 * PI / 4.0),
            CompassDirection::NorthWest
        );
        assert_eq!(
            CompassDirection::from_math_angle(-PI / 4.0),
            CompassDirection::SouthEast
        );
        assert_eq!(
            CompassDirection::from_math_angle(-3.0 * PI / 4.0),
            CompassDirection::SouthWest
        );
    }

    #[test]
    fn sector_boundaries_round_toward_the_counterclockwise_sector() {
        // Exactly 22.5 degrees belongs to the NE sector.
        assert_eq!(
            CompassDirection::from_math_angle(PI / 8.0),
            CompassDirection::NorthEast
        );
        // Just below stays E.
        assert_eq!(
            CompassDirection::from_math_angle(PI / 8.0 - 1e-9),
            CompassDirection::East
        );
    }
}

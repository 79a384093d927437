//! Geographical filter leaves and the location/distance types they use.
//!
//! Locations are given either as coordinates or as geohashes. The textual
//! forms accepted by [`GeoLocation::parse`] are `"lat,lon"` (anything with a
//! comma) and plain geohashes.
//!
//! # Examples
//!
//! ```
//! use sarissa_criteria::query::geo::{Distance, DistanceUnit, GeoLocation, GeoPoint};
//!
//! let location = GeoLocation::parse("45.7806,3.0875").unwrap();
//! assert_eq!(location, GeoLocation::Point(GeoPoint::new(45.7806, 3.0875).unwrap()));
//!
//! let location = GeoLocation::parse("u0qvy").unwrap();
//! assert_eq!(location, GeoLocation::geohash("u0qvy"));
//!
//! assert_eq!(Distance::new(20.7, DistanceUnit::Miles).to_string(), "20mi");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GeoDistanceType;

const GEOHASH_ALPHABET: &str = "0123456789bcdefghjkmnpqrstuvwxyz";
const GEOHASH_MAX_LEN: usize = 12;

/// Errors raised while interpreting geographical values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Latitude outside [-90, 90].
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180].
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),

    /// A "lat,lon" string that does not hold two numbers.
    #[error("Malformed point '{0}' (expected \"lat,lon\")")]
    MalformedPoint(String),

    /// A string that is not a geohash.
    #[error("Invalid geohash '{0}'")]
    InvalidGeohash(String),

    /// Corners that do not span a box.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),
}

/// A geographical point with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in degrees (-180 to 180)
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new geographical point.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::InvalidLongitude(lon));
        }

        Ok(GeoPoint { lat, lon })
    }

    /// Parse a `"lat,lon"` string.
    pub fn parse(text: &str) -> Result<Self, GeoError> {
        let malformed = || GeoError::MalformedPoint(text.to_string());
        let (lat, lon) = text.split_once(',').ok_or_else(malformed)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| malformed())?;
        let lon = lon.trim().parse::<f64>().map_err(|_| malformed())?;
        GeoPoint::new(lat, lon)
    }

    /// Check that the coordinates are in range.
    pub fn validate(&self) -> Result<(), GeoError> {
        GeoPoint::new(self.lat, self.lon).map(|_| ())
    }
}

/// A location given as coordinates or as a geohash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeoLocation {
    /// Coordinates.
    Point(GeoPoint),
    /// Geohash cell.
    Geohash {
        /// The geohash string.
        geohash: String,
    },
}

impl GeoLocation {
    /// Create a geohash location without validation.
    pub fn geohash<S: Into<String>>(geohash: S) -> Self {
        GeoLocation::Geohash {
            geohash: geohash.into(),
        }
    }

    /// Parse a `"lat,lon"` string or a geohash.
    pub fn parse(text: &str) -> Result<Self, GeoError> {
        if text.contains(',') {
            return GeoPoint::parse(text).map(GeoLocation::Point);
        }

        let valid = !text.is_empty()
            && text.len() <= GEOHASH_MAX_LEN
            && text.chars().all(|c| GEOHASH_ALPHABET.contains(c));
        if !valid {
            return Err(GeoError::InvalidGeohash(text.to_string()));
        }
        Ok(GeoLocation::geohash(text))
    }

    /// Get the coordinates, if this is a point.
    pub fn as_point(&self) -> Option<&GeoPoint> {
        match self {
            GeoLocation::Point(point) => Some(point),
            GeoLocation::Geohash { .. } => None,
        }
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoLocation::Point(point) => write!(f, "{},{}", point.lat, point.lon),
            GeoLocation::Geohash { geohash } => f.write_str(geohash),
        }
    }
}

/// Unit of a [`Distance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// Kilometers ("km").
    Kilometers,
    /// Miles ("mi").
    Miles,
}

impl DistanceUnit {
    /// Get the unit abbreviation used in distance strings.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }
}

/// A distance with a unit.
///
/// Rendered as the integer part of the value followed by the unit
/// abbreviation, e.g. `12km`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    /// Amount in `unit`.
    pub value: f64,
    /// Unit of `value`.
    pub unit: DistanceUnit,
}

impl Distance {
    /// Create a new distance.
    pub fn new(value: f64, unit: DistanceUnit) -> Self {
        Distance { value, unit }
    }

    /// Create a distance in kilometers.
    pub fn kilometers(value: f64) -> Self {
        Distance::new(value, DistanceUnit::Kilometers)
    }

    /// Create a distance in miles.
    pub fn miles(value: f64) -> Self {
        Distance::new(value, DistanceUnit::Miles)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value as i64, self.unit.abbreviation())
    }
}

/// A filter matching documents within a distance of a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoDistanceQuery {
    field: String,
    distance: String,
    #[serde(rename = "type")]
    distance_type: GeoDistanceType,
    location: GeoLocation,
}

impl GeoDistanceQuery {
    /// Create a new geo distance query.
    pub fn new<F, D>(
        field: F,
        location: GeoLocation,
        distance: D,
        distance_type: GeoDistanceType,
    ) -> Self
    where
        F: Into<String>,
        D: Into<String>,
    {
        GeoDistanceQuery {
            field: field.into(),
            distance: distance.into(),
            distance_type,
            location,
        }
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the formatted distance.
    pub fn distance(&self) -> &str {
        &self.distance
    }

    /// Get the distance calculation type.
    pub fn distance_type(&self) -> GeoDistanceType {
        self.distance_type
    }

    /// Get the center location.
    pub fn location(&self) -> &GeoLocation {
        &self.location
    }
}

impl fmt::Display for GeoDistanceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "geo_distance({}, {}, {})",
            self.field, self.location, self.distance
        )
    }
}

/// A filter matching documents inside a bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoBoundingBoxQuery {
    field: String,
    top_left: GeoLocation,
    bottom_right: GeoLocation,
}

impl GeoBoundingBoxQuery {
    /// Create a new bounding box query.
    ///
    /// When both corners are points, the top-left latitude must not be below
    /// the bottom-right latitude.
    pub fn new<F: Into<String>>(
        field: F,
        top_left: GeoLocation,
        bottom_right: GeoLocation,
    ) -> Result<Self, GeoError> {
        if let (Some(tl), Some(br)) = (top_left.as_point(), bottom_right.as_point()) {
            if tl.lat < br.lat {
                return Err(GeoError::InvalidBoundingBox(format!(
                    "top-left latitude {} is below bottom-right latitude {}",
                    tl.lat, br.lat
                )));
            }
        }

        Ok(GeoBoundingBoxQuery {
            field: field.into(),
            top_left,
            bottom_right,
        })
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the top-left corner.
    pub fn top_left(&self) -> &GeoLocation {
        &self.top_left
    }

    /// Get the bottom-right corner.
    pub fn bottom_right(&self) -> &GeoLocation {
        &self.bottom_right
    }
}

impl fmt::Display for GeoBoundingBoxQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "geo_bbox({}, {}, {})",
            self.field, self.top_left, self.bottom_right
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_creation() {
        let point = GeoPoint::new(40.7128, -74.0060).unwrap();
        assert_eq!(point.lat, 40.7128);
        assert_eq!(point.lon, -74.0060);

        assert_eq!(
            GeoPoint::new(91.0, 0.0).unwrap_err(),
            GeoError::InvalidLatitude(91.0)
        );
        assert_eq!(
            GeoPoint::new(0.0, 181.0).unwrap_err(),
            GeoError::InvalidLongitude(181.0)
        );
    }

    #[test]
    fn test_geo_point_parse() {
        let point = GeoPoint::parse(" 45.7806 , 3.0875 ").unwrap();
        assert_eq!(point, GeoPoint { lat: 45.7806, lon: 3.0875 });

        assert!(matches!(
            GeoPoint::parse("45.7806;3.0875"),
            Err(GeoError::MalformedPoint(_))
        ));
        assert!(matches!(
            GeoPoint::parse("north,3.0"),
            Err(GeoError::MalformedPoint(_))
        ));
        assert!(matches!(
            GeoPoint::parse("95.0,3.0"),
            Err(GeoError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn test_geohash_parse() {
        assert_eq!(
            GeoLocation::parse("u0qvy").unwrap(),
            GeoLocation::geohash("u0qvy")
        );
        // 'a' is not part of the geohash alphabet
        assert!(matches!(
            GeoLocation::parse("abc"),
            Err(GeoError::InvalidGeohash(_))
        ));
        assert!(GeoLocation::parse("").is_err());
        assert!(GeoLocation::parse("u0qvyu0qvyu0q").is_err());
    }

    #[test]
    fn test_distance_format() {
        assert_eq!(Distance::kilometers(12.9).to_string(), "12km");
        assert_eq!(Distance::miles(3.0).to_string(), "3mi");
    }

    #[test]
    fn test_geo_distance_query_json() {
        let query = GeoDistanceQuery::new(
            "location",
            GeoLocation::Point(GeoPoint::new(45.7806, 3.0875).unwrap()),
            "20km",
            GeoDistanceType::Plane,
        );
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "field": "location",
                "distance": "20km",
                "type": "plane",
                "location": {"lat": 45.7806, "lon": 3.0875}
            })
        );

        let query = GeoDistanceQuery::new(
            "location",
            GeoLocation::geohash("u0qvy"),
            "5mi",
            GeoDistanceType::Plane,
        );
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["location"], serde_json::json!({"geohash": "u0qvy"}));
    }

    #[test]
    fn test_geo_bounding_box_query() {
        let top_left = GeoLocation::Point(GeoPoint::new(41.0, -74.1).unwrap());
        let bottom_right = GeoLocation::Point(GeoPoint::new(40.0, -71.1).unwrap());

        let query =
            GeoBoundingBoxQuery::new("pin", top_left.clone(), bottom_right.clone()).unwrap();
        assert_eq!(query.top_left(), &top_left);
        assert_eq!(query.to_string(), "geo_bbox(pin, 41,-74.1, 40,-71.1)");

        assert!(matches!(
            GeoBoundingBoxQuery::new("pin", bottom_right, top_left),
            Err(GeoError::InvalidBoundingBox(_))
        ));
    }
}

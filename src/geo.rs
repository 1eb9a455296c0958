use serde::{Deserialize, Serialize};

/// A raw latitude/longitude pair as supplied by clients (device geolocation,
/// drop pin). Converted into a [`GeoPoint`] before persisting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum PointKind {
    Point,
}

/// Geographic point persisted in GeoJSON shape:
/// `{"type": "Point", "coordinates": [lng, lat]}`.
///
/// Coordinate order is longitude-first on the wire; the accessors hide that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    kind: PointKind,
    coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint {
            kind: PointKind::Point,
            coordinates: [lng, lat],
        }
    }

    pub fn from_lng_lat(coordinates: [f64; 2]) -> Self {
        GeoPoint {
            kind: PointKind::Point,
            coordinates,
        }
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn lng(&self) -> f64 {
        self.coordinates[0]
    }

    /// Haversine distance in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1 = self.lat().to_radians();
        let lat2 = other.lat().to_radians();
        let dlat = (other.lat() - self.lat()).to_radians();
        let dlon = (other.lng() - self.lng()).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

impl From<LatLng> for GeoPoint {
    fn from(value: LatLng) -> Self {
        GeoPoint::new(value.lat, value.lng)
    }
}

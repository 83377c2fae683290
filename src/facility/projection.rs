//! Latitude/longitude derivation for boundary coordinates
//!
//! Location events carry both the raw boundary coordinates and a WGS84 lat/lon
//! pair. Web Mercator positions are inverse-projected; geographic positions are
//! already lon/lat; anything else is passed through untouched.

use crate::facility::Position;

/// Spherical Web Mercator earth radius in metres
const EARTH_RADIUS: f64 = 6_378_137.0;

/// Spatial references recognised as Web Mercator
const WEB_MERCATOR_WKIDS: [u32; 3] = [3857, 102100, 900913];

/// Latitude/longitude of `position` expressed in the `wkid` spatial reference
///
/// Returns `(lat, lon)` in degrees.
pub fn to_lat_lon(position: Position, wkid: u32) -> (f64, f64) {
    if WEB_MERCATOR_WKIDS.contains(&wkid) {
        let lon = (position.x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (position.y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2)
            .to_degrees();
        (lat, lon)
    } else {
        // WGS84 (4326) is already lon/lat; unknown references pass through
        (position.y, position.x)
    }
}

/// Whether `wkid` gets a real inverse projection rather than a pass-through
pub fn is_projected(wkid: u32) -> bool {
    WEB_MERCATOR_WKIDS.contains(&wkid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_mercator_origin() {
        let (lat, lon) = to_lat_lon(Position::new(0.0, 0.0), 3857);
        assert!(lat.abs() < 1e-12);
        assert!(lon.abs() < 1e-12);
    }

    #[test]
    fn test_web_mercator_san_diego_convention_center() {
        // Roughly 32.7065 N, 117.1615 W
        let position = Position::new(-13_042_358.5, 3_856_411.2);
        let (lat, lon) = to_lat_lon(position, 3857);

        assert!((lon - -117.1615).abs() < 0.01, "lon was {}", lon);
        assert!((lat - 32.7065).abs() < 0.01, "lat was {}", lat);
    }

    #[test]
    fn test_geographic_passthrough() {
        let (lat, lon) = to_lat_lon(Position::new(-117.16, 32.70), 4326);
        assert_eq!(lat, 32.70);
        assert_eq!(lon, -117.16);
        assert!(!is_projected(4326));
        assert!(is_projected(102100));
    }
}

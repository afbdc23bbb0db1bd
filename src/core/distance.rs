use crate::domain::model::Coordinate;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points, rounded to whole meters.
pub fn haversine_meters(from: Coordinate, to: Coordinate) -> u64 {
    let lat1 = from.lat().to_radians();
    let lat2 = to.lat().to_radians();
    let dlat = (to.lat() - from.lat()).to_radians();
    let dlon = (to.lon() - from.lon()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Clamp so float noise near antipodes cannot push sqrt(1 - h) negative.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    (EARTH_RADIUS_METERS * c).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_identical_points_are_zero() {
        assert_eq!(haversine_meters(at(10.5, 20.7), at(10.5, 20.7)), 0);
        assert_eq!(haversine_meters(at(0.0, 0.0), at(0.0, 0.0)), 0);
        assert_eq!(haversine_meters(at(-89.9, 179.9), at(-89.9, 179.9)), 0);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let d = haversine_meters(at(0.0, 0.0), at(0.0, 1.0));
        assert!((111_000..=111_500).contains(&d), "unexpected distance: {}", d);
    }

    #[test]
    fn test_symmetric() {
        let helsinki = at(60.17012143, 24.92813512);
        let user = at(60.17094, 24.93087);
        assert_eq!(haversine_meters(helsinki, user), haversine_meters(user, helsinki));
    }

    #[test]
    fn test_short_hop() {
        // 0.005 degrees of longitude on the equator.
        assert_eq!(haversine_meters(at(0.0, 0.0), at(0.0, 0.005)), 556);
    }

    #[test]
    fn test_antipodes_half_circumference() {
        let d = haversine_meters(at(0.0, 0.0), at(0.0, 180.0));
        let expected = (std::f64::consts::PI * EARTH_RADIUS_METERS).round() as u64;
        assert_eq!(d, expected);
    }
}

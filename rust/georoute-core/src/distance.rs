//! Distance functions between (latitude, longitude) pairs given in degrees.

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Rough length of one degree of arc, used to convert thresholds between
/// degrees and kilometres.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Planar Euclidean distance in degrees. An approximation, not geodesic.
pub fn angular_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dlat = a.0 - b.0;
    let dlon = a.1 - b.1;
    (dlat * dlat + dlon * dlon).sqrt()
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Clamp guards against h drifting just above 1.0 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angular_is_planar_euclidean() {
        assert_eq!(angular_distance((0.0, 0.0), (3.0, 4.0)), 5.0);
        assert_eq!(angular_distance((1.0, 1.0), (1.0, 1.0)), 0.0);
        assert!((angular_distance((0.0, 0.0), (1.0, 1.0)) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn haversine_one_degree_on_equator() {
        let km = haversine_km((0.0, 0.0), (0.0, 1.0));
        assert!((km - 111.19).abs() < 0.01, "got {km}");
    }

    #[test]
    fn haversine_is_symmetric_and_zero_on_self() {
        let ny = (40.7128, -74.0060);
        let la = (34.0522, -118.2437);
        let d1 = haversine_km(ny, la);
        let d2 = haversine_km(la, ny);
        assert!((d1 - d2).abs() < 1e-9);
        assert!((d1 - 3935.7).abs() < 5.0, "got {d1}");
        assert_eq!(haversine_km(ny, ny), 0.0);
    }

    #[test]
    fn haversine_antipodes_is_half_circumference() {
        let km = haversine_km((0.0, 0.0), (0.0, 180.0));
        assert!((km - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }
}

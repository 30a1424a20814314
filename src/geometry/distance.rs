use crate::domain::Coordinate;

/// Mean Earth radius used by the spherical model
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres (Haversine).
///
/// A sphere is close enough at the sub-kilometre scale this is used for.
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

pub mod containment;
pub mod distance;

pub use containment::is_inside;
pub use distance::{EARTH_RADIUS_KM, distance_km};

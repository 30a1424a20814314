pub mod address;
pub mod area;
pub mod coordinate;

pub use address::{Address, AddressError, format_cep, is_valid_cep, normalize_cep};
pub use area::{AreaError, BoundaryPolygon, OperationalArea};
pub use coordinate::{Coordinate, CoordinateError};

use crate::domain::{BoundaryPolygon, Coordinate};

/// Point-in-polygon test using the even-odd rule.
///
/// A horizontal ray is cast eastward from `point`; every edge whose latitude
/// span strictly straddles the point and which crosses the ray toggles the
/// result. Points lying exactly on an edge or vertex may land either way.
/// Works for either winding order.
pub fn is_inside(point: &Coordinate, polygon: &BoundaryPolygon) -> bool {
    let vertices = polygon.vertices();
    let (lat, lng) = (point.latitude, point.longitude);

    let mut inside = false;
    let mut j = vertices.len().wrapping_sub(1);

    for (i, vi) in vertices.iter().enumerate() {
        let vj = &vertices[j];
        let (yi, xi) = (vi.latitude, vi.longitude);
        let (yj, xj) = (vj.latitude, vj.longitude);

        // (yi > lat) != (yj > lat) guarantees yj != yi, so the division is safe
        if (yi > lat) != (yj > lat) && lng < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }

        j = i;
    }

    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OperationalArea;
    use geo::Contains;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn square() -> BoundaryPolygon {
        BoundaryPolygon::new(vec![
            c(0.0, 0.0),
            c(0.0, 2.0),
            c(2.0, 2.0),
            c(2.0, 0.0),
            c(0.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_square_inside_and_outside() {
        let poly = square();
        assert!(is_inside(&c(1.0, 1.0), &poly));
        assert!(!is_inside(&c(5.0, 5.0), &poly));
        assert!(!is_inside(&c(1.0, -1.0), &poly));
        assert!(!is_inside(&c(1.0, 3.0), &poly));
    }

    #[test]
    fn test_winding_order_agnostic() {
        let mut reversed: Vec<Coordinate> = square().vertices().to_vec();
        reversed.reverse();
        let poly = BoundaryPolygon::new(reversed).unwrap();

        assert!(is_inside(&c(1.0, 1.0), &poly));
        assert!(!is_inside(&c(5.0, 5.0), &poly));
    }

    #[test]
    fn test_concave_notch() {
        // U shape opening to the north; the notch itself is outside
        let poly = BoundaryPolygon::new(vec![
            c(0.0, 0.0),
            c(3.0, 0.0),
            c(3.0, 1.0),
            c(1.0, 1.0),
            c(1.0, 2.0),
            c(3.0, 2.0),
            c(3.0, 3.0),
            c(0.0, 3.0),
        ])
        .unwrap();

        assert!(is_inside(&c(2.0, 0.5), &poly));
        assert!(is_inside(&c(2.0, 2.5), &poly));
        assert!(!is_inside(&c(2.0, 1.5), &poly));
        assert!(is_inside(&c(0.5, 1.5), &poly));
    }

    #[test]
    fn test_tayama_park_matches_geo_contains() {
        let area = OperationalArea::tayama_park();
        let polygon = area.boundary.to_polygon();

        let samples = [
            c(-20.445, -54.570),
            c(-20.443, -54.5700),
            c(-20.4470, -54.5695),
            c(-20.4524, -54.57015),
            c(-20.440, -54.570),
            c(-20.445, -54.565),
            c(-20.445, -54.575),
        ];

        for p in samples {
            assert_eq!(
                is_inside(&p, &area.boundary),
                polygon.contains(&p.to_point()),
                "disagreement at {p}"
            );
        }
        assert!(is_inside(&c(-20.445, -54.570), &area.boundary));
    }
}

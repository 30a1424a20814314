use geo::{BoundingRect, Centroid, LineString, Polygon};

use super::Coordinate;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AreaError {
    #[error("boundary needs at least 4 points including the closing one, got {0}")]
    TooFewVertices(usize),
    #[error("fallback radius must be a non-negative number of km, got {0}")]
    InvalidRadius(f64),
    #[error("area must accept at least one name token")]
    NoNameTokens,
}

/// Closed ring describing the operational boundary.
///
/// The first and last vertices are always equal. Self-intersection is not
/// checked; rings are hand-authored.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPolygon {
    vertices: Vec<Coordinate>,
}

impl BoundaryPolygon {
    /// Build a ring from its vertices, closing it if the last vertex does
    /// not repeat the first.
    pub fn new(mut vertices: Vec<Coordinate>) -> Result<Self, AreaError> {
        if let Some(first) = vertices.first().copied()
            && vertices.last() != Some(&first)
        {
            vertices.push(first);
        }

        if vertices.len() < 4 {
            return Err(AreaError::TooFewVertices(vertices.len()));
        }

        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        let ring: LineString<f64> = self.vertices.iter().map(|c| c.to_coord()).collect();
        Polygon::new(ring, vec![])
    }

    /// (south-west, north-east) corners
    pub fn bounding_box(&self) -> Option<(Coordinate, Coordinate)> {
        let rect = self.to_polygon().bounding_rect()?;
        let sw = Coordinate::new(rect.min().y, rect.min().x).ok()?;
        let ne = Coordinate::new(rect.max().y, rect.max().x).ok()?;
        Some((sw, ne))
    }

    pub fn centroid(&self) -> Option<Coordinate> {
        let p = self.to_polygon().centroid()?;
        Coordinate::new(p.y(), p.x()).ok()
    }
}

/// Everything the validator needs to know about one operational area.
///
/// Kept separate from the validator so the same engine can serve a
/// different neighbourhood by swapping configuration.
#[derive(Debug, Clone)]
pub struct OperationalArea {
    pub name: String,
    pub boundary: BoundaryPolygon,
    pub center: Coordinate,
    pub radius_km: f64,
    pub name_tokens: Vec<String>,
    pub city: String,
    pub state_abbreviation: String,
    pub state_name: String,
}

pub const TAYAMA_PARK_BOUNDARY: [(f64, f64); 6] = [
    (-20.44197, -54.57016),
    (-20.44337, -54.57151),
    (-20.44774, -54.57087),
    (-20.44731, -54.56851),
    (-20.44245, -54.56937),
    (-20.44197, -54.57016),
];

pub const TAYAMA_PARK_CENTER: (f64, f64) = (-20.44774, -54.57015);

pub const DEFAULT_RADIUS_KM: f64 = 1.0;

impl OperationalArea {
    /// Validate the pieces and assemble an area.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        boundary: BoundaryPolygon,
        center: Coordinate,
        radius_km: f64,
        name_tokens: Vec<String>,
        city: impl Into<String>,
        state_abbreviation: impl Into<String>,
        state_name: impl Into<String>,
    ) -> Result<Self, AreaError> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(AreaError::InvalidRadius(radius_km));
        }
        let name_tokens: Vec<String> = name_tokens
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .collect();
        if name_tokens.is_empty() {
            return Err(AreaError::NoNameTokens);
        }

        Ok(Self {
            name: name.into(),
            boundary,
            center,
            radius_km,
            name_tokens,
            city: city.into(),
            state_abbreviation: state_abbreviation.into(),
            state_name: state_name.into(),
        })
    }

    /// Tayamã Park, Campo Grande - MS.
    pub fn tayama_park() -> Self {
        Self {
            name: "Tayamã Park".to_string(),
            boundary: BoundaryPolygon {
                vertices: TAYAMA_PARK_BOUNDARY
                    .iter()
                    .map(|&(latitude, longitude)| Coordinate {
                        latitude,
                        longitude,
                    })
                    .collect(),
            },
            center: Coordinate {
                latitude: TAYAMA_PARK_CENTER.0,
                longitude: TAYAMA_PARK_CENTER.1,
            },
            radius_km: DEFAULT_RADIUS_KM,
            name_tokens: default_name_tokens(),
            city: "Campo Grande".to_string(),
            state_abbreviation: "MS".to_string(),
            state_name: "Mato Grosso do Sul".to_string(),
        }
    }
}

pub fn default_name_tokens() -> Vec<String> {
    ["tayamã", "tayama", "tayamã park", "tayama park"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_open_ring_is_closed() {
        let ring = BoundaryPolygon::new(vec![c(0.0, 0.0), c(0.0, 2.0), c(2.0, 2.0), c(2.0, 0.0)])
            .unwrap();
        assert_eq!(ring.vertices().len(), 5);
        assert_eq!(ring.vertices().first(), ring.vertices().last());
    }

    #[test]
    fn test_degenerate_ring_rejected() {
        let err = BoundaryPolygon::new(vec![c(0.0, 0.0), c(1.0, 1.0)]).unwrap_err();
        assert_eq!(err, AreaError::TooFewVertices(3));
        assert!(BoundaryPolygon::new(Vec::new()).is_err());
    }

    #[test]
    fn test_bounding_box_and_centroid() {
        let ring = BoundaryPolygon::new(vec![
            c(0.0, 0.0),
            c(0.0, 2.0),
            c(2.0, 2.0),
            c(2.0, 0.0),
            c(0.0, 0.0),
        ])
        .unwrap();

        let (sw, ne) = ring.bounding_box().unwrap();
        assert_eq!(sw, c(0.0, 0.0));
        assert_eq!(ne, c(2.0, 2.0));

        let centroid = ring.centroid().unwrap();
        assert!((centroid.latitude - 1.0).abs() < 1e-9);
        assert!((centroid.longitude - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tayama_park_defaults() {
        let area = OperationalArea::tayama_park();
        assert_eq!(area.boundary.vertices().len(), 6);
        assert_eq!(
            area.boundary.vertices().first(),
            area.boundary.vertices().last()
        );
        assert_eq!(area.radius_km, 1.0);
        assert_eq!(area.state_abbreviation, "MS");
    }

    #[test]
    fn test_area_rejects_bad_radius_and_tokens() {
        let base = OperationalArea::tayama_park();
        let err = OperationalArea::new(
            "x",
            base.boundary.clone(),
            base.center,
            -1.0,
            default_name_tokens(),
            "Campo Grande",
            "MS",
            "Mato Grosso do Sul",
        )
        .unwrap_err();
        assert_eq!(err, AreaError::InvalidRadius(-1.0));

        let err = OperationalArea::new(
            "x",
            base.boundary,
            base.center,
            1.0,
            vec!["  ".to_string()],
            "Campo Grande",
            "MS",
            "Mato Grosso do Sul",
        )
        .unwrap_err();
        assert_eq!(err, AreaError::NoNameTokens);
    }
}

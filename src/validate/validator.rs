use serde::Serialize;
use tracing::{debug, info};

use super::matcher::FoldedText;
use crate::api::Geocoder;
use crate::domain::{Address, Coordinate, OperationalArea};
use crate::geometry::{distance_km, is_inside};

/// Which path produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The geocoder had nothing for this address
    Unresolved,
    /// Strictly inside the boundary polygon
    Inside,
    /// Outside the polygon, but the address names the area, city and state
    /// and lies within the fallback radius
    AcceptedByFallback,
    /// Outside the polygon and the fallback did not hold
    Outside,
}

impl Verdict {
    /// Whether this verdict lets the address through.
    pub fn is_valid(self) -> bool {
        matches!(self, Verdict::Inside | Verdict::AcceptedByFallback)
    }
}

/// Answer returned for every validated address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Geocoded location; `None` only when the verdict is `Unresolved`
    pub coordinates: Option<Coordinate>,
    pub verdict: Verdict,
}

impl ValidationResult {
    /// Result for an address the geocoder could not place.
    pub fn unresolved() -> Self {
        Self {
            is_valid: false,
            coordinates: None,
            verdict: Verdict::Unresolved,
        }
    }

    /// Result for a geocoded address; `is_valid` follows the verdict.
    pub fn resolved(coordinates: Coordinate, verdict: Verdict) -> Self {
        Self {
            is_valid: verdict.is_valid(),
            coordinates: Some(coordinates),
            verdict,
        }
    }
}

/// Outcome of each fallback condition, kept separate for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FallbackChecks {
    /// Text contains one of the area's name tokens
    pub names_area: bool,
    /// Distance from the coordinate to the area centre
    pub distance_km: f64,
    /// `distance_km` is within the radius (inclusive)
    pub near_center: bool,
    /// Text contains the city and either the state abbreviation or name
    pub names_city_and_state: bool,
}

impl FallbackChecks {
    /// Evaluate every fallback condition for a coordinate outside the boundary.
    ///
    /// # Arguments
    /// * `area` - Operational area supplying tokens, centre and radius
    /// * `address` - Address text as given to the geocoder
    /// * `coordinate` - Where the geocoder placed it
    ///
    /// # Returns
    /// Each condition's outcome; nothing is short-circuited.
    pub fn evaluate(area: &OperationalArea, address: &str, coordinate: &Coordinate) -> Self {
        let text = FoldedText::new(address);
        let distance = distance_km(coordinate, &area.center);

        // abbreviations are two letters, so they must at least start a word
        let names_state = text.contains_word_start(&area.state_abbreviation)
            || text.contains_phrase(&area.state_name);

        Self {
            names_area: text.contains_any(area.name_tokens.as_slice()),
            distance_km: distance,
            near_center: distance <= area.radius_km,
            names_city_and_state: text.contains_phrase(&area.city) && names_state,
        }
    }

    /// True only when all three conditions hold.
    pub fn passed(&self) -> bool {
        self.names_area && self.near_center && self.names_city_and_state
    }
}

/// Decides whether addresses belong to an operational area.
///
/// The geocoder is injected so tests can substitute a fake and callers can
/// choose their provider chain. The validator itself holds no mutable state.
pub struct AddressValidator<G> {
    area: OperationalArea,
    geocoder: G,
}

impl<G: Geocoder> AddressValidator<G> {
    pub fn new(area: OperationalArea, geocoder: G) -> Self {
        Self { area, geocoder }
    }

    /// The area addresses are checked against.
    pub fn area(&self) -> &OperationalArea {
        &self.area
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Geocode `address` and classify the result.
    ///
    /// Never fails: a missing geocoding result is reported as an invalid,
    /// unresolved address.
    pub fn validate(&self, address: &str) -> ValidationResult {
        let Some(coordinate) = self.geocoder.geocode(address) else {
            info!(address, "address could not be geocoded");
            return ValidationResult::unresolved();
        };

        let verdict = self.classify(address, &coordinate);
        info!(address, %coordinate, ?verdict, "address validated");
        ValidationResult::resolved(coordinate, verdict)
    }

    /// Validate a structured address through its single-line form.
    pub fn validate_address(&self, address: &Address) -> ValidationResult {
        self.validate(&address.full_address())
    }

    /// Classify an already-geocoded address against this validator's area.
    pub fn classify(&self, address: &str, coordinate: &Coordinate) -> Verdict {
        classify(&self.area, address, coordinate)
    }
}

/// Classify an already-resolved coordinate. No network access.
///
/// Strict containment wins; otherwise every fallback condition must hold.
pub fn classify(area: &OperationalArea, address: &str, coordinate: &Coordinate) -> Verdict {
    if is_inside(coordinate, &area.boundary) {
        return Verdict::Inside;
    }

    let checks = FallbackChecks::evaluate(area, address, coordinate);
    debug!(?checks, "outside boundary, fallback evaluated");

    if checks.passed() {
        Verdict::AcceptedByFallback
    } else {
        Verdict::Outside
    }
}

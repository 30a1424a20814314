use serde::{Deserialize, Serialize};

/// Country suffix appended to every geocoding query.
pub const COUNTRY: &str = "Brasil";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("CEP must look like 00000-000, got {0:?}")]
    InvalidCep(String),
    #[error("{field} must have at least {min} characters")]
    TooShort { field: &'static str, min: usize },
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("state must be a 2-letter abbreviation, got {0:?}")]
    InvalidState(String),
}

/// A postal address as entered in the address form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Postal code, with or without the dash
    pub cep: String,
    pub street: String,
    /// House number, kept as text ("S/N", "12A")
    pub number: String,
    #[serde(default)]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    /// Two-letter state abbreviation (UF)
    pub state: String,
    /// Free-form label such as "Home" or "Office"
    #[serde(default)]
    pub description: String,
    /// Marks the user's preferred address
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Check every form rule and report all violations at once.
    pub fn validate(&self) -> Result<(), Vec<AddressError>> {
        let mut errors = Vec::new();

        if self.cep.trim().is_empty() {
            errors.push(AddressError::Missing("cep"));
        } else if !is_valid_cep(&self.cep) {
            errors.push(AddressError::InvalidCep(self.cep.clone()));
        }

        check_min_len(&mut errors, "street", &self.street, 2);

        if self.number.trim().is_empty() {
            errors.push(AddressError::Missing("number"));
        }

        check_min_len(&mut errors, "neighborhood", &self.neighborhood, 2);
        check_min_len(&mut errors, "city", &self.city, 2);

        let state = self.state.trim();
        if state.is_empty() {
            errors.push(AddressError::Missing("state"));
        } else if state.chars().count() != 2 {
            errors.push(AddressError::InvalidState(self.state.clone()));
        }

        check_min_len(&mut errors, "description", &self.description, 3);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Whether enough fields are filled in to attempt a location check.
    pub fn is_locatable(&self) -> bool {
        [&self.street, &self.number, &self.city, &self.state]
            .iter()
            .all(|f| !f.trim().is_empty())
    }

    /// Single-line address handed to the geocoder.
    pub fn full_address(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}, {}",
            self.street.trim(),
            self.number.trim(),
            self.neighborhood.trim(),
            self.city.trim(),
            self.state.trim(),
            COUNTRY
        )
    }
}

fn check_min_len(errors: &mut Vec<AddressError>, field: &'static str, value: &str, min: usize) {
    let len = value.trim().chars().count();
    if len == 0 {
        errors.push(AddressError::Missing(field));
    } else if len < min {
        errors.push(AddressError::TooShort { field, min });
    }
}

/// Keep only the digits of a CEP.
pub fn normalize_cep(cep: &str) -> String {
    cep.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Render a CEP as `00000-000`. Inputs that do not carry exactly 8 digits
/// come back as their digits only.
pub fn format_cep(cep: &str) -> String {
    let digits = normalize_cep(cep);
    if digits.len() == 8 {
        format!("{}-{}", &digits[..5], &digits[5..])
    } else {
        digits
    }
}

/// `00000000` or `00000-000`, nothing else.
pub fn is_valid_cep(cep: &str) -> bool {
    let bytes = cep.as_bytes();
    match bytes.len() {
        8 => bytes.iter().all(u8::is_ascii_digit),
        9 => {
            bytes[5] == b'-'
                && bytes[..5].iter().all(u8::is_ascii_digit)
                && bytes[6..].iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

pub mod matcher;
pub mod validator;

pub use matcher::FoldedText;
pub use validator::{AddressValidator, FallbackChecks, ValidationResult, Verdict, classify};

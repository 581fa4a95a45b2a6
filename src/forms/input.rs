use std::fmt;
use thiserror::Error;

/// Why a form could not be turned into a request
#[derive(Debug, Clone, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be a number, got {input:?}")]
    NotANumber { field: &'static str, input: String },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("curve point {index} does not increase in current")]
    NonMonotonic { index: usize },

    #[error("no parent record selected")]
    NoParent,

    #[error("invalid input: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// A finite number greater than zero, parsed from user text
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PositiveNumber(f64);

impl PositiveNumber {
    /// Parse required numeric input. Empty, non-numeric, NaN, infinite and
    /// non-positive text is rejected.
    pub fn parse(field: &'static str, text: &str) -> Result<Self, FormError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(FormError::Required(field));
        }
        let value: f64 = trimmed.parse().map_err(|_| FormError::NotANumber {
            field,
            input: text.to_string(),
        })?;
        if !value.is_finite() {
            return Err(FormError::NotANumber {
                field,
                input: text.to_string(),
            });
        }
        if value <= 0.0 {
            return Err(FormError::NotPositive { field, value });
        }
        Ok(Self(value))
    }

    /// Like [`parse`](Self::parse), but blank text means "not given".
    pub fn parse_optional(field: &'static str, text: &str) -> Result<Option<Self>, FormError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        Self::parse(field, text).map(Some)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl fmt::Display for PositiveNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trimmed non-empty text
pub fn required_text(field: &'static str, text: &str) -> Result<String, FormError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FormError::Required(field));
    }
    Ok(trimmed.to_string())
}

/// Trimmed text, or `None` when blank
pub fn optional_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

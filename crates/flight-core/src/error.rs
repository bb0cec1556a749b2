//! Error taxonomy.
//!
//! Two kinds of failure reach a caller and are always rendered apart:
//!
//! * [`ValidationError`]: an argument was rejected before any data
//!   source was consulted. Names the field and the rejected value.
//! * [`FlightError`]: the data source could not answer (provider
//!   failures, reference-table misses).
//!
//! [`CallError`] joins them with an `Internal` variant for anything the
//! dispatcher did not anticipate. Every error exposes a stable
//! machine-readable [`code`](CallError::code).

use std::fmt;
use thiserror::Error;

/// Why a date argument was rejected.
///
/// All three share the external kind `InvalidDateFormat`; the problem
/// only changes the explanation given to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateProblem {
    /// Not of the form `YYYY-MM-DD`.
    Malformed,
    /// Well-formed but not a real calendar date (e.g. `2030-02-30`).
    NotACalendarDate,
    /// Strictly before the day of the call.
    InPast,
}

/// The constraint a rejected argument violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    InvalidAirportCode,
    InvalidDateFormat(DateProblem),
    InvalidFlightNumber,
    InvalidPassengerCount,
    InvalidTravelClass,
    InvalidAirlineCode,
    /// Destination equals origin.
    SameAsOrigin,
    /// Return date is on or before the departure date.
    NotAfterDeparture,
}

impl ValidationKind {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationKind::InvalidAirportCode => "invalid_airport_code",
            ValidationKind::InvalidDateFormat(_) => "invalid_date_format",
            ValidationKind::InvalidFlightNumber => "invalid_flight_number",
            ValidationKind::InvalidPassengerCount => "invalid_passenger_count",
            ValidationKind::InvalidTravelClass => "invalid_travel_class",
            ValidationKind::InvalidAirlineCode => "invalid_airline_code",
            ValidationKind::SameAsOrigin => "same_origin_destination",
            ValidationKind::NotAfterDeparture => "return_not_after_departure",
        }
    }

    fn constraint(&self) -> &'static str {
        match self {
            ValidationKind::InvalidAirportCode => {
                "must be exactly 3 letters (e.g., LAX, JFK, LHR)"
            }
            ValidationKind::InvalidDateFormat(DateProblem::Malformed) => {
                "must be in YYYY-MM-DD format"
            }
            ValidationKind::InvalidDateFormat(DateProblem::NotACalendarDate) => {
                "is not a valid calendar date"
            }
            ValidationKind::InvalidDateFormat(DateProblem::InPast) => "cannot be in the past",
            ValidationKind::InvalidFlightNumber => {
                "must be 2-3 letters followed by 1-4 digits (e.g., AA123, DL456)"
            }
            ValidationKind::InvalidPassengerCount => "must be a whole number between 1 and 9",
            ValidationKind::InvalidTravelClass => {
                "must be one of: economy, premium_economy, business, first"
            }
            ValidationKind::InvalidAirlineCode => "must be 2-3 letters (e.g., AA, DL, UA)",
            ValidationKind::SameAsOrigin => "must be different from the origin airport",
            ValidationKind::NotAfterDeparture => "must be after the departure date",
        }
    }
}

/// An argument rejected by the validation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Argument name as it appears in the tool schema.
    pub field: &'static str,
    /// The rejected input, or an empty string when it was absent.
    pub value: String,
    pub kind: ValidationKind,
}

impl ValidationError {
    pub fn new(field: &'static str, value: impl Into<String>, kind: ValidationKind) -> Self {
        Self {
            field,
            value: value.into(),
            kind,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.kind.constraint())?;
        if self.value.is_empty() {
            write!(f, " (no value given)")
        } else {
            write!(f, " (got {:?})", self.value)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Structured detail reported by the flight-data provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderDetail {
    pub status: Option<u16>,
    pub code: Option<String>,
    pub title: Option<String>,
    pub detail: Option<String>,
}

impl fmt::Display for ProviderDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(status) = self.status {
            parts.push(format!("status {}", status));
        }
        if let Some(code) = &self.code {
            parts.push(format!("code {}", code));
        }
        if let Some(title) = &self.title {
            parts.push(title.clone());
        }
        if let Some(detail) = &self.detail {
            parts.push(detail.clone());
        }
        f.write_str(&parts.join(", "))
    }
}

/// A failure of the data source behind an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlightError {
    #[error("Invalid airport code: {message}")]
    InvalidAirportCode {
        message: String,
        provider: Option<ProviderDetail>,
    },

    #[error("Invalid date: {message}")]
    InvalidDateFormat {
        message: String,
        provider: Option<ProviderDetail>,
    },

    #[error("No flights found: {message}")]
    FlightNotFound { message: String },

    #[error("Airline information not found for code: {code}")]
    AirlineNotFound { code: String },

    #[error("Flight data provider rate limit reached: {message}")]
    ApiRateLimit { message: String },

    #[error("Flight data provider unavailable: {message}")]
    ApiUnavailable {
        message: String,
        provider: Option<ProviderDetail>,
    },

    #[error("Network error contacting flight data provider: {message}")]
    NetworkError { message: String },

    #[error("{message}")]
    GeneralError { message: String },
}

impl FlightError {
    pub fn code(&self) -> &'static str {
        match self {
            FlightError::InvalidAirportCode { .. } => "invalid_airport_code",
            FlightError::InvalidDateFormat { .. } => "invalid_date_format",
            FlightError::FlightNotFound { .. } => "flight_not_found",
            FlightError::AirlineNotFound { .. } => "airline_not_found",
            FlightError::ApiRateLimit { .. } => "api_rate_limit",
            FlightError::ApiUnavailable { .. } => "api_unavailable",
            FlightError::NetworkError { .. } => "network_error",
            FlightError::GeneralError { .. } => "general_error",
        }
    }

    pub fn provider_detail(&self) -> Option<&ProviderDetail> {
        match self {
            FlightError::InvalidAirportCode { provider, .. }
            | FlightError::InvalidDateFormat { provider, .. }
            | FlightError::ApiUnavailable { provider, .. } => provider.as_ref(),
            _ => None,
        }
    }

    pub fn airport_not_found(code: &str) -> Self {
        FlightError::InvalidAirportCode {
            message: format!("Airport information not found for code: {}", code),
            provider: None,
        }
    }

    pub fn no_flights() -> Self {
        FlightError::FlightNotFound {
            message: "No flights found for the specified criteria".to_string(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        FlightError::ApiUnavailable {
            message: message.into(),
            provider: None,
        }
    }
}

/// Any failure of a single operation call.
#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Domain(#[from] FlightError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CallError {
    pub fn code(&self) -> &'static str {
        match self {
            CallError::Validation(_) => "validation_error",
            CallError::Domain(e) => e.code(),
            CallError::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field_and_value() {
        let err = ValidationError::new("origin", "LA", ValidationKind::InvalidAirportCode);
        let msg = err.to_string();
        assert!(msg.starts_with("origin must be exactly 3 letters"));
        assert!(msg.contains("\"LA\""));
    }

    #[test]
    fn test_validation_message_for_missing_value() {
        let err = ValidationError::new("airport_code", "", ValidationKind::InvalidAirportCode);
        assert!(err.to_string().ends_with("(no value given)"));
    }

    #[test]
    fn test_date_problems_share_kind_code() {
        for problem in [
            DateProblem::Malformed,
            DateProblem::NotACalendarDate,
            DateProblem::InPast,
        ] {
            assert_eq!(
                ValidationKind::InvalidDateFormat(problem).code(),
                "invalid_date_format"
            );
        }
    }

    #[test]
    fn test_call_error_codes() {
        let v: CallError =
            ValidationError::new("adults", "12", ValidationKind::InvalidPassengerCount).into();
        assert_eq!(v.code(), "validation_error");

        let d: CallError = FlightError::AirlineNotFound {
            code: "ZZ".to_string(),
        }
        .into();
        assert_eq!(d.code(), "airline_not_found");

        assert_eq!(CallError::Internal("boom".to_string()).code(), "internal");
    }

    #[test]
    fn test_provider_detail_display() {
        let detail = ProviderDetail {
            status: Some(400),
            code: Some("477".to_string()),
            title: Some("INVALID FORMAT".to_string()),
            detail: None,
        };
        assert_eq!(detail.to_string(), "status 400, code 477, INVALID FORMAT");
    }
}

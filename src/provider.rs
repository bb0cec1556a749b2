//! Flight-data provider abstraction and failure mapping.
//!
//! [`FlightProvider`] is the seam between the dispatcher and a live data
//! source. The HTTP implementation lives in [`crate::amadeus`]; tests
//! substitute in-memory providers.
//!
//! Raw transport and HTTP failures are collected as [`ProviderFailure`]
//! and classified into the domain taxonomy here, so no transport error
//! type ever leaves the provider boundary.
//!
//! # Search failure precedence
//!
//! | Condition | Kind |
//! |-----------|------|
//! | success with no usable offers | `FlightNotFound` (decided by the client) |
//! | structured error about a location | `InvalidAirportCode` |
//! | structured error about a date | `InvalidDateFormat` |
//! | any other structured error | `ApiUnavailable` with code and detail |
//! | DNS / connection failure | `NetworkError` |
//! | HTTP 429 without an error body | `ApiRateLimit` |
//! | anything else | `ApiUnavailable` with the original message |

use async_trait::async_trait;
use flight_core::error::ProviderDetail;
use flight_core::{AirportRecord, FlightError, FlightOffer, SearchCriteria};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A live source of flight offers and airport records.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    /// Short provider name used in logs and output annotations.
    fn name(&self) -> &str;

    /// Offers for validated criteria, in provider order. Never empty on success.
    async fn search_flights(&self, criteria: &SearchCriteria)
        -> Result<Vec<FlightOffer>, FlightError>;

    /// Airport record for a validated, uppercase IATA code.
    async fn airport(&self, code: &str) -> Result<AirportRecord, FlightError>;
}

/// One entry of a provider error envelope (`{"errors": [...]}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderErrorItem {
    #[serde(default)]
    pub status: Option<u16>,
    /// Numeric or string code, depending on the endpoint.
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub source: Option<ErrorSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorSource {
    #[serde(default)]
    pub parameter: Option<String>,
    #[serde(default)]
    pub pointer: Option<String>,
}

/// Provider code for "INVALID DATE".
const INVALID_DATE_CODE: &str = "425";

impl ProviderErrorItem {
    pub fn code_str(&self) -> Option<String> {
        match &self.code {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    fn parameter(&self) -> String {
        self.source
            .as_ref()
            .and_then(|s| s.parameter.as_deref().or(s.pointer.as_deref()))
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    fn title_upper(&self) -> String {
        self.title.as_deref().unwrap_or_default().to_ascii_uppercase()
    }

    fn is_location_error(&self) -> bool {
        self.parameter().contains("location") || self.title_upper().contains("LOCATION")
    }

    fn is_date_error(&self) -> bool {
        self.code_str().as_deref() == Some(INVALID_DATE_CODE)
            || self.parameter().contains("date")
            || self.title_upper().contains("DATE")
    }

    fn to_detail(&self, status: u16) -> ProviderDetail {
        ProviderDetail {
            status: Some(self.status.unwrap_or(status)),
            code: self.code_str(),
            title: self.title.clone(),
            detail: self.detail.clone(),
        }
    }

    fn message(&self) -> String {
        self.detail
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| "provider rejected the request".to_string())
    }
}

/// Error envelope returned by the provider on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ProviderErrorItem>,
}

/// A failed provider exchange, before classification.
#[derive(Debug, Error)]
pub enum ProviderFailure {
    #[error("provider returned HTTP {status}: {body}")]
    Status {
        status: u16,
        errors: Vec<ProviderErrorItem>,
        body: String,
    },

    #[error("could not connect to provider: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

impl ProviderFailure {
    /// Build a status failure from a response body, parsing the error envelope if present.
    pub fn from_response(status: u16, body: String) -> Self {
        let errors = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.errors)
            .unwrap_or_default();
        ProviderFailure::Status {
            status,
            errors,
            body,
        }
    }
}

/// Classify a failed search exchange.
pub fn map_search_failure(failure: ProviderFailure) -> FlightError {
    match failure {
        ProviderFailure::Status { status, errors, .. } if !errors.is_empty() => {
            if let Some(item) = errors.iter().find(|e| e.is_location_error()) {
                return FlightError::InvalidAirportCode {
                    message: item.message(),
                    provider: Some(item.to_detail(status)),
                };
            }
            if let Some(item) = errors.iter().find(|e| e.is_date_error()) {
                return FlightError::InvalidDateFormat {
                    message: item.message(),
                    provider: Some(item.to_detail(status)),
                };
            }
            let first = &errors[0];
            FlightError::ApiUnavailable {
                message: first.message(),
                provider: Some(first.to_detail(status)),
            }
        }
        ProviderFailure::Status { status: 429, body, .. } => FlightError::ApiRateLimit {
            message: if body.is_empty() {
                "too many requests".to_string()
            } else {
                body
            },
        },
        ProviderFailure::Connect(message) => FlightError::NetworkError { message },
        other => FlightError::unavailable(other.to_string()),
    }
}

/// Classify a failed airport lookup; every failure is an unavailable provider.
pub fn map_lookup_failure(failure: ProviderFailure) -> FlightError {
    let provider = match &failure {
        ProviderFailure::Status { status, errors, .. } => {
            errors.first().map(|e| e.to_detail(*status))
        }
        _ => None,
    };
    FlightError::ApiUnavailable {
        message: failure.to_string(),
        provider,
    }
}

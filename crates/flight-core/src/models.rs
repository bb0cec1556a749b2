//! Core data types for flight queries.
//!
//! Every type here is request-scoped: it is built while handling one
//! call and dropped when the response is produced. Nothing persists.
//!
//! | Type | Produced by |
//! |------|-------------|
//! | [`SearchCriteria`] | validation of `search_flights` arguments |
//! | [`FlightOffer`] | provider normalization or the synthetic generator |
//! | [`AirportRecord`] | provider location lookup or the reference table |
//! | [`FlightStatusRecord`] | the synthetic generator only |
//! | [`AirlineRecord`] | the reference table only |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Service tier requested for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl TravelClass {
    pub const ALL: [TravelClass; 4] = [
        TravelClass::Economy,
        TravelClass::PremiumEconomy,
        TravelClass::Business,
        TravelClass::First,
    ];

    /// The lowercase identifier accepted as tool input.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelClass::Economy => "economy",
            TravelClass::PremiumEconomy => "premium_economy",
            TravelClass::Business => "business",
            TravelClass::First => "first",
        }
    }

    /// The cabin hint understood by the flight-data provider.
    pub fn provider_code(&self) -> &'static str {
        match self {
            TravelClass::Economy => "ECONOMY",
            TravelClass::PremiumEconomy => "PREMIUM_ECONOMY",
            TravelClass::Business => "BUSINESS",
            TravelClass::First => "FIRST",
        }
    }

    /// Parse a case-insensitive identifier, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == wanted)
    }
}

impl fmt::Display for TravelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated input of a flight search.
///
/// Invariants (enforced by [`crate::validate::search_criteria`]):
/// origin ≠ destination, `return_date > departure_date` when present,
/// both dates on or after the day of the call, `1 <= adults <= 9`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub adults: u8,
    pub travel_class: TravelClass,
}

/// Flight duration split into hours and minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlightDuration {
    pub hours: u32,
    pub minutes: u32,
}

impl FlightDuration {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self {
            hours: hours + minutes / 60,
            minutes: minutes % 60,
        }
    }

    pub fn total_minutes(&self) -> u32 {
        self.hours * 60 + self.minutes
    }
}

impl fmt::Display for FlightDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// Price of one offer for the whole party.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Price {
    /// Total for all passengers.
    pub total: f64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Base amount per passenger.
    pub per_person: f64,
}

/// One bookable flight option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightOffer {
    /// Carrier display name (e.g. `"Delta Air Lines"`).
    pub airline: String,
    /// Carrier IATA code (e.g. `"DL"`).
    pub airline_code: String,
    /// Carrier code followed by the numeric flight suffix.
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    /// Local departure time, `HH:MM`.
    pub departure_time: String,
    /// Local arrival time, `HH:MM`.
    pub arrival_time: String,
    /// `None` when the provider's duration token could not be parsed.
    pub duration: Option<FlightDuration>,
    pub price: Price,
    pub stops: u32,
    pub travel_class: TravelClass,
    pub aircraft: Option<String>,
    pub booking_class: Option<String>,
    pub segments: u32,
}

/// Stable ascending sort by total price.
///
/// Offers with equal totals keep their incoming order.
pub fn sort_by_total_price(offers: &mut [FlightOffer]) {
    offers.sort_by(|a, b| a.price.total.total_cmp(&b.price.total));
}

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Airport reference data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportRecord {
    /// Uppercase IATA code.
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    /// IANA zone name or a UTC offset such as `-08:00`.
    pub timezone: String,
    pub coordinates: Coordinates,
}

/// Operational status of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    OnTime,
    Delayed,
    Boarding,
    Departed,
    Arrived,
    Cancelled,
}

impl FlightStatus {
    pub const ALL: [FlightStatus; 6] = [
        FlightStatus::OnTime,
        FlightStatus::Delayed,
        FlightStatus::Boarding,
        FlightStatus::Departed,
        FlightStatus::Arrived,
        FlightStatus::Cancelled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FlightStatus::OnTime => "On Time",
            FlightStatus::Delayed => "Delayed",
            FlightStatus::Boarding => "Boarding",
            FlightStatus::Departed => "Departed",
            FlightStatus::Arrived => "Arrived",
            FlightStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status report for one flight on one date.
///
/// `gate` and `scheduled_departure` are present exactly when the flight
/// is not cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightStatusRecord {
    pub flight_number: String,
    pub date: NaiveDate,
    pub status: FlightStatus,
    pub gate: Option<String>,
    pub scheduled_departure: Option<String>,
    pub estimated_departure: Option<String>,
    pub delay_reason: Option<String>,
    pub actual_time: Option<String>,
}

/// Airline reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirlineRecord {
    pub code: String,
    pub name: String,
    pub country: String,
    pub founded: u16,
    pub hub: String,
    /// Approximate number of aircraft (rendered as a lower bound, `850+`).
    pub fleet_size: u32,
    /// Approximate number of destinations served.
    pub destinations: u32,
}

/// Whether calls are answered by the live provider or by synthetic data.
///
/// Decided once at startup and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataMode {
    Live,
    Fallback,
}

impl DataMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataMode::Live => "live",
            DataMode::Fallback => "fallback",
        }
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the data behind one response came from.
///
/// Operations without a provider path (airline info, flight status) are
/// always [`LookupSource::Fallback`], whatever the [`DataMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupSource {
    Provider,
    Fallback,
}

impl LookupSource {
    pub fn for_mode(mode: DataMode) -> Self {
        match mode {
            DataMode::Live => LookupSource::Provider,
            DataMode::Fallback => LookupSource::Fallback,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, LookupSource::Provider)
    }
}

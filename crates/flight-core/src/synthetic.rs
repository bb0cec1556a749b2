//! Synthetic data used when the flight-data provider is unavailable.
//!
//! Output has a fixed shape and randomized content. The pseudo-random
//! source is injected so callers (and tests) choose between a seeded,
//! reproducible stream and an entropy-seeded one.

use chrono::NaiveDate;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::FlightError;
use crate::models::{
    sort_by_total_price, AirlineRecord, AirportRecord, FlightDuration, FlightOffer, FlightStatus,
    FlightStatusRecord, Price, SearchCriteria,
};
use crate::reference;

/// Number of offers in every synthetic search result.
pub const SAMPLE_OFFER_COUNT: usize = 5;

const SAMPLE_CARRIERS: [(&str, &str); 5] = [
    ("AA", "American Airlines"),
    ("DL", "Delta Air Lines"),
    ("UA", "United Airlines"),
    ("WN", "Southwest Airlines"),
    ("AS", "Alaska Airlines"),
];

const SAMPLE_GATES: [&str; 5] = ["A12", "B7", "C14", "D9", "E23"];
const SAMPLE_AIRCRAFT: &str = "Boeing 737-800";
const SAMPLE_BOOKING_CLASS: &str = "V";
const ONE_STOP_PROBABILITY: f64 = 0.4;

const SCHEDULED_DEPARTURE: &str = "14:30";
const ESTIMATED_DEPARTURE: &str = "15:15";
const ACTUAL_TIME: &str = "14:35";
const DELAY_REASON: &str = "Weather conditions";

/// Generator of placeholder flights, airports, statuses, and airlines.
///
/// Shared across concurrent calls; the random source sits behind a mutex.
pub struct SyntheticGenerator {
    rng: Mutex<StdRng>,
    currency: String,
}

impl SyntheticGenerator {
    pub fn new(rng: StdRng, currency: impl Into<String>) -> Self {
        Self {
            rng: Mutex::new(rng),
            currency: currency.into(),
        }
    }

    /// Reproducible generator for a given seed.
    pub fn seeded(seed: u64, currency: impl Into<String>) -> Self {
        Self::new(StdRng::seed_from_u64(seed), currency)
    }

    pub fn from_entropy(currency: impl Into<String>) -> Self {
        Self::new(StdRng::from_entropy(), currency)
    }

    /// Five offers for the route, sorted by ascending total price.
    pub fn flights(&self, criteria: &SearchCriteria) -> Vec<FlightOffer> {
        let mut rng = self.rng.lock();
        let adults = f64::from(criteria.adults);

        let mut offers: Vec<FlightOffer> = (0..SAMPLE_OFFER_COUNT)
            .map(|_| {
                let (code, name) = *SAMPLE_CARRIERS
                    .choose(&mut *rng)
                    .unwrap_or(&SAMPLE_CARRIERS[0]);
                let per_person = f64::from(rng.gen_range(200u32..=999));
                let duration = FlightDuration::new(rng.gen_range(2..=10), rng.gen_range(0..=59));
                let departs_at = rng.gen_range(6 * 60..23 * 60);
                let stops = u32::from(rng.gen_bool(ONE_STOP_PROBABILITY));

                FlightOffer {
                    airline: name.to_string(),
                    airline_code: code.to_string(),
                    flight_number: format!("{}{}", code, rng.gen_range(1000..=9999)),
                    origin: criteria.origin.clone(),
                    destination: criteria.destination.clone(),
                    departure_date: criteria.departure_date,
                    departure_time: clock(departs_at),
                    arrival_time: clock(departs_at + duration.total_minutes()),
                    duration: Some(duration),
                    price: Price {
                        total: per_person * adults,
                        currency: self.currency.clone(),
                        per_person,
                    },
                    stops,
                    travel_class: criteria.travel_class,
                    aircraft: Some(SAMPLE_AIRCRAFT.to_string()),
                    booking_class: Some(SAMPLE_BOOKING_CLASS.to_string()),
                    segments: stops + 1,
                }
            })
            .collect();

        sort_by_total_price(&mut offers);
        offers
    }

    /// Airport from the reference table; a miss is an invalid code.
    pub fn airport(&self, code: &str) -> Result<AirportRecord, FlightError> {
        reference::airport(code).ok_or_else(|| FlightError::airport_not_found(code))
    }

    /// Airline from the reference table. Deterministic for a given code.
    pub fn airline(&self, code: &str) -> Result<AirlineRecord, FlightError> {
        reference::airline(code).ok_or_else(|| FlightError::AirlineNotFound {
            code: code.to_string(),
        })
    }

    /// A status drawn uniformly from [`FlightStatus::ALL`].
    pub fn flight_status(&self, flight_number: &str, date: NaiveDate) -> FlightStatusRecord {
        let mut rng = self.rng.lock();
        let status = *FlightStatus::ALL
            .choose(&mut *rng)
            .unwrap_or(&FlightStatus::OnTime);

        let mut record = FlightStatusRecord {
            flight_number: flight_number.to_string(),
            date,
            status,
            gate: None,
            scheduled_departure: None,
            estimated_departure: None,
            delay_reason: None,
            actual_time: None,
        };

        if status == FlightStatus::Cancelled {
            return record;
        }

        record.gate = SAMPLE_GATES.choose(&mut *rng).map(|g| g.to_string());
        record.scheduled_departure = Some(SCHEDULED_DEPARTURE.to_string());
        match status {
            FlightStatus::Delayed => {
                record.estimated_departure = Some(ESTIMATED_DEPARTURE.to_string());
                record.delay_reason = Some(DELAY_REASON.to_string());
            }
            FlightStatus::Arrived | FlightStatus::Departed => {
                record.actual_time = Some(ACTUAL_TIME.to_string());
            }
            _ => {}
        }
        record
    }
}

/// `HH:MM` for minutes since midnight, wrapping past 24h.
fn clock(minutes: u32) -> String {
    let minutes = minutes % (24 * 60);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

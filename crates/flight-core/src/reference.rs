//! Fixed reference tables.
//!
//! Airport records answer `get_airport_info` in fallback mode. Airline
//! records always answer `get_airline_info`: there is no provider path
//! for airlines. The carrier name table resolves display names for
//! offers returned by the provider.

use crate::models::{AirlineRecord, AirportRecord, Coordinates};

struct AirportRow {
    code: &'static str,
    name: &'static str,
    city: &'static str,
    country: &'static str,
    timezone: &'static str,
    latitude: f64,
    longitude: f64,
}

const AIRPORTS: &[AirportRow] = &[
    AirportRow {
        code: "LAX",
        name: "Los Angeles International Airport",
        city: "Los Angeles",
        country: "United States",
        timezone: "America/Los_Angeles",
        latitude: 33.9425,
        longitude: -118.4081,
    },
    AirportRow {
        code: "JFK",
        name: "John F. Kennedy International Airport",
        city: "New York",
        country: "United States",
        timezone: "America/New_York",
        latitude: 40.6413,
        longitude: -73.7781,
    },
    AirportRow {
        code: "LHR",
        name: "London Heathrow Airport",
        city: "London",
        country: "United Kingdom",
        timezone: "Europe/London",
        latitude: 51.4700,
        longitude: -0.4543,
    },
    AirportRow {
        code: "NRT",
        name: "Narita International Airport",
        city: "Tokyo",
        country: "Japan",
        timezone: "Asia/Tokyo",
        latitude: 35.7719,
        longitude: 140.3928,
    },
    AirportRow {
        code: "CDG",
        name: "Paris Charles de Gaulle Airport",
        city: "Paris",
        country: "France",
        timezone: "Europe/Paris",
        latitude: 49.0097,
        longitude: 2.5479,
    },
    AirportRow {
        code: "ORD",
        name: "O'Hare International Airport",
        city: "Chicago",
        country: "United States",
        timezone: "America/Chicago",
        latitude: 41.9742,
        longitude: -87.9073,
    },
];

struct AirlineRow {
    code: &'static str,
    name: &'static str,
    country: &'static str,
    founded: u16,
    hub: &'static str,
    fleet_size: u32,
    destinations: u32,
}

const AIRLINES: &[AirlineRow] = &[
    AirlineRow {
        code: "AA",
        name: "American Airlines",
        country: "United States",
        founded: 1930,
        hub: "Dallas/Fort Worth International Airport",
        fleet_size: 850,
        destinations: 350,
    },
    AirlineRow {
        code: "DL",
        name: "Delta Air Lines",
        country: "United States",
        founded: 1924,
        hub: "Hartsfield-Jackson Atlanta International Airport",
        fleet_size: 800,
        destinations: 325,
    },
    AirlineRow {
        code: "UA",
        name: "United Airlines",
        country: "United States",
        founded: 1926,
        hub: "Chicago O'Hare International Airport",
        fleet_size: 800,
        destinations: 340,
    },
    AirlineRow {
        code: "LH",
        name: "Lufthansa",
        country: "Germany",
        founded: 1953,
        hub: "Frankfurt Airport",
        fleet_size: 300,
        destinations: 220,
    },
    AirlineRow {
        code: "BA",
        name: "British Airways",
        country: "United Kingdom",
        founded: 1974,
        hub: "London Heathrow Airport",
        fleet_size: 250,
        destinations: 200,
    },
    AirlineRow {
        code: "AF",
        name: "Air France",
        country: "France",
        founded: 1933,
        hub: "Paris Charles de Gaulle Airport",
        fleet_size: 220,
        destinations: 190,
    },
];

/// Carrier display names used when normalizing provider offers.
const CARRIER_NAMES: &[(&str, &str)] = &[
    ("AA", "American Airlines"),
    ("DL", "Delta Air Lines"),
    ("UA", "United Airlines"),
    ("WN", "Southwest Airlines"),
    ("B6", "JetBlue Airways"),
    ("LH", "Lufthansa"),
    ("BA", "British Airways"),
    ("AF", "Air France"),
    ("KL", "KLM"),
    ("LX", "Swiss International Air Lines"),
];

/// Look up an airport by uppercase IATA code.
pub fn airport(code: &str) -> Option<AirportRecord> {
    AIRPORTS.iter().find(|a| a.code == code).map(|a| AirportRecord {
        code: a.code.to_string(),
        name: a.name.to_string(),
        city: a.city.to_string(),
        country: a.country.to_string(),
        timezone: a.timezone.to_string(),
        coordinates: Coordinates {
            latitude: a.latitude,
            longitude: a.longitude,
        },
    })
}

/// Look up an airline by uppercase IATA code.
pub fn airline(code: &str) -> Option<AirlineRecord> {
    AIRLINES.iter().find(|a| a.code == code).map(|a| AirlineRecord {
        code: a.code.to_string(),
        name: a.name.to_string(),
        country: a.country.to_string(),
        founded: a.founded,
        hub: a.hub.to_string(),
        fleet_size: a.fleet_size,
        destinations: a.destinations,
    })
}

/// Display name for a carrier code, falling back to the code itself.
pub fn carrier_name(code: &str) -> String {
    CARRIER_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.to_string())
}

//! Amadeus self-service API client.
//!
//! Implements [`FlightProvider`] over HTTPS:
//!
//! | Call | Endpoint |
//! |------|----------|
//! | token exchange | `POST /v1/security/oauth2/token` (client credentials) |
//! | flight search | `GET /v2/shopping/flight-offers` |
//! | airport lookup | `GET /v1/reference-data/locations?subType=AIRPORT` |
//!
//! The bearer token is cached until shortly before it expires. Responses
//! are decoded into loose serde structs and normalized into
//! [`FlightOffer`] / [`AirportRecord`]; malformed offers are skipped.

use async_trait::async_trait;
use chrono::NaiveDate;
use flight_core::reference::carrier_name;
use flight_core::{
    AirportRecord, Coordinates, FlightDuration, FlightError, FlightOffer, Price, SearchCriteria,
};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::config::{Credentials, ProviderConfig};
use crate::provider::{map_lookup_failure, map_search_failure, FlightProvider, ProviderFailure};

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const OFFERS_PATH: &str = "/v2/shopping/flight-offers";
const LOCATIONS_PATH: &str = "/v1/reference-data/locations";

/// Tokens are refreshed this long before the provider says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct AmadeusClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    currency: String,
    max_offers: u32,
    token: Mutex<Option<CachedToken>>,
}

impl AmadeusClient {
    pub fn new(config: &ProviderConfig, credentials: Credentials) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("flight-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            currency: config.currency.clone(),
            max_offers: config.max_offers,
            token: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn access_token(&self) -> Result<String, ProviderFailure> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!("requesting provider access token");
        let response = self
            .http
            .post(self.url(TOKEN_PATH))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.api_key.as_str()),
                ("client_secret", self.credentials.api_secret.as_str()),
            ])
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_failure)?;
        if !status.is_success() {
            return Err(ProviderFailure::from_response(status.as_u16(), body));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::Other(format!("malformed token response: {}", e)))?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + lifetime,
        });
        Ok(value)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderFailure> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_failure)?;
        if !status.is_success() {
            return Err(ProviderFailure::from_response(status.as_u16(), body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::Other(format!("malformed provider response: {}", e)))
    }

    fn search_query(&self, criteria: &SearchCriteria) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("originLocationCode", criteria.origin.clone()),
            ("destinationLocationCode", criteria.destination.clone()),
            ("departureDate", criteria.departure_date.to_string()),
            ("adults", criteria.adults.to_string()),
            ("travelClass", criteria.travel_class.provider_code().to_string()),
            ("currencyCode", self.currency.clone()),
            ("max", self.max_offers.to_string()),
        ];
        if let Some(ret) = criteria.return_date {
            query.push(("returnDate", ret.to_string()));
        }
        query
    }
}

#[async_trait]
impl FlightProvider for AmadeusClient {
    fn name(&self) -> &str {
        "amadeus"
    }

    async fn search_flights(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<FlightOffer>, FlightError> {
        let response: OffersResponse = self
            .get_json(OFFERS_PATH, &self.search_query(criteria))
            .await
            .map_err(|failure| {
                tracing::warn!(error = %failure, "flight search failed");
                map_search_failure(failure)
            })?;

        let offers = normalize_offers(response, criteria);
        if offers.is_empty() {
            return Err(FlightError::no_flights());
        }
        tracing::debug!(count = offers.len(), "provider returned offers");
        Ok(offers)
    }

    async fn airport(&self, code: &str) -> Result<AirportRecord, FlightError> {
        let query = [
            ("keyword", code.to_string()),
            ("subType", "AIRPORT".to_string()),
            ("page[limit]", "1".to_string()),
        ];
        let response: LocationsResponse =
            self.get_json(LOCATIONS_PATH, &query).await.map_err(|failure| {
                tracing::warn!(error = %failure, code, "airport lookup failed");
                map_lookup_failure(failure)
            })?;

        response
            .data
            .into_iter()
            .next()
            .map(|location| normalize_airport(location, code))
            .ok_or_else(|| FlightError::airport_not_found(code))
    }
}

fn transport_failure(err: reqwest::Error) -> ProviderFailure {
    if err.is_connect() {
        ProviderFailure::Connect(err.to_string())
    } else if err.is_timeout() {
        ProviderFailure::Other(format!("request timed out: {}", err))
    } else {
        ProviderFailure::Other(err.to_string())
    }
}

// ============ Wire types ============

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OffersResponse {
    #[serde(default)]
    data: Vec<RawOffer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOffer {
    #[serde(default)]
    itineraries: Vec<RawItinerary>,
    price: Option<RawPrice>,
    #[serde(default)]
    traveler_pricings: Vec<RawTravelerPricing>,
}

#[derive(Debug, Default, Deserialize)]
struct RawItinerary {
    duration: Option<String>,
    #[serde(default)]
    segments: Vec<RawSegment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegment {
    #[serde(default)]
    departure: RawEndpoint,
    #[serde(default)]
    arrival: RawEndpoint,
    carrier_code: Option<String>,
    number: Option<String>,
    aircraft: Option<RawAircraft>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEndpoint {
    iata_code: Option<String>,
    at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAircraft {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    total: Option<String>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTravelerPricing {
    #[serde(default)]
    fare_details_by_segment: Vec<RawFareDetail>,
}

#[derive(Debug, Deserialize)]
struct RawFareDetail {
    class: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LocationsResponse {
    #[serde(default)]
    data: Vec<RawLocation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocation {
    name: Option<String>,
    iata_code: Option<String>,
    address: Option<RawAddress>,
    geo_code: Option<RawGeoCode>,
    time_zone_offset: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAddress {
    city_name: Option<String>,
    country_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawGeoCode {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

// ============ Normalization ============

fn normalize_offers(response: OffersResponse, criteria: &SearchCriteria) -> Vec<FlightOffer> {
    let total = response.data.len();
    let offers: Vec<FlightOffer> = response
        .data
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match normalize_offer(raw, criteria) {
            Ok(offer) => Some(offer),
            Err(reason) => {
                tracing::warn!(index, reason, "skipping malformed offer");
                None
            }
        })
        .collect();
    if offers.len() < total {
        tracing::warn!(kept = offers.len(), total, "some provider offers were skipped");
    }
    offers
}

fn normalize_offer(raw: RawOffer, criteria: &SearchCriteria) -> Result<FlightOffer, &'static str> {
    let price = raw.price.ok_or("missing price")?;
    let total: f64 = price
        .total
        .as_deref()
        .and_then(|t| t.trim().parse().ok())
        .ok_or("unparsable price total")?;
    let itinerary = raw.itineraries.into_iter().next().ok_or("no itineraries")?;
    let first = itinerary.segments.first().ok_or("no segments")?;
    let last = itinerary.segments.last().ok_or("no segments")?;

    let airline_code = first.carrier_code.clone().unwrap_or_default();
    let flight_number = format!(
        "{}{}",
        airline_code,
        first.number.as_deref().unwrap_or_default()
    );
    let departure_date = first
        .departure
        .at
        .as_deref()
        .and_then(|at| at.get(..10))
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or(criteria.departure_date);

    let booking_class = raw
        .traveler_pricings
        .first()
        .and_then(|tp| tp.fare_details_by_segment.first())
        .and_then(|fd| fd.class.clone());
    let segments = itinerary.segments.len() as u32;

    Ok(FlightOffer {
        airline: carrier_name(&airline_code),
        origin: first
            .departure
            .iata_code
            .clone()
            .unwrap_or_else(|| criteria.origin.clone()),
        destination: last
            .arrival
            .iata_code
            .clone()
            .unwrap_or_else(|| criteria.destination.clone()),
        departure_date,
        departure_time: clock_time(first.departure.at.as_deref().unwrap_or_default()),
        arrival_time: clock_time(last.arrival.at.as_deref().unwrap_or_default()),
        duration: itinerary.duration.as_deref().and_then(parse_duration),
        price: Price {
            total,
            currency: price.currency.unwrap_or_default(),
            per_person: total / f64::from(criteria.adults.max(1)),
        },
        stops: segments - 1,
        travel_class: criteria.travel_class,
        aircraft: first.aircraft.as_ref().and_then(|a| a.code.clone()),
        booking_class,
        segments,
        airline_code,
        flight_number,
    })
}

fn normalize_airport(raw: RawLocation, code: &str) -> AirportRecord {
    let address = raw.address.unwrap_or_default();
    let geo = raw.geo_code.unwrap_or_default();
    AirportRecord {
        code: raw.iata_code.unwrap_or_else(|| code.to_string()),
        name: raw.name.unwrap_or_else(|| "Unknown Airport".to_string()),
        city: address.city_name.unwrap_or_else(|| "Unknown City".to_string()),
        country: address
            .country_name
            .unwrap_or_else(|| "Unknown Country".to_string()),
        timezone: raw
            .time_zone_offset
            .map(|offset| format!("UTC{}", offset))
            .unwrap_or_else(|| "Unknown".to_string()),
        coordinates: Coordinates {
            latitude: geo.latitude.unwrap_or(0.0),
            longitude: geo.longitude.unwrap_or(0.0),
        },
    }
}

/// Parse an ISO 8601 duration such as `PT5H30M` or `P1DT2H`. Days fold into hours.
pub fn parse_duration(raw: &str) -> Option<FlightDuration> {
    let rest = raw.strip_prefix('P')?;
    let (days_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, t),
        None => (rest, ""),
    };

    let mut hours = 0u32;
    let mut minutes = 0u32;

    if !days_part.is_empty() {
        hours += days_part.strip_suffix('D')?.parse::<u32>().ok()? * 24;
    }

    let mut number = String::new();
    for c in time_part.chars() {
        if c.is_ascii_digit() {
            number.push(c);
            continue;
        }
        let value: u32 = number.parse().ok()?;
        number.clear();
        match c {
            'H' => hours += value,
            'M' => minutes += value,
            'S' => {}
            _ => return None,
        }
    }
    if !number.is_empty() {
        return None;
    }

    Some(FlightDuration::new(hours, minutes))
}

/// `HH:MM` from a local timestamp like `2030-07-01T08:30:00`.
fn clock_time(at: &str) -> String {
    match at.split_once('T') {
        Some((_, time)) => time.get(..5).unwrap_or("00:00").to_string(),
        None if at.as_bytes().get(2) == Some(&b':') => at.get(..5).unwrap_or("00:00").to_string(),
        None => "00:00".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight_core::TravelClass;

    fn criteria(adults: u8) -> SearchCriteria {
        SearchCriteria {
            origin: "LAX".to_string(),
            destination: "JFK".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2030, 7, 1).unwrap(),
            return_date: None,
            adults,
            travel_class: TravelClass::Economy,
        }
    }

    fn offers_fixture() -> OffersResponse {
        serde_json::from_str(
            r#"{
  "data": [
    {
      "itineraries": [{
        "duration": "PT8H15M",
        "segments": [
          {"departure": {"iataCode": "LAX", "at": "2030-07-01T07:05:00"},
           "arrival": {"iataCode": "ORD", "at": "2030-07-01T13:10:00"},
           "carrierCode": "UA", "number": "512", "aircraft": {"code": "738"}},
          {"departure": {"iataCode": "ORD", "at": "2030-07-01T14:00:00"},
           "arrival": {"iataCode": "JFK", "at": "2030-07-01T18:20:00"},
           "carrierCode": "UA", "number": "1210", "aircraft": {"code": "321"}}
        ]
      }],
      "price": {"currency": "USD", "total": "900.50", "base": "780.00"},
      "travelerPricings": [{"fareDetailsBySegment": [{"class": "K"}, {"class": "K"}]}]
    },
    {
      "itineraries": [{"duration": "PT5H", "segments": []}],
      "price": {"currency": "USD", "total": "100.00"}
    },
    {
      "itineraries": [{
        "duration": "garbage",
        "segments": [
          {"departure": {"iataCode": "LAX", "at": "2030-07-01T22:45:00"},
           "arrival": {"iataCode": "JFK", "at": "2030-07-02T07:00:00"},
           "carrierCode": "QF", "number": "11"}
        ]
      }],
      "price": {"currency": "USD", "total": "450.00"}
    },
    {
      "itineraries": [{"segments": [{"carrierCode": "AA", "number": "1"}]}]
    }
  ]
}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_normalize_offers_skips_malformed() {
        let offers = normalize_offers(offers_fixture(), &criteria(2));
        assert_eq!(offers.len(), 2);

        let ua = &offers[0];
        assert_eq!(ua.airline, "United Airlines");
        assert_eq!(ua.flight_number, "UA512");
        assert_eq!(ua.origin, "LAX");
        assert_eq!(ua.destination, "JFK");
        assert_eq!(ua.departure_time, "07:05");
        assert_eq!(ua.arrival_time, "18:20");
        assert_eq!(ua.stops, 1);
        assert_eq!(ua.segments, 2);
        assert_eq!(ua.aircraft.as_deref(), Some("738"));
        assert_eq!(ua.booking_class.as_deref(), Some("K"));
        assert_eq!(ua.duration, Some(FlightDuration::new(8, 15)));
        assert_eq!(ua.price.total, 900.50);
        assert_eq!(ua.price.per_person, 450.25);
    }

    #[test]
    fn test_unknown_carrier_and_duration() {
        let offers = normalize_offers(offers_fixture(), &criteria(1));
        let qf = &offers[1];
        assert_eq!(qf.airline, "QF");
        assert_eq!(qf.stops, 0);
        assert!(qf.duration.is_none());
        assert!(qf.aircraft.is_none());
        assert!(qf.booking_class.is_none());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("PT2H30M"), Some(FlightDuration::new(2, 30)));
        assert_eq!(parse_duration("PT45M"), Some(FlightDuration::new(0, 45)));
        assert_eq!(parse_duration("PT11H"), Some(FlightDuration::new(11, 0)));
        assert_eq!(parse_duration("P1DT2H5M"), Some(FlightDuration::new(26, 5)));
        assert_eq!(parse_duration("5H"), None);
        assert_eq!(parse_duration("PT5X"), None);
        assert_eq!(parse_duration("PT12"), None);
    }

    #[test]
    fn test_clock_time() {
        assert_eq!(clock_time("2030-07-01T08:30:00"), "08:30");
        assert_eq!(clock_time("23:59"), "23:59");
        assert_eq!(clock_time(""), "00:00");
    }

    #[test]
    fn test_normalize_airport_defaults() {
        let full: LocationsResponse = serde_json::from_str(
            r#"{"data":[{"name":"LOS ANGELES INTL","iataCode":"LAX",
                "address":{"cityName":"LOS ANGELES","countryName":"UNITED STATES OF AMERICA"},
                "geoCode":{"latitude":33.94,"longitude":-118.40},"timeZoneOffset":"-07:00"}]}"#,
        )
        .unwrap();
        let lax = normalize_airport(full.data.into_iter().next().unwrap(), "LAX");
        assert_eq!(lax.city, "LOS ANGELES");
        assert_eq!(lax.timezone, "UTC-07:00");
        assert_eq!(lax.coordinates.latitude, 33.94);

        let bare = normalize_airport(RawLocation::default(), "XYZ");
        assert_eq!(bare.code, "XYZ");
        assert_eq!(bare.name, "Unknown Airport");
        assert_eq!(bare.city, "Unknown City");
        assert_eq!(bare.country, "Unknown Country");
    }

    #[test]
    fn test_search_query() {
        let client = AmadeusClient::new(
            &ProviderConfig::default(),
            Credentials {
                api_key: "k".to_string(),
                api_secret: "s".to_string(),
            },
        )
        .unwrap();
        let mut c = criteria(2);
        c.return_date = NaiveDate::from_ymd_opt(2030, 7, 9);
        let query = client.search_query(&c);
        let get = |k: &str| query.iter().find(|(key, _)| *key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("originLocationCode"), Some("LAX"));
        assert_eq!(get("returnDate"), Some("2030-07-09"));
        assert_eq!(get("travelClass"), Some("ECONOMY"));
        assert_eq!(get("max"), Some("10"));
        assert_eq!(get("currencyCode"), Some("USD"));
    }
}

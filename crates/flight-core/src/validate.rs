//! Input validation and normalization.
//!
//! Each validator takes the raw JSON argument (absent arguments are
//! `None`) and either returns the normalized value or a
//! [`ValidationError`] naming the field. Validators never consult a
//! data source.
//!
//! | Argument | Accepted | Normalized to |
//! |----------|----------|---------------|
//! | airport code | 3 ASCII letters, any case | uppercase |
//! | date | `YYYY-MM-DD`, real date, not before today | [`NaiveDate`] |
//! | flight number | 2-3 letters + 1-4 digits | uppercase |
//! | passenger count | integer 1..=9, absent → 1 | `u8` |
//! | travel class | one of four identifiers, absent → economy | [`TravelClass`] |
//! | airline code | 2-3 ASCII letters | uppercase |
//!
//! Surrounding whitespace is ignored for every string argument except
//! dates, which must match the pattern exactly.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{DateProblem, ValidationError, ValidationKind};
use crate::models::{SearchCriteria, TravelClass};

pub const MIN_PASSENGERS: i64 = 1;
pub const MAX_PASSENGERS: i64 = 9;

/// Text used to report a rejected value back to the caller.
fn describe(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Trimmed string content, or `None` for absent, null, non-string, or blank.
fn text(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn letters(raw: &str, lengths: std::ops::RangeInclusive<usize>) -> Option<String> {
    let upper = raw.to_ascii_uppercase();
    if lengths.contains(&upper.len()) && upper.bytes().all(|b| b.is_ascii_uppercase()) {
        Some(upper)
    } else {
        None
    }
}

/// Validate an airport IATA code.
pub fn airport_code(field: &'static str, value: Option<&Value>) -> Result<String, ValidationError> {
    text(value)
        .and_then(|raw| letters(raw, 3..=3))
        .ok_or_else(|| {
            ValidationError::new(field, describe(value), ValidationKind::InvalidAirportCode)
        })
}

/// Validate a calendar date that must not be before `today`.
pub fn date(
    field: &'static str,
    value: Option<&Value>,
    today: NaiveDate,
) -> Result<NaiveDate, ValidationError> {
    let reject = |problem| {
        ValidationError::new(
            field,
            describe(value),
            ValidationKind::InvalidDateFormat(problem),
        )
    };

    let raw = value
        .and_then(Value::as_str)
        .ok_or_else(|| reject(DateProblem::Malformed))?;
    if !has_date_shape(raw) {
        return Err(reject(DateProblem::Malformed));
    }

    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| reject(DateProblem::NotACalendarDate))?;

    if parsed < today {
        return Err(reject(DateProblem::InPast));
    }

    Ok(parsed)
}

/// Strict `\d{4}-\d{2}-\d{2}` check; chrono alone accepts single-digit fields.
fn has_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Validate a flight number such as `AA123`.
pub fn flight_number(value: Option<&Value>) -> Result<String, ValidationError> {
    let reject =
        || ValidationError::new("flight_number", describe(value), ValidationKind::InvalidFlightNumber);

    let upper = text(value).ok_or_else(reject)?.to_ascii_uppercase();
    let split = upper
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(upper.len());
    let (carrier, number) = upper.split_at(split);

    let carrier_ok = (2..=3).contains(&carrier.len());
    let number_ok = (1..=4).contains(&number.len()) && number.bytes().all(|b| b.is_ascii_digit());

    if carrier_ok && number_ok {
        Ok(upper)
    } else {
        Err(reject())
    }
}

/// Validate the passenger count, defaulting to 1 when absent.
///
/// Accepts JSON integers, integral floats, and strings holding an
/// integer (CLI parameters arrive as strings).
pub fn passenger_count(value: Option<&Value>) -> Result<u8, ValidationError> {
    if matches!(value, None | Some(Value::Null)) {
        return Ok(1);
    }

    let reject = || {
        ValidationError::new(
            "adults",
            describe(value),
            ValidationKind::InvalidPassengerCount,
        )
    };

    let count = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(reject)?;

    if (MIN_PASSENGERS..=MAX_PASSENGERS).contains(&count) {
        Ok(count as u8)
    } else {
        Err(reject())
    }
}

/// Validate the travel class, defaulting to economy when absent.
pub fn travel_class(value: Option<&Value>) -> Result<TravelClass, ValidationError> {
    if matches!(value, None | Some(Value::Null)) {
        return Ok(TravelClass::default());
    }
    value
        .and_then(Value::as_str)
        .and_then(TravelClass::parse)
        .ok_or_else(|| {
            ValidationError::new(
                "travel_class",
                describe(value),
                ValidationKind::InvalidTravelClass,
            )
        })
}

/// Validate an airline IATA code.
pub fn airline_code(value: Option<&Value>) -> Result<String, ValidationError> {
    text(value)
        .and_then(|raw| letters(raw, 2..=3))
        .ok_or_else(|| {
            ValidationError::new(
                "airline_code",
                describe(value),
                ValidationKind::InvalidAirlineCode,
            )
        })
}

/// Validate every `search_flights` argument, then the cross-field rules.
///
/// Field checks run first, so a cross-field error is only reported for
/// otherwise valid input. A blank or null `return_date` means one-way.
pub fn search_criteria(args: &Value, today: NaiveDate) -> Result<SearchCriteria, ValidationError> {
    let origin = airport_code("origin", args.get("origin"))?;
    let destination = airport_code("destination", args.get("destination"))?;
    let departure_date = date("departure_date", args.get("departure_date"), today)?;

    let return_value = args.get("return_date");
    let return_date = if is_absent(return_value) {
        None
    } else {
        Some(date("return_date", return_value, today)?)
    };

    let adults = passenger_count(args.get("adults"))?;
    let travel_class = travel_class(args.get("travel_class"))?;

    if origin == destination {
        return Err(ValidationError::new(
            "destination",
            destination,
            ValidationKind::SameAsOrigin,
        ));
    }

    if let Some(ret) = return_date {
        if ret <= departure_date {
            return Err(ValidationError::new(
                "return_date",
                ret.format("%Y-%m-%d").to_string(),
                ValidationKind::NotAfterDeparture,
            ));
        }
    }

    Ok(SearchCriteria {
        origin,
        destination,
        departure_date,
        return_date,
        adults,
        travel_class,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, 15).unwrap()
    }

    fn kind_of<T: std::fmt::Debug>(r: Result<T, ValidationError>) -> ValidationKind {
        r.unwrap_err().kind
    }

    #[test]
    fn test_airport_code_normalizes_case() {
        for raw in ["lax", "LAX", "LaX", " jfk "] {
            let code = airport_code("origin", Some(&json!(raw))).unwrap();
            assert_eq!(code, raw.trim().to_uppercase());
        }
    }

    #[test]
    fn test_airport_code_rejects_bad_input() {
        for raw in [json!("LA"), json!("LAXX"), json!("L4X"), json!(""), json!(123), json!("ÄBC")] {
            assert_eq!(
                kind_of(airport_code("origin", Some(&raw))),
                ValidationKind::InvalidAirportCode,
                "input {:?}",
                raw
            );
        }
        assert_eq!(
            kind_of(airport_code("origin", None)),
            ValidationKind::InvalidAirportCode
        );
    }

    #[test]
    fn test_date_accepts_today_and_future() {
        assert_eq!(date("date", Some(&json!("2030-06-15")), today()).unwrap(), today());
        assert_eq!(
            date("date", Some(&json!("2031-02-28")), today()).unwrap(),
            NaiveDate::from_ymd_opt(2031, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_date_problems() {
        let malformed = ["2030-6-15", "15-06-2030", "2030/06/15", "20300615", "next week", ""];
        for raw in malformed {
            assert_eq!(
                kind_of(date("date", Some(&json!(raw)), today())),
                ValidationKind::InvalidDateFormat(DateProblem::Malformed),
                "input {:?}",
                raw
            );
        }
        assert_eq!(
            kind_of(date("date", Some(&json!("2030-02-30")), today())),
            ValidationKind::InvalidDateFormat(DateProblem::NotACalendarDate)
        );
        assert_eq!(
            kind_of(date("date", Some(&json!("2030-06-14")), today())),
            ValidationKind::InvalidDateFormat(DateProblem::InPast)
        );
        assert_eq!(
            kind_of(date("date", None, today())),
            ValidationKind::InvalidDateFormat(DateProblem::Malformed)
        );
    }

    #[test]
    fn test_date_is_not_trimmed() {
        for raw in [" 2030-06-20 ", "2030-06-20\n", "\t2030-06-20"] {
            assert_eq!(
                kind_of(date("date", Some(&json!(raw)), today())),
                ValidationKind::InvalidDateFormat(DateProblem::Malformed),
                "input {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_flight_number() {
        assert_eq!(flight_number(Some(&json!("aa123"))).unwrap(), "AA123");
        assert_eq!(flight_number(Some(&json!("UAL1"))).unwrap(), "UAL1");
        assert_eq!(flight_number(Some(&json!("DL9999"))).unwrap(), "DL9999");
        for raw in ["A123", "ABCD12", "AA12345", "AA", "123", "AA12B", "B6123"] {
            assert_eq!(
                kind_of(flight_number(Some(&json!(raw)))),
                ValidationKind::InvalidFlightNumber,
                "input {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_passenger_count() {
        assert_eq!(passenger_count(None).unwrap(), 1);
        assert_eq!(passenger_count(Some(&Value::Null)).unwrap(), 1);
        assert_eq!(passenger_count(Some(&json!(9))).unwrap(), 9);
        assert_eq!(passenger_count(Some(&json!("3"))).unwrap(), 3);
        assert_eq!(passenger_count(Some(&json!(2.0))).unwrap(), 2);
        for bad in [json!(0), json!(10), json!(-1), json!(2.5), json!("two"), json!(true)] {
            assert_eq!(
                kind_of(passenger_count(Some(&bad))),
                ValidationKind::InvalidPassengerCount,
                "input {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_travel_class() {
        assert_eq!(travel_class(None).unwrap(), TravelClass::Economy);
        assert_eq!(
            travel_class(Some(&json!("FIRST"))).unwrap(),
            TravelClass::First
        );
        assert_eq!(
            kind_of(travel_class(Some(&json!("coach")))),
            ValidationKind::InvalidTravelClass
        );
        assert_eq!(
            kind_of(travel_class(Some(&json!(1)))),
            ValidationKind::InvalidTravelClass
        );
    }

    #[test]
    fn test_airline_code() {
        assert_eq!(airline_code(Some(&json!("dl"))).unwrap(), "DL");
        assert_eq!(airline_code(Some(&json!("UAL"))).unwrap(), "UAL");
        for raw in ["D", "DLXX", "B6", ""] {
            assert_eq!(
                kind_of(airline_code(Some(&json!(raw)))),
                ValidationKind::InvalidAirlineCode
            );
        }
    }

    #[test]
    fn test_search_same_origin_destination_names_destination() {
        let args = json!({
            "origin": "LAX",
            "destination": "lax",
            "departure_date": "2030-07-01",
        });
        let err = search_criteria(&args, today()).unwrap_err();
        assert_eq!(err.field, "destination");
        assert_eq!(err.kind, ValidationKind::SameAsOrigin);
    }

    #[test]
    fn test_search_return_must_follow_departure() {
        for ret in ["2030-07-01", "2030-06-20"] {
            let args = json!({
                "origin": "LAX",
                "destination": "JFK",
                "departure_date": "2030-07-01",
                "return_date": ret,
            });
            let err = search_criteria(&args, today()).unwrap_err();
            assert_eq!(err.field, "return_date");
            assert_eq!(err.kind, ValidationKind::NotAfterDeparture);
        }
    }

    #[test]
    fn test_search_defaults() {
        let args = json!({
            "origin": "lax",
            "destination": "jfk",
            "departure_date": "2030-07-01",
            "return_date": "",
        });
        let criteria = search_criteria(&args, today()).unwrap();
        assert_eq!(criteria.origin, "LAX");
        assert_eq!(criteria.destination, "JFK");
        assert_eq!(criteria.return_date, None);
        assert_eq!(criteria.adults, 1);
        assert_eq!(criteria.travel_class, TravelClass::Economy);
    }

    #[test]
    fn test_search_field_errors_win_over_cross_field() {
        let args = json!({
            "origin": "LAX",
            "destination": "LAX",
            "departure_date": "2030-07-01",
            "adults": 12,
        });
        let err = search_criteria(&args, today()).unwrap_err();
        assert_eq!(err.field, "adults");
    }
}

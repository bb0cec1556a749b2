//! Text payloads returned to callers.
//!
//! Each operation yields one text block. Line breaks are written with the
//! configured [`LineBreak`]: the escaped two-character form by default,
//! real newlines when `[output] line_break = "newline"`.

use flight_core::{
    AirlineRecord, AirportRecord, CallError, DataMode, FlightDuration, FlightOffer,
    FlightStatus, FlightStatusRecord, LookupSource, SearchCriteria,
};

use crate::config::LineBreak;

const LIVE_SEARCH_BANNER: &str = "Live data from Amadeus API";
const SAMPLE_SEARCH_BANNER: &str = "Sample data (configure API for real results)";
const SAMPLE_SEARCH_NOTE: &str =
    "Note: These are sample results. Real Amadeus API integration is available with valid credentials.";
const CANCELLED_NOTICE: &str =
    "Flight has been cancelled. Please contact your airline for rebooking options.";
const APOLOGY: &str = "Sorry, an unexpected error occurred while handling this request. Please try again.";

/// Accumulates lines joined by the configured break.
struct Text {
    br: &'static str,
    buf: String,
}

impl Text {
    fn new(line_break: LineBreak) -> Self {
        Self {
            br: line_break.as_str(),
            buf: String::new(),
        }
    }

    fn line(&mut self, s: impl AsRef<str>) -> &mut Self {
        self.buf.push_str(s.as_ref());
        self.buf.push_str(self.br);
        self
    }

    fn blank(&mut self) -> &mut Self {
        self.buf.push_str(self.br);
        self
    }

    /// Final text without trailing breaks.
    fn finish(self) -> String {
        let mut out = self.buf;
        while out.ends_with(self.br) {
            out.truncate(out.len() - self.br.len());
        }
        out
    }
}

pub fn duration_text(duration: Option<FlightDuration>) -> String {
    duration
        .map(|d| d.to_string())
        .unwrap_or_else(|| "Unknown duration".to_string())
}

fn stops_text(stops: u32) -> String {
    if stops == 0 {
        "Direct".to_string()
    } else {
        format!("{} stop(s)", stops)
    }
}

pub fn search_results(
    offers: &[FlightOffer],
    criteria: &SearchCriteria,
    mode: DataMode,
    line_break: LineBreak,
) -> String {
    let mut text = Text::new(line_break);
    text.line("Flight Search Results")
        .line(format!("Route: {} → {}", criteria.origin, criteria.destination))
        .line(format!("Departure Date: {}", criteria.departure_date));
    if let Some(ret) = criteria.return_date {
        text.line(format!("Return Date: {}", ret));
    }
    text.line(match mode {
        DataMode::Live => LIVE_SEARCH_BANNER,
        DataMode::Fallback => SAMPLE_SEARCH_BANNER,
    })
    .blank();

    for (i, offer) in offers.iter().enumerate() {
        let price = &offer.price;
        let mut class = format!("   Class: {}", offer.travel_class);
        if let Some(bc) = &offer.booking_class {
            class.push_str(&format!(" ({})", bc));
        }
        text.line(format!(
            "{}. {} ({})",
            i + 1,
            offer.airline,
            offer.flight_number
        ))
        .line(format!(
            "   Time: {} → {} ({})",
            offer.departure_time,
            offer.arrival_time,
            duration_text(offer.duration)
        ))
        .line(format!(
            "   Price: {cur} {:.2} total ({cur} {:.2}/person)",
            price.total,
            price.per_person,
            cur = price.currency
        ))
        .line(format!(
            "   Aircraft: {} | {}",
            offer.aircraft.as_deref().unwrap_or("Aircraft info unavailable"),
            stops_text(offer.stops)
        ))
        .line(class)
        .blank();
    }

    if mode == DataMode::Fallback {
        text.line(SAMPLE_SEARCH_NOTE);
    }
    text.finish()
}

pub fn airport(record: &AirportRecord, source: LookupSource, line_break: LineBreak) -> String {
    let mut text = Text::new(line_break);
    text.line("Airport Information")
        .blank()
        .line(format!("Code: {}", record.code))
        .line(format!("Name: {}", record.name))
        .line(format!("City: {}", record.city))
        .line(format!("Country: {}", record.country))
        .line(format!("Timezone: {}", record.timezone))
        .line(format!(
            "Coordinates: {}, {}",
            record.coordinates.latitude, record.coordinates.longitude
        ))
        .blank()
        .line(if source.is_live() {
            "Data from Amadeus API"
        } else {
            "Sample data"
        });
    text.finish()
}

pub fn flight_status(record: &FlightStatusRecord, line_break: LineBreak) -> String {
    let mut text = Text::new(line_break);
    text.line("Flight Status")
        .blank()
        .line(format!("Flight: {}", record.flight_number))
        .line(format!("Date: {}", record.date))
        .line(format!("Status: {}", record.status));

    if let Some(gate) = &record.gate {
        text.line(format!("Gate: {}", gate));
    }
    if let Some(scheduled) = &record.scheduled_departure {
        text.line(format!("Scheduled Departure: {}", scheduled));
    }
    if let Some(estimated) = &record.estimated_departure {
        text.line(format!("Estimated Departure: {}", estimated));
    }
    if let Some(reason) = &record.delay_reason {
        text.line(format!("Delay Reason: {}", reason));
    }
    if let Some(actual) = &record.actual_time {
        text.line(format!("Actual Time: {}", actual));
    }
    if record.status == FlightStatus::Cancelled {
        text.line(CANCELLED_NOTICE);
    }

    text.blank()
        .line("Simulated status (no live flight-status source is connected)");
    text.finish()
}

pub fn airline(record: &AirlineRecord, line_break: LineBreak) -> String {
    let mut text = Text::new(line_break);
    text.line("Airline Information")
        .blank()
        .line(format!("Code: {}", record.code))
        .line(format!("Name: {}", record.name))
        .line(format!("Country: {}", record.country))
        .line(format!("Founded: {}", record.founded))
        .line(format!("Main Hub: {}", record.hub))
        .line(format!("Fleet Size: {}+", record.fleet_size))
        .line(format!("Destinations: {}+", record.destinations))
        .blank()
        .line("Reference data");
    text.finish()
}

/// Caller-facing text for a failed call. Internal failures never leak detail.
pub fn error(err: &CallError, line_break: LineBreak) -> String {
    let mut text = Text::new(line_break);
    match err {
        CallError::Validation(e) => {
            text.line(format!("Validation error: {}", e));
        }
        CallError::Domain(e) => {
            text.line(format!("Error ({}): {}", e.code(), e));
            if let Some(detail) = e.provider_detail() {
                text.line(format!("Provider detail: {}", detail));
            }
        }
        CallError::Internal(_) => {
            text.line(APOLOGY);
        }
    }
    text.finish()
}

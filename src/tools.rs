//! The four flight tools and their registry.
//!
//! Every tool validates its arguments with [`flight_core::validate`]
//! before touching any data source, then reads from the provider (live
//! mode) or the synthetic generator (fallback mode) through
//! [`ToolContext`], and renders one text block.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 ToolRegistry                 │
//! │  search_flights      get_airport_info        │
//! │  get_flight_status   get_airline_info        │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//!     Dispatcher → MCP (stdio / streamable HTTP), REST, CLI
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use flight_core::models::sort_by_total_price;
use flight_core::{
    validate, AirlineRecord, AirportRecord, CallError, DataMode, FlightError, FlightOffer,
    FlightStatusRecord, LookupSource, SearchCriteria, SyntheticGenerator,
};
use serde::Serialize;
use serde_json::Value;

use crate::config::LineBreak;
use crate::provider::FlightProvider;
use crate::render;

// ═══════════════════════════════════════════════════════════════════════
// Tool Trait
// ═══════════════════════════════════════════════════════════════════════

/// A named operation callable through every transport.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema for the argument object.
    fn parameters_schema(&self) -> Value;

    /// Validate `params`, fetch, and render the text payload.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, CallError>;
}

/// Serializable tool descriptor for listings.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolInfo {
    pub fn of(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters_schema(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ToolContext
// ═══════════════════════════════════════════════════════════════════════

/// Everything a tool needs, fixed for the life of the process.
///
/// The data mode is derived from whether a provider was supplied and
/// never changes afterwards.
pub struct ToolContext {
    provider: Option<Arc<dyn FlightProvider>>,
    generator: Arc<SyntheticGenerator>,
    line_break: LineBreak,
    today: Option<NaiveDate>,
}

impl ToolContext {
    pub fn new(
        provider: Option<Arc<dyn FlightProvider>>,
        generator: Arc<SyntheticGenerator>,
        line_break: LineBreak,
    ) -> Self {
        Self {
            provider,
            generator,
            line_break,
            today: None,
        }
    }

    /// Pin the date used for "not in the past" checks.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn mode(&self) -> DataMode {
        if self.provider.is_some() {
            DataMode::Live
        } else {
            DataMode::Fallback
        }
    }

    pub fn line_break(&self) -> LineBreak {
        self.line_break
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Offers for the criteria, ascending by total price on both paths.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<FlightOffer>, FlightError> {
        let mut offers = match &self.provider {
            Some(provider) => provider.search_flights(criteria).await?,
            None => self.generator.flights(criteria),
        };
        sort_by_total_price(&mut offers);
        Ok(offers)
    }

    pub async fn airport(&self, code: &str) -> Result<(AirportRecord, LookupSource), FlightError> {
        let source = LookupSource::for_mode(self.mode());
        let record = match &self.provider {
            Some(provider) => provider.airport(code).await?,
            None => self.generator.airport(code)?,
        };
        Ok((record, source))
    }

    /// Always synthetic: no live status source exists.
    pub fn flight_status(&self, flight_number: &str, date: NaiveDate) -> FlightStatusRecord {
        self.generator.flight_status(flight_number, date)
    }

    /// Always from the reference table: no live airline source exists.
    pub fn airline(&self, code: &str) -> Result<AirlineRecord, FlightError> {
        self.generator.airline(code)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Tools
// ═══════════════════════════════════════════════════════════════════════

pub struct SearchFlightsTool;

#[async_trait]
impl Tool for SearchFlightsTool {
    fn name(&self) -> &str {
        "search_flights"
    }

    fn description(&self) -> &str {
        "Search for flights between two airports"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "origin": {
                    "type": "string",
                    "description": "Origin airport code (IATA 3-letter code, e.g., JFK, LAX)"
                },
                "destination": {
                    "type": "string",
                    "description": "Destination airport code (IATA 3-letter code, e.g., JFK, LAX)"
                },
                "departure_date": {
                    "type": "string",
                    "description": "Departure date in YYYY-MM-DD format"
                },
                "return_date": {
                    "type": "string",
                    "description": "Return date in YYYY-MM-DD format (optional for one-way flights)"
                },
                "adults": {
                    "type": "integer",
                    "description": "Number of adult passengers (default: 1)",
                    "minimum": 1,
                    "maximum": 9
                },
                "travel_class": {
                    "type": "string",
                    "description": "Travel class preference",
                    "enum": ["economy", "premium_economy", "business", "first"]
                }
            },
            "required": ["origin", "destination", "departure_date"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, CallError> {
        let criteria = validate::search_criteria(&params, ctx.today())?;
        let offers = ctx.search(&criteria).await?;
        Ok(render::search_results(
            &offers,
            &criteria,
            ctx.mode(),
            ctx.line_break(),
        ))
    }
}

pub struct AirportInfoTool;

#[async_trait]
impl Tool for AirportInfoTool {
    fn name(&self) -> &str {
        "get_airport_info"
    }

    fn description(&self) -> &str {
        "Get information about an airport by its code"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "airport_code": {
                    "type": "string",
                    "description": "Airport IATA code (3-letter code, e.g., LAX, JFK)"
                }
            },
            "required": ["airport_code"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, CallError> {
        let code = validate::airport_code("airport_code", params.get("airport_code"))?;
        let (record, source) = ctx.airport(&code).await?;
        Ok(render::airport(&record, source, ctx.line_break()))
    }
}

pub struct FlightStatusTool;

#[async_trait]
impl Tool for FlightStatusTool {
    fn name(&self) -> &str {
        "get_flight_status"
    }

    fn description(&self) -> &str {
        "Get the status of a specific flight (simulated)"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "flight_number": {
                    "type": "string",
                    "description": "Flight number (e.g., AA123, DL456)"
                },
                "date": {
                    "type": "string",
                    "description": "Flight date in YYYY-MM-DD format"
                }
            },
            "required": ["flight_number", "date"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, CallError> {
        let flight_number = validate::flight_number(params.get("flight_number"))?;
        let date = validate::date("date", params.get("date"), ctx.today())?;
        let record = ctx.flight_status(&flight_number, date);
        Ok(render::flight_status(&record, ctx.line_break()))
    }
}

pub struct AirlineInfoTool;

#[async_trait]
impl Tool for AirlineInfoTool {
    fn name(&self) -> &str {
        "get_airline_info"
    }

    fn description(&self) -> &str {
        "Get information about an airline"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "airline_code": {
                    "type": "string",
                    "description": "Airline IATA code (2-letter code, e.g., AA, DL, UA)"
                }
            },
            "required": ["airline_code"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, CallError> {
        let code = validate::airline_code(params.get("airline_code"))?;
        let record = ctx.airline(&code)?;
        Ok(render::airline(&record, ctx.line_break()))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// Ordered set of tools, looked up by name.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry holding the four flight tools.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SearchFlightsTool));
        registry.register(Box::new(AirportInfoTool));
        registry.register(Box::new(FlightStatusTool));
        registry.register(Box::new(AirlineInfoTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback_ctx() -> ToolContext {
        ToolContext::new(
            None,
            Arc::new(SyntheticGenerator::seeded(5, "USD")),
            LineBreak::Newline,
        )
        .with_today(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
    }

    #[test]
    fn test_registry_builtins() {
        let registry = ToolRegistry::with_builtins();
        assert_eq!(registry.len(), 4);
        let names: Vec<&str> = registry.tools().iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "search_flights",
                "get_airport_info",
                "get_flight_status",
                "get_airline_info"
            ]
        );
        assert!(registry.find("book_flight").is_none());
        assert!(ToolRegistry::default().is_empty());
    }

    #[test]
    fn test_schemas_declare_required_fields() {
        let registry = ToolRegistry::with_builtins();
        let search = ToolInfo::of(registry.find("search_flights").unwrap());
        assert_eq!(
            search.parameters["required"],
            serde_json::json!(["origin", "destination", "departure_date"])
        );
        assert_eq!(search.parameters["properties"]["adults"]["maximum"], 9);
        for tool in registry.tools() {
            assert_eq!(tool.parameters_schema()["type"], "object");
        }
    }

    #[tokio::test]
    async fn test_search_in_fallback_mode() {
        let ctx = fallback_ctx();
        assert_eq!(ctx.mode(), DataMode::Fallback);
        let out = SearchFlightsTool
            .execute(
                serde_json::json!({"origin": "lax", "destination": "jfk", "departure_date": "2030-02-01"}),
                &ctx,
            )
            .await
            .unwrap();
        assert!(out.contains("Route: LAX → JFK"));
        assert!(out.contains("5. "));
        assert!(!out.contains("6. "));
    }

    #[tokio::test]
    async fn test_validation_short_circuits() {
        let ctx = fallback_ctx();
        let err = SearchFlightsTool
            .execute(
                serde_json::json!({"origin": "LAX", "destination": "LAX", "departure_date": "2030-02-01"}),
                &ctx,
            )
            .await
            .unwrap_err();
        match err {
            CallError::Validation(e) => assert_eq!(e.field, "destination"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_airport_and_airline_lookups() {
        let ctx = fallback_ctx();
        let out = AirportInfoTool
            .execute(serde_json::json!({"airport_code": "nrt"}), &ctx)
            .await
            .unwrap();
        assert!(out.contains("City: Tokyo"));
        assert!(out.ends_with("Sample data"));

        let err = AirportInfoTool
            .execute(serde_json::json!({"airport_code": "XYZ"}), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_airport_code");

        let first = AirlineInfoTool
            .execute(serde_json::json!({"airline_code": "ba"}), &ctx)
            .await
            .unwrap();
        let second = AirlineInfoTool
            .execute(serde_json::json!({"airline_code": "BA"}), &ctx)
            .await
            .unwrap();
        assert_eq!(first, second);

        let err = AirlineInfoTool
            .execute(serde_json::json!({"airline_code": "ZZ"}), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "airline_not_found");
    }

    #[tokio::test]
    async fn test_flight_status_validates_date() {
        let ctx = fallback_ctx();
        let out = FlightStatusTool
            .execute(
                serde_json::json!({"flight_number": "aa123", "date": "2030-01-01"}),
                &ctx,
            )
            .await
            .unwrap();
        assert!(out.contains("Flight: AA123"));

        let err = FlightStatusTool
            .execute(
                serde_json::json!({"flight_number": "AA123", "date": "2029-12-31"}),
                &ctx,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }
}

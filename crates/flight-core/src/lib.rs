//! # Flight Core
//!
//! Network-free logic shared by the Flight MCP server: the data model,
//! the validation layer, the error taxonomy, the fixed reference tables,
//! and the synthetic data generator used in fallback mode.
//!
//! This crate performs no I/O. Everything that talks to the flight-data
//! provider lives in the `flight-mcp` crate.

pub mod error;
pub mod models;
pub mod reference;
pub mod synthetic;
pub mod validate;

pub use error::{
    CallError, DateProblem, FlightError, ProviderDetail, ValidationError, ValidationKind,
};
pub use models::{
    AirlineRecord, AirportRecord, Coordinates, DataMode, FlightDuration, FlightOffer, FlightStatus,
    FlightStatusRecord, LookupSource, Price, SearchCriteria, TravelClass,
};
pub use synthetic::SyntheticGenerator;

//! # Flight MCP
//!
//! An MCP tool server answering flight queries: flight search, airport
//! lookup, flight status, and airline information.
//!
//! Searches and airport lookups go to the Amadeus self-service API when
//! it is reachable at startup; otherwise every answer comes from a
//! synthetic generator and fixed reference tables. The choice is made
//! once per process.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  ┌────────────┐  ┌──────────┐
//! │  stdio   │  │ HTTP (/mcp │  │   CLI    │
//! │   MCP    │  │  + REST)   │  │  `call`  │
//! └────┬─────┘  └─────┬──────┘  └────┬─────┘
//!      └──────────────┼──────────────┘
//!                     ▼
//!              ┌────────────┐
//!              │ Dispatcher │  validate → fetch → render
//!              └─────┬──────┘
//!          ┌─────────┴─────────┐
//!          ▼                   ▼
//!   ┌─────────────┐    ┌──────────────┐
//!   │   Amadeus   │    │  Synthetic   │
//!   │  (live)     │    │  (fallback)  │
//!   └─────────────┘    └──────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and credentials |
//! | [`provider`] | Provider trait and failure classification |
//! | [`amadeus`] | Amadeus HTTP client |
//! | [`probe`] | One-time live/fallback decision |
//! | [`tools`] | The four tools and their registry |
//! | [`render`] | Text payloads |
//! | [`dispatch`] | Call boundary shared by all transports |
//! | [`mcp`] | MCP protocol bridge |
//! | [`server`] | stdio and HTTP transports |
//!
//! Validation, the data model, the error taxonomy, and the synthetic
//! generator live in the `flight-core` crate.

pub mod amadeus;
pub mod config;
pub mod dispatch;
pub mod mcp;
pub mod probe;
pub mod provider;
pub mod render;
pub mod server;
pub mod tools;

//! Startup availability probe.
//!
//! The data mode is decided exactly once, before any call is served, and
//! handed to the dispatcher. A provider that comes back later is never
//! promoted, and a live provider that starts failing is never demoted.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use flight_core::{DataMode, FlightError, SearchCriteria, TravelClass};

use crate::amadeus::AmadeusClient;
use crate::config::{Config, ModeSetting};
use crate::provider::FlightProvider;

/// How far ahead the probe search looks.
const PROBE_LEAD_DAYS: i64 = 30;

/// Result of the one-time mode decision.
pub struct ProbeOutcome {
    pub mode: DataMode,
    /// Present exactly when `mode` is [`DataMode::Live`].
    pub provider: Option<Arc<dyn FlightProvider>>,
    /// Why the mode was chosen; only ever logged or printed by `probe`.
    pub diagnostic: String,
}

impl ProbeOutcome {
    pub fn fallback(diagnostic: impl Into<String>) -> Self {
        Self {
            mode: DataMode::Fallback,
            provider: None,
            diagnostic: diagnostic.into(),
        }
    }

    pub fn live(provider: Arc<dyn FlightProvider>, diagnostic: impl Into<String>) -> Self {
        Self {
            mode: DataMode::Live,
            provider: Some(provider),
            diagnostic: diagnostic.into(),
        }
    }
}

/// Fixed, benign search used to test the provider: LAX to JFK, one adult, economy.
pub fn probe_criteria(today: NaiveDate) -> SearchCriteria {
    SearchCriteria {
        origin: "LAX".to_string(),
        destination: "JFK".to_string(),
        departure_date: today + Duration::days(PROBE_LEAD_DAYS),
        return_date: None,
        adults: 1,
        travel_class: TravelClass::Economy,
    }
}

/// Issue the probe search. Success means at least one offer came back.
pub async fn probe(provider: &dyn FlightProvider, today: NaiveDate) -> Result<usize, FlightError> {
    let offers = provider.search_flights(&probe_criteria(today)).await?;
    if offers.is_empty() {
        return Err(FlightError::no_flights());
    }
    Ok(offers.len())
}

/// Probe an already-built provider and pick the mode.
pub async fn decide(provider: Arc<dyn FlightProvider>, today: NaiveDate) -> ProbeOutcome {
    match probe(provider.as_ref(), today).await {
        Ok(count) => {
            tracing::info!(provider = provider.name(), offers = count, "provider probe succeeded");
            ProbeOutcome::live(provider, format!("probe returned {} offers", count))
        }
        Err(e) => {
            tracing::warn!(error = %e, code = e.code(), "provider probe failed, using sample data");
            ProbeOutcome::fallback(format!("probe failed: {}", e))
        }
    }
}

/// Resolve the data mode for this process from configuration.
///
/// `Live` without credentials is a startup error; `Auto` without
/// credentials quietly falls back.
pub async fn resolve(config: &Config, setting: ModeSetting, today: NaiveDate) -> Result<ProbeOutcome> {
    match setting {
        ModeSetting::Fallback => Ok(ProbeOutcome::fallback("fallback mode requested")),
        ModeSetting::Live => {
            let credentials = config
                .provider
                .credentials()
                .context("live mode requires provider credentials")?;
            let client = AmadeusClient::new(&config.provider, credentials)
                .context("Failed to build provider client")?;
            Ok(ProbeOutcome::live(
                Arc::new(client),
                "live mode requested, probe skipped",
            ))
        }
        ModeSetting::Auto => {
            let credentials = match config.provider.credentials() {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(error = %e, "provider credentials missing, using sample data");
                    return Ok(ProbeOutcome::fallback(format!(
                        "provider credentials unavailable: {}",
                        e
                    )));
                }
            };
            let client = AmadeusClient::new(&config.provider, credentials)
                .context("Failed to build provider client")?;
            Ok(decide(Arc::new(client), today).await)
        }
    }
}

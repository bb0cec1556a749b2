//! TOML configuration.
//!
//! ```toml
//! [provider]
//! base_url = "https://test.api.amadeus.com"
//! api_key_env = "AMADEUS_API_KEY"
//! api_secret_env = "AMADEUS_API_SECRET"
//! currency = "USD"
//! max_offers = 10
//! timeout_secs = 30
//! mode = "auto"          # auto | live | fallback
//!
//! [fallback]
//! seed = 42              # optional; entropy when absent
//!
//! [output]
//! line_break = "escaped" # escaped | newline
//!
//! [server]
//! bind = "127.0.0.1:7341"
//! ```
//!
//! Every section and key is optional. Credentials are only ever read
//! from the environment variables named in `[provider]`.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// How the live/fallback decision is made at startup.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModeSetting {
    /// Probe the provider once and pick live or fallback.
    #[default]
    Auto,
    /// Use the provider without probing; credentials are required.
    Live,
    /// Never contact the provider.
    Fallback,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_api_secret_env")]
    pub api_secret_env: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_max_offers")]
    pub max_offers: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub mode: ModeSetting,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            api_secret_env: default_api_secret_env(),
            currency: default_currency(),
            max_offers: default_max_offers(),
            timeout_secs: default_timeout_secs(),
            mode: ModeSetting::Auto,
        }
    }
}

fn default_base_url() -> String {
    "https://test.api.amadeus.com".to_string()
}
fn default_api_key_env() -> String {
    "AMADEUS_API_KEY".to_string()
}
fn default_api_secret_env() -> String {
    "AMADEUS_API_SECRET".to_string()
}
fn default_currency() -> String {
    "USD".to_string()
}
/// Upper bound on offers requested per search.
pub const MAX_OFFERS_LIMIT: u32 = 10;

fn default_max_offers() -> u32 {
    10
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FallbackConfig {
    #[serde(default)]
    pub seed: Option<u64>,
}

/// How line breaks are written into text payloads.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineBreak {
    /// The two characters `\` and `n`.
    #[default]
    Escaped,
    /// A real newline byte.
    Newline,
}

impl LineBreak {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineBreak::Escaped => "\\n",
            LineBreak::Newline => "\n",
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub line_break: LineBreak,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

/// Provider credentials read from the environment.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl ProviderConfig {
    /// Read both secrets from the configured environment variables.
    ///
    /// Empty values count as missing.
    pub fn credentials(&self) -> Result<Credentials> {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} environment variable not set", name))
        };
        Ok(Credentials {
            api_key: read(&self.api_key_env)?,
            api_secret: read(&self.api_secret_env)?,
        })
    }
}

/// Parse and validate a configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::info!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::default())
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.provider.base_url.trim().is_empty() {
        bail!("provider.base_url must not be empty");
    }

    if !(1..=MAX_OFFERS_LIMIT).contains(&config.provider.max_offers) {
        bail!("provider.max_offers must be in [1, {}]", MAX_OFFERS_LIMIT);
    }

    if config.provider.timeout_secs == 0 {
        bail!("provider.timeout_secs must be > 0");
    }

    let currency = &config.provider.currency;
    if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
        bail!(
            "provider.currency must be a 3-letter uppercase ISO code, got '{}'",
            currency
        );
    }

    Ok(())
}

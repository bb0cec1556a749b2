//! # Flight MCP CLI (`flight-mcp`)
//!
//! ## Usage
//!
//! ```bash
//! flight-mcp --config ./config/flight.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `flight-mcp serve mcp` | MCP server over stdio |
//! | `flight-mcp serve http` | HTTP server: `/mcp`, `/tools/*`, `/health` |
//! | `flight-mcp call <tool> --param k=v` | Run one tool call and print the result |
//! | `flight-mcp tools` | List tools |
//! | `flight-mcp probe` | Decide the data mode and print why |
//!
//! ## Examples
//!
//! ```bash
//! # Sample data only, no credentials needed
//! flight-mcp --mode fallback call search_flights \
//!     --param origin=LAX --param destination=JFK --param departure_date=2030-07-01
//!
//! # Live data when AMADEUS_API_KEY / AMADEUS_API_SECRET are set
//! flight-mcp serve mcp
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` to adjust (default `flight_mcp=info`).

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use flight_mcp::config::{self, ModeSetting};
use flight_mcp::dispatch::Dispatcher;
use flight_mcp::probe::{self, ProbeOutcome};
use flight_mcp::server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Flight MCP: flight search, airport, status, and airline tools over MCP.
#[derive(Parser)]
#[command(
    name = "flight-mcp",
    about = "Flight information tools over MCP, backed by Amadeus with a sample-data fallback",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). A missing file means defaults.
    #[arg(long, global = true, default_value = "./config/flight.toml")]
    config: PathBuf,

    /// Override `[provider].mode`.
    #[arg(long, global = true, value_enum)]
    mode: Option<ModeSetting>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a server.
    Serve {
        #[command(subcommand)]
        service: ServeService,
    },

    /// Call one tool and print its text payload.
    ///
    /// Exits non-zero when the tool returns an error payload.
    Call {
        /// Tool name, e.g. `search_flights`.
        tool: String,

        /// Tool argument as KEY=VALUE. Repeatable.
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// List available tools.
    Tools,

    /// Decide the data mode and print the result.
    Probe,
}

#[derive(Subcommand)]
enum ServeService {
    /// MCP over stdin/stdout.
    Mcp,
    /// HTTP on `[server].bind`.
    Http,
}

/// Parse a `key=value` pair for `--param` arguments.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flight_mcp=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = config::load_or_default(&cli.config)?;
    let setting = cli.mode.unwrap_or(cfg.provider.mode);
    let today = chrono::Local::now().date_naive();

    if let Commands::Tools = cli.command {
        let dispatcher = Dispatcher::from_config(&cfg, ProbeOutcome::fallback("listing only"));
        for tool in dispatcher.tools() {
            println!("{:<20} {}", tool.name, tool.description);
        }
        return Ok(());
    }

    let outcome = probe::resolve(&cfg, setting, today)
        .await
        .context("Failed to decide data mode")?;
    tracing::info!(mode = %outcome.mode, diagnostic = %outcome.diagnostic, "data mode decided");

    match cli.command {
        Commands::Probe => {
            println!("mode: {}", outcome.mode);
            println!("diagnostic: {}", outcome.diagnostic);
        }
        Commands::Serve { service } => {
            let dispatcher = Dispatcher::from_config(&cfg, outcome);
            match service {
                ServeService::Mcp => server::run_stdio(dispatcher).await?,
                ServeService::Http => server::run_http(dispatcher, &cfg.server.bind).await?,
            }
        }
        Commands::Call { tool, params } => {
            let dispatcher = Dispatcher::from_config(&cfg, outcome);
            let args: serde_json::Map<String, serde_json::Value> = params
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            let reply = dispatcher
                .call(&tool, serde_json::Value::Object(args))
                .await;
            println!("{}", reply.text);
            if reply.is_error {
                std::process::exit(1);
            }
        }
        Commands::Tools => {}
    }

    Ok(())
}

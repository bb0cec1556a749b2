use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn flight_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("flight-mcp");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let config_dir = tmp.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = r#"[provider]
mode = "fallback"
api_key_env = "FLIGHT_MCP_IT_UNSET_KEY"
api_secret_env = "FLIGHT_MCP_IT_UNSET_SECRET"

[fallback]
seed = 17

[output]
line_break = "newline"
"#;

    let config_path = config_dir.join("flight.toml");
    fs::write(&config_path, config_content).unwrap();
    (tmp, config_path)
}

fn run_flight(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = flight_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run flight-mcp binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn future_date(days: i64) -> String {
    (chrono::Local::now().date_naive() + chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

#[test]
fn test_tools_lists_four() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, stderr, success) = run_flight(&config_path, &["tools"]);
    assert!(success, "tools failed: {}", stderr);
    for name in [
        "search_flights",
        "get_airport_info",
        "get_flight_status",
        "get_airline_info",
    ] {
        assert!(stdout.contains(name), "missing {}", name);
    }
}

#[test]
fn test_probe_reports_fallback() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_flight(&config_path, &["probe"]);
    assert!(success);
    assert!(stdout.contains("mode: fallback"));
}

#[test]
fn test_search_sample_results() {
    let (_tmp, config_path) = setup_test_env();
    let departure = format!("departure_date={}", future_date(20));
    let (stdout, stderr, success) = run_flight(
        &config_path,
        &[
            "call",
            "search_flights",
            "--param",
            "origin=lax",
            "--param",
            "destination=nrt",
            "--param",
            &departure,
            "--param",
            "adults=2",
        ],
    );
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Route: LAX → NRT"));
    assert!(stdout.contains("Sample data (configure API for real results)"));
    assert!(stdout.contains("5. "));
    assert!(stdout.contains("Note: These are sample results."));
}

#[test]
fn test_same_origin_and_destination_fails() {
    let (_tmp, config_path) = setup_test_env();
    let departure = format!("departure_date={}", future_date(20));
    let (stdout, _, success) = run_flight(
        &config_path,
        &[
            "call",
            "search_flights",
            "--param",
            "origin=LAX",
            "--param",
            "destination=LAX",
            "--param",
            &departure,
        ],
    );
    assert!(!success);
    assert!(stdout.starts_with("Validation error: destination"));
}

#[test]
fn test_past_date_fails() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_flight(
        &config_path,
        &[
            "call",
            "get_flight_status",
            "--param",
            "flight_number=DL456",
            "--param",
            "date=2001-01-01",
        ],
    );
    assert!(!success);
    assert!(stdout.contains("date"));
}

#[test]
fn test_airline_lookup_is_deterministic() {
    let (_tmp, config_path) = setup_test_env();
    let args = ["call", "get_airline_info", "--param", "airline_code=dl"];
    let (first, _, ok1) = run_flight(&config_path, &args);
    let (second, _, ok2) = run_flight(&config_path, &args);
    assert!(ok1 && ok2);
    assert_eq!(first, second);
    assert!(first.contains("Name: Delta Air Lines"));
}

#[test]
fn test_unknown_airline_and_airport() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_flight(
        &config_path,
        &["call", "get_airline_info", "--param", "airline_code=ZZ"],
    );
    assert!(!success);
    assert!(stdout.contains("airline_not_found"));

    let (stdout, _, success) = run_flight(
        &config_path,
        &["call", "get_airport_info", "--param", "airport_code=XYZ"],
    );
    assert!(!success);
    assert!(stdout.contains("invalid_airport_code"));
}

#[test]
fn test_unknown_tool_fails() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_flight(&config_path, &["call", "book_flight"]);
    assert!(!success);
    assert!(stdout.contains("Unknown tool: book_flight"));
}

#[test]
fn test_escaped_line_breaks() {
    let (_tmp, config_path) = setup_test_env();
    let escaped = config_path.with_file_name("escaped.toml");
    fs::write(
        &escaped,
        "[provider]\nmode = \"fallback\"\n\n[output]\nline_break = \"escaped\"\n",
    )
    .unwrap();
    let (stdout, _, success) = run_flight(
        &escaped,
        &["call", "get_airport_info", "--param", "airport_code=CDG"],
    );
    assert!(success);
    assert!(stdout.contains("Airport Information\\n\\nCode: CDG"));
    assert_eq!(stdout.trim_end().lines().count(), 1);
}

#[test]
fn test_live_mode_without_credentials_is_startup_error() {
    let (_tmp, config_path) = setup_test_env();
    let (_, stderr, success) = run_flight(&config_path, &["--mode", "live", "probe"]);
    assert!(!success);
    assert!(stderr.contains("credentials"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_config_rejected() {
    let (_tmp, config_path) = setup_test_env();
    fs::write(&config_path, "[provider]\nmax_offers = 0\n").unwrap();
    let (_, _, success) = run_flight(&config_path, &["tools"]);
    assert!(!success);
}

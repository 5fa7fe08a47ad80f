//! IO envelope for the belts solver: read all of stdin, write all of
//! stdout, exit 0 unconditionally. Diagnostics go to stderr via `tracing`
//! so stdout stays a single parseable JSON document (SPEC_FULL §6.1).

use std::io::{self, Read, Write};

use line_balance::belts::{solve, BeltsRequest, BeltsResponse};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let response = run();
    let output = serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"status":"error","message":"failed to serialize response"}"#.to_string());

    let mut stdout = io::stdout();
    let _ = stdout.write_all(output.as_bytes());
    let _ = stdout.flush();
}

fn run() -> BeltsResponse {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        return BeltsResponse::Error { message: format!("failed to read stdin: {e}") };
    }

    let request: BeltsRequest = match serde_json::from_str(&input) {
        Ok(r) => r,
        Err(e) => return BeltsResponse::Error { message: format!("invalid JSON input: {e}") },
    };

    match solve(&request) {
        Ok(response) => response,
        Err(e) => BeltsResponse::Error { message: e.to_string() },
    }
}

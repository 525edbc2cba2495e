//! Health check command
//!
//! GETs `/api` on a running server and prints the response. Exits with an
//! error unless the server answers 200, which makes it usable as a
//! container health check.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Health endpoint URL (default: http://127.0.0.1:$PORT/api)
    #[arg(long)]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "5")]
    pub timeout: u64,
}

fn default_url() -> String {
    let port = std::env::var("PORT")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| "3000".to_string());
    format!("http://127.0.0.1:{}/api", port.trim())
}

/// Probe the health endpoint
pub async fn run_check(args: CheckArgs) -> Result<()> {
    let url = args.url.unwrap_or_else(default_url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .context("Health endpoint did not return JSON")?;

    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        bail!("{} reported {}", url, status);
    }

    tracing::debug!(%url, "Health check passed");
    Ok(())
}

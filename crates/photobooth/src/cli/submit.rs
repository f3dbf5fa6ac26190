//! The `photobooth submit` command: send an image file to a running server.

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

/// Arguments for the `submit` command.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// JPEG or PNG file to submit
    pub file: PathBuf,

    /// Base URL of the photobooth server
    #[arg(long, env = "PHOTOBOOTH_SERVER", default_value = "http://localhost:8080")]
    pub server: String,
}

pub async fn execute(args: SubmitArgs) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let data = BASE64.encode(&bytes);

    let url = endpoint(&args.server);
    tracing::debug!("Submitting {} ({} bytes) to {}", args.file.display(), bytes.len(), url);

    let response = reqwest::Client::new()
        .post(&url)
        .json(&json!({ "data": data }))
        .send()
        .await
        .with_context(|| format!("Failed to reach {url}"))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        anyhow::bail!("Server rejected submission ({status}): {body}");
    }

    println!("Queued {}", args.file.display());
    Ok(())
}

fn endpoint(server: &str) -> String {
    format!("{}/api/photo", server.trim_end_matches('/'))
}

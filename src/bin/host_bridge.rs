//! Headless host bridge binary for stdin/stdout JSON communication.
//!
//! Reads `CommandEnvelope` messages as newline-delimited JSON from stdin,
//! drives one sketch session, and writes `ResponseEnvelope` and
//! `EventEnvelope` messages to stdout.
//!
//! All tracing/diagnostic output goes to stderr so that stdout remains a
//! clean JSON protocol channel.

use std::sync::Arc;

use anyhow::Context;
use sketchguess::host::{SessionRouter, run_stdio_bridge};
use sketchguess::inference::{GeminiClassifier, GeminiConfig, InferenceClient};
use sketchguess::{SketchConfig, SketchSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise tracing to stderr only (stdout is reserved for the JSON
    // protocol).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("sketchguess-host starting");

    let config = SketchConfig::load_or_default().context("failed to load config")?;
    config.validate().context("invalid config")?;

    let language = config.locale.resolve();
    let classifier = GeminiClassifier::new(GeminiConfig::from_inference_config(&config.inference));
    let client = Arc::new(InferenceClient::new(classifier));
    let session =
        SketchSession::start(&config, client, language).context("failed to start session")?;

    run_stdio_bridge(SessionRouter::new(session))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "sketchguess-host exited with error");
            anyhow::anyhow!("sketchguess-host failed: {e}")
        })?;

    tracing::info!("sketchguess-host shut down cleanly");
    Ok(())
}

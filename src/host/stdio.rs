//! Stdin/stdout JSON bridge for driving a sketch session.
//!
//! Reads newline-delimited JSON `CommandEnvelope` messages, routes them
//! through a [`SessionRouter`], and writes `ResponseEnvelope` and
//! `EventEnvelope` messages as newline-delimited JSON.
//!
//! Stdout is exclusively reserved for the JSON protocol; all diagnostic
//! output (tracing, logs) must be routed to stderr.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::{Mutex, watch};

use crate::error::{Result, SketchError};
use crate::host::contract::{
    CommandEnvelope, CommandName, EVENT_ANALYSIS_STATE, EventEnvelope, ResponseEnvelope,
};
use crate::host::router::SessionRouter;
use crate::pipeline::AnalysisState;

type SharedWriter<W> = Arc<Mutex<BufWriter<W>>>;

/// Run the bridge over the process's stdin and stdout.
pub async fn run_stdio_bridge(router: SessionRouter) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    run_bridge(router, stdin, tokio::io::stdout()).await
}

/// Run the bridge until the input closes or a `runtime.stop` command is
/// received.
///
/// Two tasks operate in parallel:
///
/// 1. **Reader** -- reads commands, routes each one, and writes the
///    response. Runs on the current task.
/// 2. **Event forwarder** -- writes an `analysis.state` event for every
///    state change published by the session.
///
/// When the reader finishes the session is shut down, which closes the
/// state channel and lets the forwarder drain and exit.
pub async fn run_bridge<R, W>(mut router: SessionRouter, reader: R, writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let writer: SharedWriter<W> = Arc::new(Mutex::new(BufWriter::new(writer)));

    let state_rx = router.session().subscribe();
    let event_handle = tokio::spawn(forward_state_events(state_rx, Arc::clone(&writer)));

    let reader_result = run_reader(&mut router, reader, &writer).await;

    router.into_session().join().await;
    if let Err(e) = event_handle.await {
        tracing::warn!(error = %e, "event forwarder ended abnormally");
    }

    reader_result
}

async fn forward_state_events<W>(mut state_rx: watch::Receiver<AnalysisState>, writer: SharedWriter<W>)
where
    W: AsyncWrite + Unpin + Send,
{
    while state_rx.changed().await.is_ok() {
        let state = state_rx.borrow_and_update().clone();
        let payload = match serde_json::to_value(&state) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize analysis state; skipping");
                continue;
            }
        };
        let envelope = EventEnvelope::new(
            uuid::Uuid::new_v4().to_string(),
            EVENT_ANALYSIS_STATE,
            payload,
        );
        match serde_json::to_string(&envelope) {
            Ok(json) => {
                let mut w = writer.lock().await;
                if let Err(e) = write_line(&mut w, &json).await {
                    tracing::warn!(
                        error = %e,
                        "failed to write event envelope; stopping event forwarder"
                    );
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize event envelope; skipping");
            }
        }
    }
    tracing::debug!("analysis state channel closed; event forwarder stopped");
}

/// Read line-by-line, dispatch each command, and write responses.
async fn run_reader<R, W>(
    router: &mut SessionRouter,
    mut reader: R,
    writer: &SharedWriter<W>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| SketchError::Channel(format!("failed to read command: {e}")))?;

        if bytes_read == 0 {
            tracing::info!("input closed (EOF); shutting down bridge");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<CommandEnvelope>(trimmed) {
            Ok(envelope) => {
                let is_stop = envelope.command == CommandName::RuntimeStop;
                let response = router.dispatch(&envelope);
                write_response(writer, &response).await?;
                if is_stop && response.ok {
                    tracing::info!("runtime.stop received; shutting down bridge");
                    break;
                }
                continue;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    raw_line = %trimmed,
                    "failed to parse command envelope"
                );
                ResponseEnvelope::error(
                    "parse-error",
                    format!("failed to parse command envelope: {e}"),
                )
            }
        };
        write_response(writer, &response).await?;
    }

    Ok(())
}

async fn write_response<W>(writer: &SharedWriter<W>, response: &ResponseEnvelope) -> Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    let json = serde_json::to_string(response)
        .map_err(|e| SketchError::Host(format!("failed to serialize response envelope: {e}")))?;
    let mut w = writer.lock().await;
    write_line(&mut w, &json).await
}

/// Write a single JSON line to the buffered writer and flush.
async fn write_line<W>(writer: &mut BufWriter<W>, json: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(json.as_bytes())
        .await
        .map_err(|e| SketchError::Channel(format!("failed to write output: {e}")))?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| SketchError::Channel(format!("failed to write newline: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| SketchError::Channel(format!("failed to flush output: {e}")))?;
    Ok(())
}

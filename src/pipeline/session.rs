//! Sketch session: wires the drawing surface, the debounce gate, and the
//! inference client together.
//!
//! ```text
//! input ──► DrawingSurface ──frame──► DebounceController ──frame──► worker
//!                                                                   │
//!                                     watch<AnalysisState> ◄────────┘
//! ```
//!
//! The worker task is the only writer of [`AnalysisState`]. Each debounced
//! frame starts a new analysis cycle; cycles are not serialized, so when two
//! overlap the one that completes last decides the published prediction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use super::debounce::DebounceController;
use crate::canvas::{DrawingSurface, Frame, InputEvent, Tool};
use crate::config::SketchConfig;
use crate::error::Result;
use crate::inference::{Classifier, InferenceClient, Prediction};
use crate::locale::Language;

/// UI-facing analysis state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "prediction", rename_all = "snake_case")]
pub enum AnalysisState {
    /// No analysis has run yet.
    #[default]
    Idle,
    /// A debounced frame has been dispatched and no completion has arrived since.
    Analyzing,
    /// The most recent completion.
    Done(Prediction),
}

impl AnalysisState {
    pub fn is_analyzing(&self) -> bool {
        matches!(self, Self::Analyzing)
    }

    /// The last completed prediction, if any.
    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            Self::Done(p) => Some(p),
            Self::Idle | Self::Analyzing => None,
        }
    }
}

/// One interactive drawing session with background analysis.
///
/// Must be created inside a tokio runtime. Dropping the session tears down
/// the debounce gate so a pending frame is never analyzed.
#[derive(Debug)]
pub struct SketchSession {
    surface: DrawingSurface,
    debounce: DebounceController<Frame>,
    state_rx: watch::Receiver<AnalysisState>,
    cancel: CancellationToken,
    worker: Option<JoinHandle<()>>,
    language: Language,
}

impl SketchSession {
    /// Build the surface from `config` and spawn the debounce and analysis tasks.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Canvas`](crate::error::SketchError::Canvas) if
    /// the canvas section describes an unusable surface.
    pub fn start<C: Classifier + 'static>(
        config: &SketchConfig,
        client: Arc<InferenceClient<C>>,
        language: Language,
    ) -> Result<Self> {
        let surface = DrawingSurface::from_config(&config.canvas)?;
        let cancel = CancellationToken::new();
        let (debounce, frames) =
            DebounceController::spawn(config.debounce.quiet_period(), cancel.child_token());
        let (state_tx, state_rx) = watch::channel(AnalysisState::Idle);

        let worker = tokio::spawn(run_analysis_worker(
            client,
            language,
            frames,
            state_tx,
            cancel.clone(),
        ));

        tracing::info!(
            width = surface.width(),
            height = surface.height(),
            quiet_ms = config.debounce.quiet_ms,
            %language,
            "sketch session started"
        );

        Ok(Self {
            surface,
            debounce,
            state_rx,
            cancel,
            worker: Some(worker),
            language,
        })
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Snapshot of the current analysis state.
    pub fn state(&self) -> AnalysisState {
        self.state_rx.borrow().clone()
    }

    /// Watch receiver that yields every state change.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.state_rx.clone()
    }

    /// Feed one pointer event. A finished stroke schedules analysis.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<()> {
        if let Some(frame) = self.surface.handle_input(event)? {
            self.schedule(frame);
        }
        Ok(())
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.surface.set_tool(tool);
    }

    /// Undo the last destructive operation. Returns `false` when the history
    /// was empty, in which case nothing is scheduled.
    pub fn undo(&mut self) -> Result<bool> {
        match self.surface.undo()? {
            Some(frame) => {
                self.schedule(frame);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Wipe the canvas and schedule analysis of the blank frame.
    pub fn clear(&mut self) -> Result<()> {
        let frame = self.surface.clear()?;
        self.schedule(frame);
        Ok(())
    }

    /// Reinitialize the surface to new dimensions. Does not schedule analysis.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.surface.resize(width, height)
    }

    /// Cancel any pending debounce and stop the worker.
    ///
    /// Calls already dispatched run to completion but their results are
    /// discarded.
    pub fn shutdown(&mut self) {
        if !self.cancel.is_cancelled() {
            tracing::info!("sketch session shutting down");
        }
        self.debounce.shutdown();
        self.cancel.cancel();
    }

    /// Shut down and wait for the worker task to exit.
    pub async fn join(mut self) {
        self.shutdown();
        if let Some(worker) = self.worker.take()
            && let Err(e) = worker.await
        {
            tracing::warn!(error = %e, "analysis worker ended abnormally");
        }
    }

    fn schedule(&self, frame: Frame) {
        let (width, height, bytes) = (frame.width(), frame.height(), frame.png_bytes().len());
        if self.debounce.submit(frame) {
            tracing::debug!(width, height, bytes, "frame scheduled for analysis");
        } else {
            tracing::debug!("session shut down; frame not scheduled");
        }
    }
}

impl Drop for SketchSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_analysis_worker<C: Classifier + 'static>(
    client: Arc<InferenceClient<C>>,
    language: Language,
    mut frames: mpsc::UnboundedReceiver<Frame>,
    state_tx: watch::Sender<AnalysisState>,
    cancel: CancellationToken,
) {
    let mut in_flight: JoinSet<(u64, Prediction)> = JoinSet::new();
    let mut cycle: u64 = 0;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            frame = frames.recv() => {
                let Some(frame) = frame else {
                    break;
                };
                cycle += 1;
                let id = cycle;
                tracing::debug!(cycle = id, "analysis cycle started");
                state_tx.send_replace(AnalysisState::Analyzing);

                let client = Arc::clone(&client);
                in_flight.spawn(async move {
                    let prediction = client.analyze_frame(&frame, language).await;
                    (id, prediction)
                });
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                let prediction = match joined {
                    Ok((id, prediction)) => {
                        if id != cycle {
                            tracing::debug!(cycle = id, latest = cycle, "stale cycle completed");
                        }
                        prediction
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "analysis task failed");
                        Prediction::fallback()
                    }
                };
                state_tx.send_replace(AnalysisState::Done(prediction));
            }
        }
    }

    if !in_flight.is_empty() {
        tracing::debug!(
            pending = in_flight.len(),
            "detaching in-flight analysis calls"
        );
        in_flight.detach_all();
    }
    tracing::debug!(cycles = cycle, "analysis worker stopped");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::canvas::Point;
    use crate::inference::InferenceError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Classifier for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        async fn classify(
            &self,
            image_base64: &str,
            _language: Language,
        ) -> std::result::Result<Prediction, InferenceError> {
            self.calls.lock().unwrap().push(image_base64.to_owned());
            Ok(Prediction::new("Circle", "Round", 64.0))
        }
    }

    fn small_config() -> SketchConfig {
        let mut config = SketchConfig::default();
        config.canvas.width = 32;
        config.canvas.height = 32;
        config
    }

    fn stroke(session: &mut SketchSession, from: (f32, f32), to: (f32, f32)) {
        session
            .handle_input(InputEvent::PointerDown(Point::new(from.0, from.1)))
            .unwrap();
        session
            .handle_input(InputEvent::PointerMove(Point::new(to.0, to.1)))
            .unwrap();
        session.handle_input(InputEvent::PointerUp).unwrap();
    }

    #[test]
    fn state_accessors() {
        assert!(!AnalysisState::Idle.is_analyzing());
        assert!(AnalysisState::Analyzing.is_analyzing());
        let done = AnalysisState::Done(Prediction::new("Cat", "Ears", 50.0));
        assert_eq!(done.prediction().map(|p| p.guess.as_str()), Some("Cat"));
        assert!(AnalysisState::Idle.prediction().is_none());
    }

    #[test]
    fn state_serializes_tagged() {
        let json = serde_json::to_value(AnalysisState::Analyzing).unwrap();
        assert_eq!(json, serde_json::json!({"status": "analyzing"}));
        let json =
            serde_json::to_value(AnalysisState::Done(Prediction::new("Cat", "Ears", 50.0)))
                .unwrap();
        assert_eq!(json["status"], "done");
        assert_eq!(json["prediction"]["guess"], "Cat");
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_strokes_analyzes_last_frame_once() {
        let classifier = Arc::new(InferenceClient::new(Recording::default()));
        let mut session =
            SketchSession::start(&small_config(), Arc::clone(&classifier), Language::En).unwrap();
        let mut rx = session.subscribe();

        stroke(&mut session, (2.0, 2.0), (10.0, 2.0));
        tokio::time::sleep(Duration::from_millis(200)).await;
        stroke(&mut session, (2.0, 20.0), (20.0, 20.0));
        let last = session.surface().snapshot_frame().unwrap();

        tokio::time::sleep(Duration::from_millis(799)).await;
        assert!(classifier.classifier().calls.lock().unwrap().is_empty());
        assert_eq!(session.state(), AnalysisState::Idle);

        rx.wait_for(|s| s.prediction().is_some()).await.unwrap();
        let calls = classifier.classifier().calls.lock().unwrap().clone();
        assert_eq!(calls, vec![last.to_base64()]);
        assert_eq!(
            session.state().prediction().map(|p| p.guess.clone()),
            Some("Circle".to_owned())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_before_quiet_period_skips_analysis() {
        let classifier = Arc::new(InferenceClient::new(Recording::default()));
        let mut session =
            SketchSession::start(&small_config(), Arc::clone(&classifier), Language::En).unwrap();

        stroke(&mut session, (1.0, 1.0), (8.0, 8.0));
        tokio::time::sleep(Duration::from_millis(300)).await;
        session.join().await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(classifier.classifier().calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_undo_schedules_nothing() {
        let classifier = Arc::new(InferenceClient::new(Recording::default()));
        let mut session =
            SketchSession::start(&small_config(), Arc::clone(&classifier), Language::Fr).unwrap();

        assert!(!session.undo().unwrap());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(classifier.classifier().calls.lock().unwrap().is_empty());
        assert_eq!(session.language(), Language::Fr);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_schedules_blank_frame() {
        let classifier = Arc::new(InferenceClient::new(Recording::default()));
        let mut session =
            SketchSession::start(&small_config(), Arc::clone(&classifier), Language::En).unwrap();
        let mut rx = session.subscribe();

        session.clear().unwrap();
        let blank = session.surface().snapshot_frame().unwrap();
        rx.wait_for(|s| s.prediction().is_some()).await.unwrap();

        let calls = classifier.classifier().calls.lock().unwrap().clone();
        assert_eq!(calls, vec![blank.to_base64()]);
        assert!(session.surface().can_undo());
    }

    #[tokio::test(start_paused = true)]
    async fn resize_and_tool_changes_do_not_schedule() {
        let classifier = Arc::new(InferenceClient::new(Recording::default()));
        let mut session =
            SketchSession::start(&small_config(), Arc::clone(&classifier), Language::En).unwrap();

        session.set_tool(Tool::Eraser);
        session.resize(16, 8).unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(session.surface().tool(), Tool::Eraser);
        assert_eq!(session.surface().width(), 16);
        assert!(classifier.classifier().calls.lock().unwrap().is_empty());
    }
}

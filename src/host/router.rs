//! Routes host commands onto a [`SketchSession`].

use crate::canvas::{CanvasBounds, InputEvent, Point, Tool, TouchPhase};
use crate::error::{Result, SketchError};
use crate::host::contract::{CommandEnvelope, CommandName, EVENT_VERSION, ResponseEnvelope};
use crate::pipeline::SketchSession;

/// Owns the session and turns each command into a response.
#[derive(Debug)]
pub struct SessionRouter {
    session: SketchSession,
}

impl SessionRouter {
    pub fn new(session: SketchSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SketchSession {
        &self.session
    }

    /// Consume the router and return the session for teardown.
    pub fn into_session(self) -> SketchSession {
        self.session
    }

    /// Validate and route one command, turning failures into error envelopes.
    pub fn dispatch(&mut self, envelope: &CommandEnvelope) -> ResponseEnvelope {
        if let Err(e) = envelope.validate() {
            return ResponseEnvelope::error(envelope.request_id.clone(), e.to_string());
        }
        match self.route(envelope) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    command = envelope.command.as_str(),
                    request_id = %envelope.request_id,
                    error = %e,
                    "host command failed"
                );
                ResponseEnvelope::error(envelope.request_id.clone(), e.to_string())
            }
        }
    }

    /// Route a command envelope to the appropriate handler.
    pub fn route(&mut self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        match envelope.command {
            CommandName::HostPing => Ok(ResponseEnvelope::ok(
                envelope.request_id.clone(),
                serde_json::json!({"pong": true}),
            )),
            CommandName::HostVersion => Ok(ResponseEnvelope::ok(
                envelope.request_id.clone(),
                serde_json::json!({
                    "contract_version": EVENT_VERSION,
                    "version": env!("CARGO_PKG_VERSION"),
                }),
            )),
            CommandName::CanvasPointerDown => {
                let event = parse_pointer(&envelope.payload, TouchPhase::Start, envelope.command)?;
                self.apply_input(envelope, event)
            }
            CommandName::CanvasPointerMove => {
                let event = parse_pointer(&envelope.payload, TouchPhase::Move, envelope.command)?;
                self.apply_input(envelope, event)
            }
            CommandName::CanvasPointerUp => self.apply_input(envelope, Some(InputEvent::PointerUp)),
            CommandName::CanvasPointerLeave => {
                self.apply_input(envelope, Some(InputEvent::PointerLeave))
            }
            CommandName::CanvasToolSet => self.handle_tool_set(envelope),
            CommandName::CanvasUndo => self.handle_undo(envelope),
            CommandName::CanvasClear => {
                self.session.clear()?;
                Ok(self.canvas_response(envelope, serde_json::json!({})))
            }
            CommandName::CanvasResize => self.handle_resize(envelope),
            CommandName::AnalysisStatus => {
                let state = serde_json::to_value(self.session.state()).map_err(|e| {
                    SketchError::Host(format!("failed to serialize analysis state: {e}"))
                })?;
                Ok(ResponseEnvelope::ok(envelope.request_id.clone(), state))
            }
            CommandName::RuntimeStop => {
                self.session.shutdown();
                Ok(ResponseEnvelope::ok(
                    envelope.request_id.clone(),
                    serde_json::json!({"stopping": true}),
                ))
            }
        }
    }

    fn apply_input(
        &mut self,
        envelope: &CommandEnvelope,
        event: Option<InputEvent>,
    ) -> Result<ResponseEnvelope> {
        if let Some(event) = event {
            self.session.handle_input(event)?;
        }
        Ok(self.canvas_response(
            envelope,
            serde_json::json!({"drawing": self.session.surface().is_drawing()}),
        ))
    }

    fn handle_tool_set(&mut self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        let tool = parse_tool(&envelope.payload)?;
        self.session.set_tool(tool);
        Ok(self.canvas_response(envelope, serde_json::json!({})))
    }

    fn handle_undo(&mut self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        let undone = self.session.undo()?;
        Ok(self.canvas_response(envelope, serde_json::json!({"undone": undone})))
    }

    fn handle_resize(&mut self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        let width = parse_dimension(&envelope.payload, "width")?;
        let height = parse_dimension(&envelope.payload, "height")?;
        self.session.resize(width, height)?;
        Ok(self.canvas_response(envelope, serde_json::json!({})))
    }

    /// Merge `extra` into the common canvas status payload.
    fn canvas_response(
        &self,
        envelope: &CommandEnvelope,
        extra: serde_json::Value,
    ) -> ResponseEnvelope {
        let surface = self.session.surface();
        let mut payload = serde_json::json!({
            "can_undo": surface.can_undo(),
            "tool": surface.tool(),
            "width": surface.width(),
            "height": surface.height(),
        });
        if let (Some(base), serde_json::Value::Object(extra)) = (payload.as_object_mut(), extra) {
            base.extend(extra);
        }
        ResponseEnvelope::ok(envelope.request_id.clone(), payload)
    }
}

/// Parse a pointer position.
///
/// Accepts canvas-space `{x, y}`, client-space `{x, y, bounds: {left, top}}`,
/// or a touch list `{touches: [{x, y}, ...]}` of which only the first point
/// counts. An empty touch list yields `None`.
fn parse_pointer(
    payload: &serde_json::Value,
    phase: TouchPhase,
    command: CommandName,
) -> Result<Option<InputEvent>> {
    let bounds = match payload.get("bounds") {
        None | Some(serde_json::Value::Null) => CanvasBounds::default(),
        Some(raw) => serde_json::from_value::<CanvasBounds>(raw.clone()).map_err(|e| {
            SketchError::Host(format!("{} has invalid payload.bounds: {e}", command.as_str()))
        })?,
    };

    if let Some(touches) = payload.get("touches") {
        let Some(list) = touches.as_array() else {
            return Err(SketchError::Host(format!(
                "{} payload.touches must be an array",
                command.as_str()
            )));
        };
        let points = list
            .iter()
            .map(|t| parse_xy(t, command).map(|(x, y)| bounds.to_canvas(x, y)))
            .collect::<Result<Vec<Point>>>()?;
        return Ok(InputEvent::from_touches(phase, &points));
    }

    let (x, y) = parse_xy(payload, command)?;
    let point = bounds.to_canvas(x, y);
    Ok(InputEvent::from_touches(phase, &[point]))
}

fn parse_xy(value: &serde_json::Value, command: CommandName) -> Result<(f32, f32)> {
    let coord = |field: &str| {
        value
            .get(field)
            .and_then(serde_json::Value::as_f64)
            .map(|v| v as f32)
            .ok_or_else(|| {
                SketchError::Host(format!(
                    "{} requires numeric payload.{field}",
                    command.as_str()
                ))
            })
    };
    Ok((coord("x")?, coord("y")?))
}

fn parse_tool(payload: &serde_json::Value) -> Result<Tool> {
    let Some(raw_tool) = payload.get("tool").and_then(serde_json::Value::as_str) else {
        return Err(SketchError::Host(
            "canvas.tool_set requires payload.tool".to_owned(),
        ));
    };
    match raw_tool.trim().to_ascii_lowercase().as_str() {
        "pencil" => Ok(Tool::Pencil),
        "eraser" => Ok(Tool::Eraser),
        other => Err(SketchError::Host(format!(
            "unsupported tool `{other}` (expected pencil/eraser)"
        ))),
    }
}

fn parse_dimension(payload: &serde_json::Value, field: &str) -> Result<u32> {
    let Some(raw) = payload.get(field).and_then(serde_json::Value::as_u64) else {
        return Err(SketchError::Host(format!(
            "canvas.resize requires integer payload.{field}"
        )));
    };
    u32::try_from(raw)
        .map_err(|_| SketchError::Host(format!("canvas.resize payload.{field} out of range")))
}

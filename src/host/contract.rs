//! Versioned command/event envelopes for front ends driving a sketch session.

use serde::{Deserialize, Serialize};

/// Contract version for host command/event envelopes.
pub const EVENT_VERSION: u32 = 1;

/// Event emitted whenever the analysis state changes.
pub const EVENT_ANALYSIS_STATE: &str = "analysis.state";

/// Command set understood by the sketch host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandName {
    #[serde(rename = "host.ping")]
    HostPing,
    #[serde(rename = "host.version")]
    HostVersion,
    #[serde(rename = "canvas.pointer_down")]
    CanvasPointerDown,
    #[serde(rename = "canvas.pointer_move")]
    CanvasPointerMove,
    #[serde(rename = "canvas.pointer_up")]
    CanvasPointerUp,
    #[serde(rename = "canvas.pointer_leave")]
    CanvasPointerLeave,
    #[serde(rename = "canvas.tool_set")]
    CanvasToolSet,
    #[serde(rename = "canvas.undo")]
    CanvasUndo,
    #[serde(rename = "canvas.clear")]
    CanvasClear,
    #[serde(rename = "canvas.resize")]
    CanvasResize,
    #[serde(rename = "analysis.status")]
    AnalysisStatus,
    #[serde(rename = "runtime.stop")]
    RuntimeStop,
}

impl CommandName {
    /// Render command name to wire format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HostPing => "host.ping",
            Self::HostVersion => "host.version",
            Self::CanvasPointerDown => "canvas.pointer_down",
            Self::CanvasPointerMove => "canvas.pointer_move",
            Self::CanvasPointerUp => "canvas.pointer_up",
            Self::CanvasPointerLeave => "canvas.pointer_leave",
            Self::CanvasToolSet => "canvas.tool_set",
            Self::CanvasUndo => "canvas.undo",
            Self::CanvasClear => "canvas.clear",
            Self::CanvasResize => "canvas.resize",
            Self::AnalysisStatus => "analysis.status",
            Self::RuntimeStop => "runtime.stop",
        }
    }
}

/// A versioned response envelope from backend host -> frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub v: u32,
    pub request_id: String,
    pub ok: bool,
    pub payload: serde_json::Value,
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Build a successful response envelope.
    #[must_use]
    pub fn ok(request_id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            v: EVENT_VERSION,
            request_id: request_id.into(),
            ok: true,
            payload,
            error: None,
        }
    }

    /// Build an error response envelope.
    #[must_use]
    pub fn error(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            v: EVENT_VERSION,
            request_id: request_id.into(),
            ok: false,
            payload: serde_json::Value::Null,
            error: Some(message.into()),
        }
    }
}

/// A versioned command envelope from frontend -> backend host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub v: u32,
    pub request_id: String,
    pub command: CommandName,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl CommandEnvelope {
    /// Build a v1 command envelope.
    #[must_use]
    pub fn new(
        request_id: impl Into<String>,
        command: CommandName,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            v: EVENT_VERSION,
            request_id: request_id.into(),
            command,
            payload,
        }
    }

    /// Validate envelope version and required identifiers.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.v != EVENT_VERSION {
            return Err(ContractError::new(
                ContractErrorKind::UnsupportedVersion,
                format!(
                    "unsupported contract version {}; expected {}",
                    self.v, EVENT_VERSION
                ),
            ));
        }
        if self.request_id.trim().is_empty() {
            return Err(ContractError::new(
                ContractErrorKind::InvalidEnvelope,
                "request_id cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

/// A versioned event envelope from backend host -> frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub v: u32,
    pub event_id: String,
    pub event: String,
    pub payload: serde_json::Value,
}

impl EventEnvelope {
    /// Build a v1 event envelope.
    #[must_use]
    pub fn new(
        event_id: impl Into<String>,
        event: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            v: EVENT_VERSION,
            event_id: event_id.into(),
            event: event.into(),
            payload,
        }
    }
}

/// Contract validation error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractErrorKind {
    UnsupportedVersion,
    InvalidEnvelope,
}

/// Contract validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractError {
    pub kind: ContractErrorKind,
    pub message: String,
}

impl ContractError {
    #[must_use]
    pub fn new(kind: ContractErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl std::fmt::Display for ContractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ContractError {}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn wire_names_match_serde() {
        let commands = [
            CommandName::HostPing,
            CommandName::HostVersion,
            CommandName::CanvasPointerDown,
            CommandName::CanvasPointerMove,
            CommandName::CanvasPointerUp,
            CommandName::CanvasPointerLeave,
            CommandName::CanvasToolSet,
            CommandName::CanvasUndo,
            CommandName::CanvasClear,
            CommandName::CanvasResize,
            CommandName::AnalysisStatus,
            CommandName::RuntimeStop,
        ];
        for command in commands {
            let json = serde_json::to_value(command).unwrap();
            assert_eq!(json, serde_json::json!(command.as_str()));
            let parsed: CommandName = serde_json::from_value(json).unwrap();
            assert_eq!(parsed, command);
        }
        assert!(serde_json::from_str::<CommandName>("\"canvas.redo\"").is_err());
    }

    #[test]
    fn validate_rejects_wrong_version() {
        let mut envelope =
            CommandEnvelope::new("req-1", CommandName::CanvasUndo, serde_json::json!({}));
        assert!(envelope.validate().is_ok());
        envelope.v = 99;
        let err = envelope.validate().unwrap_err();
        assert_eq!(err.kind, ContractErrorKind::UnsupportedVersion);
    }

    #[test]
    fn validate_rejects_blank_request_id() {
        let envelope = CommandEnvelope::new("  ", CommandName::HostPing, serde_json::Value::Null);
        let err = envelope.validate().unwrap_err();
        assert_eq!(err.kind, ContractErrorKind::InvalidEnvelope);
    }

    #[test]
    fn command_envelope_parses_from_wire() {
        let raw = r#"{"v":1,"request_id":"r1","command":"canvas.pointer_down","payload":{"x":3,"y":4}}"#;
        let envelope: CommandEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.command, CommandName::CanvasPointerDown);
        assert_eq!(envelope.payload["x"], 3);
    }
}

pub mod classify;
pub mod config;
pub mod dashboard;
pub mod templates;

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use visor_core::audit::{AuditEvent, InMemoryAuditSink};
use visor_core::errors::ApplicationError;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    user_message: Option<String>,
}

impl CommandResult {
    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error.error_class().to_string()),
            message: error.to_string(),
            user_message: Some(error.user_message().to_string()),
        };
        let exit_code = u8::try_from(error.exit_code()).unwrap_or(1);
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Raw output for commands whose stdout is the rendered document itself.
    pub fn rendered(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn from_outcome(command: &str, outcome: Result<String, ApplicationError>) -> Self {
        match outcome {
            Ok(output) => Self::rendered(output),
            Err(error) => {
                tracing::warn!(
                    event_name = "cli.command_failed",
                    command,
                    error_class = error.error_class(),
                    error = %error,
                    "command failed"
                );
                Self::from_error(command, &error)
            }
        }
    }
}

pub(crate) fn read_json(path: &Path) -> Result<Value, ApplicationError> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read `{}`", path.display()))
        .map_err(|error| ApplicationError::InvalidInput(format!("{error:#}")))?;

    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, ApplicationError> {
    serde_json::to_string_pretty(value)
        .map_err(|error| ApplicationError::Serialization(error.to_string()))
}

/// Forwards collected audit events to the log so they reach stderr.
pub(crate) fn drain_audit(sink: &InMemoryAuditSink) {
    for event in sink.events() {
        log_audit_event(&event);
    }
}

fn log_audit_event(event: &AuditEvent) {
    let folio = event.folio.as_ref().map(|folio| folio.0.as_str()).unwrap_or("");
    let metadata = event
        .metadata
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ");

    tracing::info!(
        event_name = %event.event_type,
        event_id = %event.event_id,
        correlation_id = %event.correlation_id,
        actor = %event.actor,
        folio,
        outcome = ?event.outcome,
        metadata = %metadata,
        "audit event"
    );
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

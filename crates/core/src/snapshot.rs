//! Normalizes raw procedure records into [`ProcedureSnapshot`]s.
//!
//! The backend persists flags as booleans, `0`/`1` integers or numeric
//! strings depending on the endpoint, and mixes camelCase with snake_case
//! keys. Reading is total: anything unreadable becomes the falsy value of its
//! domain.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::procedure::{Folio, ProcedureSnapshot, StepFlag};
use crate::domain::workflow_status::{WorkflowMarker, WorkflowStatus};

type Record = Map<String, Value>;

pub fn read(raw: &Value) -> ProcedureSnapshot {
    let Some(record) = raw.as_object() else {
        debug!(
            event_name = "snapshot.record_not_object",
            kind = value_kind(raw),
            "procedure record is not an object; using empty snapshot"
        );
        return ProcedureSnapshot::default();
    };

    ProcedureSnapshot {
        folio: read_text(record, &["folio"]).map(Folio),
        procedure_type: read_text(record, &["procedureType", "procedure_type"]).unwrap_or_default(),
        status: read_status(record),
        sent_to_reviewers: read_bool(record, &["sentToReviewers", "sent_to_reviewers"]),
        step_one: read_step_flag(record, &["stepOne", "step_one"]),
        step_two: read_step_flag(record, &["stepTwo", "step_two"]),
        step_three: read_step_flag(record, &["stepThree", "step_three"]),
        step_four: read_step_flag(record, &["stepFour", "step_four"]),
        director_approval: read_bool(record, &["directorApproval", "director_approval"]),
        window_license_generated: read_bool(
            record,
            &["windowLicenseGenerated", "window_license_generated"],
        ),
        created_at: read_timestamp(record, &["createdAt", "created_at"]),
    }
}

pub fn read_workflow_status(raw: &Value) -> Option<WorkflowStatus> {
    let record = raw.as_object()?;

    let current_workflow_step = lookup(record, &["currentWorkflowStep", "current_workflow_step"])
        .and_then(|(_, value)| value.as_str())
        .and_then(WorkflowMarker::parse);
    let can_proceed_to_next_step =
        lookup(record, &["canProceedToNextStep", "can_proceed_to_next_step"]).and_then(
            |(key, value)| match flag_code(value) {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => {
                    log_unrecognized(key, value);
                    None
                }
            },
        );

    if current_workflow_step.is_none() && can_proceed_to_next_step.is_none() {
        return None;
    }

    Some(WorkflowStatus { current_workflow_step, can_proceed_to_next_step })
}

/// Integer code of a flag value, or `None` when it has no flag reading.
pub fn flag_code(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(flag) => Some(i64::from(*flag)),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|float| float.fract() == 0.0).map(|f| f as i64)),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(1),
            "false" => Some(0),
            other => other.parse::<i64>().ok(),
        },
        _ => None,
    }
}

fn lookup<'a>(record: &'a Record, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    keys.iter().find_map(|key| {
        record.get(*key).filter(|value| !value.is_null()).map(|value| (*key, value))
    })
}

fn read_text(record: &Record, keys: &[&'static str]) -> Option<String> {
    let (_, value) = lookup(record, keys)?;
    let text = match value {
        Value::String(text) => text.trim().to_owned(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn read_status(record: &Record) -> Option<i32> {
    let (key, value) = lookup(record, &["status"])?;
    let code = match value {
        Value::Bool(_) => None,
        other => flag_code(other),
    };
    let status = code.and_then(|code| i32::try_from(code).ok());
    if status.is_none() {
        log_unrecognized(key, value);
    }
    status
}

fn read_bool(record: &Record, keys: &[&'static str]) -> bool {
    let Some((key, value)) = lookup(record, keys) else {
        return false;
    };
    match flag_code(value) {
        Some(1) => true,
        Some(0) => false,
        _ => {
            log_unrecognized(key, value);
            false
        }
    }
}

fn read_step_flag(record: &Record, keys: &[&'static str]) -> StepFlag {
    let Some((key, value)) = lookup(record, keys) else {
        return StepFlag::NotCompleted;
    };
    match flag_code(value).and_then(StepFlag::from_code) {
        Some(flag) => flag,
        None => {
            log_unrecognized(key, value);
            StepFlag::NotCompleted
        }
    }
}

fn read_timestamp(record: &Record, keys: &[&'static str]) -> Option<DateTime<Utc>> {
    let (key, value) = lookup(record, keys)?;
    let text = value.as_str()?.trim();

    let parsed = DateTime::parse_from_rfc3339(text)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                .into_iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|naive| naive.and_utc())
        });
    if parsed.is_none() {
        log_unrecognized(key, value);
    }
    parsed
}

fn log_unrecognized(key: &str, value: &Value) {
    debug!(
        event_name = "snapshot.flag_unrecognized",
        field = key,
        kind = value_kind(value),
        "unrecognized value normalized to its falsy default"
    );
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

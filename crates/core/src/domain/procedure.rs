use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Folio(pub String);

/// Per-step completion marker as persisted by the backend (`-1`, `0`, `1`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepFlag {
    Rejected,
    #[default]
    NotCompleted,
    Completed,
}

impl StepFlag {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Self::Rejected),
            0 => Some(Self::NotCompleted),
            1 => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Self::Rejected => -1,
            Self::NotCompleted => 0,
            Self::Completed => 1,
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }

    pub fn is_rejected(self) -> bool {
        self == Self::Rejected
    }
}

/// Normalized view of one persisted procedure record.
///
/// `status` is `None` when the record carried no readable status code. Every
/// status-derived predicate is false in that case, so a malformed record
/// classifies as "nothing started".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureSnapshot {
    pub folio: Option<Folio>,
    pub procedure_type: String,
    pub status: Option<i32>,
    pub sent_to_reviewers: bool,
    pub step_one: StepFlag,
    pub step_two: StepFlag,
    pub step_three: StepFlag,
    pub step_four: StepFlag,
    pub director_approval: bool,
    pub window_license_generated: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl ProcedureSnapshot {
    pub fn new(procedure_type: impl Into<String>, status: i32) -> Self {
        Self { procedure_type: procedure_type.into(), status: Some(status), ..Self::default() }
    }

    pub fn status_is(&self, code: i32) -> bool {
        self.status == Some(code)
    }

    pub fn status_at_least(&self, code: i32) -> bool {
        self.status.is_some_and(|status| status >= code)
    }

    pub fn step_flags(&self) -> [StepFlag; 4] {
        [self.step_one, self.step_two, self.step_three, self.step_four]
    }
}

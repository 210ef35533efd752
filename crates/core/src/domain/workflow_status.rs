use serde::{Deserialize, Serialize};

/// Value of the backend's `currentWorkflowStep` field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowMarker {
    Completed,
    Rejected,
    Prevention,
    AprobacionCompleted,
    Other(String),
}

impl WorkflowMarker {
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase();
        let marker = match key.as_str() {
            "" => return None,
            "completed" => Self::Completed,
            "rejected" => Self::Rejected,
            "prevention" => Self::Prevention,
            "aprobacion_completed" => Self::AprobacionCompleted,
            _ => Self::Other(key),
        };
        Some(marker)
    }
}

/// Authoritative snapshot from the backend workflow service. Either field may
/// be absent, in which case classification falls back to procedure flags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStatus {
    pub current_workflow_step: Option<WorkflowMarker>,
    pub can_proceed_to_next_step: Option<bool>,
}

impl WorkflowStatus {
    pub fn at(marker: WorkflowMarker) -> Self {
        Self { current_workflow_step: Some(marker), can_proceed_to_next_step: None }
    }

    pub fn marker_is(&self, expected: &WorkflowMarker) -> bool {
        self.current_workflow_step.as_ref() == Some(expected)
    }
}

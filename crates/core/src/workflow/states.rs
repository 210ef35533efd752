use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Pending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Rejected,
    Prevention,
    ApprovedPendingIssuance,
    Completed,
}

impl OverallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rejected => "rejected",
            Self::Prevention => "prevention",
            Self::ApprovedPendingIssuance => "approved_pending_issuance",
            Self::Completed => "completed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: String,
    pub label: String,
    pub description: String,
    pub status: StepStatus,
    /// Forced to pending by a blocking rule or by an incomplete earlier step.
    pub blocked: bool,
    /// Active step of a rejected procedure.
    pub rejected: bool,
}

impl WorkflowStep {
    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }

    pub fn is_current(&self) -> bool {
        self.status == StepStatus::Current
    }
}

/// Raw outcome of one step rule before reduction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepRule {
    pub completed: bool,
    pub in_progress: bool,
    pub blocked: bool,
}

impl StepRule {
    pub fn completed_when(completed: bool) -> Self {
        Self { completed, ..Self::default() }
    }

    /// Collapses the rule into a status. Returns the status and whether the
    /// step is rendered as blocked.
    pub fn reduce(self, procedure_completed: bool) -> (StepStatus, bool) {
        if procedure_completed {
            (StepStatus::Completed, false)
        } else if self.blocked {
            (StepStatus::Pending, true)
        } else if self.completed {
            (StepStatus::Completed, false)
        } else if self.in_progress {
            (StepStatus::Current, false)
        } else {
            (StepStatus::Pending, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StepRule, StepStatus};

    #[test]
    fn global_completion_overrides_every_rule() {
        let rule = StepRule { completed: false, in_progress: false, blocked: true };
        assert_eq!(rule.reduce(true), (StepStatus::Completed, false));
    }

    #[test]
    fn blocked_wins_over_completed_and_in_progress() {
        let rule = StepRule { completed: true, in_progress: true, blocked: true };
        assert_eq!(rule.reduce(false), (StepStatus::Pending, true));
    }

    #[test]
    fn completed_wins_over_in_progress() {
        let rule = StepRule { completed: true, in_progress: true, blocked: false };
        assert_eq!(rule.reduce(false), (StepStatus::Completed, false));

        let rule = StepRule { completed: false, in_progress: true, blocked: false };
        assert_eq!(rule.reduce(false), (StepStatus::Current, false));
        assert_eq!(StepRule::default().reduce(false), (StepStatus::Pending, false));
    }
}

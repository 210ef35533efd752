use serde::{Deserialize, Serialize};

use crate::domain::procedure::ProcedureSnapshot;
use crate::domain::workflow_status::{WorkflowMarker, WorkflowStatus};

pub const STATUS_APPROVED: i32 = 2;
pub const STATUS_REJECTED_OR_PREVENTION: i32 = 3;
pub const STATUS_LICENSE_STAGE: i32 = 4;
pub const STATUS_COMPLETED: i32 = 7;

/// Procedure-level predicates, each resolved from the backend workflow
/// status first and from persisted flags second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowPredicates {
    pub is_completed: bool,
    pub is_rejected: bool,
    pub is_prevention: bool,
    pub is_approved: bool,
    pub is_in_progress: bool,
    pub is_start_completed: bool,
}

impl WorkflowPredicates {
    pub fn evaluate(
        snapshot: &ProcedureSnapshot,
        workflow_status: Option<&WorkflowStatus>,
    ) -> Self {
        let marker_is =
            |marker: WorkflowMarker| workflow_status.is_some_and(|ws| ws.marker_is(&marker));

        // Flags cannot tell rejection from prevention; both read status 3.
        let is_completed =
            marker_is(WorkflowMarker::Completed) || snapshot.status_at_least(STATUS_COMPLETED);
        let is_rejected = marker_is(WorkflowMarker::Rejected)
            || snapshot.status_is(STATUS_REJECTED_OR_PREVENTION);
        let is_prevention = marker_is(WorkflowMarker::Prevention)
            || snapshot.status_is(STATUS_REJECTED_OR_PREVENTION);
        let is_approved = marker_is(WorkflowMarker::AprobacionCompleted)
            || snapshot.status_is(STATUS_APPROVED);

        let is_in_progress = match workflow_status.and_then(|ws| ws.can_proceed_to_next_step) {
            Some(can_proceed) => can_proceed,
            None => {
                snapshot.sent_to_reviewers
                    || snapshot.step_flags().into_iter().any(|flag| flag.is_completed())
            }
        };

        Self {
            is_completed,
            is_rejected,
            is_prevention,
            is_approved,
            is_in_progress,
            is_start_completed: snapshot.status_at_least(0),
        }
    }
}

//! Projects a classified step list onto a continuous progress indicator.
//!
//! Completed steps contribute one unit each and a current step half a unit,
//! normalized by the number of gaps between steps. An approved procedure that
//! is still waiting for issuance snaps to its approval milestone instead.

use serde::{Deserialize, Serialize};

use crate::workflow::predicates::{WorkflowPredicates, STATUS_APPROVED};
use crate::workflow::states::WorkflowStep;

const MILESTONE_STEP_IDS: [&str; 2] = ["aprobacion", "approval"];
const CURRENT_STEP_WEIGHT: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressProjection {
    /// Fill of the progress bar in `[0, 1]`.
    pub fraction: f64,
    pub active_index: usize,
}

impl ProgressProjection {
    pub fn percent(&self) -> u8 {
        (self.fraction.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// First current step, else first step not completed, else the last step.
pub fn active_index(steps: &[WorkflowStep]) -> usize {
    steps
        .iter()
        .position(WorkflowStep::is_current)
        .or_else(|| steps.iter().position(|step| !step.is_completed()))
        .unwrap_or_else(|| steps.len().saturating_sub(1))
}

pub fn project(
    steps: &[WorkflowStep],
    predicates: &WorkflowPredicates,
    status: Option<i32>,
) -> ProgressProjection {
    let active_index = active_index(steps);

    if predicates.is_completed {
        return ProgressProjection { fraction: 1.0, active_index };
    }
    if steps.len() <= 1 {
        return ProgressProjection { fraction: 0.0, active_index };
    }

    let gaps = (steps.len() - 1) as f64;

    if status == Some(STATUS_APPROVED) {
        let milestone =
            steps.iter().position(|step| MILESTONE_STEP_IDS.contains(&step.id.as_str()));
        if let Some(index) = milestone {
            return ProgressProjection { fraction: index as f64 / gaps, active_index };
        }
    }

    let completed = steps.iter().filter(|step| step.is_completed()).count() as f64;
    let current =
        if steps.iter().any(WorkflowStep::is_current) { CURRENT_STEP_WEIGHT } else { 0.0 };
    let fraction = ((completed + current) / gaps).clamp(0.0, 1.0);

    ProgressProjection { fraction, active_index }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::domain::procedure::{Folio, ProcedureSnapshot};
use crate::domain::workflow_status::WorkflowStatus;
use crate::progress::ProgressProjection;
use crate::workflow::{
    Classification, OverallStatus, ProcedureCategory, WorkflowClassifier, WorkflowStep,
};

/// View model for the procedure detail surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowView {
    pub folio: Option<Folio>,
    pub category: ProcedureCategory,
    pub steps: Vec<WorkflowStep>,
    pub overall: Option<OverallStatus>,
    pub overall_message: Option<String>,
    pub progress: ProgressProjection,
}

impl WorkflowView {
    pub fn build(
        snapshot: &ProcedureSnapshot,
        workflow_status: Option<&WorkflowStatus>,
        classifier: &WorkflowClassifier,
    ) -> Self {
        let classification = classifier.classify(snapshot, workflow_status);
        Self::from_classification(snapshot, classification, classifier)
    }

    pub fn from_classification(
        snapshot: &ProcedureSnapshot,
        classification: Classification,
        classifier: &WorkflowClassifier,
    ) -> Self {
        let progress = classification.progress();
        let catalog = classifier.catalog();
        Self {
            folio: snapshot.folio.clone(),
            category: classification.category,
            overall_message: classification
                .overall
                .map(|overall| catalog.overall_message(overall).to_owned()),
            overall: classification.overall,
            steps: classification.steps,
            progress,
        }
    }

    pub fn active_step(&self) -> Option<&WorkflowStep> {
        self.steps.get(self.progress.active_index)
    }
}

/// One row of the procedure list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureSummary {
    pub folio: Option<Folio>,
    pub category: ProcedureCategory,
    pub overall: Option<OverallStatus>,
    pub current_step: Option<String>,
    pub percent: u8,
}

impl From<&WorkflowView> for ProcedureSummary {
    fn from(view: &WorkflowView) -> Self {
        Self {
            folio: view.folio.clone(),
            category: view.category,
            overall: view.overall,
            current_step: view.active_step().map(|step| step.label.clone()),
            percent: view.progress.percent(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardBucket {
    NotStarted,
    InReview,
    ApprovedPendingIssuance,
    RejectedOrPrevention,
    Completed,
}

impl DashboardBucket {
    pub fn of(classification: &Classification) -> Self {
        match classification.overall {
            Some(OverallStatus::Completed) => Self::Completed,
            Some(OverallStatus::Rejected | OverallStatus::Prevention) => {
                Self::RejectedOrPrevention
            }
            Some(OverallStatus::ApprovedPendingIssuance) => Self::ApprovedPendingIssuance,
            None if classification.predicates.is_in_progress => Self::InReview,
            None => Self::NotStarted,
        }
    }
}

/// Director dashboard counters. List surfaces have no workflow status, so
/// every row is classified from its flags alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardTally {
    pub total: usize,
    pub not_started: usize,
    pub in_review: usize,
    pub approved_pending_issuance: usize,
    pub rejected_or_prevention: usize,
    pub completed: usize,
    pub by_category: BTreeMap<ProcedureCategory, usize>,
}

impl DashboardTally {
    pub fn from_snapshots(
        snapshots: &[ProcedureSnapshot],
        classifier: &WorkflowClassifier,
    ) -> Self {
        snapshots.iter().fold(Self::default(), |mut tally, snapshot| {
            tally.record(&classifier.classify(snapshot, None));
            tally
        })
    }

    pub fn from_snapshots_with_audit<S>(
        snapshots: &[ProcedureSnapshot],
        classifier: &WorkflowClassifier,
        sink: &S,
        audit: &AuditContext,
    ) -> Self
    where
        S: AuditSink,
    {
        let tally = Self::from_snapshots(snapshots, classifier);
        let event = AuditEvent::new(
            audit,
            "dashboard.tallied",
            AuditCategory::Dashboard,
            AuditOutcome::Success,
        );
        sink.emit(
            event
                .with_metadata("total", tally.total.to_string())
                .with_metadata("rejected_or_prevention", tally.rejected_or_prevention.to_string()),
        );
        tally
    }

    pub fn record(&mut self, classification: &Classification) {
        self.total += 1;
        *self.by_category.entry(classification.category).or_default() += 1;

        let counter = match DashboardBucket::of(classification) {
            DashboardBucket::NotStarted => &mut self.not_started,
            DashboardBucket::InReview => &mut self.in_review,
            DashboardBucket::ApprovedPendingIssuance => &mut self.approved_pending_issuance,
            DashboardBucket::RejectedOrPrevention => &mut self.rejected_or_prevention,
            DashboardBucket::Completed => &mut self.completed,
        };
        *counter += 1;
    }
}

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::domain::procedure::ProcedureSnapshot;
use crate::domain::workflow_status::WorkflowStatus;
use crate::labels::LabelCatalog;
use crate::progress::{self, ProgressProjection};
use crate::workflow::category::ProcedureCategory;
use crate::workflow::predicates::{WorkflowPredicates, STATUS_APPROVED};
use crate::workflow::states::{OverallStatus, StepStatus, WorkflowStep};
use crate::workflow::templates::{RuleInput, TemplateRegistry};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: ProcedureCategory,
    pub status: Option<i32>,
    pub predicates: WorkflowPredicates,
    pub steps: Vec<WorkflowStep>,
    pub overall: Option<OverallStatus>,
}

impl Classification {
    pub fn progress(&self) -> ProgressProjection {
        progress::project(&self.steps, &self.predicates, self.status)
    }

    pub fn step(&self, id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub fn step_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.id.as_str()).collect()
    }
}

/// Template registry plus label catalog. `classify` is pure; the audit
/// variant only adds one event on the caller's sink.
#[derive(Clone, Debug, Default)]
pub struct WorkflowClassifier {
    registry: TemplateRegistry,
    catalog: LabelCatalog,
}

impl WorkflowClassifier {
    pub fn new(registry: TemplateRegistry, catalog: LabelCatalog) -> Self {
        Self { registry, catalog }
    }

    pub fn with_catalog(catalog: LabelCatalog) -> Self {
        Self::new(TemplateRegistry::standard(), catalog)
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> LabelCatalog {
        self.catalog
    }

    pub fn classify(
        &self,
        snapshot: &ProcedureSnapshot,
        workflow_status: Option<&WorkflowStatus>,
    ) -> Classification {
        let category = ProcedureCategory::from_procedure_type(&snapshot.procedure_type);
        let predicates = WorkflowPredicates::evaluate(snapshot, workflow_status);
        let input = RuleInput::new(snapshot, predicates);

        let mut steps: Vec<WorkflowStep> = self
            .registry
            .template(category)
            .iter()
            .map(|definition| {
                let (status, blocked) =
                    definition.evaluate(&input).reduce(predicates.is_completed);
                let text = self.catalog.step(category, definition.id);
                WorkflowStep {
                    id: definition.id.to_owned(),
                    label: text.label.to_owned(),
                    description: text.description.to_owned(),
                    status,
                    blocked,
                    rejected: false,
                }
            })
            .collect();

        if !predicates.is_completed {
            enforce_step_order(&mut steps);
        }
        if predicates.is_rejected {
            let active = progress::active_index(&steps);
            if let Some(step) = steps.get_mut(active) {
                step.rejected = true;
            }
        }

        Classification {
            category,
            status: snapshot.status,
            predicates,
            steps,
            overall: overall_status(&predicates, snapshot.status),
        }
    }

    pub fn classify_with_audit<S>(
        &self,
        snapshot: &ProcedureSnapshot,
        workflow_status: Option<&WorkflowStatus>,
        sink: &S,
        audit: &AuditContext,
    ) -> Classification
    where
        S: AuditSink,
    {
        let classification = self.classify(snapshot, workflow_status);
        let projection = classification.progress();
        let outcome =
            if snapshot.status.is_some() { AuditOutcome::Success } else { AuditOutcome::Degraded };
        let active_step = classification
            .steps
            .get(projection.active_index)
            .map(|step| step.id.clone())
            .unwrap_or_default();

        sink.emit(
            AuditEvent::new(audit, "workflow.classified", AuditCategory::Workflow, outcome)
                .with_metadata("category", classification.category.as_str())
                .with_metadata(
                    "overall",
                    classification.overall.map(OverallStatus::as_str).unwrap_or("none"),
                )
                .with_metadata("active_step", active_step)
                .with_metadata("progress_percent", projection.percent().to_string())
                .with_metadata("workflow_status_present", workflow_status.is_some().to_string()),
        );
        classification
    }
}

/// Classifies with the standard templates and the default catalog.
pub fn classify(
    snapshot: &ProcedureSnapshot,
    workflow_status: Option<&WorkflowStatus>,
) -> Classification {
    static STANDARD: OnceLock<WorkflowClassifier> = OnceLock::new();
    STANDARD.get_or_init(WorkflowClassifier::default).classify(snapshot, workflow_status)
}

pub fn overall_status(
    predicates: &WorkflowPredicates,
    status: Option<i32>,
) -> Option<OverallStatus> {
    if predicates.is_rejected {
        Some(OverallStatus::Rejected)
    } else if predicates.is_prevention {
        Some(OverallStatus::Prevention)
    } else if status == Some(STATUS_APPROVED) {
        Some(OverallStatus::ApprovedPendingIssuance)
    } else if predicates.is_completed {
        Some(OverallStatus::Completed)
    } else {
        None
    }
}

// No step may read as completed after an earlier step that is not.
fn enforce_step_order(steps: &mut [WorkflowStep]) {
    let Some(first_open) = steps.iter().position(|step| !step.is_completed()) else {
        return;
    };

    for step in steps.iter_mut().skip(first_open + 1).filter(|step| step.is_completed()) {
        debug!(
            event_name = "workflow.step_demoted",
            step_id = %step.id,
            "completed step follows an incomplete one; rendering as pending"
        );
        step.status = StepStatus::Pending;
        step.blocked = true;
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, WorkflowClassifier};
    use crate::audit::{AuditContext, AuditOutcome, InMemoryAuditSink};
    use crate::domain::procedure::{Folio, ProcedureSnapshot, StepFlag};
    use crate::domain::workflow_status::{WorkflowMarker, WorkflowStatus};
    use crate::labels::{LabelCatalog, Locale};
    use crate::workflow::category::ProcedureCategory;
    use crate::workflow::states::{OverallStatus, StepStatus};

    fn statuses(snapshot: &ProcedureSnapshot) -> Vec<StepStatus> {
        classify(snapshot, None).steps.iter().map(|step| step.status).collect()
    }

    #[test]
    fn rejected_construction_blocks_submission_and_everything_after() {
        let snapshot = ProcedureSnapshot {
            step_one: StepFlag::Rejected,
            ..ProcedureSnapshot::new("Licencia de construcción", 3)
        };
        let classification = classify(&snapshot, None);

        assert_eq!(classification.overall, Some(OverallStatus::Rejected));
        let submission = classification.step("submission").expect("submission step");
        assert_eq!(submission.status, StepStatus::Pending);
        assert!(submission.blocked);
        assert!(submission.rejected);
        assert!(classification.steps[1..]
            .iter()
            .all(|step| step.status == StepStatus::Pending && !step.rejected));
    }

    #[test]
    fn issued_construction_license_completes_every_step() {
        let snapshot = ProcedureSnapshot {
            window_license_generated: true,
            ..ProcedureSnapshot::new("construction", 7)
        };
        let classification = classify(&snapshot, None);

        assert!(classification.steps.iter().all(|step| step.status == StepStatus::Completed));
        assert_eq!(classification.overall, Some(OverallStatus::Completed));
        assert_eq!(classification.progress().fraction, 1.0);
    }

    #[test]
    fn approved_commercial_procedure_holds_at_approval() {
        let classification =
            classify(&ProcedureSnapshot::new("Licencia de giro comercial", 2), None);

        assert_eq!(
            classification.step("aprobacion").map(|step| step.status),
            Some(StepStatus::Current)
        );
        assert_eq!(classification.overall, Some(OverallStatus::ApprovedPendingIssuance));
        let progress = classification.progress();
        assert!((progress.fraction - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(progress.active_index, 2);
    }

    #[test]
    fn generic_procedure_under_review_blocks_approval() {
        let snapshot = ProcedureSnapshot {
            sent_to_reviewers: true,
            step_one: StepFlag::NotCompleted,
            ..ProcedureSnapshot::new("Anuncio", 1)
        };
        let classification = classify(&snapshot, None);

        assert_eq!(classification.category, ProcedureCategory::Generic);
        let revision = classification.step("revision").expect("revision step");
        assert_eq!(revision.status, StepStatus::Current);
        let aprobacion = classification.step("aprobacion").expect("aprobacion step");
        assert_eq!(aprobacion.status, StepStatus::Pending);
        assert!(aprobacion.blocked);
        assert_eq!(classification.overall, None);
    }

    #[test]
    fn workflow_completion_wins_over_flags() {
        let workflow_status = WorkflowStatus::at(WorkflowMarker::Completed);
        for procedure_type in ["construccion", "giro", "refrendo", "otro"] {
            let classification =
                classify(&ProcedureSnapshot::new(procedure_type, 0), Some(&workflow_status));
            assert!(
                classification.steps.iter().all(|step| step.status == StepStatus::Completed),
                "{procedure_type}"
            );
            assert_eq!(classification.overall, Some(OverallStatus::Completed));
            assert_eq!(classification.progress().fraction, 1.0);
        }
    }

    #[test]
    fn out_of_order_flags_are_demoted_behind_an_open_step() {
        let snapshot = ProcedureSnapshot {
            director_approval: true,
            step_four: StepFlag::Completed,
            ..ProcedureSnapshot::new("construccion", 1)
        };
        let classification = classify(&snapshot, None);

        let license = classification.step("license_generation").expect("license step");
        assert_eq!(license.status, StepStatus::Pending);
        assert!(license.blocked);
    }

    #[test]
    fn rejected_review_renders_the_active_step_as_rejected() {
        let classification = classify(&ProcedureSnapshot::new("giro", 3), None);
        let revision = classification.step("revision").expect("revision step");

        assert_eq!(revision.status, StepStatus::Current);
        assert!(revision.rejected);
        assert_eq!(classification.steps.iter().filter(|step| step.rejected).count(), 1);
    }

    #[test]
    fn malformed_records_classify_as_nothing_started() {
        let classification = classify(&ProcedureSnapshot::default(), None);

        assert_eq!(classification.category, ProcedureCategory::Generic);
        assert!(classification.steps.iter().all(|step| step.status == StepStatus::Pending));
        assert_eq!(classification.overall, None);
        assert_eq!(classification.progress().fraction, 0.0);
    }

    #[test]
    fn classification_is_idempotent() {
        let snapshot = ProcedureSnapshot {
            sent_to_reviewers: true,
            step_one: StepFlag::Completed,
            step_two: StepFlag::Completed,
            ..ProcedureSnapshot::new("construccion", 1)
        };
        assert_eq!(classify(&snapshot, None), classify(&snapshot, None));
        assert_eq!(statuses(&snapshot), statuses(&snapshot.clone()));
    }

    #[test]
    fn labels_follow_the_catalog_locale() {
        let classifier = WorkflowClassifier::with_catalog(LabelCatalog::for_locale(Locale::En));
        let classification = classifier.classify(&ProcedureSnapshot::new("refrendo", 1), None);
        let labels: Vec<&str> =
            classification.steps.iter().map(|step| step.label.as_str()).collect();

        assert_eq!(labels, ["Renewal request", "Verification", "Approval", "Issuance"]);
    }

    #[test]
    fn classification_with_audit_emits_one_event() {
        let sink = InMemoryAuditSink::default();
        let snapshot = ProcedureSnapshot {
            folio: Some(Folio("VU-77".to_owned())),
            ..ProcedureSnapshot::new("giro", 2)
        };
        let classification = WorkflowClassifier::default().classify_with_audit(
            &snapshot,
            None,
            &sink,
            &AuditContext::new(snapshot.folio.clone(), "req-7", "detail-view"),
        );

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "workflow.classified");
        assert_eq!(events[0].outcome, AuditOutcome::Success);
        assert_eq!(
            events[0].metadata.get("overall").map(String::as_str),
            Some("approved_pending_issuance")
        );
        assert_eq!(events[0].metadata.get("progress_percent").map(String::as_str), Some("67"));
        assert_eq!(classification, classify(&snapshot, None));
    }

    #[test]
    fn audit_marks_records_without_status_as_degraded() {
        let sink = InMemoryAuditSink::default();
        WorkflowClassifier::default().classify_with_audit(
            &ProcedureSnapshot::default(),
            None,
            &sink,
            &AuditContext::new(None, "req-8", "procedure-list"),
        );

        assert_eq!(sink.events()[0].outcome, AuditOutcome::Degraded);
    }
}

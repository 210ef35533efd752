use proptest::prelude::*;
use visor_core::domain::procedure::{ProcedureSnapshot, StepFlag};
use visor_core::domain::workflow_status::{WorkflowMarker, WorkflowStatus};
use visor_core::workflow::{classify, StepStatus, WorkflowPredicates};

fn step_flag_strategy() -> impl Strategy<Value = StepFlag> {
    prop_oneof![Just(StepFlag::Rejected), Just(StepFlag::NotCompleted), Just(StepFlag::Completed)]
}

fn procedure_type_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Licencia de Construcción".to_string()),
        Just("construction".to_string()),
        Just("Licencia de giro".to_string()),
        Just("refrendo".to_string()),
        Just("anuncio".to_string()),
        Just(String::new()),
        "[a-zA-Z ]{0,24}",
    ]
}

fn snapshot_strategy() -> impl Strategy<Value = ProcedureSnapshot> {
    (
        procedure_type_strategy(),
        proptest::option::of(-2i32..10),
        any::<bool>(),
        [step_flag_strategy(), step_flag_strategy(), step_flag_strategy(), step_flag_strategy()],
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(procedure_type, status, sent_to_reviewers, flags, director, window)| {
                let [step_one, step_two, step_three, step_four] = flags;
                ProcedureSnapshot {
                    procedure_type,
                    status,
                    sent_to_reviewers,
                    step_one,
                    step_two,
                    step_three,
                    step_four,
                    director_approval: director,
                    window_license_generated: window,
                    ..ProcedureSnapshot::default()
                }
            },
        )
}

fn marker_strategy() -> impl Strategy<Value = WorkflowMarker> {
    prop_oneof![
        Just(WorkflowMarker::Completed),
        Just(WorkflowMarker::Rejected),
        Just(WorkflowMarker::Prevention),
        Just(WorkflowMarker::AprobacionCompleted),
        Just(WorkflowMarker::Other("en_revision".to_string())),
    ]
}

fn workflow_status_strategy() -> impl Strategy<Value = Option<WorkflowStatus>> {
    proptest::option::of(
        (proptest::option::of(marker_strategy()), proptest::option::of(any::<bool>())).prop_map(
            |(current_workflow_step, can_proceed_to_next_step)| WorkflowStatus {
                current_workflow_step,
                can_proceed_to_next_step,
            },
        ),
    )
}

/// Completed either by status code or by the authoritative marker, whatever the flags say.
fn completed_case_strategy() -> impl Strategy<Value = (ProcedureSnapshot, Option<WorkflowStatus>)> {
    prop_oneof![
        (snapshot_strategy(), 7i32..=12, workflow_status_strategy()).prop_map(
            |(snapshot, status, workflow_status)| {
                (ProcedureSnapshot { status: Some(status), ..snapshot }, workflow_status)
            },
        ),
        snapshot_strategy().prop_map(|snapshot| {
            (snapshot, Some(WorkflowStatus::at(WorkflowMarker::Completed)))
        }),
    ]
}

proptest! {
    #[test]
    fn classification_is_idempotent(
        snapshot in snapshot_strategy(),
        workflow_status in workflow_status_strategy(),
    ) {
        let first = classify(&snapshot, workflow_status.as_ref());
        let second = classify(&snapshot, workflow_status.as_ref());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn completed_procedures_complete_every_step(
        (snapshot, workflow_status) in completed_case_strategy(),
    ) {
        let predicates = WorkflowPredicates::evaluate(&snapshot, workflow_status.as_ref());
        prop_assert!(predicates.is_completed);

        let classification = classify(&snapshot, workflow_status.as_ref());
        prop_assert!(classification.steps.iter().all(|step| step.status == StepStatus::Completed));
        prop_assert_eq!(classification.progress().fraction, 1.0);
    }

    #[test]
    fn construction_types_select_the_construction_template(
        prefix in "[a-z ]{0,8}",
        suffix in "[a-z ]{0,8}",
        upper in any::<bool>(),
        snapshot in snapshot_strategy(),
    ) {
        let marker = if upper { "CONSTRUCTION" } else { "Construction" };
        let snapshot = ProcedureSnapshot {
            procedure_type: format!("{prefix}{marker}{suffix}"),
            ..snapshot
        };

        let classification = classify(&snapshot, None);
        prop_assert_eq!(
            classification.step_ids(),
            vec![
                "submission",
                "technical_review",
                "department_approval",
                "director_approval",
                "license_generation",
            ]
        );
    }

    #[test]
    fn rejected_marker_wins_over_status(snapshot in snapshot_strategy()) {
        let workflow_status = WorkflowStatus::at(WorkflowMarker::Rejected);
        let predicates = WorkflowPredicates::evaluate(&snapshot, Some(&workflow_status));
        prop_assert!(predicates.is_rejected);
    }

    #[test]
    fn progress_stays_within_bounds(
        snapshot in snapshot_strategy(),
        workflow_status in workflow_status_strategy(),
    ) {
        let projection = classify(&snapshot, workflow_status.as_ref()).progress();
        prop_assert!((0.0..=1.0).contains(&projection.fraction));
        prop_assert!(projection.percent() <= 100);
    }

    #[test]
    fn completed_steps_form_a_prefix(
        snapshot in snapshot_strategy(),
        workflow_status in workflow_status_strategy(),
    ) {
        let classification = classify(&snapshot, workflow_status.as_ref());
        let first_open = classification
            .steps
            .iter()
            .position(|step| step.status != StepStatus::Completed)
            .unwrap_or(classification.steps.len());

        prop_assert!(classification.steps[first_open..]
            .iter()
            .all(|step| step.status != StepStatus::Completed));
    }
}

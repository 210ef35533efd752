use std::path::Path;

use visor_core::audit::{AuditContext, InMemoryAuditSink};
use visor_core::config::AppConfig;
use visor_core::errors::ApplicationError;
use visor_core::labels::LabelCatalog;
use visor_core::snapshot;
use visor_core::view::WorkflowView;
use visor_core::workflow::{StepStatus, WorkflowClassifier, WorkflowStep};

use super::{drain_audit, read_json, to_pretty_json, CommandResult};

pub fn run(
    procedure: &Path,
    workflow_status: Option<&Path>,
    json: bool,
    config: &AppConfig,
) -> CommandResult {
    CommandResult::from_outcome("classify", execute(procedure, workflow_status, json, config))
}

fn execute(
    procedure: &Path,
    workflow_status: Option<&Path>,
    json: bool,
    config: &AppConfig,
) -> Result<String, ApplicationError> {
    let record = read_json(procedure)?;
    if !record.is_object() {
        return Err(ApplicationError::InvalidInput(format!(
            "`{}` must contain a single procedure object",
            procedure.display()
        )));
    }
    let snapshot = snapshot::read(&record);

    let workflow_status = match workflow_status {
        Some(path) => snapshot::read_workflow_status(&read_json(path)?),
        None => None,
    };

    let catalog = LabelCatalog::for_locale(config.display.locale);
    let classifier = WorkflowClassifier::with_catalog(catalog);
    let sink = InMemoryAuditSink::default();
    let context = AuditContext::new(
        snapshot.folio.clone(),
        procedure.display().to_string(),
        "visor-cli",
    );
    let classification =
        classifier.classify_with_audit(&snapshot, workflow_status.as_ref(), &sink, &context);
    drain_audit(&sink);

    let view = WorkflowView::from_classification(&snapshot, classification, &classifier);
    if json {
        to_pretty_json(&view)
    } else {
        Ok(render_view(&view))
    }
}

fn render_view(view: &WorkflowView) -> String {
    let folio = view.folio.as_ref().map(|folio| folio.0.as_str()).unwrap_or("<no folio>");
    let mut lines = vec![format!("folio: {folio} ({})", view.category)];

    if let (Some(overall), Some(message)) = (view.overall, view.overall_message.as_deref()) {
        lines.push(format!("overall: {} - {message}", overall.as_str()));
    }
    lines.push(format!("progress: {}%", view.progress.percent()));

    for (index, step) in view.steps.iter().enumerate() {
        lines.push(render_step(index + 1, step));
    }

    lines.join("\n")
}

fn render_step(position: usize, step: &WorkflowStep) -> String {
    let marker = match step.status {
        StepStatus::Completed => "[x]",
        StepStatus::Current => "[>]",
        StepStatus::Pending => "[ ]",
    };
    let mut line = format!("{marker} {position}. {}", step.label);
    if step.rejected {
        line.push_str(" (rejected)");
    }
    if step.blocked {
        line.push_str(" (blocked)");
    }
    line
}

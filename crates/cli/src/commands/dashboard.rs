use std::path::Path;

use serde::Serialize;
use visor_core::audit::{AuditContext, InMemoryAuditSink};
use visor_core::config::AppConfig;
use visor_core::domain::procedure::ProcedureSnapshot;
use visor_core::errors::ApplicationError;
use visor_core::labels::LabelCatalog;
use visor_core::snapshot;
use visor_core::view::{DashboardTally, ProcedureSummary, WorkflowView};
use visor_core::workflow::WorkflowClassifier;

use super::{drain_audit, read_json, to_pretty_json, CommandResult};

#[derive(Debug, Serialize)]
struct DashboardReport {
    tally: DashboardTally,
    procedures: Vec<ProcedureSummary>,
}

pub fn run(procedures: &Path, config: &AppConfig) -> CommandResult {
    CommandResult::from_outcome("dashboard", execute(procedures, config))
}

fn execute(procedures: &Path, config: &AppConfig) -> Result<String, ApplicationError> {
    let document = read_json(procedures)?;
    let records = document.as_array().ok_or_else(|| {
        ApplicationError::InvalidInput(format!(
            "`{}` must contain a json array of procedure records",
            procedures.display()
        ))
    })?;

    let snapshots: Vec<ProcedureSnapshot> = records.iter().map(snapshot::read).collect();
    let catalog = LabelCatalog::for_locale(config.display.locale);
    let classifier = WorkflowClassifier::with_catalog(catalog);

    let sink = InMemoryAuditSink::default();
    let context = AuditContext::new(None, procedures.display().to_string(), "visor-cli");
    let tally = DashboardTally::from_snapshots_with_audit(&snapshots, &classifier, &sink, &context);
    drain_audit(&sink);

    // List rows have no workflow status, same as the tally.
    let procedures = snapshots
        .iter()
        .map(|snapshot| ProcedureSummary::from(&WorkflowView::build(snapshot, None, &classifier)))
        .collect();

    to_pretty_json(&DashboardReport { tally, procedures })
}

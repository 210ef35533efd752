pub mod audit;
pub mod config;
pub mod domain;
pub mod errors;
pub mod labels;
pub mod progress;
pub mod snapshot;
pub mod view;
pub mod workflow;

pub use audit::{AuditContext, AuditEvent, AuditSink, InMemoryAuditSink};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::procedure::{Folio, ProcedureSnapshot, StepFlag};
pub use domain::workflow_status::{WorkflowMarker, WorkflowStatus};
pub use errors::ApplicationError;
pub use labels::{LabelCatalog, Locale};
pub use progress::ProgressProjection;
pub use view::{DashboardBucket, DashboardTally, ProcedureSummary, WorkflowView};
pub use workflow::{
    classify, Classification, OverallStatus, ProcedureCategory, StepStatus, TemplateRegistry,
    WorkflowClassifier, WorkflowPredicates, WorkflowStep,
};

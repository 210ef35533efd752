pub mod category;
pub mod engine;
pub mod predicates;
pub mod states;
pub mod templates;

pub use category::ProcedureCategory;
pub use engine::{classify, Classification, WorkflowClassifier};
pub use predicates::WorkflowPredicates;
pub use states::{OverallStatus, StepRule, StepStatus, WorkflowStep};
pub use templates::{RuleInput, StepDefinition, TemplateRegistry};

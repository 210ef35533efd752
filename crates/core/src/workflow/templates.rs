use std::collections::HashMap;

use crate::domain::procedure::{ProcedureSnapshot, StepFlag};
use crate::workflow::category::ProcedureCategory;
use crate::workflow::predicates::{WorkflowPredicates, STATUS_LICENSE_STAGE};
use crate::workflow::states::StepRule;

/// Everything a step rule may look at, resolved once per classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleInput {
    pub predicates: WorkflowPredicates,
    pub step_one: StepFlag,
    pub step_two: StepFlag,
    pub step_three: StepFlag,
    pub step_four: StepFlag,
    pub director_approval: bool,
    pub window_license_generated: bool,
    /// Status sits in the license-generation range (4 and up).
    pub license_stage: bool,
}

impl RuleInput {
    pub fn new(snapshot: &ProcedureSnapshot, predicates: WorkflowPredicates) -> Self {
        Self {
            predicates,
            step_one: snapshot.step_one,
            step_two: snapshot.step_two,
            step_three: snapshot.step_three,
            step_four: snapshot.step_four,
            director_approval: snapshot.director_approval,
            window_license_generated: snapshot.window_license_generated,
            license_stage: snapshot.status_at_least(STATUS_LICENSE_STAGE),
        }
    }

    fn rejected(&self) -> bool {
        self.predicates.is_rejected
    }

    fn approved(&self) -> bool {
        self.predicates.is_approved
    }

    fn in_progress_or_flagged(&self) -> bool {
        self.predicates.is_in_progress
            || self.predicates.is_rejected
            || self.predicates.is_prevention
    }

    fn signed_off(&self) -> bool {
        self.approved() || self.director_approval || self.license_stage
    }
}

pub type RuleFn = fn(&RuleInput) -> StepRule;

#[derive(Clone, Copy, Debug)]
pub struct StepDefinition {
    pub id: &'static str,
    pub rule: RuleFn,
}

impl StepDefinition {
    pub const fn new(id: &'static str, rule: RuleFn) -> Self {
        Self { id, rule }
    }

    pub fn evaluate(&self, input: &RuleInput) -> StepRule {
        (self.rule)(input)
    }
}

/// Ordered step templates keyed by procedure category.
#[derive(Clone, Debug)]
pub struct TemplateRegistry {
    templates: HashMap<ProcedureCategory, Vec<StepDefinition>>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl TemplateRegistry {
    pub fn empty() -> Self {
        Self { templates: HashMap::new() }
    }

    pub fn standard() -> Self {
        Self::empty()
            .with_template(ProcedureCategory::Construction, construction_template())
            .with_template(ProcedureCategory::Commercial, commercial_template())
            .with_template(ProcedureCategory::Renewal, renewal_template())
            .with_template(ProcedureCategory::Generic, generic_template())
    }

    pub fn with_template(
        mut self,
        category: ProcedureCategory,
        steps: Vec<StepDefinition>,
    ) -> Self {
        self.templates.insert(category, steps);
        self
    }

    /// Steps for `category`, falling back to the generic template.
    pub fn template(&self, category: ProcedureCategory) -> &[StepDefinition] {
        self.templates
            .get(&category)
            .or_else(|| self.templates.get(&ProcedureCategory::Generic))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn step_ids(&self, category: ProcedureCategory) -> Vec<&'static str> {
        self.template(category).iter().map(|step| step.id).collect()
    }
}

fn construction_template() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new("submission", |input| StepRule {
            completed: input.predicates.is_start_completed,
            in_progress: false,
            blocked: input.rejected() && input.step_one.is_rejected(),
        }),
        StepDefinition::new("technical_review", |input| StepRule {
            completed: input.step_two.is_completed(),
            in_progress: input.predicates.is_in_progress && !input.step_two.is_completed(),
            blocked: input.rejected() || input.step_one.is_rejected(),
        }),
        StepDefinition::new("department_approval", |input| StepRule {
            completed: input.step_three.is_completed(),
            in_progress: input.step_two.is_completed() && !input.step_three.is_completed(),
            blocked: input.rejected() || !input.step_two.is_completed(),
        }),
        StepDefinition::new("director_approval", |input| StepRule {
            completed: input.director_approval || input.approved(),
            in_progress: input.step_two.is_completed()
                && input.step_three.is_completed()
                && !input.director_approval,
            blocked: input.rejected()
                || !input.step_two.is_completed()
                || !input.step_three.is_completed(),
        }),
        StepDefinition::new("license_generation", |input| {
            let director_signed = input.director_approval || input.approved();
            StepRule {
                completed: input.window_license_generated || input.step_four.is_completed(),
                in_progress: director_signed && !input.window_license_generated,
                blocked: input.rejected() || !director_signed,
            }
        }),
    ]
}

// Approval stays open while the procedure is approved but not yet issued.
fn commercial_template() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new("inicio", |input| {
            StepRule::completed_when(input.predicates.is_start_completed)
        }),
        StepDefinition::new("revision", |input| StepRule {
            completed: input.approved()
                || input.license_stage
                || (input.step_one.is_completed() && input.step_two.is_completed()),
            in_progress: input.in_progress_or_flagged(),
            blocked: false,
        }),
        StepDefinition::new("aprobacion", |input| StepRule {
            completed: input.license_stage || input.window_license_generated,
            in_progress: input.approved()
                || (input.step_one.is_completed() && input.step_two.is_completed())
                || input.step_three.is_completed(),
            blocked: !input.approved() && !input.step_one.is_completed(),
        }),
        StepDefinition::new("finalizacion", |input| StepRule {
            completed: input.window_license_generated,
            in_progress: input.license_stage && !input.window_license_generated,
            blocked: input.rejected() || !(input.license_stage || input.window_license_generated),
        }),
    ]
}

fn generic_template() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new("inicio", |input| {
            StepRule::completed_when(input.predicates.is_start_completed)
        }),
        StepDefinition::new("revision", |input| StepRule {
            completed: input.step_one.is_completed() || input.approved() || input.license_stage,
            in_progress: input.in_progress_or_flagged(),
            blocked: false,
        }),
        StepDefinition::new("aprobacion", |input| StepRule {
            completed: input.signed_off(),
            in_progress: input.step_one.is_completed(),
            blocked: !input.step_one.is_completed() && !input.approved() && !input.license_stage,
        }),
        StepDefinition::new("finalizacion", |input| StepRule {
            completed: input.window_license_generated,
            in_progress: input.signed_off(),
            blocked: input.rejected() || !input.signed_off(),
        }),
    ]
}

fn renewal_template() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new("submission", |input| StepRule {
            completed: input.predicates.is_start_completed,
            in_progress: false,
            blocked: input.rejected() && input.step_one.is_rejected(),
        }),
        StepDefinition::new("verification", |input| StepRule {
            completed: input.step_one.is_completed() || input.approved() || input.license_stage,
            in_progress: input.in_progress_or_flagged(),
            blocked: input.step_one.is_rejected(),
        }),
        StepDefinition::new("approval", |input| StepRule {
            completed: input.signed_off(),
            in_progress: input.step_one.is_completed(),
            blocked: !input.step_one.is_completed() && !input.approved() && !input.license_stage,
        }),
        StepDefinition::new("issuance", |input| StepRule {
            completed: input.window_license_generated,
            in_progress: input.signed_off(),
            blocked: input.rejected() || !input.signed_off(),
        }),
    ]
}

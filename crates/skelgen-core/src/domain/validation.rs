use crate::domain::{
    entities::{Component, GenerationPlan},
    error::DomainError,
};

/// Centralized domain validation.
///
/// Services call these before rendering and before writing.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_component(component: &Component) -> Result<(), DomainError> {
        component.validate()
    }

    pub fn validate_plan(plan: &GenerationPlan) -> Result<(), DomainError> {
        plan.validate()
    }
}

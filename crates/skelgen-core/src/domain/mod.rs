// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for skelgen.
//!
//! This module contains the model, the expression evaluator and the template
//! engine. All I/O (project files, template directories, output files) is
//! handled via ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: rendering is synchronous
//! - **No I/O**: no filesystem, network, or external calls
//! - **Immutable model**: rendering only ever reads it
//! - **Parse once**: templates and expressions are parsed up front and
//!   rendered any number of times
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod expression;
pub mod template;
pub mod value;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    Argument, Component, GeneratedFile, GenerationPlan, Operation, Skeleton, Task, TypeRef,
    common::{RelativePath, is_identifier},
    generation::PRISTINE_DIR,
    model::NAMESPACE_SEPARATOR,
};

pub use error::{
    DomainError, ErrorCategory, EvalError, RenderError, RenderErrorKind, SyntaxError,
};
pub use expression::{Expr, Scope};
pub use template::{Chunk, Template};
pub use value::{OperationRef, TaskRef, Value};
pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use super::*;

    fn nav() -> Component {
        Component::new("nav").with_task(
            Task::new("Controller")
                .with_operation(Operation::new("reset").doc("back to the initial pose"))
                .with_operation(
                    Operation::new("getStatus")
                        .returns(TypeRef::new("Status"))
                        .argument("verbose", TypeRef::new("bool")),
                ),
        )
    }

    fn render(source: &str, component: &Component) -> Result<String, RenderError> {
        let task = &component.tasks()[0];
        let mut scope = Scope::new()
            .with("component", Value::Component(component))
            .with("task", Value::task(component, task));
        Template::parse(source)?.render(&mut scope)
    }

    // ========================================================================
    // Model + Template
    // ========================================================================

    #[test]
    fn return_branch_uses_first_return_type() {
        let template = "\
<% each op in task.self_operations %>
<%= op.qualified_signature %>
{
<% if op.has_return_value? %>
    return <%= op.return_type.first.cxx_name %>();
<% end %>
}
<% end %>
";
        assert_eq!(
            render(template, &nav()).unwrap(),
            "void Controller::reset()\n{\n}\nStatus Controller::getStatus(bool verbose)\n{\n    return Status();\n}\n"
        );
    }

    #[test]
    fn doc_comments_only_where_documented() {
        let template = "<% each op in task.operations %><% if op.has_doc? %>// <%= op.doc %>\n<% end %><% end %>";
        assert_eq!(render(template, &nav()).unwrap(), "// back to the initial pose\n");
    }

    #[test]
    fn argument_accessors() {
        let template = "<% each arg in task.operations.last.arguments %><%= arg.type.cxx_name %> <%= arg.name %><%= \" (scalar)\" if arg.type.scalar? %><% end %>";
        assert_eq!(render(template, &nav()).unwrap(), "bool verbose (scalar)");
    }

    #[test]
    fn component_tasks_iterate_in_order() {
        let component = nav().with_task(Task::new("Planner"));
        let template = "<% each t in component.tasks %><%= t.name %>;<% end %>";
        assert_eq!(
            render(template, &component).unwrap(),
            "nav::Controller;nav::Planner;"
        );
    }

    #[test]
    fn unknown_accessor_names_the_path() {
        let err = render("<%= task.component.nam %>", &nav()).unwrap_err();
        assert_eq!(err.path(), Some("task.component.nam"));
        assert!(matches!(
            err.kind,
            RenderErrorKind::Eval(EvalError::UnresolvedPath { on: "component", .. })
        ));
    }

    #[test]
    fn predicate_suffix_only_on_booleans() {
        let err = render("<%= task.basename? %>", &nav()).unwrap_err();
        assert!(matches!(
            err.kind,
            RenderErrorKind::Eval(EvalError::UnresolvedPath { .. })
        ));
    }

    #[test]
    fn interpolating_a_list_is_a_type_mismatch() {
        let err = render("<%= task.self_operations %>", &nav()).unwrap_err();
        assert!(matches!(
            err.kind,
            RenderErrorKind::Eval(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn string_guards_are_rejected() {
        let err = render("<% if task.basename %>x<% end %>", &nav()).unwrap_err();
        assert!(matches!(
            err.kind,
            RenderErrorKind::Eval(EvalError::TypeMismatch { expected: "a boolean", .. })
        ));
    }

    // ========================================================================
    // Validation
    // ========================================================================

    #[test]
    fn validator_checks_the_model() {
        assert!(DomainValidator::validate_component(&nav()).is_ok());
        let bad = Component::new("3d").with_task(Task::new("Controller"));
        assert!(DomainValidator::validate_component(&bad).is_err());
    }

    #[test]
    fn skeleton_errors_are_template_category() {
        let err = Skeleton::new("bad", "x", "<% end %>").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Template);
    }
}
